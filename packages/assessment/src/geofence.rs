//! Geofence evaluation.
//!
//! A geofence fires whenever the user is within its radius. No previous
//! state is tracked: a user who stays inside keeps producing
//! [`AlertType::Entry`] triggers on every check, and exits are never
//! reported. Callers needing edge-triggered alerts must diff successive
//! results themselves.

use tourist_safety_location_models::{AlertType, Coordinate, GeofenceTrigger, PointOfInterest};

/// Returns a trigger for every geofence containing `point`.
///
/// Results follow the order of `locations`, not distance.
#[must_use]
pub fn evaluate(point: &Coordinate, locations: &[PointOfInterest]) -> Vec<GeofenceTrigger> {
    locations
        .iter()
        .filter_map(|location| {
            let geofence = location.geofence.as_ref()?;
            let distance = tourist_safety_geo::distance(point, &location.coordinate);
            (distance <= geofence.radius_meters).then(|| GeofenceTrigger {
                poi_id: location.id.clone(),
                poi_name: location.name.clone(),
                trigger_type: AlertType::Entry,
                distance_meters: distance,
                alert_types: geofence.alert_types.clone(),
                safety_rating: location.safety_rating,
                risk_factors: location.risk_factors.clone(),
            })
        })
        .collect()
}
