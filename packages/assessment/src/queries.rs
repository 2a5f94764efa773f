//! The request shapes served by the location API.
//!
//! Each function validates its raw input, reads the registry, and returns a
//! serializable result. Missing fields surface as
//! [`ValidationError::MissingField`].

use serde::{Deserialize, Serialize};
use tourist_safety_location_models::{
    Coordinate, GeofenceTrigger, PointOfInterest, RiskAssessment, ValidationError,
};
use tourist_safety_registry::LocationRegistry;

use crate::{AssessmentError, geofence, risk};

/// Search radius used when a nearby query does not give one.
pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 1_000.0;

/// Raw nearby-search input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    /// User latitude.
    pub lat: Option<f64>,
    /// User longitude.
    pub lng: Option<f64>,
    /// Search radius in meters.
    pub radius: Option<f64>,
}

/// Locations near the user with a risk summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResult {
    /// Locations within the search radius, in registry order.
    pub locations: Vec<PointOfInterest>,
    /// Risk summary over `locations`.
    pub risk_assessment: RiskAssessment,
    /// Radius that was searched, in meters.
    pub search_radius: f64,
    /// Number of locations found.
    pub count: usize,
}

/// Raw geofence-check input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceCheck {
    /// User latitude.
    pub lat: Option<f64>,
    /// User longitude.
    pub lng: Option<f64>,
    /// User being checked.
    pub user_id: Option<String>,
}

/// Geofences the user is currently inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceCheckResult {
    /// Triggered geofences, in registry order.
    pub triggered_geofences: Vec<GeofenceTrigger>,
    /// The position that was checked.
    pub user_location: Coordinate,
    /// Number of triggered geofences.
    pub count: usize,
}

/// Raw safety-rating update input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRatingUpdate {
    /// New rating in `[1, 5]`.
    pub rating: Option<f64>,
    /// Replacement risk factors; existing ones are kept if absent.
    pub risk_factors: Option<Vec<String>>,
}

fn required_coordinate(lat: Option<f64>, lng: Option<f64>) -> Result<Coordinate, ValidationError> {
    let lat = lat.ok_or(ValidationError::MissingField { field: "lat" })?;
    let lng = lng.ok_or(ValidationError::MissingField { field: "lng" })?;
    Coordinate::new(lat, lng)
}

/// Finds locations around the user and assesses their combined risk.
///
/// # Errors
///
/// Returns [`AssessmentError::Validation`] if `lat`/`lng` are missing or out
/// of range, or the radius is not a finite number. A negative radius matches
/// nothing.
pub fn nearby(
    registry: &LocationRegistry,
    query: &NearbyQuery,
) -> Result<NearbyResult, AssessmentError> {
    let center = required_coordinate(query.lat, query.lng)?;
    let radius = query.radius.unwrap_or(DEFAULT_SEARCH_RADIUS_METERS);
    if !radius.is_finite() {
        return Err(ValidationError::InvalidSearchRadius(radius).into());
    }

    let locations = registry.filter_by_proximity(&center, radius);
    let risk_assessment = risk::assess(&locations);

    Ok(NearbyResult {
        count: locations.len(),
        locations,
        risk_assessment,
        search_radius: radius,
    })
}

/// Reports which geofences contain the user.
///
/// # Errors
///
/// Returns [`AssessmentError::Validation`] if any field is missing (an empty
/// `userId` counts as missing) or the coordinate is out of range.
pub fn check_geofences(
    registry: &LocationRegistry,
    check: &GeofenceCheck,
) -> Result<GeofenceCheckResult, AssessmentError> {
    let user_location = required_coordinate(check.lat, check.lng)?;
    let user_id = check
        .user_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingField { field: "userId" })?;

    let triggered_geofences = geofence::evaluate(&user_location, &registry.list_all());
    log::debug!(
        "User {user_id} at {user_location} is inside {} geofence(s)",
        triggered_geofences.len()
    );

    Ok(GeofenceCheckResult {
        count: triggered_geofences.len(),
        triggered_geofences,
        user_location,
    })
}

/// Sets a location's safety rating, and optionally its risk factors.
///
/// # Errors
///
/// Returns a not-found error if `id` is unknown, otherwise
/// [`AssessmentError::Validation`] if the rating is missing or outside
/// `[1, 5]`.
pub fn update_safety_rating(
    registry: &LocationRegistry,
    id: &str,
    update: SafetyRatingUpdate,
) -> Result<PointOfInterest, AssessmentError> {
    let Some(rating) = update.rating else {
        registry.get(id)?;
        return Err(ValidationError::MissingField { field: "rating" }.into());
    };

    Ok(registry.update_safety_rating(id, rating, update.risk_factors)?)
}
