#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-of-interest, geofence, and risk assessment types.
//!
//! These types are shared by the location registry, the assessment engine,
//! and the API layer. Field names serialize to the JSON shape the mobile and
//! web clients already consume (`coordinates`, `type`, `radius`, ...).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lowest allowed safety rating.
pub const MIN_SAFETY_RATING: f64 = 1.0;

/// Highest allowed safety rating.
pub const MAX_SAFETY_RATING: f64 = 5.0;

/// Well-known risk factor tags that drive recommendations.
pub mod risk_factor {
    /// Dense crowds (pickpocket risk).
    pub const CROWDED: &str = "crowded";
    /// Parts of the location are deserted after dark.
    pub const ISOLATED_AREAS_AT_NIGHT: &str = "isolated_areas_at_night";
}

/// Caller-correctable input errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside `[-180, 180]` or not finite.
    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Safety rating outside `[1, 5]` or not finite.
    #[error("Safety rating must be between 1 and 5 (got {0})")]
    SafetyRatingOutOfRange(f64),

    /// Geofence radius that is not strictly positive.
    #[error("Geofence radius must be positive (got {0})")]
    InvalidGeofenceRadius(f64),

    /// Search radius that is not a finite number.
    #[error("Search radius must be a finite number (got {0})")]
    InvalidSearchRadius(f64),

    /// A required request field was absent.
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field as it appears on the wire.
        field: &'static str,
    },

    /// A location was defined without an identifier.
    #[error("Location id must not be empty")]
    EmptyId,
}

/// Returns `true` if `rating` lies within `[1, 5]`.
#[must_use]
pub fn is_valid_safety_rating(rating: f64) -> bool {
    rating.is_finite() && (MIN_SAFETY_RATING..=MAX_SAFETY_RATING).contains(&rating)
}

/// Checks that `rating` lies within `[1, 5]`.
///
/// # Errors
///
/// Returns [`ValidationError::SafetyRatingOutOfRange`] otherwise.
pub fn validate_safety_rating(rating: f64) -> Result<f64, ValidationError> {
    if is_valid_safety_rating(rating) {
        Ok(rating)
    } else {
        Err(ValidationError::SafetyRatingOutOfRange(rating))
    }
}

/// Deduplicates tags, keeping the first occurrence of each.
#[must_use]
pub fn dedup_first_seen<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in degrees.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if either component is out of range
    /// or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

/// Kind of place a point of interest represents.
///
/// The set is open: unrecognized names round-trip through
/// [`LocationCategory::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationCategory {
    /// Landmarks and sightseeing spots.
    TouristAttraction,
    /// Parks and green spaces.
    Park,
    /// Museums and galleries.
    Museum,
    /// Stations, terminals, and airports.
    TransitHub,
    /// Beaches and waterfronts.
    Beach,
    /// Markets and shopping streets.
    Market,
    /// Any category not listed above.
    Other(String),
}

impl LocationCategory {
    /// Returns the wire name of this category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TouristAttraction => "tourist_attraction",
            Self::Park => "park",
            Self::Museum => "museum",
            Self::TransitHub => "transit_hub",
            Self::Beach => "beach",
            Self::Market => "market",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "tourist_attraction" => Self::TouristAttraction,
            "park" => Self::Park,
            "museum" => Self::Museum,
            "transit_hub" => Self::TransitHub,
            "beach" => Self::Beach,
            "market" => Self::Market,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<String> for LocationCategory {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(category) => category,
            Err(infallible) => match infallible {},
        }
    }
}

impl From<LocationCategory> for String {
    fn from(category: LocationCategory) -> Self {
        match category {
            LocationCategory::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Geofence transition a point of interest wants alerts for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
    /// The user moved inside the geofence.
    Entry,
    /// The user left the geofence.
    Exit,
}

/// A circular geofence centered on a point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
    /// Radius in meters.
    #[serde(rename = "radius")]
    pub radius_meters: f64,
    /// Transitions that should raise alerts.
    pub alert_types: Vec<AlertType>,
}

impl Geofence {
    /// Creates a geofence, deduplicating alert types.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGeofenceRadius`] if the radius is
    /// not strictly positive.
    pub fn new(
        radius_meters: f64,
        alert_types: impl IntoIterator<Item = AlertType>,
    ) -> Result<Self, ValidationError> {
        let fence = Self {
            radius_meters,
            alert_types: alert_types.into_iter().collect(),
        }
        .normalized();
        fence.validate()?;
        Ok(fence)
    }

    /// Checks the radius invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGeofenceRadius`] if the radius is
    /// not strictly positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.radius_meters.is_finite() && self.radius_meters > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::InvalidGeofenceRadius(self.radius_meters))
        }
    }

    #[must_use]
    fn normalized(mut self) -> Self {
        let mut seen = BTreeSet::new();
        self.alert_types.retain(|t| seen.insert(*t));
        self
    }
}

/// Type of emergency service near a point of interest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmergencyServiceType {
    /// Police station or patrol post.
    Police,
    /// Hospital, clinic, or ambulance post.
    Medical,
    /// Fire station.
    Fire,
    /// Dedicated tourist police desk.
    TouristPolice,
}

/// An emergency service reachable from a point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyService {
    /// Kind of service.
    #[serde(rename = "type")]
    pub service_type: EmergencyServiceType,
    /// Walking distance from the point of interest, in meters.
    #[serde(rename = "distance")]
    pub distance_meters: f64,
    /// Phone number or other contact.
    pub contact: String,
}

/// A named, located place with a safety rating and optional geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    /// Unique, stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Kind of place.
    #[serde(rename = "type")]
    pub category: LocationCategory,
    /// Location of the place.
    #[serde(rename = "coordinates")]
    pub coordinate: Coordinate,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Safety rating from 1 (least safe) to 5 (safest).
    pub safety_rating: f64,
    /// Risk factor tags, e.g. `crowded`.
    #[serde(default)]
    pub risk_factors: Vec<String>,
    /// Geofence around the place, if alerts are configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geofence: Option<Geofence>,
    /// Nearby emergency services.
    #[serde(default)]
    pub emergency_services: Vec<EmergencyService>,
    /// When the safety data was last changed.
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl PointOfInterest {
    /// Checks every invariant of a point of interest.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Coordinate::new(self.coordinate.latitude, self.coordinate.longitude)?;
        validate_safety_rating(self.safety_rating)?;
        if let Some(geofence) = &self.geofence {
            geofence.validate()?;
        }
        Ok(())
    }

    /// Deduplicates risk factors and alert types in place.
    pub fn normalize(&mut self) {
        self.risk_factors = dedup_first_seen(std::mem::take(&mut self.risk_factors));
        if let Some(geofence) = self.geofence.take() {
            self.geofence = Some(geofence.normalized());
        }
    }

    /// Returns `true` if this location carries the given risk factor tag.
    #[must_use]
    pub fn has_risk_factor(&self, tag: &str) -> bool {
        self.risk_factors.iter().any(|f| f == tag)
    }
}

/// Severity of a filed safety report.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    /// Minor concern.
    Low,
    /// Notable concern. Reports default to this.
    #[default]
    Medium,
    /// Serious incident; lowers the location's safety rating.
    High,
}

/// Coarse risk bucket derived from nearby safety ratings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    /// Score below 40.
    Low,
    /// Score from 40 up to 60.
    Medium,
    /// Score of 60 or more.
    High,
    /// No locations to assess.
    Unknown,
}

/// A geofence the user is currently inside.
///
/// Produced fresh on every check and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceTrigger {
    /// Location whose geofence fired.
    #[serde(rename = "locationId")]
    pub poi_id: String,
    /// Name of that location.
    #[serde(rename = "locationName")]
    pub poi_name: String,
    /// Always [`AlertType::Entry`]; prior state is not tracked.
    #[serde(rename = "type")]
    pub trigger_type: AlertType,
    /// Distance from the user to the location, in meters.
    #[serde(rename = "distance")]
    pub distance_meters: f64,
    /// Alert types configured on the geofence.
    pub alert_types: Vec<AlertType>,
    /// Current safety rating of the location.
    pub safety_rating: f64,
    /// Current risk factors of the location.
    pub risk_factors: Vec<String>,
}

/// Aggregated risk summary for a set of nearby locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Coarse risk bucket.
    pub level: RiskLevel,
    /// Risk score in `[0, 100]`.
    pub score: u8,
    /// Union of nearby risk factors, in first-seen order.
    pub factors: Vec<String>,
    /// Mean safety rating rounded to one decimal; absent when nothing is
    /// nearby.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_safety_rating: Option<f64>,
    /// Deduplicated advice, most general first.
    pub recommendations: Vec<String>,
}

/// A safety incident reported by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    /// Location the report is about.
    #[serde(default, rename = "locationId")]
    pub poi_id: Option<String>,
    /// Reporting user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Free-form incident type.
    #[serde(default = "default_incident_type")]
    pub incident_type: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Reported severity.
    #[serde(default)]
    pub severity: Severity,
    /// Where the incident happened, if different from the location.
    #[serde(default, rename = "coordinates")]
    pub coordinate: Option<Coordinate>,
}

fn default_incident_type() -> String {
    "other".to_string()
}
