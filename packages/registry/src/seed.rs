//! Compile-time registry of built-in points of interest.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new location requires creating a TOML file in `locations/` and
//! adding a corresponding entry here.

use std::path::Path;

use serde::Deserialize;
use tourist_safety_location_models::PointOfInterest;

use crate::RegistryError;

/// Number of built-in locations. Enforced by a test.
#[cfg(test)]
const EXPECTED_SEED_COUNT: usize = 4;

/// Embedded TOML location definitions, in registry order.
const LOCATION_TOMLS: &[(&str, &str)] = &[
    ("times_square", include_str!("../locations/times_square.toml")),
    ("central_park", include_str!("../locations/central_park.toml")),
    ("grand_central", include_str!("../locations/grand_central.toml")),
    (
        "brooklyn_bridge_park",
        include_str!("../locations/brooklyn_bridge_park.toml"),
    ),
];

/// Shape of a user-supplied locations file.
#[derive(Debug, Deserialize)]
struct LocationsFile {
    locations: Vec<PointOfInterest>,
}

/// Returns all built-in locations.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_seed_locations() -> Vec<PointOfInterest> {
    LOCATION_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse seed location '{name}': {e}"))
        })
        .collect()
}

/// Parses a `[[locations]]` TOML document.
///
/// # Errors
///
/// Returns [`RegistryError::Toml`] if the document is malformed.
pub fn parse_locations(toml_str: &str) -> Result<Vec<PointOfInterest>, RegistryError> {
    let file: LocationsFile = toml::de::from_str(toml_str)?;
    Ok(file.locations)
}

/// Reads and parses a `[[locations]]` TOML file.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the file cannot be read, or
/// [`RegistryError::Toml`] if it is malformed.
pub fn load_locations_file(path: &Path) -> Result<Vec<PointOfInterest>, RegistryError> {
    let contents = std::fs::read_to_string(path)?;
    let locations = parse_locations(&contents)?;
    log::info!(
        "Loaded {} locations from {}",
        locations.len(),
        path.display()
    );
    Ok(locations)
}
