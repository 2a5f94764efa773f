#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Authoritative in-memory store of points of interest.
//!
//! The registry is the only shared mutable state in the system. Reads clone
//! a consistent snapshot under a read lock; each mutation runs entirely
//! under the write lock, so concurrent readers observe a location either
//! fully before or fully after an update.

pub mod seed;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tourist_safety_location_models::{
    Coordinate, LocationCategory, MIN_SAFETY_RATING, PointOfInterest, Severity, ValidationError,
    dedup_first_seen, validate_safety_rating,
};

/// Rating deducted from a location for each high-severity report.
pub const REPORT_PENALTY: f64 = 0.5;

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No location has the requested ID.
    #[error("Location not found: {id}")]
    NotFound {
        /// The ID that was looked up.
        id: String,
    },

    /// Input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A location with the same ID is already registered.
    #[error("Duplicate location ID: {id}")]
    DuplicateId {
        /// The conflicting ID.
        id: String,
    },

    /// A locations file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A locations file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A circular search area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    /// Center of the search area.
    pub center: Coordinate,
    /// Radius in meters (inclusive).
    pub radius_meters: f64,
}

/// Combined filter for [`LocationRegistry::search`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilter {
    /// Only include locations of this category.
    pub category: Option<LocationCategory>,
    /// Only include locations inside this area.
    pub proximity: Option<Proximity>,
}

#[derive(Default)]
struct Store {
    /// Locations in insertion order.
    locations: Vec<PointOfInterest>,
    /// location ID -> index into `locations`
    index: BTreeMap<String, usize>,
}

impl Store {
    fn get_mut(&mut self, id: &str) -> Result<&mut PointOfInterest, RegistryError> {
        let idx = *self.index.get(id).ok_or_else(|| RegistryError::NotFound {
            id: id.to_string(),
        })?;
        Ok(&mut self.locations[idx])
    }
}

/// Thread-safe registry of points of interest.
#[derive(Default)]
pub struct LocationRegistry {
    store: RwLock<Store>,
}

impl LocationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from the given locations, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if any location is invalid or duplicates
    /// an earlier ID.
    pub fn from_locations<I>(locations: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = PointOfInterest>,
    {
        let registry = Self::new();
        for location in locations {
            registry.insert(location)?;
        }
        Ok(registry)
    }

    /// Creates a registry holding the built-in locations.
    ///
    /// # Panics
    ///
    /// Panics if the embedded seed data is invalid. The seed tests guard
    /// against this.
    #[must_use]
    pub fn with_seed_locations() -> Self {
        let registry = Self::from_locations(seed::all_seed_locations())
            .unwrap_or_else(|e| panic!("Invalid seed locations: {e}"));
        log::info!("Loaded {} seed locations", registry.len());
        registry
    }

    /// Creates a registry from a `[[locations]]` TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed, or
    /// contains invalid or duplicate locations.
    pub fn from_toml_file(path: &Path) -> Result<Self, RegistryError> {
        Self::from_locations(seed::load_locations_file(path)?)
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a location to the end of the registry.
    ///
    /// Risk factors and alert types are deduplicated on the way in.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] if the location breaks an
    /// invariant, or [`RegistryError::DuplicateId`] if its ID is taken.
    pub fn insert(&self, mut location: PointOfInterest) -> Result<(), RegistryError> {
        location.validate()?;
        location.normalize();

        let mut store = self.write();
        if store.index.contains_key(&location.id) {
            return Err(RegistryError::DuplicateId { id: location.id });
        }
        let idx = store.locations.len();
        store.index.insert(location.id.clone(), idx);
        store.locations.push(location);
        Ok(())
    }

    /// Number of registered locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().locations.len()
    }

    /// Returns `true` if no locations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().locations.is_empty()
    }

    /// Returns every location in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<PointOfInterest> {
        self.read().locations.clone()
    }

    /// Looks up a location by ID.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no location has this ID.
    pub fn get(&self, id: &str) -> Result<PointOfInterest, RegistryError> {
        let store = self.read();
        store
            .index
            .get(id)
            .map(|&idx| store.locations[idx].clone())
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })
    }

    /// Returns locations of the given category, in insertion order.
    #[must_use]
    pub fn filter_by_category(&self, category: &LocationCategory) -> Vec<PointOfInterest> {
        self.search(&LocationFilter {
            category: Some(category.clone()),
            proximity: None,
        })
    }

    /// Returns locations within `radius_meters` of `center` (inclusive), in
    /// insertion order.
    #[must_use]
    pub fn filter_by_proximity(
        &self,
        center: &Coordinate,
        radius_meters: f64,
    ) -> Vec<PointOfInterest> {
        self.search(&LocationFilter {
            category: None,
            proximity: Some(Proximity {
                center: *center,
                radius_meters,
            }),
        })
    }

    /// Returns locations matching every part of `filter`, in insertion
    /// order.
    #[must_use]
    pub fn search(&self, filter: &LocationFilter) -> Vec<PointOfInterest> {
        self.read()
            .locations
            .iter()
            .filter(|loc| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|category| &loc.category == category)
            })
            .filter(|loc| {
                filter.proximity.is_none_or(|p| {
                    tourist_safety_geo::within_radius(&p.center, &loc.coordinate, p.radius_meters)
                })
            })
            .cloned()
            .collect()
    }

    /// Replaces a location's safety rating, and its risk factors if given.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no location has this ID, or
    /// [`RegistryError::Validation`] if `rating` is outside `[1, 5]`.
    pub fn update_safety_rating(
        &self,
        id: &str,
        rating: f64,
        risk_factors: Option<Vec<String>>,
    ) -> Result<PointOfInterest, RegistryError> {
        let mut store = self.write();
        let location = store.get_mut(id)?;
        let rating = validate_safety_rating(rating)?;

        let previous = location.safety_rating;
        location.safety_rating = rating;
        if let Some(factors) = risk_factors {
            location.risk_factors = dedup_first_seen(factors);
        }
        location.last_updated = location.last_updated.max(Utc::now());

        log::info!("Safety rating for location {id} changed from {previous} to {rating}");
        Ok(location.clone())
    }

    /// Lowers a location's rating by [`REPORT_PENALTY`] for a
    /// high-severity report, never going below the minimum rating.
    ///
    /// Other severities leave the rating untouched. Returns whether the
    /// location was penalized.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no location has this ID.
    pub fn apply_report_penalty(&self, id: &str, severity: Severity) -> Result<bool, RegistryError> {
        let mut store = self.write();
        let location = store.get_mut(id)?;

        if severity != Severity::High {
            return Ok(false);
        }

        let previous = location.safety_rating;
        location.safety_rating = (previous - REPORT_PENALTY).max(MIN_SAFETY_RATING);
        location.last_updated = location.last_updated.max(Utc::now());

        log::debug!(
            "Penalized location {id} for a {severity} severity report: {previous} -> {}",
            location.safety_rating
        );
        Ok(true)
    }
}
