#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geospatial risk assessment over the location registry.
//!
//! Everything here is a pure function of the caller's input and the current
//! registry contents. Nothing is cached, so a rating change is reflected by
//! the very next geofence check or nearby search.

pub mod geofence;
pub mod queries;
pub mod report;
pub mod risk;

use thiserror::Error;
use tourist_safety_location_models::ValidationError;
use tourist_safety_registry::RegistryError;

/// Errors that can occur during assessment operations.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// Registry lookup or update failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Request input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Coarse classification of an [`AssessmentError`] for callers that map
/// errors onto transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or out-of-range input; the caller can fix it.
    Validation,
    /// The referenced location does not exist.
    NotFound,
    /// Anything else.
    Internal,
}

impl AssessmentError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Registry(RegistryError::Validation(_)) => {
                ErrorKind::Validation
            }
            Self::Registry(RegistryError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Registry(_) => ErrorKind::Internal,
        }
    }
}
