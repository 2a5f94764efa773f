//! HTTP handler functions for the tourist safety API.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use tourist_safety_assessment::queries::{self, GeofenceCheck, NearbyQuery, SafetyRatingUpdate};
use tourist_safety_assessment::report::{self, ReportOutcome};
use tourist_safety_assessment::{AssessmentError, ErrorKind};
use tourist_safety_location_models::{Coordinate, LocationCategory, SafetyReport, ValidationError};
use tourist_safety_registry::{LocationFilter, Proximity, RegistryError};
use tourist_safety_server_models::{ApiHealth, ApiResponse, LocationQueryParams};

use crate::AppState;

/// Error returned by handlers, rendered as an [`ApiResponse`] envelope.
#[derive(Debug)]
pub struct ApiError(AssessmentError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.kind() {
            ErrorKind::NotFound => f.write_str("Location not found"),
            ErrorKind::Validation | ErrorKind::Internal => write!(f, "{}", self.0),
        }
    }
}

impl From<AssessmentError> for ApiError {
    fn from(e: AssessmentError) -> Self {
        Self(e)
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        Self(e.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self(e.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.0.kind() == ErrorKind::Internal {
            log::error!("Request failed: {}", self.0);
        }
        HttpResponse::build(self.status_code()).json(ApiResponse::error(self.to_string()))
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/locations`
///
/// Lists locations, optionally filtered by category and proximity.
pub async fn list_locations(
    state: web::Data<AppState>,
    params: web::Query<LocationQueryParams>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();

    let proximity = match (params.lat, params.lng, params.radius) {
        (Some(lat), Some(lng), Some(radius_meters)) => Some(Proximity {
            center: Coordinate::new(lat, lng)?,
            radius_meters,
        }),
        _ => None,
    };

    // `?type=` with no value means no category filter.
    let category = params
        .category
        .filter(|c| !matches!(c, LocationCategory::Other(name) if name.is_empty()));

    let locations = state.registry.search(&LocationFilter {
        category,
        proximity,
    });
    let count = locations.len();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(locations).with_count(count)))
}

/// `GET /api/locations/{id}`
pub async fn get_location(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let location = state.registry.get(&id)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(location)))
}

/// `POST /api/locations/nearby`
///
/// Returns locations around the user with an aggregated risk assessment.
pub async fn nearby(
    state: web::Data<AppState>,
    body: web::Json<NearbyQuery>,
) -> Result<HttpResponse, ApiError> {
    let result = queries::nearby(&state.registry, &body)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}

/// `POST /api/locations/geofence/check`
///
/// Returns every geofence the user is currently inside.
pub async fn geofence_check(
    state: web::Data<AppState>,
    body: web::Json<GeofenceCheck>,
) -> Result<HttpResponse, ApiError> {
    let result = queries::check_geofences(&state.registry, &body)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}

/// `POST /api/locations/safety-report`
///
/// Accepts a safety report. High-severity reports lower the rating of the
/// location they name.
pub async fn safety_report(
    state: web::Data<AppState>,
    body: web::Json<SafetyReport>,
) -> HttpResponse {
    let filed = report::file_report(&state.registry, body.into_inner());

    match filed.outcome {
        ReportOutcome::Penalized | ReportOutcome::Unchanged | ReportOutcome::NoLocation => {
            log::info!(
                "New safety report {} ({} severity, {})",
                filed.id,
                filed.report.severity,
                filed.outcome
            );
        }
        ReportOutcome::UnknownLocation => {
            log::warn!(
                "Safety report {} names unknown location {:?}",
                filed.id,
                filed.report.poi_id
            );
        }
    }

    HttpResponse::Created()
        .json(ApiResponse::ok(filed).with_message("Safety report submitted successfully"))
}

/// `PUT /api/locations/{id}/safety-rating`
pub async fn update_safety_rating(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<SafetyRatingUpdate>,
) -> Result<HttpResponse, ApiError> {
    let location = queries::update_safety_rating(&state.registry, &id, body.into_inner())?;
    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(location).with_message("Location safety rating updated successfully"),
    ))
}
