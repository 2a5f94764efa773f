#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the tourist safety service.
//!
//! Serves the JSON REST API for location lookup, nearby risk assessment,
//! geofence checks, and safety reports. All state lives in a single shared
//! [`LocationRegistry`], loaded at startup from the built-in seed locations
//! or from the TOML file named by `TOURIST_SAFETY_LOCATIONS`.

mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use tourist_safety_registry::{LocationRegistry, RegistryError};

pub use handlers::ApiError;

/// Environment variable naming an optional locations TOML file.
pub const LOCATIONS_FILE_ENV: &str = "TOURIST_SAFETY_LOCATIONS";

/// Shared application state.
pub struct AppState {
    /// Registry of points of interest. The only mutable state.
    pub registry: Arc<LocationRegistry>,
}

/// Builds the registry from `TOURIST_SAFETY_LOCATIONS` if set, otherwise
/// from the built-in seed locations.
///
/// # Errors
///
/// Returns [`RegistryError`] if the configured file cannot be loaded.
pub fn registry_from_env() -> Result<LocationRegistry, RegistryError> {
    match std::env::var(LOCATIONS_FILE_ENV) {
        Ok(path) if !path.is_empty() => LocationRegistry::from_toml_file(Path::new(&path)),
        _ => Ok(LocationRegistry::with_seed_locations()),
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/locations", web::get().to(handlers::list_locations))
            .route("/locations/nearby", web::post().to(handlers::nearby))
            .route(
                "/locations/geofence/check",
                web::post().to(handlers::geofence_check),
            )
            .route(
                "/locations/safety-report",
                web::post().to(handlers::safety_report),
            )
            .route("/locations/{id}", web::get().to(handlers::get_location))
            .route(
                "/locations/{id}/safety-rating",
                web::put().to(handlers::update_safety_rating),
            ),
    );
}

/// Starts the tourist safety API server.
///
/// Loads the location registry and starts the Actix-Web HTTP server on
/// `BIND_ADDR:PORT` (default `127.0.0.1:8080`). This is a regular async
/// function; the caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the locations file cannot be
/// loaded, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    log::info!("Loading location registry...");
    let registry = registry_from_env().map_err(std::io::Error::other)?;
    log::info!("Registry holds {} locations", registry.len());

    let state = web::Data::new(AppState {
        registry: Arc::new(registry),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    fn seeded_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            registry: Arc::new(LocationRegistry::with_seed_locations()),
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .configure(configure_api),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let state = seeded_state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn lists_and_filters_locations() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/locations").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 4);
        assert_eq!(body["data"][0]["name"], "Times Square");
        assert_eq!(body["data"][0]["coordinates"], json!({ "lat": 40.758, "lng": -73.9855 }));

        let req = test::TestRequest::get()
            .uri("/api/locations?type=park&lat=40.758&lng=-73.9855&radius=5000")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["id"], "2");
    }

    #[actix_web::test]
    async fn empty_type_filter_lists_everything() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/locations?type=")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 4);
    }

    #[actix_web::test]
    async fn nearby_with_zero_radius_finds_exact_match() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/locations/nearby")
            .set_json(json!({ "lat": 40.758, "lng": -73.9855, "radius": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["count"], 1);
        assert_eq!(body["data"]["locations"][0]["id"], "1");
    }

    #[actix_web::test]
    async fn get_location_by_id() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/locations/2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "Central Park");
        assert_eq!(body["data"]["geofence"]["radius"], 1000.0);

        let req = test::TestRequest::get().uri("/api/locations/99").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Location not found");
    }

    #[actix_web::test]
    async fn nearby_returns_risk_assessment() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/locations/nearby")
            .set_json(json!({ "lat": 40.758, "lng": -73.9855 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let data = &body["data"];
        assert_eq!(data["count"], 2);
        assert_eq!(data["searchRadius"], 1000.0);
        assert_eq!(data["riskAssessment"]["level"], "low");
        assert_eq!(data["riskAssessment"]["score"], 35);
        assert_eq!(data["riskAssessment"]["avgSafetyRating"], 3.3);
    }

    #[actix_web::test]
    async fn nearby_without_coordinates_is_bad_request() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/locations/nearby")
            .set_json(json!({ "lat": 40.758 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn geofence_check_reports_triggers() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/locations/geofence/check")
            .set_json(json!({ "lat": 40.758, "lng": -73.9855, "userId": "user-1" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let data = &body["data"];
        assert_eq!(data["count"], 1);
        assert_eq!(data["triggeredGeofences"][0]["locationId"], "1");
        assert_eq!(data["triggeredGeofences"][0]["type"], "entry");
        assert_eq!(
            data["triggeredGeofences"][0]["alertTypes"],
            json!(["entry", "exit"])
        );
        assert_eq!(data["userLocation"], json!({ "lat": 40.758, "lng": -73.9855 }));

        let req = test::TestRequest::post()
            .uri("/api/locations/geofence/check")
            .set_json(json!({ "lat": 40.758, "lng": -73.9855 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn high_severity_report_lowers_rating() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/locations/safety-report")
            .set_json(json!({
                "locationId": "2",
                "userId": "user-1",
                "incidentType": "theft",
                "severity": "high"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], "pending");
        assert_eq!(body["data"]["verified"], false);
        assert_eq!(body["data"]["locationId"], "2");

        let rating = state.registry.get("2").unwrap().safety_rating;
        assert!((rating - 3.5).abs() < f64::EPSILON);
    }

    #[actix_web::test]
    async fn report_for_unknown_location_is_still_accepted() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/locations/safety-report")
            .set_json(json!({ "locationId": "nope", "severity": "high" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn safety_rating_update() {
        let state = seeded_state();
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri("/api/locations/1/safety-rating")
            .set_json(json!({ "rating": 4.5, "riskFactors": ["crowded"] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["safetyRating"], 4.5);
        assert_eq!(body["data"]["riskFactors"], json!(["crowded"]));

        for (uri, payload, status) in [
            (
                "/api/locations/1/safety-rating",
                json!({ "rating": 0 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                "/api/locations/1/safety-rating",
                json!({ "rating": 5.1 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                "/api/locations/99/safety-rating",
                json!({ "rating": 3 }),
                StatusCode::NOT_FOUND,
            ),
        ] {
            let req = test::TestRequest::put()
                .uri(uri)
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status, "{uri}");
        }
    }
}
