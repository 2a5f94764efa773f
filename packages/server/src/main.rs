#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binary entry point for the tourist safety API server.
//!
//! Configuration comes from the environment: `BIND_ADDR`, `PORT`,
//! `RUST_LOG`, and `TOURIST_SAFETY_LOCATIONS`.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    tourist_safety_server::run_server().await
}
