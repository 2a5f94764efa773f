#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distance between coordinates.
//!
//! Uses the haversine formula on a spherical Earth. Accurate to well under
//! half a percent at geofencing scales (hundreds of meters to a few
//! kilometers), which is all the proximity and geofence checks need.

use tourist_safety_location_models::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Returns the great-circle distance between `a` and `b` in meters.
#[must_use]
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `h` just past 1 for antipodal points.
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Returns `true` if `point` is within `radius_meters` of `center`.
///
/// The boundary is inclusive.
#[must_use]
pub fn within_radius(center: &Coordinate, point: &Coordinate, radius_meters: f64) -> bool {
    distance(center, point) <= radius_meters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn distance_to_self_is_zero() {
        for c in [
            coord(40.758, -73.9855),
            coord(-33.8568, 151.2153),
            coord(90.0, 0.0),
            coord(0.0, 180.0),
        ] {
            assert!(distance(&c, &c).abs() < 1e-6, "non-zero self distance at {c}");
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let times_square = coord(40.758, -73.9855);
        let central_park = coord(40.7829, -73.9654);
        let ab = distance(&times_square, &central_park);
        let ba = distance(&central_park, &times_square);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn times_square_to_central_park() {
        // ~3.2 km between the two landmarks.
        let d = distance(&coord(40.758, -73.9855), &coord(40.7829, -73.9654));
        assert!(d > 3_100.0 && d < 3_300.0, "unexpected distance {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance(&coord(0.0, 0.0), &coord(1.0, 0.0));
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((d - expected).abs() < 1e-3);
    }

    #[test]
    fn crosses_antimeridian_the_short_way() {
        let d = distance(&coord(0.0, 179.999), &coord(0.0, -179.999));
        assert!(d < 300.0, "unexpected distance {d}");
    }

    #[test]
    fn antipodal_points_are_half_a_circumference_apart() {
        let half = EARTH_RADIUS_METERS * std::f64::consts::PI;
        for (a, b) in [
            (coord(-12.0, -180.0), coord(12.0, 0.0)),
            (coord(0.0, 0.0), coord(0.0, 180.0)),
            (coord(90.0, 0.0), coord(-90.0, 0.0)),
            (coord(40.5, -73.5), coord(-40.5, 106.5)),
        ] {
            let d = distance(&a, &b);
            assert!((d - half).abs() < 1.0, "unexpected distance {d} for {a} / {b}");
            assert!(within_radius(&a, &b, half + 1.0));
        }
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let a = coord(0.0, 0.0);
        let b = coord(0.001, 0.0);
        let d = distance(&a, &b);
        assert!(within_radius(&a, &b, d));
        assert!(!within_radius(&a, &b, d - 1e-3));
        assert!(within_radius(&a, &a, 0.0));
    }
}
