//! Safety report intake.
//!
//! A filed report is handed back to the caller for storage elsewhere; the
//! only lasting effect here is the rating penalty a high-severity report
//! applies to the location it names.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use tourist_safety_location_models::SafetyReport;
use tourist_safety_registry::LocationRegistry;

/// What a report did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ReportOutcome {
    /// The location's rating was lowered.
    Penalized,
    /// The location exists but the severity does not warrant a penalty.
    Unchanged,
    /// The report names a location that is not registered.
    UnknownLocation,
    /// The report does not name a location.
    NoLocation,
}

/// Review state of a filed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportStatus {
    /// Awaiting review.
    Pending,
}

/// A report as accepted by the system.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiledReport {
    /// Generated report ID.
    pub id: String,
    /// The submitted report.
    #[serde(flatten)]
    pub report: SafetyReport,
    /// When the report was accepted.
    pub timestamp: DateTime<Utc>,
    /// Review state.
    pub status: ReportStatus,
    /// Whether a moderator has verified the report.
    pub verified: bool,
    /// Effect on the referenced location.
    #[serde(skip)]
    pub outcome: ReportOutcome,
}

/// Applies a report's rating penalty to the location it names.
///
/// Reports naming no location, or a location that is not registered, are
/// accepted without effect.
#[must_use]
pub fn apply_safety_report(registry: &LocationRegistry, report: &SafetyReport) -> ReportOutcome {
    let Some(poi_id) = report.poi_id.as_deref() else {
        return ReportOutcome::NoLocation;
    };

    match registry.apply_report_penalty(poi_id, report.severity) {
        Ok(true) => ReportOutcome::Penalized,
        Ok(false) => ReportOutcome::Unchanged,
        // The penalty only fails for ids that are not registered.
        Err(e) => {
            log::debug!("Ignoring report for location {poi_id}: {e}");
            ReportOutcome::UnknownLocation
        }
    }
}

/// Accepts a report, applying its effect on the registry.
#[must_use]
pub fn file_report(registry: &LocationRegistry, report: SafetyReport) -> FiledReport {
    let outcome = apply_safety_report(registry, &report);

    FiledReport {
        id: uuid::Uuid::new_v4().to_string(),
        report,
        timestamp: Utc::now(),
        status: ReportStatus::Pending,
        verified: false,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourist_safety_location_models::Severity;

    fn report(poi_id: Option<&str>, severity: Severity) -> SafetyReport {
        SafetyReport {
            poi_id: poi_id.map(String::from),
            user_id: Some("user-1".to_string()),
            incident_type: "theft".to_string(),
            description: None,
            severity,
            coordinate: None,
        }
    }

    fn rating(registry: &LocationRegistry, id: &str) -> f64 {
        registry.get(id).unwrap().safety_rating
    }

    #[test]
    fn high_severity_lowers_rating() {
        let registry = LocationRegistry::with_seed_locations();
        let before = rating(&registry, "1");

        let outcome = apply_safety_report(&registry, &report(Some("1"), Severity::High));
        assert_eq!(outcome, ReportOutcome::Penalized);
        assert!((rating(&registry, "1") - (before - 0.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn low_severity_is_a_no_op() {
        let registry = LocationRegistry::with_seed_locations();
        let before = rating(&registry, "1");

        let outcome = apply_safety_report(&registry, &report(Some("1"), Severity::Low));
        assert_eq!(outcome, ReportOutcome::Unchanged);
        assert!((rating(&registry, "1") - before).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_location_is_silently_ignored() {
        let registry = LocationRegistry::with_seed_locations();
        let before = registry.list_all();

        assert_eq!(
            apply_safety_report(&registry, &report(Some("nope"), Severity::High)),
            ReportOutcome::UnknownLocation
        );
        assert_eq!(
            apply_safety_report(&registry, &report(None, Severity::High)),
            ReportOutcome::NoLocation
        );
        assert_eq!(registry.list_all(), before);
    }

    #[test]
    fn filed_report_is_pending_and_unverified() {
        let registry = LocationRegistry::with_seed_locations();
        let filed = file_report(&registry, report(Some("2"), Severity::High));

        assert!(!filed.id.is_empty());
        assert_eq!(filed.status, ReportStatus::Pending);
        assert!(!filed.verified);
        assert_eq!(filed.outcome, ReportOutcome::Penalized);
        assert_eq!(filed.report.incident_type, "theft");
    }
}
