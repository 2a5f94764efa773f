//! Risk aggregation over a set of nearby locations.
//!
//! The score is linear in the mean safety rating: `(5 - avg) * 20`. Since
//! ratings never drop below 1, the score tops out at 80, not 100.

use tourist_safety_location_models::{
    MAX_SAFETY_RATING, PointOfInterest, RiskAssessment, RiskLevel, dedup_first_seen, risk_factor,
};

/// Score at or above which the level is [`RiskLevel::High`].
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;

/// Score at or above which the level is [`RiskLevel::Medium`].
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

const STAY_AWARE: &str = "Stay aware of your surroundings";
const KEEP_CONTACTS: &str = "Keep emergency contacts handy";

/// Summarizes the risk posed by `nearby` locations.
#[must_use]
pub fn assess(nearby: &[PointOfInterest]) -> RiskAssessment {
    if nearby.is_empty() {
        return RiskAssessment {
            level: RiskLevel::Unknown,
            score: 0,
            factors: Vec::new(),
            avg_safety_rating: None,
            recommendations: vec![STAY_AWARE.to_string()],
        };
    }

    #[allow(clippy::cast_precision_loss)]
    let avg = nearby.iter().map(|loc| loc.safety_rating).sum::<f64>() / nearby.len() as f64;
    let raw_score = (MAX_SAFETY_RATING - avg) * 20.0;
    let level = level_for_score(raw_score);

    let factors = dedup_first_seen(
        nearby
            .iter()
            .flat_map(|loc| loc.risk_factors.iter().cloned()),
    );
    let recommendations = recommendations(level, &factors);

    RiskAssessment {
        level,
        score: clamp_score(raw_score),
        factors,
        avg_safety_rating: Some((avg * 10.0).round() / 10.0),
        recommendations,
    }
}

/// Buckets a score into a [`RiskLevel`].
#[must_use]
pub fn level_for_score(score: f64) -> RiskLevel {
    if score >= HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if score >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(raw: f64) -> u8 {
    raw.round().clamp(0.0, 100.0) as u8
}

/// Builds advice for a risk level and set of risk factors.
#[must_use]
pub fn recommendations(level: RiskLevel, factors: &[String]) -> Vec<String> {
    let mut advice = vec![STAY_AWARE, KEEP_CONTACTS];

    if level == RiskLevel::High {
        advice.extend(["Consider avoiding this area", "Travel with others if possible"]);
    }

    let has = |tag: &str| factors.iter().any(|f| f == tag);

    if has(risk_factor::CROWDED) {
        advice.extend(["Watch for pickpockets", "Keep valuables secure"]);
    }

    if has(risk_factor::ISOLATED_AREAS_AT_NIGHT) {
        advice.extend(["Avoid isolated areas after dark", "Use well-lit paths"]);
    }

    dedup_first_seen(advice.into_iter().map(String::from))
}
