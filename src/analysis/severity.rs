//! Heuristic text classifiers for interaction descriptions.
//!
//! The interaction database returns free-text descriptions with no structured
//! severity field, so severity and symptom labels are derived from keyword
//! matches. Rule order is part of the contract: the first matching tier wins,
//! so "severe but moderate" classifies as Severe.

use crate::entities::report::RiskLevel;

/// Maps a free-text interaction description to a risk level.
///
/// Case-insensitive substring match, evaluated in strict priority order.
pub fn classify_severity(description: &str) -> RiskLevel {
    let text = description.to_lowercase();
    if text.contains("contraindicated") || text.contains("severe") || text.contains("life-threatening")
    {
        return RiskLevel::Severe;
    }
    if text.contains("monitor") || text.contains("caution") || text.contains("risk") {
        return RiskLevel::High;
    }
    if text.contains("moderate") {
        return RiskLevel::Moderate;
    }
    RiskLevel::Low
}

/// Maps a free-text interaction description to a coarse symptom label.
///
/// Same first-match-wins strategy as [`classify_severity`]; used when the
/// back end supplies no structured side-effect data.
pub fn extract_symptom(description: &str) -> &'static str {
    let text = description.to_lowercase();
    if text.contains("bleeding") {
        return "Increased Bleeding Risk";
    }
    if text.contains("drowsiness") || text.contains("sedation") {
        return "Excessive Drowsiness";
    }
    if text.contains("arrhythmia") || text.contains("qt prolongation") {
        return "Heart Rhythm Irregularities";
    }
    if text.contains("hypotension") || text.contains("blood pressure") {
        return "Blood Pressure Changes";
    }
    if text.contains("toxicity") {
        return "Drug Toxicity";
    }
    "Interaction Effect"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_each_tier() {
        assert_eq!(
            classify_severity("Use is contraindicated in renal impairment"),
            RiskLevel::Severe
        );
        assert_eq!(
            classify_severity("May cause life-threatening arrhythmia"),
            RiskLevel::Severe
        );
        assert_eq!(
            classify_severity("Monitor INR closely"),
            RiskLevel::High
        );
        assert_eq!(
            classify_severity("Use with caution"),
            RiskLevel::High
        );
        assert_eq!(
            classify_severity("Moderate reduction in clearance"),
            RiskLevel::Moderate
        );
        assert_eq!(classify_severity("Minor effect on absorption"), RiskLevel::Low);
    }

    #[test]
    fn classify_higher_tier_wins_when_descriptions_mix_keywords() {
        assert_eq!(
            classify_severity("severe but moderate interaction"),
            RiskLevel::Severe
        );
        assert_eq!(
            classify_severity("moderate risk of hypotension"),
            RiskLevel::High
        );
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(classify_severity("SEVERE INTERACTION"), RiskLevel::Severe);
        assert_eq!(classify_severity("Caution advised"), RiskLevel::High);
    }

    #[test]
    fn extract_symptom_first_match_wins() {
        assert_eq!(
            extract_symptom("risk of increased bleeding and drowsiness"),
            "Increased Bleeding Risk"
        );
        assert_eq!(
            extract_symptom("additive sedation expected"),
            "Excessive Drowsiness"
        );
        assert_eq!(
            extract_symptom("may prolong the QT Prolongation interval"),
            "Heart Rhythm Irregularities"
        );
        assert_eq!(
            extract_symptom("can lower blood pressure"),
            "Blood Pressure Changes"
        );
        assert_eq!(extract_symptom("lithium toxicity"), "Drug Toxicity");
        assert_eq!(
            extract_symptom("alters hepatic metabolism"),
            "Interaction Effect"
        );
    }
}
