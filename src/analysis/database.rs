//! Interaction analysis backed by the NLM RxNav pairwise database.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::analysis::severity::{classify_severity, extract_symptom};
use crate::analysis::InteractionAnalyzer;
use crate::entities::{
    AnalysisResult, CombinedEffect, DrugEntry, IndividualDrugAnalysis, InteractionDetail,
    RiskLevel,
};
use crate::error::MedcheckError;
use crate::sources::rxnav::RxNavClient;

const DISCLAIMER: &str = "Interaction data sourced from National Library of Medicine (RxNav). This tool does not provide medical advice.";
const DEGRADED_DISCLAIMER: &str =
    "Data provided by NLM. Always consult a healthcare professional.";
const NO_INTERACTIONS_SUMMARY: &str =
    "No known interactions were found between the selected medications.";
const NEED_TWO_SUMMARY: &str =
    "Please add at least two recognized medications to check for interactions.";
const UNIDENTIFIED_SUMMARY: &str = "Unable to analyze. Please delete the drugs and re-add them by selecting from the search suggestions to ensure they are recognized.";
const SUCCESS_USAGE_NOTE: &str = "Refer to official labeling.";
const ID_VERIFIED_NOTE: &str = "ID verified.";
const ID_MISSING_NOTE: &str = "Drug ID not found. Please re-add from suggestions.";
// RxNav rarely supplies a mechanism, so interactions carry a generic one.
const GENERIC_MECHANISM: &str = "Pharmacological Interaction";
const MANAGEMENT_TIPS: [&str; 2] = [
    "Consult your doctor about this interaction.",
    "Do not stop medication without advice.",
];

pub struct DatabaseAnalyzer {
    rxnav: RxNavClient,
}

impl DatabaseAnalyzer {
    pub fn new() -> Result<Self, MedcheckError> {
        Ok(Self {
            rxnav: RxNavClient::new()?,
        })
    }

    #[cfg(test)]
    fn new_for_test(base: String) -> Result<Self, MedcheckError> {
        Ok(Self {
            rxnav: RxNavClient::new_for_test(base)?,
        })
    }

    /// Result returned without contacting the service when fewer than two
    /// roster entries carry a resolved identifier.
    fn degraded_result(drugs: &[DrugEntry], resolved_count: usize) -> AnalysisResult {
        let has_unidentified = drugs.len() >= 2 && resolved_count < 2;
        let summary = if has_unidentified {
            UNIDENTIFIED_SUMMARY
        } else {
            NEED_TWO_SUMMARY
        };

        AnalysisResult {
            risk_level: RiskLevel::Unknown,
            summary: summary.to_string(),
            individual_analyses: drugs
                .iter()
                .map(|d| IndividualDrugAnalysis {
                    drug_name: d.name.clone(),
                    usage_summary: if d.rxcui.is_some() {
                        ID_VERIFIED_NOTE.to_string()
                    } else {
                        ID_MISSING_NOTE.to_string()
                    },
                    common_side_effects: Vec::new(),
                })
                .collect(),
            interactions: Vec::new(),
            combined_side_effects: Vec::new(),
            disclaimer: DEGRADED_DISCLAIMER.to_string(),
        }
    }
}

#[async_trait]
impl InteractionAnalyzer for DatabaseAnalyzer {
    async fn analyze(&self, drugs: &[DrugEntry]) -> Result<AnalysisResult, MedcheckError> {
        let rxcuis: Vec<&str> = drugs.iter().filter_map(|d| d.rxcui.as_deref()).collect();

        if rxcuis.len() < 2 {
            return Ok(Self::degraded_result(drugs, rxcuis.len()));
        }

        let response = self.rxnav.interaction_list(&rxcuis).await?;

        let mut interactions: Vec<InteractionDetail> = Vec::new();
        let mut combined_side_effects: Vec<CombinedEffect> = Vec::new();
        let mut max_severity = RiskLevel::Low;

        for group in response.full_interaction_type_group {
            for interaction_type in group.full_interaction_type {
                for pair in interaction_type.interaction_pair {
                    let [first, second, ..] = pair.interaction_concept.as_slice() else {
                        warn!("Skipping interaction pair with fewer than two drug concepts");
                        continue;
                    };

                    let severity = classify_severity(&pair.description);
                    max_severity = max_severity.escalated(severity);

                    interactions.push(InteractionDetail {
                        drugs_involved: vec![
                            first.min_concept_item.name.clone(),
                            second.min_concept_item.name.clone(),
                        ],
                        mechanism: GENERIC_MECHANISM.to_string(),
                        severity,
                        description: pair.description.clone(),
                    });

                    combined_side_effects.push(CombinedEffect {
                        symptom: extract_symptom(&pair.description).to_string(),
                        description: pair.description,
                        management_tips: MANAGEMENT_TIPS.iter().map(|t| t.to_string()).collect(),
                    });
                }
            }
        }

        debug!(
            pairs = interactions.len(),
            max_severity = %max_severity,
            "Aggregated interaction pairs"
        );

        let summary = if interactions.is_empty() {
            NO_INTERACTIONS_SUMMARY.to_string()
        } else {
            format!(
                "Found {} potential interaction{}. The highest risk level is {}.",
                interactions.len(),
                if interactions.len() > 1 { "s" } else { "" },
                max_severity
            )
        };

        Ok(AnalysisResult {
            risk_level: if interactions.is_empty() {
                RiskLevel::Low
            } else {
                max_severity
            },
            summary,
            individual_analyses: drugs
                .iter()
                .map(|d| IndividualDrugAnalysis {
                    drug_name: d.name.clone(),
                    usage_summary: SUCCESS_USAGE_NOTE.to_string(),
                    common_side_effects: Vec::new(),
                })
                .collect(),
            interactions,
            combined_side_effects,
            disclaimer: DISCLAIMER.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolved(id: &str, name: &str, rxcui: &str) -> DrugEntry {
        DrugEntry {
            id: id.into(),
            name: name.into(),
            rxcui: Some(rxcui.into()),
            generic_name: None,
        }
    }

    fn unresolved(id: &str, name: &str) -> DrugEntry {
        DrugEntry::free_text(id, name)
    }

    fn pair_body(pairs: &[&str]) -> serde_json::Value {
        let pairs: Vec<serde_json::Value> = pairs
            .iter()
            .map(|description| {
                serde_json::json!({
                    "description": description,
                    "interactionConcept": [
                        {"minConceptItem": {"name": "warfarin"}},
                        {"minConceptItem": {"name": "fluconazole"}}
                    ]
                })
            })
            .collect();
        serde_json::json!({
            "fullInteractionTypeGroup": [{
                "fullInteractionType": [{"interactionPair": pairs}]
            }]
        })
    }

    #[tokio::test]
    async fn fewer_than_two_resolved_drugs_degrades_without_calling_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/REST/interaction/list.json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let analyzer = DatabaseAnalyzer::new_for_test(server.uri()).unwrap();
        let drugs = [resolved("p1", "Warfarin", "11289"), unresolved("p2", "Mystery")];
        let result = analyzer.analyze(&drugs).await.unwrap();

        assert_eq!(result.risk_level, RiskLevel::Unknown);
        assert_eq!(result.summary, UNIDENTIFIED_SUMMARY);
        assert!(result.interactions.is_empty());
        assert_eq!(result.individual_analyses.len(), 2);
        assert_eq!(result.individual_analyses[0].usage_summary, ID_VERIFIED_NOTE);
        assert_eq!(result.individual_analyses[1].usage_summary, ID_MISSING_NOTE);
    }

    #[tokio::test]
    async fn single_drug_gets_the_need_two_guidance() {
        let server = MockServer::start().await;
        let analyzer = DatabaseAnalyzer::new_for_test(server.uri()).unwrap();

        let drugs = [resolved("p1", "Warfarin", "11289")];
        let result = analyzer.analyze(&drugs).await.unwrap();

        assert_eq!(result.risk_level, RiskLevel::Unknown);
        assert_eq!(result.summary, NEED_TWO_SUMMARY);
    }

    #[tokio::test]
    async fn escalates_to_the_maximum_pair_severity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/REST/interaction/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pair_body(&[
                "minor absorption change",
                "moderate reduction in clearance",
                "minor plasma level shift",
            ])))
            .mount(&server)
            .await;

        let analyzer = DatabaseAnalyzer::new_for_test(server.uri()).unwrap();
        let drugs = [
            resolved("p1", "Warfarin", "11289"),
            resolved("p2", "Fluconazole", "207106"),
        ];
        let result = analyzer.analyze(&drugs).await.unwrap();

        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(
            result.summary,
            "Found 3 potential interactions. The highest risk level is Moderate."
        );
        assert_eq!(result.interactions.len(), 3);
        assert_eq!(result.combined_side_effects.len(), 3);
        assert_eq!(
            result.combined_side_effects[0].management_tips,
            vec![
                "Consult your doctor about this interaction.".to_string(),
                "Do not stop medication without advice.".to_string(),
            ]
        );
        for analysis in &result.individual_analyses {
            assert_eq!(analysis.usage_summary, SUCCESS_USAGE_NOTE);
            assert!(analysis.common_side_effects.is_empty());
        }
    }

    #[tokio::test]
    async fn severe_pair_dominates_and_singular_summary_reads_correctly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/REST/interaction/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pair_body(&[
                "contraindicated due to severe bleeding risk",
            ])))
            .mount(&server)
            .await;

        let analyzer = DatabaseAnalyzer::new_for_test(server.uri()).unwrap();
        let drugs = [
            resolved("p1", "Warfarin", "11289"),
            resolved("p2", "Aspirin", "1191"),
        ];
        let result = analyzer.analyze(&drugs).await.unwrap();

        assert_eq!(result.risk_level, RiskLevel::Severe);
        assert_eq!(
            result.summary,
            "Found 1 potential interaction. The highest risk level is Severe."
        );
        assert_eq!(
            result.combined_side_effects[0].symptom,
            "Increased Bleeding Risk"
        );
        assert_eq!(
            result.interactions[0].drugs_involved,
            vec!["warfarin".to_string(), "fluconazole".to_string()]
        );
        assert_eq!(result.interactions[0].mechanism, GENERIC_MECHANISM);
    }

    #[tokio::test]
    async fn zero_pairs_is_low_risk_with_the_fixed_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/REST/interaction/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nlmDisclaimer": "not medical advice"
            })))
            .mount(&server)
            .await;

        let analyzer = DatabaseAnalyzer::new_for_test(server.uri()).unwrap();
        let drugs = [
            resolved("p1", "Warfarin", "11289"),
            resolved("p2", "Levothyroxine", "10582"),
        ];
        let result = analyzer.analyze(&drugs).await.unwrap();

        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.summary, NO_INTERACTIONS_SUMMARY);
        assert!(result.interactions.is_empty());
        assert!(result.combined_side_effects.is_empty());
    }

    #[tokio::test]
    async fn malformed_pair_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/REST/interaction/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "fullInteractionTypeGroup": [{
                    "fullInteractionType": [{
                        "interactionPair": [
                            {
                                "description": "monitor closely",
                                "interactionConcept": [
                                    {"minConceptItem": {"name": "warfarin"}}
                                ]
                            },
                            {
                                "description": "moderate effect",
                                "interactionConcept": [
                                    {"minConceptItem": {"name": "warfarin"}},
                                    {"minConceptItem": {"name": "aspirin"}}
                                ]
                            }
                        ]
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let analyzer = DatabaseAnalyzer::new_for_test(server.uri()).unwrap();
        let drugs = [
            resolved("p1", "Warfarin", "11289"),
            resolved("p2", "Aspirin", "1191"),
        ];
        let result = analyzer.analyze(&drugs).await.unwrap();

        assert_eq!(result.interactions.len(), 1);
        assert_eq!(result.risk_level, RiskLevel::Moderate);
    }

    #[tokio::test]
    async fn service_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/REST/interaction/list.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let analyzer = DatabaseAnalyzer::new_for_test(server.uri()).unwrap();
        let drugs = [
            resolved("p1", "Warfarin", "11289"),
            resolved("p2", "Aspirin", "1191"),
        ];
        let err = analyzer.analyze(&drugs).await.unwrap_err();
        assert!(matches!(err, MedcheckError::Api { .. }));
    }

    #[tokio::test]
    async fn non_json_body_propagates_as_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/REST/interaction/list.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let analyzer = DatabaseAnalyzer::new_for_test(server.uri()).unwrap();
        let drugs = [
            resolved("p1", "Warfarin", "11289"),
            resolved("p2", "Aspirin", "1191"),
        ];
        let err = analyzer.analyze(&drugs).await.unwrap_err();
        assert!(matches!(err, MedcheckError::ApiJson { .. }));
    }
}
