//! Interaction analysis via a schema-constrained generative call.

use async_trait::async_trait;

use crate::analysis::InteractionAnalyzer;
use crate::entities::{AnalysisResult, DrugEntry};
use crate::error::MedcheckError;
use crate::sources::gemini::{GeminiClient, GeminiConfig};

const SYSTEM_INSTRUCTION: &str = "You are a helpful and accurate medical assistant. You strictly provide medical facts about drug interactions. You always include a disclaimer that this is not a substitute for professional medical advice.";

pub struct StructuredAnalyzer {
    gemini: GeminiClient,
}

impl StructuredAnalyzer {
    pub fn new(config: GeminiConfig) -> Result<Self, MedcheckError> {
        Ok(Self {
            gemini: GeminiClient::new(config)?,
        })
    }

    #[cfg(test)]
    fn new_for_test(base: String, config: GeminiConfig) -> Result<Self, MedcheckError> {
        Ok(Self {
            gemini: GeminiClient::new_for_test(base, config)?,
        })
    }

    fn build_prompt(drugs: &[DrugEntry]) -> String {
        let roster = drugs
            .iter()
            .map(|d| match &d.generic_name {
                Some(generic) => format!("{} (Generic: {})", d.name, generic),
                None => d.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Analyze the following list of drugs for potential interactions, side effects, and management strategies.\n\
             Drugs: {roster}.\n\
             \n\
             Act as a senior clinical pharmacologist.\n\
             1. Identify individual side effects for each drug.\n\
             2. Identify specific interactions between any pairs or groups of drugs.\n\
             3. Determine the overall risk level.\n\
             4. Predict combined side effects that might be exacerbated by taking these together.\n\
             5. Provide actionable management tips or remedies for these side effects.\n\
             \n\
             Ensure the data is accurate based on established medical knowledge bases."
        )
    }

    /// Response schema the model output is constrained to.
    ///
    /// Mirrors [`AnalysisResult`] field for field; the parsed text is trusted
    /// as-is, so any shape drift surfaces as a parse failure rather than
    /// being coerced.
    fn response_schema() -> serde_json::Value {
        let risk_enum = serde_json::json!(["Low", "Moderate", "High", "Severe", "Unknown"]);
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "riskLevel": {
                    "type": "STRING",
                    "enum": risk_enum.clone(),
                    "description": "The highest severity level of interaction found."
                },
                "summary": {
                    "type": "STRING",
                    "description": "A concise summary of the analysis for the patient."
                },
                "individualAnalyses": {
                    "type": "ARRAY",
                    "description": "Analysis for each single drug.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "drugName": {"type": "STRING"},
                            "usageSummary": {"type": "STRING", "description": "Briefly what it treats."},
                            "commonSideEffects": {
                                "type": "ARRAY",
                                "items": {
                                    "type": "OBJECT",
                                    "properties": {
                                        "symptom": {"type": "STRING"},
                                        "frequency": {"type": "STRING"},
                                        "severity": {"type": "STRING"}
                                    },
                                    "required": ["symptom", "frequency", "severity"]
                                }
                            }
                        },
                        "required": ["drugName", "usageSummary", "commonSideEffects"]
                    }
                },
                "interactions": {
                    "type": "ARRAY",
                    "description": "Specific interaction mechanisms between drugs.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "drugsInvolved": {"type": "ARRAY", "items": {"type": "STRING"}},
                            "mechanism": {"type": "STRING", "description": "Pharmacokinetic or pharmacodynamic mechanism."},
                            "severity": {"type": "STRING", "enum": risk_enum},
                            "description": {"type": "STRING", "description": "Detailed explanation of the interaction."}
                        },
                        "required": ["drugsInvolved", "mechanism", "severity", "description"]
                    }
                },
                "combinedSideEffects": {
                    "type": "ARRAY",
                    "description": "Side effects unique to or worsened by the combination, with remedies.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "symptom": {"type": "STRING"},
                            "description": {"type": "STRING", "description": "Why this happens with this combination."},
                            "managementTips": {
                                "type": "ARRAY",
                                "items": {"type": "STRING"},
                                "description": "Practical advice or remedies to manage this side effect."
                            }
                        },
                        "required": ["symptom", "description", "managementTips"]
                    }
                },
                "disclaimer": {
                    "type": "STRING",
                    "description": "Standard medical disclaimer."
                }
            },
            "required": ["riskLevel", "summary", "individualAnalyses", "interactions", "combinedSideEffects", "disclaimer"]
        })
    }
}

#[async_trait]
impl InteractionAnalyzer for StructuredAnalyzer {
    async fn analyze(&self, drugs: &[DrugEntry]) -> Result<AnalysisResult, MedcheckError> {
        if drugs.is_empty() {
            return Err(MedcheckError::InvalidArgument(
                "No drugs provided for analysis.".into(),
            ));
        }

        let prompt = Self::build_prompt(drugs);
        let text = self
            .gemini
            .generate_json(&prompt, SYSTEM_INSTRUCTION, Self::response_schema())
            .await?;

        serde_json::from_str(&text).map_err(|source| MedcheckError::ApiJson {
            api: "gemini".to_string(),
            source,
        })
    }
}
