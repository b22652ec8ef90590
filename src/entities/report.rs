//! Report types shared by both analysis back ends.
//!
//! `AnalysisResult` is the sole output contract: whichever back end ran, the
//! session layer only ever sees this shape. JSON field names are camelCase to
//! match the wire schema the generative back end is constrained to.

use serde::{Deserialize, Serialize};

/// Ordered interaction risk scale, plus an out-of-band `Unknown`.
///
/// `Unknown` marks absence of data (for example, unresolved drug identifiers)
/// and is never produced by risk escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
    Unknown,
}

impl RiskLevel {
    /// Escalates an aggregate risk level with one more observation.
    ///
    /// Guarded escalation over `Low < Moderate < High < Severe`: a Severe
    /// observation always wins, High wins unless the aggregate is already
    /// Severe, and Moderate only lifts a Low aggregate. `Unknown` observations
    /// never change the aggregate.
    #[must_use]
    pub fn escalated(self, observed: RiskLevel) -> RiskLevel {
        match observed {
            RiskLevel::Severe => RiskLevel::Severe,
            RiskLevel::High if self != RiskLevel::Severe => RiskLevel::High,
            RiskLevel::Moderate if self == RiskLevel::Low => RiskLevel::Moderate,
            _ => self,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Severe => "Severe",
            RiskLevel::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A side effect of a single drug taken on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideEffect {
    pub symptom: String,
    /// Free text, e.g. "Common" or "Rare".
    pub frequency: String,
    /// Free text, e.g. "Mild" or "Severe"; not a [`RiskLevel`].
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualDrugAnalysis {
    pub drug_name: String,
    pub usage_summary: String,
    pub common_side_effects: Vec<SideEffect>,
}

/// One pairwise (or group) interaction between drugs in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDetail {
    /// Display names of the drugs involved, two or more.
    pub drugs_involved: Vec<String>,
    pub mechanism: String,
    pub severity: RiskLevel,
    pub description: String,
}

/// A side effect emergent from the combination, with management advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedEffect {
    pub symptom: String,
    pub description: String,
    pub management_tips: Vec<String>,
}

/// The aggregated interaction report.
///
/// Constructed once per analysis request and immutable thereafter; the
/// session discards it whenever the drug roster changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub individual_analyses: Vec<IndividualDrugAnalysis>,
    pub interactions: Vec<InteractionDetail>,
    pub combined_side_effects: Vec<CombinedEffect>,
    pub disclaimer: String,
}
