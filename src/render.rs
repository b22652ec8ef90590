//! Markdown rendering of an analysis report for the terminal.

use crate::entities::{AnalysisResult, DrugEntry};

pub(crate) fn report_to_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str("# Interaction Report\n\n");
    out.push_str(&format!("**Overall risk:** {}\n\n", result.risk_level));
    out.push_str(&format!("{}\n", result.summary));

    if !result.interactions.is_empty() {
        out.push_str("\n## Interactions\n\n");
        for interaction in &result.interactions {
            out.push_str(&format!(
                "- **{}** ({}): {}\n",
                interaction.drugs_involved.join(" + "),
                interaction.severity,
                interaction.description
            ));
        }
    }

    if !result.combined_side_effects.is_empty() {
        out.push_str("\n## Combined Side Effects\n\n");
        for effect in &result.combined_side_effects {
            out.push_str(&format!("- **{}**: {}\n", effect.symptom, effect.description));
            for tip in &effect.management_tips {
                out.push_str(&format!("  - {tip}\n"));
            }
        }
    }

    if !result.individual_analyses.is_empty() {
        out.push_str("\n## Individual Drugs\n\n");
        for analysis in &result.individual_analyses {
            out.push_str(&format!(
                "- **{}**: {}\n",
                analysis.drug_name, analysis.usage_summary
            ));
            for effect in &analysis.common_side_effects {
                out.push_str(&format!(
                    "  - {} ({}, {})\n",
                    effect.symptom, effect.frequency, effect.severity
                ));
            }
        }
    }

    out.push_str(&format!("\n_{}_\n", result.disclaimer));
    out
}

pub(crate) fn roster_to_markdown(drugs: &[DrugEntry]) -> String {
    if drugs.is_empty() {
        return "No medications selected.\n".to_string();
    }

    let mut out = String::new();
    for (idx, drug) in drugs.iter().enumerate() {
        let mut line = format!("{}. {}", idx + 1, drug.name);
        if let Some(generic) = &drug.generic_name {
            line.push_str(&format!(" ({generic})"));
        }
        if drug.rxcui.is_some() {
            line.push_str(" [id verified]");
        }
        line.push('\n');
        out.push_str(&line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CombinedEffect, IndividualDrugAnalysis, InteractionDetail, RiskLevel, SideEffect,
    };

    #[test]
    fn report_markdown_includes_all_sections() {
        let result = AnalysisResult {
            risk_level: RiskLevel::High,
            summary: "Found 1 potential interaction. The highest risk level is High.".into(),
            individual_analyses: vec![IndividualDrugAnalysis {
                drug_name: "Warfarin".into(),
                usage_summary: "Refer to official labeling.".into(),
                common_side_effects: vec![SideEffect {
                    symptom: "Bruising".into(),
                    frequency: "Common".into(),
                    severity: "Mild".into(),
                }],
            }],
            interactions: vec![InteractionDetail {
                drugs_involved: vec!["warfarin".into(), "aspirin".into()],
                mechanism: "Pharmacological Interaction".into(),
                severity: RiskLevel::High,
                description: "Monitor for bleeding.".into(),
            }],
            combined_side_effects: vec![CombinedEffect {
                symptom: "Increased Bleeding Risk".into(),
                description: "Monitor for bleeding.".into(),
                management_tips: vec!["Consult your doctor about this interaction.".into()],
            }],
            disclaimer: "Not medical advice.".into(),
        };

        let md = report_to_markdown(&result);
        assert!(md.contains("**Overall risk:** High"));
        assert!(md.contains("## Interactions"));
        assert!(md.contains("warfarin + aspirin"));
        assert!(md.contains("## Combined Side Effects"));
        assert!(md.contains("Bruising (Common, Mild)"));
        assert!(md.contains("_Not medical advice._"));
    }

    #[test]
    fn roster_markdown_marks_resolved_entries() {
        let drugs = vec![
            DrugEntry {
                id: "p1".into(),
                name: "Warfarin".into(),
                rxcui: Some("11289".into()),
                generic_name: Some("warfarin sodium".into()),
            },
            DrugEntry::free_text("p2", "Mystery"),
        ];

        let md = roster_to_markdown(&drugs);
        assert!(md.contains("1. Warfarin (warfarin sodium) [id verified]"));
        assert!(md.contains("2. Mystery\n"));
    }
}
