use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::sources::openfda::OpenFdaClient;
use crate::sources::rxnav::RxNavClient;

/// Queries shorter than this never reach the catalog service.
pub const MIN_SEARCH_LEN: usize = 3;

/// Raw results requested from the catalog before name deduplication.
const CATALOG_RESULT_CAP: usize = 5;

/// A medication in the user's roster.
///
/// `rxcui` is only present when the entry was resolved against RxNorm; the
/// database back end needs it, the generative back end does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugEntry {
    /// Opaque identifier, unique within a session.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rxcui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
}

impl DrugEntry {
    pub fn free_text(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rxcui: None,
            generic_name: None,
        }
    }

    /// Two entries are the same drug when ids match or names match
    /// case-insensitively.
    pub fn is_same_drug(&self, other: &DrugEntry) -> bool {
        self.id == other.id || self.name.eq_ignore_ascii_case(&other.name)
    }
}

/// Searches the drug catalog for candidate entries matching a partial name.
///
/// Best-effort: short queries short-circuit to no candidates, and every
/// transport or format failure degrades to an empty list so free-text entry
/// is never blocked. Raw results are deduplicated by exact brand name,
/// keeping the first occurrence (the same product appears once per package
/// size upstream).
pub(crate) async fn search_catalog(client: &OpenFdaClient, query: &str) -> Vec<DrugEntry> {
    let query = query.trim();
    if query.len() < MIN_SEARCH_LEN {
        return Vec::new();
    }

    let response = match client.ndc_brand_search(query, CATALOG_RESULT_CAP).await {
        Ok(Some(response)) => response,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(error = %err, "Drug catalog search failed");
            return Vec::new();
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();
    for item in response.results {
        let (Some(id), Some(name)) = (item.product_id, item.brand_name) else {
            continue;
        };
        if !seen.insert(name.clone()) {
            continue;
        }
        candidates.push(DrugEntry {
            id,
            name,
            rxcui: None,
            generic_name: item.generic_name,
        });
    }
    candidates
}

/// Fills in the RxNorm identifier for an entry, if RxNav recognizes the name.
///
/// Best-effort like catalog search: a miss or a failed lookup leaves `rxcui`
/// unset, and the database back end reports the drug as unidentified.
pub(crate) async fn resolve_identifier(client: &RxNavClient, entry: &mut DrugEntry) {
    if entry.rxcui.is_some() {
        return;
    }
    match client.find_rxcui(&entry.name).await {
        Ok(Some(rxcui)) => entry.rxcui = Some(rxcui),
        Ok(None) => warn!(drug = %entry.name, "No RxNorm identifier found"),
        Err(err) => {
            warn!(drug = %entry.name, error = %err, "RxNorm identifier lookup failed");
        }
    }
}
