//! NLM RxNav clients: pairwise interaction lookup and RxNorm name resolution.

use std::borrow::Cow;

use serde::Deserialize;

use crate::error::MedcheckError;

const RXNAV_BASE: &str = "https://rxnav.nlm.nih.gov";
const RXNAV_API: &str = "rxnav";
const RXNAV_BASE_ENV: &str = "MEDCHECK_RXNAV_BASE";

pub(crate) struct RxNavClient {
    client: reqwest::Client,
    base: Cow<'static, str>,
}

impl RxNavClient {
    pub fn new() -> Result<Self, MedcheckError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(RXNAV_BASE, RXNAV_BASE_ENV),
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(base: String) -> Result<Self, MedcheckError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: Cow::Owned(base),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_ref().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Fetches all pairwise interactions for a set of RxCUIs in one call.
    ///
    /// The `rxcuis` parameter is a `+`-joined list; RxCUIs are numeric, so
    /// the URL is assembled directly to keep the separator literal. A valid
    /// JSON body without the interaction group key deserializes to an empty
    /// group list, which callers treat as "no known interactions".
    pub async fn interaction_list(
        &self,
        rxcuis: &[&str],
    ) -> Result<InteractionListResponse, MedcheckError> {
        let joined = rxcuis.join("+");
        let url = format!(
            "{}?rxcuis={joined}",
            self.endpoint("REST/interaction/list.json")
        );

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let bytes = crate::sources::read_limited_body(resp, RXNAV_API).await?;

        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(MedcheckError::Api {
                api: RXNAV_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| MedcheckError::ApiJson {
            api: RXNAV_API.to_string(),
            source,
        })
    }

    /// Resolves a drug name to its RxNorm concept identifier, if any.
    pub async fn find_rxcui(&self, name: &str) -> Result<Option<String>, MedcheckError> {
        let url = self.endpoint("REST/rxcui.json");
        let resp = self
            .client
            .get(&url)
            .query(&[("name", name), ("search", "2")])
            .send()
            .await?;

        let status = resp.status();
        let bytes = crate::sources::read_limited_body(resp, RXNAV_API).await?;

        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(MedcheckError::Api {
                api: RXNAV_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }

        let parsed: RxCuiResponse =
            serde_json::from_slice(&bytes).map_err(|source| MedcheckError::ApiJson {
                api: RXNAV_API.to_string(),
                source,
            })?;

        Ok(parsed.id_group.rxnorm_id.into_iter().next())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InteractionListResponse {
    #[serde(default, rename = "fullInteractionTypeGroup")]
    pub full_interaction_type_group: Vec<InteractionTypeGroup>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InteractionTypeGroup {
    #[serde(default, rename = "fullInteractionType")]
    pub full_interaction_type: Vec<InteractionType>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InteractionType {
    #[serde(default, rename = "interactionPair")]
    pub interaction_pair: Vec<InteractionPair>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InteractionPair {
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "interactionConcept")]
    pub interaction_concept: Vec<InteractionConcept>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InteractionConcept {
    #[serde(default, rename = "minConceptItem")]
    pub min_concept_item: MinConceptItem,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MinConceptItem {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
struct RxCuiResponse {
    #[serde(default, rename = "idGroup")]
    id_group: RxCuiIdGroup,
}

#[derive(Debug, Default, Deserialize)]
struct RxCuiIdGroup {
    #[serde(default, rename = "rxnormId")]
    rxnorm_id: Vec<String>,
}
