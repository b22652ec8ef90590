//! OpenFDA drug-product catalog lookup (`/drug/ndc.json`).

use std::borrow::Cow;

use serde::Deserialize;

use crate::error::MedcheckError;

const OPENFDA_BASE: &str = "https://api.fda.gov";
const OPENFDA_API: &str = "openfda";
const OPENFDA_BASE_ENV: &str = "MEDCHECK_OPENFDA_BASE";

pub(crate) struct OpenFdaClient {
    client: reqwest::Client,
    base: Cow<'static, str>,
}

impl OpenFdaClient {
    pub fn new() -> Result<Self, MedcheckError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(OPENFDA_BASE, OPENFDA_BASE_ENV),
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

    /// Escapes a user-provided value for OpenFDA's Lucene-like query syntax.
    pub(crate) fn escape_query_value(value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\\' | '+' | '-' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~'
                | '*' | '?' | ':' | '/' | '&' | '|' => {
                    out.push('\\');
                    out.push(ch);
                }
                _ => out.push(ch),
            }
        }
        out
    }

    /// Prefix search on the trade name against the NDC directory.
    ///
    /// Returns `Ok(None)` for OpenFDA's no-match 404 so callers can treat it
    /// as zero candidates.
    pub async fn ndc_brand_search(
        &self,
        brand_prefix: &str,
        limit: usize,
    ) -> Result<Option<NdcResponse>, MedcheckError> {
        let escaped = Self::escape_query_value(brand_prefix.trim());
        let search = format!("brand_name:\"{escaped}*\"");

        let url = self.endpoint("drug/ndc.json");
        let resp = self
            .client
            .get(&url)
            .query(&[("search", search.as_str()), ("limit", &limit.to_string())])
            .send()
            .await?;

        let status = resp.status();
        let bytes = crate::sources::read_limited_body(resp, OPENFDA_API).await?;

        if status.as_u16() == 404 {
            return Ok(None);
        }

        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(MedcheckError::Api {
                api: OPENFDA_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| MedcheckError::ApiJson {
                api: OPENFDA_API.to_string(),
                source,
            })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NdcResponse {
    /// Absent `results` means zero candidates, not an error.
    #[serde(default)]
    pub results: Vec<NdcResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NdcResult {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub generic_name: Option<String>,
}
