//! Gemini `generateContent` client for schema-constrained JSON generation.

use std::borrow::Cow;

use serde::Deserialize;

use crate::error::MedcheckError;

const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com";
const GEMINI_API: &str = "gemini";
const GEMINI_BASE_ENV: &str = "MEDCHECK_GEMINI_BASE";
const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
const GEMINI_DOCS_URL: &str = "https://ai.google.dev/gemini-api/docs/api-key";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Explicit configuration for the generative back end.
///
/// The credential is carried here rather than read ambiently by the client,
/// so callers decide where it comes from and tests can construct one freely.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Builds a config from `GEMINI_API_KEY` with the default model.
    pub fn from_env() -> Result<Self, MedcheckError> {
        let api_key = std::env::var(GEMINI_KEY_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MedcheckError::ApiKeyRequired {
                api: GEMINI_API.to_string(),
                env_var: GEMINI_KEY_ENV.to_string(),
                docs_url: GEMINI_DOCS_URL.to_string(),
            })?;
        Ok(Self::new(api_key, DEFAULT_GEMINI_MODEL))
    }
}

pub(crate) struct GeminiClient {
    client: reqwest::Client,
    base: Cow<'static, str>,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, MedcheckError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(GEMINI_BASE, GEMINI_BASE_ENV),
            config,
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(base: String, config: GeminiConfig) -> Result<Self, MedcheckError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: Cow::Owned(base),
            config,
        })
    }

    /// One non-streaming generation call constrained to a JSON response.
    ///
    /// Returns the concatenated candidate text; an answered request that
    /// carries no text at all is an [`MedcheckError::EmptyResponse`].
    pub async fn generate_json(
        &self,
        prompt: &str,
        system_instruction: &str,
        response_schema: serde_json::Value,
    ) -> Result<String, MedcheckError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base.as_ref().trim_end_matches('/'),
            self.config.model
        );

        let body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "systemInstruction": {"parts": [{"text": system_instruction}]},
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema
            }
        });

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = crate::sources::read_limited_body(resp, GEMINI_API).await?;

        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(MedcheckError::Api {
                api: GEMINI_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|source| MedcheckError::ApiJson {
                api: GEMINI_API.to_string(),
                source,
            })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(MedcheckError::EmptyResponse {
                api: GEMINI_API.to_string(),
            });
        }

        Ok(text)
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GenerateContentCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentCandidate {
    #[serde(default)]
    content: GenerateContentContent,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentContent {
    #[serde(default)]
    parts: Vec<GenerateContentPart>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentPart {
    #[serde(default)]
    text: Option<String>,
}
