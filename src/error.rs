#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum MedcheckError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {api}: {message}")]
    Api { api: String, message: String },

    #[error("API JSON error from {api}: {source}")]
    ApiJson {
        api: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Empty response from {api}: the service answered but returned no usable payload")]
    EmptyResponse { api: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "API key required: {api} requires {env_var} environment variable.\n\nTo set:\n  export {env_var}=your-key\n\nMore info: {docs_url}"
    )]
    ApiKeyRequired {
        api: String,
        env_var: String,
        docs_url: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::MedcheckError;

    #[test]
    fn api_error_display_includes_api_name() {
        let err = MedcheckError::Api {
            api: "rxnav".to_string(),
            message: "HTTP 503".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("rxnav"));
        assert!(msg.contains("HTTP 503"));
    }

    #[test]
    fn api_key_required_display_includes_env_var_and_docs() {
        let err = MedcheckError::ApiKeyRequired {
            api: "gemini".to_string(),
            env_var: "GEMINI_API_KEY".to_string(),
            docs_url: "https://ai.google.dev/gemini-api/docs/api-key".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("GEMINI_API_KEY"));
        assert!(msg.contains("https://ai.google.dev/gemini-api/docs/api-key"));
    }

    #[test]
    fn empty_response_display_names_api() {
        let err = MedcheckError::EmptyResponse {
            api: "gemini".to_string(),
        };

        assert!(err.to_string().contains("gemini"));
    }
}
