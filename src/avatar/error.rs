//! Error type shared by provider adapters, the orchestrator and the poller.

use std::time::Duration;

use super::provider::ProviderId;

/// Errors that can occur while talking to avatar providers.
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    /// The adapter's credential is absent or empty. Raised at construction.
    #[error("{provider} credential not configured (set {env_var})")]
    MissingCredential {
        provider: ProviderId,
        env_var: &'static str,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from a provider.
    #[error("{provider} API request failed with status {status}: {body}")]
    Api {
        provider: ProviderId,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unexpected response: {message}")]
    MalformedResponse {
        provider: ProviderId,
        message: String,
    },

    #[error("Empty text")]
    EmptyText,

    #[error("Empty source reference")]
    EmptySource,

    /// A status query carried a job id no provider could have issued.
    #[error("Invalid job id '{0}'")]
    InvalidJobId(String),

    #[error("{provider} base URL '{url}' cannot be used for API requests")]
    InvalidBaseUrl { provider: ProviderId, url: String },

    /// A status query named a provider with no configured adapter.
    #[error("Serviço não reconhecido")]
    UnknownProvider(String),

    #[error("Video still processing after {waited:?}")]
    Timeout { waited: Duration },
}
