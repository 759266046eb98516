//! Provider identities and the adapter trait every provider client implements.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AvatarError;

/// Default timeout for HTTP requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Known remote avatar providers.
///
/// The display name is the tag callers must keep alongside a job id to
/// query its status later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "D-ID")]
    DId,
    #[serde(rename = "HeyGen")]
    HeyGen,
}

impl ProviderId {
    /// Providers in the order they are tried when the caller has no preference.
    pub const DEFAULT_ORDER: [ProviderId; 2] = [ProviderId::DId, ProviderId::HeyGen];

    pub fn name(self) -> &'static str {
        match self {
            ProviderId::DId => "D-ID",
            ProviderId::HeyGen => "HeyGen",
        }
    }

    /// Environment variable holding this provider's credential.
    pub fn credential_env(self) -> &'static str {
        match self {
            ProviderId::DId => "DID_API_KEY",
            ProviderId::HeyGen => "HEYGEN_API_KEY",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderId {
    type Err = AvatarError;

    /// Exact match on the display name. No case folding: a tag that does not
    /// round-trip is treated as unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::DEFAULT_ORDER
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| AvatarError::UnknownProvider(s.to_string()))
    }
}

/// What the caller would like to render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    Provider(ProviderId),
    /// Skip remote providers and use the local animation.
    Native,
}

impl From<ProviderId> for ProviderChoice {
    fn from(id: ProviderId) -> Self {
        ProviderChoice::Provider(id)
    }
}

/// A job as reported by a provider, in that provider's own vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderJob {
    /// Absent when a provider answers synchronously with a finished video.
    pub job_id: Option<String>,
    /// Provider-native status string (e.g. `"created"`, `"done"`, `"processing"`).
    pub status: String,
    pub result_url: Option<String>,
    pub error: Option<String>,
}

/// Reference to a job at a specific provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    pub provider: ProviderId,
    pub job_id: String,
}

/// A client for one external talking-avatar API.
///
/// Implementations only translate between the generic request shape and
/// their provider's wire format. They do not normalize status and know
/// nothing about sibling providers.
#[async_trait]
pub trait AvatarProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Submit a talking-video job for `source_ref` speaking `text`.
    ///
    /// # Errors
    ///
    /// `AvatarError::EmptyText` / `AvatarError::EmptySource` for invalid input,
    /// `AvatarError::Api` for non-2xx responses, `AvatarError::Http` when the
    /// request itself fails.
    async fn create_talking_video(
        &self,
        source_ref: &str,
        text: &str,
    ) -> Result<ProviderJob, AvatarError>;

    /// Fetch the current provider-native status of `job_id`.
    async fn check_status(&self, job_id: &str) -> Result<ProviderJob, AvatarError>;
}

/// Validate adapter input before sending anything over the network.
pub fn validate_request(source_ref: &str, text: &str) -> Result<(), AvatarError> {
    if source_ref.trim().is_empty() {
        return Err(AvatarError::EmptySource);
    }
    if text.trim().is_empty() {
        return Err(AvatarError::EmptyText);
    }
    Ok(())
}

/// Reject job ids that are empty or would not stay a single URL path segment.
pub fn validate_job_id(job_id: &str) -> Result<(), AvatarError> {
    let trimmed = job_id.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(AvatarError::InvalidJobId(job_id.to_string()));
    }
    Ok(())
}

/// Timeouts applied to every provider HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl HttpSettings {
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, AvatarError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;
        Ok(client)
    }
}

/// Turn a non-success response into `AvatarError::Api`, keeping the body.
pub(crate) async fn api_error(provider: ProviderId, response: reqwest::Response) -> AvatarError {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    AvatarError::Api {
        provider,
        status,
        body,
    }
}

/// Read a credential, treating an empty value as absent.
pub(crate) fn require_credential(
    provider: ProviderId,
    api_key: String,
) -> Result<String, AvatarError> {
    if api_key.trim().is_empty() {
        return Err(AvatarError::MissingCredential {
            provider,
            env_var: provider.credential_env(),
        });
    }
    Ok(api_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names_round_trip() {
        for id in ProviderId::DEFAULT_ORDER {
            assert_eq!(id.name().parse::<ProviderId>().unwrap(), id);
        }
    }

    #[test]
    fn test_provider_from_str_is_exact() {
        assert!("d-id".parse::<ProviderId>().is_err());
        assert!("Heygen".parse::<ProviderId>().is_err());
        assert!(" D-ID".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_unknown_provider_keeps_name() {
        match "UnknownProvider".parse::<ProviderId>() {
            Err(AvatarError::UnknownProvider(name)) => assert_eq!(name, "UnknownProvider"),
            other => panic!("Expected UnknownProvider, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_serializes_as_display_name() {
        let json = serde_json::to_string(&ProviderId::DId).unwrap();
        assert_eq!(json, "\"D-ID\"");
        let id: ProviderId = serde_json::from_str("\"HeyGen\"").unwrap();
        assert_eq!(id, ProviderId::HeyGen);
    }

    #[test]
    fn test_credential_env_names() {
        assert_eq!(ProviderId::DId.credential_env(), "DID_API_KEY");
        assert_eq!(ProviderId::HeyGen.credential_env(), "HEYGEN_API_KEY");
    }

    #[test]
    fn test_validate_request() {
        assert!(validate_request("https://img/doctor.png", "Olá").is_ok());
        assert!(matches!(
            validate_request("", "Olá"),
            Err(AvatarError::EmptySource)
        ));
        assert!(matches!(
            validate_request("https://img/doctor.png", "   \n"),
            Err(AvatarError::EmptyText)
        ));
    }

    #[test]
    fn test_validate_job_id() {
        assert!(validate_job_id("tlk_123").is_ok());
        assert!(validate_job_id("../credits").is_ok());
        for bad in ["", "   ", ".", ".."] {
            assert!(matches!(
                validate_job_id(bad),
                Err(AvatarError::InvalidJobId(_))
            ));
        }
    }

    #[test]
    fn test_require_credential_rejects_blank() {
        let result = require_credential(ProviderId::DId, "  ".to_string());
        assert!(matches!(
            result,
            Err(AvatarError::MissingCredential {
                provider: ProviderId::DId,
                env_var: "DID_API_KEY"
            })
        ));
        assert_eq!(
            require_credential(ProviderId::DId, "key".to_string()).unwrap(),
            "key"
        );
    }

    #[test]
    fn test_default_http_settings() {
        let settings = HttpSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }
}
