//! DIdClient - handles communication with the D-ID talks API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AvatarError;
use super::provider::{
    api_error, require_credential, validate_job_id, validate_request, AvatarProvider,
    HttpSettings, ProviderId, ProviderJob,
};
use crate::config::DIdConfig;

/// Default base URL for the D-ID API.
pub const DID_API_BASE_URL: &str = "https://api.d-id.com";

/// Default Azure voice used for the spoken script.
pub const DID_DEFAULT_VOICE: &str = "pt-BR-FranciscaNeural";

/// Request body for `POST /talks`.
#[derive(Debug, Serialize)]
struct TalkRequest<'a> {
    source_url: &'a str,
    script: Script<'a>,
    config: TalkConfig,
}

#[derive(Debug, Serialize)]
struct Script<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    input: &'a str,
    provider: VoiceProvider<'a>,
}

#[derive(Debug, Serialize)]
struct VoiceProvider<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    voice_id: &'a str,
}

#[derive(Debug, Serialize)]
struct TalkConfig {
    fluent: bool,
    pad_audio: f32,
}

/// Response from both `POST /talks` and `GET /talks/{id}`.
#[derive(Debug, Deserialize)]
struct TalkResponse {
    id: String,
    /// Absent on some creation responses; a new talk is `created`.
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result_url: Option<String>,
    /// D-ID reports failures either as a string or as `{kind, description}`.
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl TalkResponse {
    fn into_job(self) -> ProviderJob {
        ProviderJob {
            job_id: Some(self.id),
            status: self.status.unwrap_or_else(|| "created".to_string()),
            result_url: self.result_url,
            error: self.error.map(describe_error),
        }
    }
}

fn describe_error(value: serde_json::Value) -> String {
    if let Some(message) = value.as_str() {
        return message.to_string();
    }
    value
        .get("description")
        .and_then(|d| d.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// Client for the D-ID talks API.
pub struct DIdClient {
    api_key: String,
    base_url: String,
    voice_id: String,
    fluent: bool,
    pad_audio: f32,
    http_client: reqwest::Client,
}

impl DIdClient {
    /// Create a DIdClient by reading the API key from `DID_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `AvatarError::MissingCredential` if the variable is unset or empty.
    pub fn new() -> Result<Self, AvatarError> {
        let api_key = std::env::var(ProviderId::DId.credential_env()).unwrap_or_default();
        Self::with_api_key(api_key)
    }

    /// Create a DIdClient with an explicit API key and default settings.
    pub fn with_api_key(api_key: String) -> Result<Self, AvatarError> {
        Self::from_config(api_key, &DIdConfig::default(), &HttpSettings::default())
    }

    /// Create a DIdClient pointed at a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, AvatarError> {
        let config = DIdConfig {
            base_url,
            ..DIdConfig::default()
        };
        Self::from_config(api_key, &config, &HttpSettings::default())
    }

    /// Create a DIdClient from loaded configuration.
    pub fn from_config(
        api_key: String,
        config: &DIdConfig,
        http: &HttpSettings,
    ) -> Result<Self, AvatarError> {
        let api_key = require_credential(ProviderId::DId, api_key)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            voice_id: config.voice_id.clone(),
            fluent: config.fluent,
            pad_audio: config.pad_audio,
            http_client: http.build_client()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    /// URL of a single talk, with `job_id` percent-encoded as one path segment.
    fn talk_url(&self, job_id: &str) -> Result<reqwest::Url, AvatarError> {
        let invalid = || AvatarError::InvalidBaseUrl {
            provider: ProviderId::DId,
            url: self.base_url.clone(),
        };
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("talks")
            .push(job_id);
        Ok(url)
    }

    fn authorization(&self) -> String {
        format!("Basic {}", self.api_key)
    }
}

#[async_trait]
impl AvatarProvider for DIdClient {
    fn id(&self) -> ProviderId {
        ProviderId::DId
    }

    async fn create_talking_video(
        &self,
        source_ref: &str,
        text: &str,
    ) -> Result<ProviderJob, AvatarError> {
        validate_request(source_ref, text)?;

        let url = format!("{}/talks", self.base_url);
        let body = TalkRequest {
            source_url: source_ref,
            script: Script {
                kind: "text",
                input: text,
                provider: VoiceProvider {
                    kind: "microsoft",
                    voice_id: &self.voice_id,
                },
            },
            config: TalkConfig {
                fluent: self.fluent,
                pad_audio: self.pad_audio,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.authorization())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(ProviderId::DId, response).await);
        }

        let talk: TalkResponse = response.json().await?;
        log::debug!("D-ID talk {} created", talk.id);
        Ok(talk.into_job())
    }

    async fn check_status(&self, job_id: &str) -> Result<ProviderJob, AvatarError> {
        validate_job_id(job_id)?;
        let url = self.talk_url(job_id)?;

        let response = self
            .http_client
            .get(url)
            .header("Authorization", self.authorization())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(ProviderId::DId, response).await);
        }

        let talk: TalkResponse = response.json().await?;
        Ok(talk.into_job())
    }
}
