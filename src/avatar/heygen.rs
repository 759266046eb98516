//! HeyGenClient - handles communication with the HeyGen video generation API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AvatarError;
use super::provider::{
    api_error, require_credential, validate_job_id, validate_request, AvatarProvider,
    HttpSettings, ProviderId, ProviderJob,
};
use crate::config::HeyGenConfig;

/// Default base URL for the HeyGen API.
pub const HEYGEN_API_BASE_URL: &str = "https://api.heygen.com";

/// Default HeyGen voice (Brazilian Portuguese, female).
pub const HEYGEN_DEFAULT_VOICE: &str = "pt-BR-female-1";

/// Request body for `POST /v2/video/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    video_inputs: Vec<VideoInput<'a>>,
    dimension: Dimension,
}

#[derive(Debug, Serialize)]
struct VideoInput<'a> {
    character: Character<'a>,
    voice: Voice<'a>,
}

/// Who speaks: an uploaded photo by URL or a stock/custom avatar by id.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Character<'a> {
    TalkingPhoto {
        talking_photo_url: &'a str,
    },
    Avatar {
        avatar_id: &'a str,
        avatar_style: &'static str,
    },
}

impl<'a> Character<'a> {
    fn from_source(source_ref: &'a str) -> Self {
        if source_ref.starts_with("http://") || source_ref.starts_with("https://") {
            Character::TalkingPhoto {
                talking_photo_url: source_ref,
            }
        } else {
            Character::Avatar {
                avatar_id: source_ref,
                avatar_style: "normal",
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct Voice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    input_text: &'a str,
    voice_id: &'a str,
}

#[derive(Debug, Serialize)]
struct Dimension {
    width: u32,
    height: u32,
}

/// Video fields as HeyGen reports them.
#[derive(Debug, Default, Deserialize)]
struct VideoFields {
    #[serde(default, alias = "id")]
    video_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// HeyGen wraps results in `{"error": ..., "data": {...}}`; some endpoints
/// answer with the fields at the top level instead.
#[derive(Debug, Deserialize)]
struct HeyGenResponse {
    #[serde(flatten)]
    top: VideoFields,
    #[serde(default)]
    data: Option<VideoFields>,
}

impl HeyGenResponse {
    /// Merge enveloped and flat fields, preferring the envelope.
    fn into_fields(self) -> VideoFields {
        let top = self.top;
        match self.data {
            Some(data) => VideoFields {
                video_id: data.video_id.or(top.video_id),
                status: data.status.or(top.status),
                video_url: data.video_url.or(top.video_url),
                error: non_null(data.error).or(non_null(top.error)),
            },
            None => VideoFields {
                error: non_null(top.error),
                ..top
            },
        }
    }
}

fn non_null(value: Option<serde_json::Value>) -> Option<serde_json::Value> {
    value.filter(|v| !v.is_null())
}

fn describe_error(value: serde_json::Value) -> String {
    if let Some(message) = value.as_str() {
        return message.to_string();
    }
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// Client for the HeyGen video generation API.
pub struct HeyGenClient {
    api_key: String,
    base_url: String,
    voice_id: String,
    width: u32,
    height: u32,
    http_client: reqwest::Client,
}

impl HeyGenClient {
    /// Create a HeyGenClient by reading the API key from `HEYGEN_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns `AvatarError::MissingCredential` if the variable is unset or empty.
    pub fn new() -> Result<Self, AvatarError> {
        let api_key = std::env::var(ProviderId::HeyGen.credential_env()).unwrap_or_default();
        Self::with_api_key(api_key)
    }

    pub fn with_api_key(api_key: String) -> Result<Self, AvatarError> {
        Self::from_config(api_key, &HeyGenConfig::default(), &HttpSettings::default())
    }

    /// Create a HeyGenClient pointed at a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, AvatarError> {
        let config = HeyGenConfig {
            base_url,
            ..HeyGenConfig::default()
        };
        Self::from_config(api_key, &config, &HttpSettings::default())
    }

    pub fn from_config(
        api_key: String,
        config: &HeyGenConfig,
        http: &HttpSettings,
    ) -> Result<Self, AvatarError> {
        let api_key = require_credential(ProviderId::HeyGen, api_key)?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            voice_id: config.voice_id.clone(),
            width: config.width,
            height: config.height,
            http_client: http.build_client()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    pub fn dimension(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn into_job(fields: VideoFields, fallback_id: Option<&str>) -> Result<ProviderJob, AvatarError> {
        let job_id = fields.video_id.or_else(|| fallback_id.map(str::to_string));

        if job_id.is_none() && fields.video_url.is_none() {
            return Err(AvatarError::MalformedResponse {
                provider: ProviderId::HeyGen,
                message: "response carries neither a video id nor a video URL".to_string(),
            });
        }

        let status = fields.status.unwrap_or_else(|| {
            if fields.video_url.is_some() {
                "completed".to_string()
            } else {
                "pending".to_string()
            }
        });

        Ok(ProviderJob {
            job_id,
            status,
            result_url: fields.video_url,
            error: fields.error.map(describe_error),
        })
    }
}

#[async_trait]
impl AvatarProvider for HeyGenClient {
    fn id(&self) -> ProviderId {
        ProviderId::HeyGen
    }

    async fn create_talking_video(
        &self,
        source_ref: &str,
        text: &str,
    ) -> Result<ProviderJob, AvatarError> {
        validate_request(source_ref, text)?;

        let url = format!("{}/v2/video/generate", self.base_url);
        let body = GenerateRequest {
            video_inputs: vec![VideoInput {
                character: Character::from_source(source_ref),
                voice: Voice {
                    kind: "text",
                    input_text: text,
                    voice_id: &self.voice_id,
                },
            }],
            dimension: Dimension {
                width: self.width,
                height: self.height,
            },
        };

        let response = self
            .http_client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(ProviderId::HeyGen, response).await);
        }

        let parsed: HeyGenResponse = response.json().await?;
        Self::into_job(parsed.into_fields(), None)
    }

    async fn check_status(&self, job_id: &str) -> Result<ProviderJob, AvatarError> {
        validate_job_id(job_id)?;
        let url = format!("{}/v1/video_status.get", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("video_id", job_id)])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(ProviderId::HeyGen, response).await);
        }

        let parsed: HeyGenResponse = response.json().await?;
        Self::into_job(parsed.into_fields(), Some(job_id))
    }
}
