//! Status normalization and the response shapes handed back to callers.

use serde::{Deserialize, Serialize};

use super::provider::{ProviderId, ProviderJob};

/// Service name reported when every remote provider failed.
pub const NATIVE_SERVICE: &str = "Native Enhanced";

/// Provider-independent state of a video job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoState {
    Processing,
    Completed,
    Failed,
}

impl VideoState {
    pub fn is_terminal(self) -> bool {
        matches!(self, VideoState::Completed | VideoState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VideoState::Processing => "processing",
            VideoState::Completed => "completed",
            VideoState::Failed => "failed",
        }
    }
}

/// Map a provider-native status string to [`VideoState`].
///
/// Returns `None` when the provider used a word outside its known vocabulary.
pub fn normalize_state(provider: ProviderId, native: &str) -> Option<VideoState> {
    let native = native.trim().to_lowercase();
    let state = match provider {
        ProviderId::DId => match native.as_str() {
            "created" | "started" => VideoState::Processing,
            "done" => VideoState::Completed,
            "error" | "rejected" => VideoState::Failed,
            _ => return None,
        },
        ProviderId::HeyGen => match native.as_str() {
            "pending" | "waiting" | "processing" => VideoState::Processing,
            "completed" => VideoState::Completed,
            "failed" => VideoState::Failed,
            _ => return None,
        },
    };
    Some(state)
}

/// A provider job after normalization. Built fresh on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStatus {
    pub success: bool,
    pub provider: String,
    pub job_id: Option<String>,
    pub state: VideoState,
    pub result_url: Option<String>,
    pub error: Option<String>,
}

impl NormalizedStatus {
    /// Normalize a job reported by `provider`.
    ///
    /// Unknown native statuses are reported as failed so that pollers stop.
    pub fn from_job(provider: ProviderId, job: ProviderJob) -> Self {
        let (state, error) = match normalize_state(provider, &job.status) {
            Some(VideoState::Failed) => (
                VideoState::Failed,
                Some(job.error.unwrap_or_else(|| {
                    format!("{} reported status '{}'", provider, job.status)
                })),
            ),
            Some(state) => (state, job.error),
            None => (
                VideoState::Failed,
                Some(format!(
                    "{} returned unrecognized status '{}'",
                    provider, job.status
                )),
            ),
        };

        Self {
            success: state != VideoState::Failed,
            provider: provider.name().to_string(),
            job_id: job.job_id,
            state,
            result_url: job.result_url,
            error,
        }
    }

    /// The synthetic result used when no remote provider could be reached.
    pub fn native_fallback() -> Self {
        Self {
            success: true,
            provider: NATIVE_SERVICE.to_string(),
            job_id: None,
            state: VideoState::Completed,
            result_url: None,
            error: None,
        }
    }

    /// A failed status attributed to `service`.
    pub fn failure(service: impl Into<String>, job_id: Option<String>, error: String) -> Self {
        Self {
            success: false,
            provider: service.into(),
            job_id,
            state: VideoState::Failed,
            result_url: None,
            error: Some(error),
        }
    }
}

/// Response returned to the rest of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationResponse {
    pub success: bool,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub status: VideoState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnimationResponse {
    pub fn is_native(&self) -> bool {
        self.service == NATIVE_SERVICE
    }
}

impl From<NormalizedStatus> for AnimationResponse {
    fn from(status: NormalizedStatus) -> Self {
        Self {
            success: status.success,
            service: status.provider,
            video_url: status.result_url,
            video_id: status.job_id,
            status: status.state,
            error: status.error,
        }
    }
}
