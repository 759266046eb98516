//! AvatarOrchestrator - one entry point over all configured providers.
//!
//! A request walks the provider list in order, awaiting each attempt before
//! trying the next. The first provider that accepts the job wins. Every
//! adapter error is logged and turns into "try the next one"; when the list
//! is exhausted the caller gets a successful native-fallback response and is
//! expected to play the local animation instead.

use super::error::AvatarError;
use super::provider::{JobHandle, ProviderChoice, ProviderId};
use super::registry::ProviderRegistry;
use super::status::{AnimationResponse, NormalizedStatus, VideoState};

/// Source image of the platform doctor whose avatar renders best on HeyGen.
pub const HEYGEN_PREFERRED_SOURCE: &str = "dra-cannabis.png";

/// A single "make this face say this" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRequest {
    /// Image URL or provider-specific avatar identity.
    pub source_ref: String,
    pub text: String,
    pub preferred_provider: Option<ProviderChoice>,
}

impl AnimationRequest {
    pub fn new(source_ref: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            text: text.into(),
            preferred_provider: None,
        }
    }

    pub fn with_preferred(mut self, choice: impl Into<ProviderChoice>) -> Self {
        self.preferred_provider = Some(choice.into());
        self
    }
}

/// Pick the provider most likely to render `source_ref` well.
///
/// Pure lookup: one hard-coded rule, otherwise the default provider.
pub fn detect_best_service(source_ref: &str) -> ProviderChoice {
    if source_ref.contains(HEYGEN_PREFERRED_SOURCE) {
        ProviderChoice::Provider(ProviderId::HeyGen)
    } else {
        ProviderChoice::Provider(ProviderId::DEFAULT_ORDER[0])
    }
}

/// Fallback orchestrator over a fixed set of provider adapters.
pub struct AvatarOrchestrator {
    registry: ProviderRegistry,
    default_order: Vec<ProviderId>,
}

impl AvatarOrchestrator {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self::with_default_order(registry, ProviderId::DEFAULT_ORDER.to_vec())
    }

    /// Use `default_order` instead of [`ProviderId::DEFAULT_ORDER`] when the
    /// caller states no preference. Duplicates are ignored.
    pub fn with_default_order(registry: ProviderRegistry, default_order: Vec<ProviderId>) -> Self {
        let mut order: Vec<ProviderId> = Vec::with_capacity(default_order.len());
        for id in default_order {
            if !order.contains(&id) {
                order.push(id);
            }
        }
        Self {
            registry,
            default_order: order,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn default_order(&self) -> &[ProviderId] {
        &self.default_order
    }

    /// Providers to try for `preferred`, restricted to configured adapters.
    ///
    /// The preferred provider goes first, followed by the default order.
    /// `Native` yields an empty list.
    pub fn provider_order(&self, preferred: Option<ProviderChoice>) -> Vec<ProviderId> {
        let mut order = Vec::with_capacity(self.default_order.len() + 1);
        match preferred {
            Some(ProviderChoice::Native) => return order,
            Some(ProviderChoice::Provider(id)) => order.push(id),
            None => {}
        }
        for id in &self.default_order {
            if !order.contains(id) {
                order.push(*id);
            }
        }
        order.retain(|id| self.registry.contains(*id));
        order
    }

    /// Render `request` with the first provider that accepts it.
    ///
    /// Never fails: when no provider succeeds the response points at the
    /// native fallback.
    pub async fn create_talking_avatar(&self, request: &AnimationRequest) -> AnimationResponse {
        let order = self.provider_order(request.preferred_provider);

        for id in order {
            let Some(adapter) = self.registry.get(id) else {
                continue;
            };

            log::info!("Requesting talking avatar from {}", id);
            let job = match adapter
                .create_talking_video(&request.source_ref, &request.text)
                .await
            {
                Ok(job) => job,
                Err(e) => {
                    log::warn!("{} failed, trying next provider: {}", id, e);
                    continue;
                }
            };

            let normalized = NormalizedStatus::from_job(id, job);
            if normalized.state == VideoState::Failed {
                log::warn!(
                    "{} rejected the job, trying next provider: {}",
                    id,
                    normalized.error.as_deref().unwrap_or("no details")
                );
                continue;
            }

            let state = if normalized.result_url.is_some() {
                VideoState::Completed
            } else {
                VideoState::Processing
            };
            log::info!(
                "{} accepted job {} ({})",
                id,
                normalized.job_id.as_deref().unwrap_or("-"),
                state.as_str()
            );
            return NormalizedStatus { state, ..normalized }.into();
        }

        log::warn!("No avatar provider available, using native fallback");
        NormalizedStatus::native_fallback().into()
    }

    /// Query the provider named `service_name` about `video_id`.
    ///
    /// Single attempt. Unknown or unconfigured providers and adapter errors
    /// are reported as a failed response.
    pub async fn check_video_status(&self, video_id: &str, service_name: &str) -> AnimationResponse {
        match self.try_check_video_status(video_id, service_name).await {
            Ok(status) => status.into(),
            Err(e) => {
                log::warn!("Status check for {} at {} failed: {}", video_id, service_name, e);
                NormalizedStatus::failure(service_name, Some(video_id.to_string()), e.to_string())
                    .into()
            }
        }
    }

    /// Status of a job by its handle.
    pub async fn check_job(&self, handle: &JobHandle) -> AnimationResponse {
        self.check_video_status(&handle.job_id, handle.provider.name())
            .await
    }

    async fn try_check_video_status(
        &self,
        video_id: &str,
        service_name: &str,
    ) -> Result<NormalizedStatus, AvatarError> {
        let id: ProviderId = service_name.parse()?;
        let adapter = self
            .registry
            .get(id)
            .ok_or_else(|| AvatarError::UnknownProvider(service_name.to_string()))?;

        log::debug!("Checking {} job {}", id, video_id);
        let mut job = adapter.check_status(video_id).await?;
        if job.job_id.is_none() {
            job.job_id = Some(video_id.to_string());
        }
        Ok(NormalizedStatus::from_job(id, job))
    }
}
