//! Talking-avatar provider integration.
//!
//! Provider adapters (D-ID, HeyGen) turn an image or avatar identity plus a
//! line of text into a talking-head video. The orchestrator tries them in
//! order and degrades to a local "native" animation when none answers.

mod did;
mod error;
mod heygen;
mod orchestrator;
mod poll;
mod provider;
mod registry;
mod status;

pub use did::{DIdClient, DID_API_BASE_URL, DID_DEFAULT_VOICE};
pub use error::AvatarError;
pub use heygen::{HeyGenClient, HEYGEN_API_BASE_URL, HEYGEN_DEFAULT_VOICE};
pub use orchestrator::{
    detect_best_service, AnimationRequest, AvatarOrchestrator, HEYGEN_PREFERRED_SOURCE,
};
pub use poll::{StatusPoller, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
pub use provider::{
    validate_job_id, validate_request, AvatarProvider, HttpSettings, JobHandle, ProviderChoice,
    ProviderId, ProviderJob, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT,
};
pub use registry::ProviderRegistry;
pub use status::{
    normalize_state, AnimationResponse, NormalizedStatus, VideoState, NATIVE_SERVICE,
};
