//! CLI enum types for provider selection.

use clap::ValueEnum;

use avatar_relay::avatar::{ProviderChoice, ProviderId};

/// Provider requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    #[value(name = "d-id")]
    DId,
    Heygen,
    /// Skip remote providers and use the local animation
    Native,
}

impl From<ProviderArg> for ProviderChoice {
    fn from(p: ProviderArg) -> Self {
        match p {
            ProviderArg::DId => ProviderChoice::Provider(ProviderId::DId),
            ProviderArg::Heygen => ProviderChoice::Provider(ProviderId::HeyGen),
            ProviderArg::Native => ProviderChoice::Native,
        }
    }
}
