//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::ProviderArg;

/// Talking-avatar videos from D-ID or HeyGen, with a local fallback
#[derive(Parser, Debug)]
#[command(name = "avatar-relay")]
#[command(version, about = "Talking-avatar videos with provider fallback", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Animate a doctor photo, trying D-ID then HeyGen
    avatar-relay create --source https://img/doctor.png --text \"Olá\"

    # Prefer HeyGen and wait for the video
    avatar-relay create -s https://img/doctor.png -t \"Olá\" --provider heygen --wait

    # Check a job later
    avatar-relay status tlk_123 --service D-ID

ENVIRONMENT:
    DID_API_KEY       D-ID API key
    HEYGEN_API_KEY    HeyGen API key
    RUST_LOG          Log filter (default: info)")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Request a talking-avatar video
    Create {
        /// Image URL or provider avatar id
        #[arg(long, short)]
        source: String,

        /// Text the avatar should speak
        #[arg(long, short)]
        text: String,

        /// Provider to try first
        #[arg(long, short, conflicts_with = "auto")]
        provider: Option<ProviderArg>,

        /// Pick the provider from the source reference
        #[arg(long)]
        auto: bool,

        /// Poll until the video is ready
        #[arg(long, short)]
        wait: bool,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check the status of a previously created video
    Status {
        /// Video id returned by `create`
        video_id: String,

        /// Service that created the video (e.g. D-ID, HeyGen)
        #[arg(long)]
        service: String,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which provider a source reference would prefer
    Detect {
        source: String,
    },
    /// List configured providers
    Providers,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
