mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use avatar_relay::avatar::{AvatarOrchestrator, ProviderId, ProviderRegistry};
use avatar_relay::config::Config;
use cli::{Args, Command, CreateOptions};

/// Load .env file. Does not override existing environment variables.
fn load_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();
}

fn warn_missing_credentials() {
    let missing: Vec<&str> = ProviderId::DEFAULT_ORDER
        .iter()
        .map(|id| id.credential_env())
        .filter(|var| std::env::var(var).map_or(true, |v| v.trim().is_empty()))
        .collect();
    if !missing.is_empty() {
        log::warn!(
            "Provider credentials not set: {}. Those providers will be skipped.",
            missing.join(", ")
        );
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Also installs the bridge that forwards `log` records.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_orchestrator(config: &Config) -> AvatarOrchestrator {
    let registry = ProviderRegistry::from_config(config);
    AvatarOrchestrator::with_default_order(registry, config.orchestrator.default_order.clone())
}

fn run(args: Args) -> Result<(), String> {
    // Detection needs neither config nor credentials.
    if let Command::Detect { source } = &args.command {
        cli::run_detect(source);
        return Ok(());
    }

    let config = Config::load(args.config.as_deref()).map_err(|e| e.to_string())?;

    let command = match args.command {
        Command::Config { action } => {
            return cli::handle_config_action(action, args.config.as_deref(), &config);
        }
        other => other,
    };

    let orchestrator = build_orchestrator(&config);
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    rt.block_on(async {
        match command {
            Command::Create {
                source,
                text,
                provider,
                auto,
                wait,
                json,
            } => {
                let options = CreateOptions {
                    source,
                    text,
                    provider: provider.map(Into::into),
                    auto,
                    wait,
                    json,
                };
                cli::run_create(&orchestrator, &config.poll.poller(), options).await
            }
            Command::Status {
                video_id,
                service,
                json,
            } => cli::run_status(&orchestrator, &video_id, &service, json).await,
            Command::Providers => {
                cli::run_providers(orchestrator.registry());
                Ok(())
            }
            Command::Detect { .. } | Command::Config { .. } => Ok(()),
        }
    })
}

fn main() {
    // RUST_LOG may come from .env.
    load_env();
    init_logging();
    warn_missing_credentials();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
