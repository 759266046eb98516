//! Subcommand handlers for create, status, detect, providers and config.

use std::path::Path;

use avatar_relay::avatar::{
    detect_best_service, AnimationRequest, AnimationResponse, AvatarOrchestrator, JobHandle,
    ProviderChoice, ProviderId, ProviderRegistry, StatusPoller,
};
use avatar_relay::config::{default_path, Config, DEFAULT_CONFIG_TEMPLATE};

use super::args::ConfigAction;

/// Options for the `create` subcommand.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub source: String,
    pub text: String,
    pub provider: Option<ProviderChoice>,
    pub auto: bool,
    pub wait: bool,
    pub json: bool,
}

fn print_response(response: &AnimationResponse, json: bool) -> Result<(), String> {
    if json {
        let rendered = serde_json::to_string_pretty(response)
            .map_err(|e| format!("Failed to render response: {}", e))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Service: {}", response.service);
    println!("Status:  {}", response.status.as_str());
    if let Some(id) = &response.video_id {
        println!("Video ID: {}", id);
    }
    if let Some(url) = &response.video_url {
        println!("Video URL: {}", url);
    }
    if let Some(error) = &response.error {
        println!("Error: {}", error);
    }
    if response.is_native() {
        println!();
        println!("No remote provider answered; play the local animation.");
    }
    Ok(())
}

/// Request a talking avatar and optionally wait for it.
pub async fn run_create(
    orchestrator: &AvatarOrchestrator,
    poller: &StatusPoller,
    options: CreateOptions,
) -> Result<(), String> {
    let preferred = if options.auto {
        Some(detect_best_service(&options.source))
    } else {
        options.provider
    };

    let mut request = AnimationRequest::new(options.source, options.text);
    request.preferred_provider = preferred;

    let mut response = orchestrator.create_talking_avatar(&request).await;

    if options.wait && !response.status.is_terminal() {
        let provider: ProviderId = response
            .service
            .parse()
            .map_err(|e| format!("Cannot poll {}: {}", response.service, e))?;
        let job_id = response
            .video_id
            .clone()
            .ok_or_else(|| format!("{} returned no video id to poll", response.service))?;

        if !options.json {
            println!("Waiting for {} video {}...", provider, job_id);
        }
        response = poller
            .wait(orchestrator, &JobHandle { provider, job_id })
            .await
            .map_err(|e| e.to_string())?;
    }

    print_response(&response, options.json)?;
    if response.success {
        Ok(())
    } else {
        Err(response
            .error
            .unwrap_or_else(|| "Video generation failed".to_string()))
    }
}

/// Check a video's status once.
pub async fn run_status(
    orchestrator: &AvatarOrchestrator,
    video_id: &str,
    service: &str,
    json: bool,
) -> Result<(), String> {
    let response = orchestrator.check_video_status(video_id, service).await;
    print_response(&response, json)?;
    if response.success {
        Ok(())
    } else {
        Err(response
            .error
            .unwrap_or_else(|| "Status check failed".to_string()))
    }
}

/// Print the provider a source reference would prefer.
pub fn run_detect(source: &str) {
    match detect_best_service(source) {
        ProviderChoice::Provider(id) => println!("{}", id),
        ProviderChoice::Native => println!("native"),
    }
}

/// List configured and unavailable providers.
pub fn run_providers(registry: &ProviderRegistry) {
    if registry.is_empty() {
        println!("No providers configured. Every request will use the native fallback.");
    } else {
        println!("Configured providers:");
        for id in registry.ids() {
            println!("  {}", id);
        }
    }

    let unavailable: Vec<_> = registry.unavailable().collect();
    if !unavailable.is_empty() {
        println!();
        println!("Unavailable:");
        for (id, reason) in unavailable {
            println!("  {}: {}", id, reason);
        }
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config_path: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            let rendered = config
                .to_toml()
                .map_err(|e| format!("Failed to render config: {}", e))?;
            println!("{}", rendered);

            for id in ProviderId::DEFAULT_ORDER {
                let env_var = id.credential_env();
                let state = match std::env::var(env_var) {
                    Ok(v) if !v.trim().is_empty() => "set",
                    _ => "not set",
                };
                println!("{}: {}", env_var, state);
            }
            println!();

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if path.exists() {
                return Err(format!(
                    "Config file already exists: {}\nUse 'avatar-relay config show' to view current settings.",
                    path.display()
                ));
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Error creating config directory: {}", e))?;
            }

            std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
                .map_err(|e| format!("Error writing config file: {}", e))?;
            println!("Created config file: {}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_init_writes_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        handle_config_action(ConfigAction::Init, Some(&path), &Config::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, DEFAULT_CONFIG_TEMPLATE);
    }

    #[test]
    fn test_config_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# mine").unwrap();

        let result = handle_config_action(ConfigAction::Init, Some(&path), &Config::default());
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");
    }

    #[tokio::test]
    async fn test_create_with_native_preference_succeeds() {
        let orchestrator = AvatarOrchestrator::new(ProviderRegistry::new());
        let options = CreateOptions {
            source: "https://img/doctor.png".to_string(),
            text: "Olá".to_string(),
            provider: Some(ProviderChoice::Native),
            auto: false,
            wait: true,
            json: true,
        };
        let result = run_create(&orchestrator, &StatusPoller::default(), options).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_status_for_unknown_service_is_error() {
        let orchestrator = AvatarOrchestrator::new(ProviderRegistry::new());
        let result = run_status(&orchestrator, "id", "Nope", true).await;
        assert_eq!(result, Err("Serviço não reconhecido".to_string()));
    }
}
