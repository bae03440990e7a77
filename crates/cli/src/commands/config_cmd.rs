//! `agriroute config`: Configuration management commands.

use agriroute_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if !config.has_api_key() {
                warnings.push("No API key set (set GEMINI_API_KEY or AGRIROUTE_API_KEY env var)");
            }

            if config.enabled_experts().next().is_none() {
                warnings.push("No experts enabled; every request gets the clarification reply");
            }

            if config.routing.greeting.trim().is_empty() && config.routing.greet_first_turn {
                warnings.push("Greeting is empty but greet_first_turn = true");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:  {}", config.default_provider);
            println!("   Model:     {}", config.default_model);
            println!(
                "   Experts:   {} enabled / {} configured",
                config.enabled_experts().count(),
                config.experts.len()
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    redact_keys(&mut config);
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

/// Mask API keys before printing the effective configuration.
fn redact_keys(config: &mut AppConfig) {
    const MASK: &str = "***";
    if config.api_key.is_some() {
        config.api_key = Some(MASK.into());
    }
    for provider in config.providers.values_mut() {
        if provider.api_key.is_some() {
            provider.api_key = Some(MASK.into());
        }
    }
}
