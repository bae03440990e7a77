//! `agriroute doctor`: Diagnose setup problems.

use agriroute_config::AppConfig;
use agriroute_core::Provider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 AgriRoute Doctor — Setup Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    let config = if AppConfig::config_path().exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ⚠️  No config file — using defaults (run `agriroute onboard`)");
        AppConfig::load().ok()
    };

    if let Some(config) = config {
        if config.has_api_key() {
            println!("  ✅ API key configured");
        } else {
            println!("  ❌ No API key — set GEMINI_API_KEY or add api_key to config.toml");
            issues += 1;
        }

        if config.enabled_experts().next().is_some() {
            println!("  ✅ {} expert(s) enabled", config.enabled_experts().count());
        } else {
            println!("  ⚠️  No experts enabled — every request will get the clarification reply");
            issues += 1;
        }

        if config.has_api_key() {
            let router = agriroute_providers::build_from_config(&config);
            match router.default() {
                Some(provider) => match provider.health_check().await {
                    Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
                    Ok(false) => {
                        println!("  ⚠️  Provider '{}' answered but reported unhealthy", provider.name());
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                        issues += 1;
                    }
                },
                None => {
                    println!("  ❌ Default provider '{}' not configured", config.default_provider);
                    issues += 1;
                }
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
