//! `agriroute status`: Show configuration status.

use agriroute_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🌾 AgriRoute Status");
    println!("===================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.default_model);
    println!("  Temperature:  {}", config.default_temperature);
    println!("  Max tokens:   {}", config.default_max_tokens);
    println!("  Timeout:      {}s", config.request_timeout_secs);
    println!(
        "  Experts:      {} enabled / {} configured",
        config.enabled_experts().count(),
        config.experts.len()
    );
    println!("  Greeting:     {}", if config.routing.greet_first_turn { "enabled" } else { "disabled" });
    println!("  On failure:   responder={:?}, aggregation={:?}",
        config.routing.on_responder_failure, config.routing.on_aggregation_failure);
    println!("  API key:      {}", if config.has_api_key() { "configured" } else { "missing" });

    if AppConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `agriroute onboard` first");
    }

    Ok(())
}
