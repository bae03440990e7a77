//! `agriroute experts`: List the configured experts.

use agriroute_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🌾 AgriRoute Experts");
    println!("====================");
    println!();
    println!("  {:<16} {:<36} Status", "Id", "Label");
    println!("  {:<16} {:<36} ------", "--", "-----");
    for expert in &config.experts {
        let status = if expert.enabled { "enabled" } else { "disabled" };
        println!("  {:<16} {:<36} {status}", expert.id, expert.label);
    }
    println!();
    println!(
        "  {} of {} experts enabled. Edit [[experts]] in {} to change them.",
        config.enabled_experts().count(),
        config.experts.len(),
        AppConfig::config_path().display()
    );

    Ok(())
}
