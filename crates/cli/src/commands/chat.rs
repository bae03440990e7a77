//! `agriroute chat`: Interactive or single-message chat mode.

use agriroute_agent::{Coordinator, build_coordinator};
use agriroute_config::AppConfig;
use agriroute_core::Inference;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::info;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Fail early with setup instructions when no API key is set
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GEMINI_API_KEY=...        (recommended, default provider)");
        eprintln!("    OPENROUTER_API_KEY=...    (with default_provider = \"openrouter\")");
        eprintln!("    AGRIROUTE_API_KEY=...     (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let inference = agriroute_providers::build_inference(&config)?;
    let model = inference.model().to_string();
    info!(provider = %inference.provider_name(), model = %model, "Chat session starting");
    let inference: Arc<dyn Inference> = Arc::new(inference);

    if let Some(msg) = message {
        // Single message mode: route straight away, no greeting
        let coordinator = build_coordinator(&config, inference).without_greeting();

        eprint!("  Thinking...");
        let result = coordinator.process(&msg).await;
        eprint!("\r              \r");
        println!("{}", result?);
        return Ok(());
    }

    let coordinator = build_coordinator(&config, inference);

    println!();
    for line in BANNER {
        println!("  {line}");
    }
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {model}");
    println!("  Experts:   {}", coordinator.registry().len());
    println!();
    println!("  Type your message and press Enter.");
    println!("  Commands: /experts, /history, /save <path>");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }
        if matches!(line, "exit" | "quit" | "/exit" | "/quit") {
            break;
        }

        if let Some(command) = line.strip_prefix('/') {
            run_command(&coordinator, command).await;
        } else {
            eprint!("  ...");
            match coordinator.process(line).await {
                Ok(response) => {
                    eprint!("\r     \r");
                    println!();
                    for line in response.lines() {
                        println!("  AgriRoute > {line}");
                    }
                    println!();
                }
                Err(e) => {
                    eprint!("\r     \r");
                    eprintln!("  [Error] {e}");
                    println!();
                }
            }
        }

        prompt()?;
    }

    println!();
    println!("  Goodbye! 🌱");
    println!();

    Ok(())
}

const BANNER: [&str; 3] = [
    "╔══════════════════════════════════════════════╗",
    "║       AgriRoute — Agricultural Advisor       ║",
    "╚══════════════════════════════════════════════╝",
];

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

async fn run_command(coordinator: &Coordinator, command: &str) {
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command, ""));

    match name {
        "experts" => {
            for entry in coordinator.registry().iter() {
                println!("  - {:<16} {}", entry.id, entry.label);
            }
        }
        "history" => {
            let history = coordinator.history().await;
            if history.is_empty() {
                println!("  (no messages yet)");
            } else {
                print!("{}", history.render());
            }
        }
        "save" if !arg.is_empty() => match save_transcript(coordinator, Path::new(arg)).await {
            Ok(count) => println!("  ✅ Saved {count} turns to {arg}"),
            Err(e) => eprintln!("  [Error] Could not save transcript: {e}"),
        },
        "save" => eprintln!("  Usage: /save <path>"),
        other => eprintln!("  Unknown command '/{other}'"),
    }
}

/// Write the conversation so far as a JSON array of turns.
pub async fn save_transcript(
    coordinator: &Coordinator,
    path: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let history = coordinator.history().await;
    let json = serde_json::to_string_pretty(history.turns())?;
    tokio::fs::write(path, json).await?;
    Ok(history.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriroute_core::ProviderError;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Inference for Unreachable {
        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Err(ProviderError::Network("offline".into()))
        }
    }

    #[test]
    fn banner_rows_have_equal_width() {
        let widths: Vec<usize> = BANNER.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{widths:?}");
    }

    #[tokio::test]
    async fn transcript_is_a_json_array_of_turns() {
        let coordinator = build_coordinator(&AppConfig::default(), Arc::new(Unreachable));
        coordinator.process("hello").await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");
        let count = save_transcript(&coordinator, &path).await.unwrap();
        assert_eq!(count, 2);

        let turns: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[0]["content"], "hello");
        assert_eq!(turns[1]["role"], "system");
    }
}
