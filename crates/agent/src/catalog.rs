//! Build a ready-to-use coordinator from configuration.

use crate::persona::PersonaResponder;
use crate::routing::Coordinator;
use agriroute_config::AppConfig;
use agriroute_core::Inference;
use std::sync::Arc;
use tracing::info;

/// Create a coordinator with every enabled expert from `config` registered,
/// in config order. All experts share one inference handle.
pub fn build_coordinator(config: &AppConfig, inference: Arc<dyn Inference>) -> Coordinator {
    let roster: String = config
        .enabled_experts()
        .map(|e| format!("- {}\n", e.label))
        .collect();
    let persona = if roster.is_empty() {
        config.routing.persona.clone()
    } else {
        format!(
            "{}\n\nYou have access to these specialists:\n{}",
            config.routing.persona, roster
        )
    };

    let mut coordinator =
        Coordinator::from_routing(inference.clone(), &config.routing).with_persona(persona);

    for expert in config.enabled_experts() {
        let responder = PersonaResponder::new(&expert.label, &expert.persona, inference.clone());
        coordinator.register_labeled(&expert.id, &expert.label, Arc::new(responder));
    }

    info!(
        experts = coordinator.registry().len(),
        "Coordinator ready"
    );
    coordinator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedInference;

    #[test]
    fn registers_enabled_experts_in_config_order() {
        let mut config = AppConfig::default();
        config.experts[1].enabled = false;
        let inference = Arc::new(ScriptedInference::new(vec![]));

        let coordinator = build_coordinator(&config, inference);

        let ids = coordinator.registry().ids();
        assert_eq!(ids.len(), config.experts.len() - 1);
        assert_eq!(ids[0], "crops");
        assert!(!ids.contains(&"weather"));
        assert!(coordinator.registry().resolve("Soil Analysis Specialist").is_some());
    }

    #[tokio::test]
    async fn classifier_prompt_lists_the_roster() {
        let mut config = AppConfig::default();
        config.routing.greet_first_turn = false;
        let inference = Arc::new(ScriptedInference::new(vec!["Astrologer"]));

        let coordinator = build_coordinator(&config, inference.clone());
        coordinator.process("hello").await.unwrap();

        let prompt = &inference.prompts()[0];
        assert!(prompt.contains("You have access to these specialists:\n- Crop Specialist\n"));
        assert!(prompt.contains("- Sustainability Specialist\n"));
    }

    #[tokio::test]
    async fn expert_prompt_uses_configured_persona() {
        let mut config = AppConfig::default();
        config.routing.greet_first_turn = false;
        config.experts.retain(|e| e.id == "soil");
        config.experts[0].persona = "You test soil.".into();
        let inference = Arc::new(ScriptedInference::new(vec![
            "Soil Analysis Specialist",
            "Add lime.",
        ]));

        let coordinator = build_coordinator(&config, inference.clone());
        let reply = coordinator.process("pH is 5.2").await.unwrap();

        assert_eq!(reply, "[Consulting Soil Analysis Specialist]\n\nAdd lime.");
        assert!(inference.prompts()[1].starts_with("You test soil.\n\n"));
    }
}
