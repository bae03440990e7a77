//! Intent classification: which experts should answer this message?
//!
//! The classifier asks the model for a comma-separated list of expert labels
//! and returns the candidates verbatim. Matching them against the registry is
//! the dispatcher's job.

use agriroute_core::{Inference, RoutingError};
use std::sync::Arc;
use tracing::debug;

/// Split a raw classifier reply into candidate names.
///
/// Trims the reply, splits on `,` and trims each segment. A reply without a
/// comma yields one candidate; an empty reply yields `[""]`.
pub fn parse_candidates(raw: &str) -> Vec<String> {
    raw.trim()
        .split(',')
        .map(|segment| segment.trim().to_string())
        .collect()
}

/// Free-text intent classifier backed by one inference call.
pub struct IntentClassifier {
    inference: Arc<dyn Inference>,
    persona: String,
}

impl IntentClassifier {
    pub fn new(inference: Arc<dyn Inference>, persona: impl Into<String>) -> Self {
        Self {
            inference,
            persona: persona.into(),
        }
    }

    pub fn build_prompt(&self, message: &str, labels: &[&str]) -> String {
        let roster: String = labels.iter().map(|label| format!("- {label}\n")).collect();

        format!(
            "{}\n\n\
            Analyze the following user request and decide which specialist or specialists \
            should answer it. Reply with only the specialist name, or a comma-separated list \
            of names.\n\n\
            Available specialists:\n{}\n\
            User request: \"{}\"\n\n\
            Best-suited specialist(s):",
            self.persona, roster, message
        )
    }

    /// Name the expert(s) that should answer `message`.
    pub async fn classify(
        &self,
        message: &str,
        labels: &[&str],
    ) -> Result<Vec<String>, RoutingError> {
        let prompt = self.build_prompt(message, labels);
        let raw = self
            .inference
            .generate(&prompt)
            .await
            .map_err(RoutingError::Classification)?;

        let candidates = parse_candidates(&raw);
        debug!(?candidates, "Classifier: candidates parsed");
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedInference;
    use agriroute_core::ProviderError;

    #[test]
    fn parse_single_name() {
        assert_eq!(parse_candidates("  Soil Analysis Specialist \n"), vec!["Soil Analysis Specialist"]);
    }

    #[test]
    fn parse_comma_list_keeps_order_and_duplicates() {
        assert_eq!(
            parse_candidates("Irrigation, Soil ,Irrigation"),
            vec!["Irrigation", "Soil", "Irrigation"]
        );
    }

    #[test]
    fn parse_empty_reply() {
        assert_eq!(parse_candidates(""), vec![""]);
        assert_eq!(parse_candidates("   "), vec![""]);
    }

    #[test]
    fn parse_keeps_empty_segments() {
        assert_eq!(parse_candidates("Soil,,"), vec!["Soil", "", ""]);
    }

    #[tokio::test]
    async fn prompt_lists_labels_and_quotes_message() {
        let inference = Arc::new(ScriptedInference::new(vec!["Soil"]));
        let classifier = IntentClassifier::new(inference.clone(), "You are the Manager.");

        let candidates = classifier
            .classify("pH is 5.2", &["Soil", "Irrigation"])
            .await
            .unwrap();
        assert_eq!(candidates, vec!["Soil"]);

        let prompt = &inference.prompts()[0];
        assert!(prompt.starts_with("You are the Manager."));
        assert!(prompt.contains("- Soil\n- Irrigation\n"));
        assert!(prompt.contains("\"pH is 5.2\""));
    }

    #[tokio::test]
    async fn candidates_are_not_validated() {
        let inference = Arc::new(ScriptedInference::new(vec!["Astrologer, soil"]));
        let classifier = IntentClassifier::new(inference, "persona");
        let candidates = classifier.classify("hi", &["Soil"]).await.unwrap();
        assert_eq!(candidates, vec!["Astrologer", "soil"]);
    }

    #[tokio::test]
    async fn inference_failure_is_classification_error() {
        let inference = Arc::new(ScriptedInference::from_results(vec![Err(
            ProviderError::Network("connection reset".into()),
        )]));
        let classifier = IntentClassifier::new(inference, "persona");
        let err = classifier.classify("hi", &["Soil"]).await.unwrap_err();
        assert!(matches!(err, RoutingError::Classification(ProviderError::Network(_))));
    }
}
