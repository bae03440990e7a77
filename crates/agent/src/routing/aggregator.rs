//! Aggregation: Merge several experts' answers into one reply.

use super::dispatcher::ResponderReply;
use agriroute_core::{Inference, RoutingError};
use std::sync::Arc;
use tracing::debug;

/// Synthesizes multi-expert rounds with a single inference call.
pub struct Aggregator {
    inference: Arc<dyn Inference>,
    persona: String,
}

/// Comma-joined expert labels, in invocation order.
pub fn joined_labels(replies: &[ResponderReply]) -> String {
    replies
        .iter()
        .map(|r| r.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every reply labeled by expert: `[<label>]:\n<text>\n`, concatenated.
pub fn labeled_outputs(replies: &[ResponderReply]) -> String {
    replies
        .iter()
        .map(|r| format!("[{}]:\n{}\n", r.label, r.text))
        .collect()
}

/// The raw outputs under a header naming the experts. Used when synthesis
/// fails and the concatenate policy is on.
pub fn concatenate(replies: &[ResponderReply]) -> String {
    format!(
        "Our specialists ({}) answered separately:\n\n{}",
        joined_labels(replies),
        labeled_outputs(replies)
    )
}

impl Aggregator {
    pub fn new(inference: Arc<dyn Inference>, persona: impl Into<String>) -> Self {
        Self {
            inference,
            persona: persona.into(),
        }
    }

    pub fn build_prompt(&self, message: &str, replies: &[ResponderReply]) -> String {
        format!(
            "{}\n\n\
            You received answers from several specialists to the following user request:\n\
            \"{}\"\n\n\
            Specialist answers:\n{}\n\
            Merge these answers into one coherent, comprehensive reply. Keep the important \
            technical information from each specialist but avoid repetition. Organize the \
            reply logically, as if it were a single complete analysis.",
            self.persona,
            message,
            labeled_outputs(replies)
        )
    }

    /// Merge `replies` into one answer, prefixed with an attribution banner.
    pub async fn aggregate(
        &self,
        message: &str,
        replies: &[ResponderReply],
    ) -> Result<String, RoutingError> {
        let prompt = self.build_prompt(message, replies);
        debug!(replies = replies.len(), prompt_chars = prompt.len(), "Aggregator: synthesizing");

        let merged = self
            .inference
            .generate(&prompt)
            .await
            .map_err(RoutingError::Aggregation)?;

        Ok(format!(
            "Based on the analysis of our specialists ({}), here is what I can tell you:\n\n{}",
            joined_labels(replies),
            merged
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedInference;
    use agriroute_core::ProviderError;

    fn reply(label: &str, text: &str) -> ResponderReply {
        ResponderReply {
            label: label.into(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn banner_names_experts_in_order() {
        let inference = Arc::new(ScriptedInference::new(vec!["MERGED"]));
        let aggregator = Aggregator::new(inference.clone(), "You are the Manager.");

        let text = aggregator
            .aggregate(
                "pH is 5.2, what should I irrigate with?",
                &[reply("Soil", "LOW_PH_NOTE"), reply("Irrigation", "DRIP_NOTE")],
            )
            .await
            .unwrap();

        assert_eq!(
            text,
            "Based on the analysis of our specialists (Soil, Irrigation), here is what I can tell you:\n\nMERGED"
        );
        assert_eq!(inference.calls(), 1);
    }

    #[tokio::test]
    async fn prompt_carries_every_labeled_output() {
        let inference = Arc::new(ScriptedInference::new(vec!["ok"]));
        let aggregator = Aggregator::new(inference.clone(), "persona");
        aggregator
            .aggregate("q", &[reply("Soil", "LOW_PH_NOTE"), reply("Irrigation", "DRIP_NOTE")])
            .await
            .unwrap();

        let prompt = &inference.prompts()[0];
        assert!(prompt.contains("[Soil]:\nLOW_PH_NOTE\n[Irrigation]:\nDRIP_NOTE\n"));
        assert!(prompt.contains("\"q\""));
    }

    #[tokio::test]
    async fn inference_failure_is_aggregation_error() {
        let inference = Arc::new(ScriptedInference::from_results(vec![Err(
            ProviderError::Timeout("120s".into()),
        )]));
        let aggregator = Aggregator::new(inference, "persona");
        let err = aggregator
            .aggregate("q", &[reply("Soil", "a"), reply("Irrigation", "b")])
            .await
            .unwrap_err();
        assert!(matches!(err, RoutingError::Aggregation(ProviderError::Timeout(_))));
    }

    #[test]
    fn concatenate_labels_raw_outputs() {
        let text = concatenate(&[reply("Soil", "LOW_PH_NOTE"), reply("Irrigation", "DRIP_NOTE")]);
        assert_eq!(
            text,
            "Our specialists (Soil, Irrigation) answered separately:\n\n[Soil]:\nLOW_PH_NOTE\n[Irrigation]:\nDRIP_NOTE\n"
        );
    }
}
