//! Persona-backed experts.
//!
//! Every built-in expert has the same shape: a fixed persona, the
//! conversation so far, the user's question, one inference call. Only the
//! persona text differs, and that comes from configuration.

use agriroute_core::{HistorySnapshot, Inference, Responder};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A [`Responder`] defined entirely by its persona text.
pub struct PersonaResponder {
    label: String,
    persona: String,
    inference: Arc<dyn Inference>,
}

impl PersonaResponder {
    pub fn new(
        label: impl Into<String>,
        persona: impl Into<String>,
        inference: Arc<dyn Inference>,
    ) -> Self {
        Self {
            label: label.into(),
            persona: persona.into(),
            inference,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn build_prompt(&self, message: &str, history: &HistorySnapshot) -> String {
        format!(
            "{}\n\n\
            Conversation history:\n{}\n\
            User question: \"{}\"\n\n\
            Give a detailed, specialized answer that takes the conversation so far into \
            account. If the question is outside your specialty, say which other specialists \
            could help better.",
            self.persona,
            history.render(),
            message
        )
    }
}

#[async_trait]
impl Responder for PersonaResponder {
    async fn respond(&self, message: &str, history: &HistorySnapshot) -> agriroute_core::Result<String> {
        let prompt = self.build_prompt(message, history);
        debug!(expert = %self.label, history = history.len(), "Expert answering");
        Ok(self.inference.generate(&prompt).await?)
    }
}
