//! Shared test doubles for routing tests.

use agriroute_core::error::{Error, ProviderError};
use agriroute_core::{HistorySnapshot, Inference, Responder};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// An inference service that returns a sequence of scripted replies.
///
/// Each call to `generate` pops the next reply and records the prompt.
/// Panics if more calls are made than replies provided.
pub struct ScriptedInference {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInference {
    pub fn new(replies: Vec<&str>) -> Self {
        Self::from_results(replies.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn from_results(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Inference for ScriptedInference {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let mut prompts = self.prompts.lock().unwrap();
        let call = prompts.len();
        prompts.push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedInference: no more replies (call #{call})"))
    }
}

/// A responder that returns a fixed reply and records what it was shown.
pub struct RecordingResponder {
    reply: String,
    seen: Mutex<Vec<(String, usize)>>,
    log: Option<(String, Arc<Mutex<Vec<String>>>)>,
}

impl RecordingResponder {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.into(),
            seen: Mutex::new(Vec::new()),
            log: None,
        }
    }

    /// Also push `name` onto a log shared between responders on every call,
    /// to observe invocation order across a round.
    pub fn logging(reply: &str, name: &str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            log: Some((name.into(), log)),
            ..Self::new(reply)
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen_messages(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    /// History length observed on each call.
    pub fn seen_history_lens(&self) -> Vec<usize> {
        self.seen.lock().unwrap().iter().map(|(_, len)| *len).collect()
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn respond(&self, message: &str, history: &HistorySnapshot) -> agriroute_core::Result<String> {
        self.seen
            .lock()
            .unwrap()
            .push((message.to_string(), history.len()));
        if let Some((name, log)) = &self.log {
            log.lock().unwrap().push(name.clone());
        }
        Ok(self.reply.clone())
    }
}

/// A responder whose inference call always fails.
pub struct FailingResponder {
    error: ProviderError,
}

impl FailingResponder {
    pub fn new() -> Self {
        Self {
            error: ProviderError::ApiError {
                status_code: 500,
                message: "Internal Server Error".into(),
            },
        }
    }
}

#[async_trait]
impl Responder for FailingResponder {
    async fn respond(&self, _message: &str, _history: &HistorySnapshot) -> agriroute_core::Result<String> {
        Err(Error::Provider(self.error.clone()))
    }
}
