//! Dispatch: Match candidates against the registry and run the experts.
//!
//! Responders run one after another in candidate order. Every responder in a
//! round receives the same [`HistorySnapshot`]; the dispatcher never touches
//! the live history.

use agriroute_config::ResponderFailurePolicy;
use agriroute_core::{HistorySnapshot, RegisteredResponder, ResponderRegistry, RoutingError};
use tracing::{debug, warn};

/// Text produced by one expert during a dispatch round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderReply {
    pub label: String,
    pub text: String,
}

/// An expert that failed during a best-effort round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderFailure {
    pub label: String,
    pub reason: String,
}

/// Result of a dispatch round.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// No candidate named a registered expert; nobody was invoked.
    NoMatch,
    /// Exactly one candidate matched and it answered.
    Single(ResponderReply),
    /// Several candidates matched. `replies` is in invocation order;
    /// `omitted` is only ever non-empty under the skip policy.
    Multiple {
        replies: Vec<ResponderReply>,
        omitted: Vec<ResponderFailure>,
    },
}

/// Runs matched experts under a failure policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    on_failure: ResponderFailurePolicy,
}

impl Dispatcher {
    pub fn new(on_failure: ResponderFailurePolicy) -> Self {
        Self { on_failure }
    }

    /// Keep the candidates that resolve to a registered expert, in candidate
    /// order. Duplicates are kept.
    pub fn select<'r>(
        candidates: &[String],
        registry: &'r ResponderRegistry,
    ) -> Vec<&'r RegisteredResponder> {
        candidates
            .iter()
            .filter_map(|candidate| registry.resolve(candidate))
            .collect()
    }

    pub async fn dispatch(
        &self,
        message: &str,
        candidates: &[String],
        registry: &ResponderRegistry,
        snapshot: &HistorySnapshot,
    ) -> Result<DispatchOutcome, RoutingError> {
        let matched = Self::select(candidates, registry);
        debug!(
            candidates = candidates.len(),
            matched = matched.len(),
            "Dispatcher: candidates filtered"
        );

        let mut replies = Vec::with_capacity(matched.len());
        let mut omitted = Vec::new();

        for entry in &matched {
            match entry.responder.respond(message, snapshot).await {
                Ok(text) => replies.push(ResponderReply {
                    label: entry.label.clone(),
                    text,
                }),
                Err(e) => match self.on_failure {
                    ResponderFailurePolicy::Abort => {
                        return Err(RoutingError::Responder {
                            responder: entry.label.clone(),
                            reason: e.to_string(),
                        });
                    }
                    ResponderFailurePolicy::Skip => {
                        warn!(responder = %entry.label, error = %e, "Dispatcher: skipping failed responder");
                        omitted.push(ResponderFailure {
                            label: entry.label.clone(),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        if !matched.is_empty() && replies.is_empty() {
            return Err(RoutingError::AllRespondersFailed {
                attempted: matched.len(),
            });
        }

        Ok(match matched.len() {
            0 => DispatchOutcome::NoMatch,
            1 => DispatchOutcome::Single(replies.remove(0)),
            _ => DispatchOutcome::Multiple { replies, omitted },
        })
    }
}
