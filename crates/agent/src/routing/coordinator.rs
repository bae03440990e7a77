//! The expert router.
//!
//! A coordinator asks the classifier which experts fit a request, runs
//! them against one history snapshot and merges their answers when more than
//! one responded. The conversation history it owns grows by one user
//! turn per call plus whatever the chosen route records.
//!
//! # Architecture
//!
//! ```text
//! User message
//!       │
//!       ▼
//! ┌─────────────┐
//! │ Coordinator │  ← greets, classifies, records history
//! └──┬──────┬───┘
//!    │      │
//!    ▼      ▼
//! ┌──────┐ ┌──────┐
//! │ E-1  │ │ E-2  │  ← matched experts, same history snapshot
//! └──┬───┘ └──┬───┘
//!    └───┬────┘
//!        ▼
//!   Aggregator      ← only when two or more experts answered
//! ```

use super::aggregator::{self, Aggregator};
use super::classifier::IntentClassifier;
use super::dispatcher::{DispatchOutcome, Dispatcher, ResponderFailure, ResponderReply};
use agriroute_config::{AggregationFailurePolicy, ResponderFailurePolicy, RoutingConfig};
use agriroute_core::{
    History, HistorySnapshot, Inference, Responder, ResponderRegistry, RoutingError, Turn,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// How a request was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// First message of the conversation; the fixed greeting was returned.
    Greeting,
    /// No registered expert matched; the clarification text was returned.
    NoMatch,
    /// One expert answered and its reply was passed through.
    Single { responder: String },
    /// Several experts answered and their replies were synthesized.
    Aggregated { responders: Vec<String> },
    /// Several experts answered, synthesis failed, raw replies were returned.
    Concatenated { responders: Vec<String> },
}

/// A routed reply together with the route that produced it.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub route: Route,
    /// Experts that matched but failed, with the reason (skip policy only).
    pub omitted: Vec<ResponderFailure>,
}

/// Routes messages to registered experts and keeps the conversation.
pub struct Coordinator {
    inference: Arc<dyn Inference>,
    registry: ResponderRegistry,
    history: Mutex<History>,
    classifier: IntentClassifier,
    dispatcher: Dispatcher,
    aggregator: Aggregator,
    greeting: String,
    greet_first_turn: bool,
    clarification: String,
    on_aggregation_failure: AggregationFailurePolicy,
}

impl Coordinator {
    /// Create a coordinator with the default routing settings and no experts.
    pub fn new(inference: Arc<dyn Inference>) -> Self {
        Self::from_routing(inference, &RoutingConfig::default())
    }

    /// Create a coordinator from a `[routing]` configuration section.
    pub fn from_routing(inference: Arc<dyn Inference>, routing: &RoutingConfig) -> Self {
        Self {
            classifier: IntentClassifier::new(inference.clone(), routing.persona.clone()),
            aggregator: Aggregator::new(inference.clone(), routing.persona.clone()),
            dispatcher: Dispatcher::new(routing.on_responder_failure),
            inference,
            registry: ResponderRegistry::new(),
            history: Mutex::new(History::new()),
            greeting: routing.greeting.clone(),
            greet_first_turn: routing.greet_first_turn,
            clarification: routing.clarification.clone(),
            on_aggregation_failure: routing.on_aggregation_failure,
        }
    }

    /// Replace the persona used for classification and aggregation.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        let persona = persona.into();
        self.classifier = IntentClassifier::new(self.inference.clone(), persona.clone());
        self.aggregator = Aggregator::new(self.inference.clone(), persona);
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Route the very first message like any other.
    pub fn without_greeting(mut self) -> Self {
        self.greet_first_turn = false;
        self
    }

    pub fn with_clarification(mut self, clarification: impl Into<String>) -> Self {
        self.clarification = clarification.into();
        self
    }

    pub fn on_responder_failure(mut self, policy: ResponderFailurePolicy) -> Self {
        self.dispatcher = Dispatcher::new(policy);
        self
    }

    pub fn on_aggregation_failure(mut self, policy: AggregationFailurePolicy) -> Self {
        self.on_aggregation_failure = policy;
        self
    }

    /// Add an expert (builder form of [`Coordinator::register_labeled`]).
    pub fn add_responder(
        mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        responder: Arc<dyn Responder>,
    ) -> Self {
        self.register_labeled(id, label, responder);
        self
    }

    /// Register an expert whose display label is its id. Last write wins.
    pub fn register(&mut self, id: impl Into<String>, responder: Arc<dyn Responder>) {
        self.registry.register(id, responder);
    }

    /// Register an expert under `id`, shown to the classifier as `label`.
    pub fn register_labeled(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        responder: Arc<dyn Responder>,
    ) {
        self.registry.register_labeled(id, label, responder);
    }

    pub fn registry(&self) -> &ResponderRegistry {
        &self.registry
    }

    /// A consistent view of the conversation so far.
    pub async fn history(&self) -> HistorySnapshot {
        self.history.lock().await.snapshot()
    }

    /// Route `message` and return the reply text.
    pub async fn process(&self, message: &str) -> agriroute_core::Result<String> {
        Ok(self.process_detailed(message).await?.text)
    }

    /// Route `message` and report the route taken.
    ///
    /// The history lock is held for the whole call, so concurrent callers on
    /// one coordinator are served one at a time. On error only the user turn
    /// has been recorded.
    pub async fn process_detailed(&self, message: &str) -> agriroute_core::Result<Reply> {
        let mut history = self.history.lock().await;
        history.append(Turn::user(message));

        if self.greet_first_turn && history.len() == 1 {
            history.append(Turn::system(self.greeting.clone()));
            info!(route = "greeting", "Coordinator: first turn greeted");
            return Ok(Reply {
                text: self.greeting.clone(),
                route: Route::Greeting,
                omitted: Vec::new(),
            });
        }

        let snapshot = history.snapshot();
        let labels = self.registry.labels();
        let candidates = self.classifier.classify(message, &labels).await?;

        let outcome = self
            .dispatcher
            .dispatch(message, &candidates, &self.registry, &snapshot)
            .await?;

        let reply = match outcome {
            DispatchOutcome::NoMatch => {
                history.append(Turn::system(self.clarification.clone()));
                Reply {
                    text: self.clarification.clone(),
                    route: Route::NoMatch,
                    omitted: Vec::new(),
                }
            }
            DispatchOutcome::Single(reply) => self.single(&mut history, reply, &[]),
            DispatchOutcome::Multiple { mut replies, omitted } if replies.len() == 1 => {
                let reply = replies.remove(0);
                self.single(&mut history, reply, &omitted)
            }
            DispatchOutcome::Multiple { replies, omitted } => {
                self.synthesize(&mut history, message, replies, &omitted).await?
            }
        };

        info!(route = ?reply.route, history = history.len(), "Coordinator: request routed");
        Ok(reply)
    }

    fn single(&self, history: &mut History, reply: ResponderReply, omitted: &[ResponderFailure]) -> Reply {
        history.append(Turn::responder(reply.label.clone(), reply.text.clone()));
        Reply {
            text: format!(
                "[Consulting {}]\n\n{}{}",
                reply.label,
                reply.text,
                omission_note(omitted)
            ),
            route: Route::Single {
                responder: reply.label,
            },
            omitted: omitted.to_vec(),
        }
    }

    async fn synthesize(
        &self,
        history: &mut History,
        message: &str,
        replies: Vec<ResponderReply>,
        omitted: &[ResponderFailure],
    ) -> Result<Reply, RoutingError> {
        let responders: Vec<String> = replies.iter().map(|r| r.label.clone()).collect();

        let (body, route) = match self.aggregator.aggregate(message, &replies).await {
            Ok(merged) => (merged, Route::Aggregated { responders }),
            Err(e) => match self.on_aggregation_failure {
                AggregationFailurePolicy::Abort => return Err(e),
                AggregationFailurePolicy::Concatenate => {
                    warn!(error = %e, "Coordinator: aggregation failed, concatenating replies");
                    (aggregator::concatenate(&replies), Route::Concatenated { responders })
                }
            },
        };
        let text = format!("{body}{}", omission_note(omitted));
        debug!(replies = replies.len(), omitted = omitted.len(), "Coordinator: round complete");

        history.extend(
            replies
                .into_iter()
                .map(|r| Turn::responder(r.label, r.text)),
        );
        history.append(Turn::system(text.clone()));

        Ok(Reply {
            text,
            route,
            omitted: omitted.to_vec(),
        })
    }
}

fn omission_note(omitted: &[ResponderFailure]) -> String {
    if omitted.is_empty() {
        return String::new();
    }
    let labels: Vec<&str> = omitted.iter().map(|f| f.label.as_str()).collect();
    format!(
        "\n\nNote: no answer was available from {} for this request.",
        labels.join(", ")
    )
}
