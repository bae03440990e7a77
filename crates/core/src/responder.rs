//! Responder trait: the pluggable experts the router dispatches to.
//!
//! A responder turns a user message plus a read-only view of the
//! conversation into generated text. Responders are registered under a stable
//! id in the [`ResponderRegistry`] and shown to the classifier by label.

use crate::history::HistorySnapshot;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A capability that answers a message given the conversation so far.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a reply to `message`.
    ///
    /// `history` is the conversation as it stood when the dispatch round
    /// began; every responder in a round sees the same snapshot.
    async fn respond(&self, message: &str, history: &HistorySnapshot) -> crate::Result<String>;
}

/// A responder together with the names it is known by.
#[derive(Clone)]
pub struct RegisteredResponder {
    /// Unique registry key
    pub id: String,
    /// Display name used in prompts, banners and history turns
    pub label: String,
    pub responder: Arc<dyn Responder>,
}

impl std::fmt::Debug for RegisteredResponder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredResponder")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// The set of responders available to the router.
///
/// Iteration order is registration order. Registering an id twice replaces
/// the entry but keeps its original position.
#[derive(Debug, Default)]
pub struct ResponderRegistry {
    entries: HashMap<String, RegisteredResponder>,
    order: Vec<String>,
}

impl ResponderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a responder whose label is its id.
    pub fn register(&mut self, id: impl Into<String>, responder: Arc<dyn Responder>) {
        let id = id.into();
        let label = id.clone();
        self.register_labeled(id, label, responder);
    }

    /// Register a responder under `id`, displayed as `label`.
    pub fn register_labeled(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        responder: Arc<dyn Responder>,
    ) {
        let id = id.into();
        let entry = RegisteredResponder {
            id: id.clone(),
            label: label.into(),
            responder,
        };
        if self.entries.insert(id.clone(), entry).is_none() {
            self.order.push(id);
        }
    }

    /// Look up a responder by id.
    pub fn get(&self, id: &str) -> Option<&RegisteredResponder> {
        self.entries.get(id)
    }

    /// Resolve a classifier candidate: exact id match first, then exact label.
    pub fn resolve(&self, candidate: &str) -> Option<&RegisteredResponder> {
        self.entries.get(candidate).or_else(|| {
            self.iter().find(|entry| entry.label == candidate)
        })
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredResponder> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Display labels in registration order.
    pub fn labels(&self) -> Vec<&str> {
        self.iter().map(|entry| entry.label.as_str()).collect()
    }

    /// Ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
