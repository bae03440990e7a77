//! Conversation history: the append-only log threaded through every call.
//!
//! [`History`] is owned by the coordinator and only ever grows.
//! [`HistorySnapshot`] is an immutable, cheaply clonable "as-of" view handed
//! to responders; taking one never blocks later appends, and appends never
//! change a snapshot that was already taken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The end user
    User,
    /// The router itself (greeting, clarification, aggregate answers)
    System,
    /// A named responder
    Responder,
}

/// One atomic entry in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Originator of this turn
    pub role: TurnRole,

    /// Display name of the responder, set only for [`TurnRole::Responder`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responder: Option<String>,

    /// The text content
    pub content: String,

    /// When the turn was appended (not part of the rendered form)
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// A turn authored by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            responder: None,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// A turn authored by the router.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            responder: None,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// A turn authored by a named responder.
    pub fn responder(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Responder,
            responder: Some(name.into()),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// The label this turn is rendered with.
    pub fn speaker(&self) -> &str {
        match self.role {
            TurnRole::User => "User",
            TurnRole::System => "System",
            TurnRole::Responder => self.responder.as_deref().unwrap_or("Responder"),
        }
    }
}

/// Append-only conversation log.
#[derive(Debug, Clone, Default)]
pub struct History {
    turns: Arc<Vec<Turn>>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the log.
    ///
    /// Outstanding snapshots keep seeing the log as it was when they were taken.
    pub fn append(&mut self, turn: Turn) {
        Arc::make_mut(&mut self.turns).push(turn);
    }

    /// Append several turns, preserving their order.
    pub fn extend(&mut self, turns: impl IntoIterator<Item = Turn>) {
        Arc::make_mut(&mut self.turns).extend(turns);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Take a consistent read-only view of the log as it stands now.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            turns: Arc::clone(&self.turns),
        }
    }

    /// Role-labeled linearization of all turns in append order.
    pub fn render(&self) -> String {
        render_turns(&self.turns)
    }
}

/// Immutable view of a [`History`] at a point in time.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    turns: Arc<Vec<Turn>>,
}

impl HistorySnapshot {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Same rendering as [`History::render`].
    pub fn render(&self) -> String {
        render_turns(&self.turns)
    }
}

impl From<Vec<Turn>> for HistorySnapshot {
    fn from(turns: Vec<Turn>) -> Self {
        Self {
            turns: Arc::new(turns),
        }
    }
}

fn render_turns(turns: &[Turn]) -> String {
    let mut out = String::new();
    for turn in turns {
        out.push_str(turn.speaker());
        out.push_str(": ");
        out.push_str(&turn.content);
        out.push('\n');
    }
    out
}
