//! # AgriRoute Core
//!
//! Domain types, traits, and error definitions for the AgriRoute expert router.
//! This crate does **no I/O**; it defines the domain model
//! that the provider, agent and CLI crates implement against.
//!
//! ## Design Philosophy
//!
//! The seams of the router are traits defined here:
//! - [`Provider`]: A chat-completion backend
//! - [`Inference`]: The `generate(prompt) -> text` boundary the router consumes
//! - [`Responder`]: A pluggable expert that answers with the history in view
//!
//! Implementations live in their respective crates, which keeps every
//! routing component testable with scripted doubles.

pub mod error;
pub mod history;
pub mod inference;
pub mod message;
pub mod provider;
pub mod responder;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, RoutingError};
pub use history::{History, HistorySnapshot, Turn, TurnRole};
pub use inference::Inference;
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use responder::{RegisteredResponder, Responder, ResponderRegistry};
