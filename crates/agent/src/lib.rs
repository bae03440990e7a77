//! The AgriRoute expert router.
//!
//! A [`Coordinator`] answers each message in one of four ways:
//!
//! 1. **Greet** on the first message of a conversation
//! 2. **Clarify** when no registered expert fits the request
//! 3. **Pass through** the answer of the single matching expert
//! 4. **Aggregate** the answers of several experts into one reply
//!
//! Experts are [`agriroute_core::Responder`]s. The built-in ones are
//! [`PersonaResponder`]s assembled from configuration by [`build_coordinator`].

pub mod catalog;
pub mod persona;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use catalog::build_coordinator;
pub use persona::PersonaResponder;
pub use routing::{
    Aggregator, Coordinator, DispatchOutcome, Dispatcher, IntentClassifier, Reply,
    ResponderFailure, ResponderReply, Route, parse_candidates,
};
