//! Expert routing: classify, dispatch, aggregate.
//!
//! [`Coordinator`] is the entry point; the other pieces are public so a
//! caller can swap one stage (for example a structured classifier) without
//! touching the rest.

pub mod aggregator;
pub mod classifier;
pub mod coordinator;
pub mod dispatcher;

pub use aggregator::Aggregator;
pub use classifier::{IntentClassifier, parse_candidates};
pub use coordinator::{Coordinator, Reply, Route};
pub use dispatcher::{DispatchOutcome, Dispatcher, ResponderFailure, ResponderReply};
