//! Shared types for streaming test-run results to a remote listener.
//!
//! [`event`] holds the value snapshots a sender transmits; [`wire`] is the
//! binary codec both ends of a connection agree on.

pub mod event;
pub mod wire;

pub use event::{MessageType, ResultEvent, TestDescriptor, TestOutcome, TestStatus};
pub use wire::{decode_event, encode_event, WireError, MAX_EVENT_BYTES};
