//! Best-effort streaming of test-run results to a remote listener.
//!
//! The harness drives one or more [`RunListener`]s as a run progresses. The
//! [`NetworkResultSender`] turns each notification into a [`ResultEvent`]
//! and ships it over a fresh TCP connection; delivery failures collapse to
//! `false` and never reach the harness.

pub mod config;
pub mod connector;
mod error;
pub mod listener;
pub mod receiver;
pub mod sender;

pub use config::SenderConfig;
pub use connector::{Connector, TcpConnector};
pub use error::{ConfigError, ReceiveError, SendError};
pub use listener::{ListenerSet, NoOpListener, RunListener, TracingListener};
pub use receiver::ResultReceiver;
pub use sender::{ConnectionState, NetworkResultSender};

pub use resultcast_common::{
    decode_event, encode_event, MessageType, ResultEvent, TestDescriptor, TestOutcome,
    TestStatus, WireError, MAX_EVENT_BYTES,
};
