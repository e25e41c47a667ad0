use resultcast_common::WireError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a single send did not go through.
///
/// Internal to the transport: callers only ever see the boolean outcome.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("connect to {endpoint} timed out after {after:?}")]
    ConnectTimeout { endpoint: String, after: Duration },

    #[error("connect to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Encode(#[from] WireError),

    #[error("write to {endpoint} failed: {source}")]
    Write {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
}

impl SendError {
    /// Whether this failure proves the listener unreachable and should
    /// disable further sends until a probe.
    ///
    /// Timeouts are transient; refusal, reset, unreachable hosts, write
    /// faults and encoding faults are not.
    pub fn latches(&self) -> bool {
        match self {
            SendError::ConnectTimeout { .. } => false,
            SendError::Connect { source, .. } => source.kind() != std::io::ErrorKind::TimedOut,
            SendError::Encode(_) | SendError::Write { .. } => true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid sender config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ReceiveError {
    /// The listening socket itself failed; nothing was read.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    #[error("read from {peer} failed: {source}")]
    Io {
        peer: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("{peer} sent no complete event within {after:?}")]
    Timeout { peer: SocketAddr, after: Duration },

    #[error(transparent)]
    Wire(#[from] WireError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    fn connect_err(kind: ErrorKind) -> SendError {
        SendError::Connect {
            endpoint: "127.0.0.1:7412".into(),
            source: Error::from(kind),
        }
    }

    #[test]
    fn refusal_and_reset_latch() {
        assert!(connect_err(ErrorKind::ConnectionRefused).latches());
        assert!(connect_err(ErrorKind::ConnectionReset).latches());
        assert!(SendError::Write {
            endpoint: "x:1".into(),
            source: Error::from(ErrorKind::BrokenPipe),
        }
        .latches());
    }

    #[test]
    fn timeouts_do_not_latch() {
        assert!(!connect_err(ErrorKind::TimedOut).latches());
        assert!(!SendError::ConnectTimeout {
            endpoint: "x:1".into(),
            after: Duration::from_secs(5),
        }
        .latches());
    }
}
