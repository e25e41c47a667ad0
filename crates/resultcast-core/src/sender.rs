//! Fail-soft result transport.
//!
//! Every event travels on its own short-lived connection: connect (bounded
//! by the configured deadline), write the encoded event, flush, close. A
//! refused or broken connection latches the sender into
//! [`ConnectionState::Disabled`], after which sends are free no-ops until
//! [`NetworkResultSender::probe`] is called. Connect timeouts do not latch.
//!
//! Nothing here returns an error to the caller; outcomes are booleans and
//! the reason goes to the log.

use crate::config::SenderConfig;
use crate::connector::{Connector, TcpConnector};
use crate::error::SendError;
use crate::listener::RunListener;
use async_trait::async_trait;
use resultcast_common::{encode_event, ResultEvent, TestDescriptor, TestOutcome};
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Live,
    /// A previous send proved the listener unreachable.
    Disabled,
}

pub struct NetworkResultSender<C: Connector = TcpConnector> {
    config: SenderConfig,
    connector: C,
    state: ConnectionState,
}

impl NetworkResultSender<TcpConnector> {
    pub fn new(config: SenderConfig) -> Self {
        Self::with_connector(config, TcpConnector)
    }
}

impl<C: Connector> NetworkResultSender<C> {
    pub fn with_connector(config: SenderConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            state: ConnectionState::Live,
        }
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_disabled(&self) -> bool {
        self.state == ConnectionState::Disabled
    }

    /// Send a ping and re-arm the sender.
    ///
    /// The ping is attempted even while disabled. Afterwards the state is
    /// `Live` whatever the outcome; the return value says whether the
    /// listener answered.
    pub async fn probe(&mut self) -> bool {
        let delivered = self.attempt(&ResultEvent::ping()).await;
        self.state = ConnectionState::Live;
        tracing::info!(
            endpoint = %self.config.endpoint(),
            delivered,
            "result listener probed"
        );
        delivered
    }

    pub async fn notify_run_started(&mut self, platform: &str, planned: &[TestDescriptor]) -> bool {
        self.send(&ResultEvent::run_started(platform, planned)).await
    }

    pub async fn notify_run_finished(&mut self, results: &[TestOutcome]) -> bool {
        self.send(&ResultEvent::run_finished(results)).await
    }

    pub async fn notify_test_started(&mut self, outcome: &TestOutcome) -> bool {
        self.send(&ResultEvent::test_started(outcome)).await
    }

    pub async fn notify_test_finished(&mut self, outcome: &TestOutcome) -> bool {
        self.send(&ResultEvent::test_finished(outcome)).await
    }

    /// Report an aborted run as finished with no results.
    ///
    /// The listener only learns that the run ended; which tests were left
    /// unexecuted is not transmitted.
    pub async fn notify_run_interrupted(&mut self, not_run: &[TestDescriptor]) -> bool {
        tracing::debug!(not_run = not_run.len(), "run interrupted");
        self.notify_run_finished(&[]).await
    }

    pub(crate) async fn send(&mut self, event: &ResultEvent) -> bool {
        if self.is_disabled() {
            tracing::trace!(
                message_type = %event.message_type(),
                "reporting disabled; event dropped"
            );
            return false;
        }
        self.attempt(event).await
    }

    /// One delivery attempt, ignoring the latch but updating it on failure.
    async fn attempt(&mut self, event: &ResultEvent) -> bool {
        let message_type = event.message_type();
        match self.transmit(event).await {
            Ok(()) => {
                tracing::debug!(
                    message_type = %message_type,
                    endpoint = %self.config.endpoint(),
                    "sent result event"
                );
                true
            }
            Err(err) if err.latches() => {
                self.state = ConnectionState::Disabled;
                tracing::warn!(
                    message_type = %message_type,
                    error = %err,
                    "result listener unreachable; reporting disabled until probed"
                );
                false
            }
            Err(err) => {
                tracing::info!(
                    message_type = %message_type,
                    error = %err,
                    "result event not delivered"
                );
                false
            }
        }
    }

    async fn transmit(&self, event: &ResultEvent) -> Result<(), SendError> {
        let endpoint = self.config.endpoint();
        let after = self.config.connect_timeout();

        let connect = self.connector.connect(&self.config.host, self.config.port);
        let mut stream = match timeout(after, connect).await {
            Err(_) => return Err(SendError::ConnectTimeout { endpoint, after }),
            Ok(Err(source)) => return Err(SendError::Connect { endpoint, source }),
            Ok(Ok(stream)) => stream,
        };

        let bytes = encode_event(event)?;
        let written = async {
            stream.write_all(&bytes).await?;
            stream.flush().await?;
            stream.shutdown().await
        };
        written
            .await
            .map_err(|source| SendError::Write { endpoint, source })
    }
}

#[async_trait]
impl<C: Connector> RunListener for NetworkResultSender<C> {
    async fn run_started(&mut self, platform: &str, planned: &[TestDescriptor]) -> bool {
        self.notify_run_started(platform, planned).await
    }

    async fn run_finished(&mut self, results: &[TestOutcome]) -> bool {
        self.notify_run_finished(results).await
    }

    async fn test_started(&mut self, outcome: &TestOutcome) -> bool {
        self.notify_test_started(outcome).await
    }

    async fn test_finished(&mut self, outcome: &TestOutcome) -> bool {
        self.notify_test_finished(outcome).await
    }

    async fn run_interrupted(&mut self, not_run: &[TestDescriptor]) -> bool {
        self.notify_run_interrupted(not_run).await
    }
}
