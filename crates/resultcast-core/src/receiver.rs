//! Listening end of the result stream: one inbound connection, one event.

use crate::error::ReceiveError;
use resultcast_common::{decode_event, ResultEvent, WireError, MAX_EVENT_BYTES};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::time::timeout;

/// How long one connection may take to deliver its event and close.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

pub struct ResultReceiver {
    listener: TcpListener,
    read_timeout: Duration,
}

impl ResultReceiver {
    pub async fn bind(addr: impl ToSocketAddrs) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept the next connection and decode the single event it carries.
    ///
    /// A peer that stays silent is cut off after the read timeout. Apart
    /// from [`ReceiveError::Accept`], an error concerns that connection
    /// only; the receiver stays usable.
    pub async fn accept_event(&self) -> Result<(ResultEvent, SocketAddr), ReceiveError> {
        let (stream, peer) = self.listener.accept().await.map_err(ReceiveError::Accept)?;

        let mut body = Vec::new();
        // One byte past the limit tells an exact-limit body from an oversized one.
        let mut limited = stream.take(MAX_EVENT_BYTES as u64 + 1);
        match timeout(self.read_timeout, limited.read_to_end(&mut body)).await {
            Err(_) => {
                tracing::warn!(%peer, "result connection timed out before closing");
                return Err(ReceiveError::Timeout {
                    peer,
                    after: self.read_timeout,
                });
            }
            Ok(Err(source)) => return Err(ReceiveError::Io { peer, source }),
            Ok(Ok(_)) => {}
        }
        if body.len() > MAX_EVENT_BYTES {
            tracing::warn!(%peer, "oversized result event rejected");
            return Err(WireError::Oversized {
                limit: MAX_EVENT_BYTES,
            }
            .into());
        }

        let event = decode_event(&body)?;
        tracing::debug!(%peer, message_type = %event.message_type(), "received result event");
        Ok((event, peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resultcast_common::encode_event;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    async fn send_raw(addr: SocketAddr, bytes: &[u8]) {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(bytes).await.unwrap();
        stream.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn reads_one_event_per_connection() {
        let rx = ResultReceiver::bind("127.0.0.1:0").await.unwrap();
        let addr = rx.local_addr().unwrap();

        let bytes = encode_event(&ResultEvent::run_finished(&[])).unwrap();
        let client = tokio::spawn(async move { send_raw(addr, &bytes).await });

        let (event, _peer) = rx.accept_event().await.unwrap();
        assert_eq!(event, ResultEvent::RunFinished { results: vec![] });
        client.await.unwrap();
    }

    #[tokio::test]
    async fn garbage_fails_that_connection_only() {
        let rx = ResultReceiver::bind("127.0.0.1:0").await.unwrap();
        let addr = rx.local_addr().unwrap();

        let ping = encode_event(&ResultEvent::ping()).unwrap();
        let client = tokio::spawn(async move {
            send_raw(addr, &[0xFF, 0xFF, 0xFF, 0xFF, 0x01]).await;
            send_raw(addr, &ping).await;
        });

        let err = rx.accept_event().await.unwrap_err();
        assert!(matches!(err, ReceiveError::Wire(_)), "got {err:?}");

        let (event, _) = rx.accept_event().await.unwrap();
        assert_eq!(event, ResultEvent::Ping);
        client.await.unwrap();
    }

    #[tokio::test]
    async fn silent_peer_does_not_block_later_events() {
        let rx = ResultReceiver::bind("127.0.0.1:0")
            .await
            .unwrap()
            .with_read_timeout(Duration::from_millis(200));
        let addr = rx.local_addr().unwrap();

        // Connects first, then never writes nor closes.
        let silent = TcpStream::connect(addr).await.unwrap();
        let ping = encode_event(&ResultEvent::ping()).unwrap();
        send_raw(addr, &ping).await;

        let err = tokio::time::timeout(Duration::from_secs(3), rx.accept_event())
            .await
            .expect("receiver stuck on silent peer")
            .unwrap_err();
        assert!(matches!(err, ReceiveError::Timeout { .. }), "got {err:?}");

        let (event, _) = tokio::time::timeout(Duration::from_secs(3), rx.accept_event())
            .await
            .expect("queued ping never read")
            .unwrap();
        assert_eq!(event, ResultEvent::Ping);
        drop(silent);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let rx = ResultReceiver::bind("127.0.0.1:0")
            .await
            .unwrap()
            .with_read_timeout(Duration::from_secs(20));
        let addr = rx.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let body = vec![0u8; MAX_EVENT_BYTES + 1];
            // The receiver may hang up as soon as it has seen enough.
            let _ = stream.write_all(&body).await;
            let _ = stream.shutdown().await;
        });

        let err = rx.accept_event().await.unwrap_err();
        assert!(
            matches!(err, ReceiveError::Wire(WireError::Oversized { limit }) if limit == MAX_EVENT_BYTES),
            "got {err:?}"
        );
        client.await.unwrap();
    }
}
