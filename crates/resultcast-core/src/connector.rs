//! How the sender obtains a connection.
//!
//! Production code always uses [`TcpConnector`]. The trait exists so tests can
//! script slow, refusing or broken connections without depending on how the
//! host's network stack treats unroutable addresses.

use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;

#[async_trait]
pub trait Connector: Send + Sync {
    type Stream: AsyncWrite + Unpin + Send;

    /// Open one outbound connection. The caller applies the connect deadline.
    async fn connect(&self, host: &str, port: u16) -> std::io::Result<Self::Stream>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> std::io::Result<TcpStream> {
        let stream = TcpStream::connect((host, port)).await?;
        // Events are written in one go and the socket is closed right after.
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
