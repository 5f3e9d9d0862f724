use async_trait::async_trait;
use tokio::net::TcpStream;

/// Answers whether something accepts TCP connections on an address.
///
/// A refused, unreachable or timed-out connection is an expected outcome
/// here and is reported as `false`, never as an error. Implementations make
/// a single attempt; polling belongs to the caller.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Try to connect to `host:port` once.
    async fn is_connectable(&self, host: &str, port: u16) -> bool;
}

/// [`Prober`] that opens a real TCP connection and closes it immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn is_connectable(&self, host: &str, port: u16) -> bool {
        match TcpStream::connect((host, port)).await {
            Ok(stream) => {
                drop(stream);
                true
            }
            Err(e) => {
                tracing::trace!(host, port, error = %e, "Connection attempt failed");
                false
            }
        }
    }
}
