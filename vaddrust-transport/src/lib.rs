//! Transport layer for the Vaddio telnet shell
//!
//! Provides the raw TCP byte stream; framing and login live in
//! `vaddrust-core`.

pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for different communication methods
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device
    async fn connect(&mut self) -> Result<()>;
    
    /// Disconnect from device
    async fn disconnect(&mut self) -> Result<()>;
    
    /// Check if connected
    fn is_connected(&self) -> bool;
    
    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;
    
    /// Receive the next chunk of bytes
    ///
    /// Waits until data arrives; there is no read timeout because an idle
    /// shell is normal. Returns [`Error::ConnectionClosed`] at end of stream.
    /// Must be cancel safe so it can sit in a `select!`.
    async fn receive(&mut self) -> Result<BytesMut>;
    
    /// Get remote address
    fn remote_addr(&self) -> String;
}
