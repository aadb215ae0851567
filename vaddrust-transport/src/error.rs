//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,
    
    #[error("Already connected")]
    AlreadyConnected,
    
    #[error("Connection timeout")]
    ConnectionTimeout,
    
    #[error("Connection closed by remote")]
    ConnectionClosed,
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Check if the connection is gone and a new connect attempt is needed
    pub fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::ConnectionTimeout
                | Self::ConnectionClosed
                | Self::Io(_)
        )
    }
}
