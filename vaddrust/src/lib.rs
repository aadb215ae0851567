//! # vaddrust
//!
//! Rust client for the telnet shell of Vaddio PTZ cameras.
//!
//! ## Features
//!
//! - Automatic login and device identification
//! - Catch-up and periodic status polling
//! - Typed camera commands (movement, CCU, presets, scenes)
//! - Async API using Tokio
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use vaddrust::{Camera, CameraCommand, ConnectionConfig, SessionState};
//!
//! #[tokio::main]
//! async fn main() -> vaddrust::Result<()> {
//!     // Connect to camera
//!     let config = ConnectionConfig::new("192.168.1.50").with_credentials("admin", "password");
//!     let camera = Camera::new(config).spawn()?;
//!     camera.wait_for(SessionState::Ready, Duration::from_secs(10)).await?;
//!
//!     // Recall a preset
//!     camera.send(&CameraCommand::preset_recall(1)?)?;
//!     println!("{:?}", camera.device_info());
//!
//!     // Disconnect
//!     camera.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod camera;
pub mod error;

// Re-exports
pub use camera::{Camera, CameraHandle};
pub use error::{Error, Result};

// Re-export types
pub use vaddrust_core::{CameraCommand, Credential, Session, SessionState, StateListener};
pub use vaddrust_core::command::{
    FocusDirection, FocusMode, PanDirection, SceneBank, Switch, TiltDirection, ZoomDirection,
};
pub use vaddrust_types::{Axis, CameraState, ConnectionConfig, DeviceInfo, Field, Level, Speeds};
