//! # vaddrust-core
//!
//! Protocol engine for the Vaddio PTZ camera telnet shell.
//!
//! This crate provides the sans-IO building blocks:
//! - Line framing and prompt detection
//! - The single-slot command gate
//! - Catch-up and recurring status polling
//! - Reply parsing into [`vaddrust_types::CameraState`]
//! - The session state machine tying them together

pub mod command;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod framer;
pub mod listener;
pub mod poll;
pub mod reply;
pub mod session;

pub use command::CameraCommand;
pub use error::{Error, Result};
pub use framer::{LineFramer, Prompt};
pub use listener::StateListener;
pub use session::{Credential, Output, Session, SessionRuntime, SessionState};

/// Default telnet port
pub const DEFAULT_PORT: u16 = vaddrust_types::ConnectionConfig::DEFAULT_PORT;
