//! Type definitions for vaddrust

pub mod config;
pub mod device_info;
pub mod error;
pub mod speeds;
pub mod state;

pub use config::ConnectionConfig;
pub use device_info::DeviceInfo;
pub use error::{Error, Result};
pub use speeds::{Axis, Speeds};
pub use state::{CameraState, Field, FieldKind, Level};
