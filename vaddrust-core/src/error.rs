//! Error types for vaddrust-core

/// Result type alias for vaddrust-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
///
/// The session engine itself never fails: malformed replies are kept as
/// invalid values and missing prompts simply stall. These errors come from
/// building commands with out-of-range arguments.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Preset slot outside 1..=16
    #[error("Invalid preset: {0} (expected 1..=16)")]
    InvalidPreset(u8),

    /// CCU scene outside the bank's range
    #[error("Invalid {bank} scene: {scene} (expected 1..={max})")]
    InvalidScene {
        bank: &'static str,
        scene: u8,
        max: u8,
    },

    /// Field cannot be used with this command
    #[error("Field {field} cannot be used with {command}")]
    UnsupportedField {
        field: vaddrust_types::Field,
        command: &'static str,
    },

    /// Speed outside the axis range
    #[error("Invalid speed {speed} for {axis:?} (expected {min}..={max})")]
    InvalidSpeed {
        axis: vaddrust_types::Axis,
        speed: u8,
        min: u8,
        max: u8,
    },

    /// CCU level outside the field's range
    #[error("Invalid {field} level {value} (expected {min}..={max})")]
    InvalidLevel {
        field: vaddrust_types::Field,
        value: i32,
        min: i32,
        max: i32,
    },

    /// Type-level error
    #[error("Type error: {0}")]
    Types(#[from] vaddrust_types::Error),
}
