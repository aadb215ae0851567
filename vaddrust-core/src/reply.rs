//! Reply line parsing

use vaddrust_types::{CameraState, Field, FieldKind, Level};

use crate::constants::SYSTEM_VERSION;

/// A recognized reply line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Answer to `version`, carrying the whole line
    SystemVersion(String),

    /// Flag field with its literal token
    Flag(Field, String),

    /// Level field, possibly invalid
    Level(Field, Level),
}

impl Reply {
    /// Field this reply updates, if any
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::SystemVersion(_) => None,
            Self::Flag(field, _) | Self::Level(field, _) => Some(*field),
        }
    }

    /// Write the reply into `state`
    pub fn apply(&self, state: &mut CameraState) -> Option<Field> {
        let stored = match self {
            Self::SystemVersion(_) => false,
            Self::Flag(field, token) => state.set_flag(*field, token.as_str()),
            Self::Level(field, level) => state.set_level(*field, *level),
        };

        self.field().filter(|_| stored)
    }
}

/// Recognize a reply line
///
/// Keys are matched case-sensitively as line prefixes, first match wins,
/// in [`Field::ALL`] order. The value is whatever follows the key, minus
/// an optional `:` and surrounding whitespace. Trailing `\r` is ignored.
///
/// The `:` is accepted after every key, so `gain: 6` reads as 6. Firmware
/// only prints it after `auto_focus`, `led`, `mute` and `standby`; clients
/// that strip it for those keys alone read `gain: 6` as an invalid level.
pub fn parse(line: &str) -> Option<Reply> {
    let line = line.trim_end_matches('\r');

    if line.contains(SYSTEM_VERSION) {
        return Some(Reply::SystemVersion(line.to_string()));
    }

    let field = Field::ALL
        .into_iter()
        .find(|field| line.starts_with(field.key()))?;

    let rest = &line[field.key().len()..];
    let value = rest.trim_start();
    let value = value.strip_prefix(':').unwrap_or(value).trim();

    Some(match field.kind() {
        FieldKind::Flag => Reply::Flag(field, value.to_string()),
        FieldKind::Level => Reply::Level(field, Level::parse(value)),
    })
}
