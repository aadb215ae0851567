//! Mirrored camera attributes

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{Error, Result};

/// How a field's value is reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Literal token such as `on`, `off` or `auto`
    Flag,

    /// Integer level
    Level,
}

/// Camera attribute names as they appear in shell replies
///
/// The variant order matches the order replies are matched in, so that a
/// longer key is never shadowed by a shorter one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    AutoFocus,
    AutoIris,
    AutoWhiteBalance,
    BacklightCompensation,
    BlueGain,
    Chroma,
    Detail,
    Gain,
    Gamma,
    Iris,
    Led,
    Mute,
    RedGain,
    Standby,
    WideDynamicRange,
}

impl Field {
    /// All fields in reply-matching order
    pub const ALL: [Field; 15] = [
        Self::AutoFocus,
        Self::AutoIris,
        Self::AutoWhiteBalance,
        Self::BacklightCompensation,
        Self::BlueGain,
        Self::Chroma,
        Self::Detail,
        Self::Gain,
        Self::Gamma,
        Self::Iris,
        Self::Led,
        Self::Mute,
        Self::RedGain,
        Self::Standby,
        Self::WideDynamicRange,
    ];

    /// Key used by the device shell
    pub fn key(self) -> &'static str {
        match self {
            Self::AutoFocus => "auto_focus",
            Self::AutoIris => "auto_iris",
            Self::AutoWhiteBalance => "auto_white_balance",
            Self::BacklightCompensation => "backlight_compensation",
            Self::BlueGain => "blue_gain",
            Self::Chroma => "chroma",
            Self::Detail => "detail",
            Self::Gain => "gain",
            Self::Gamma => "gamma",
            Self::Iris => "iris",
            Self::Led => "led",
            Self::Mute => "mute",
            Self::RedGain => "red_gain",
            Self::Standby => "standby",
            Self::WideDynamicRange => "wide_dynamic_range",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::BlueGain
            | Self::Chroma
            | Self::Detail
            | Self::Gain
            | Self::Gamma
            | Self::Iris
            | Self::RedGain => FieldKind::Level,
            _ => FieldKind::Flag,
        }
    }

    /// Values the device accepts for a level field
    pub fn level_range(self) -> Option<RangeInclusive<i32>> {
        match self {
            Self::Gain | Self::Iris => Some(0..=11),
            Self::RedGain | Self::BlueGain => Some(0..=255),
            Self::Detail => Some(0..=15),
            Self::Chroma => Some(0..=14),
            Self::Gamma => Some(-64..=64),
            _ => None,
        }
    }

    /// Whether the field belongs to the camera control unit (`camera ccu ...`)
    pub fn is_ccu(self) -> bool {
        !matches!(self, Self::AutoFocus | Self::Led | Self::Mute | Self::Standby)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| Error::Parse(format!("unknown camera field: {}", s)))
    }
}

/// Integer level reported by the device
///
/// The shell is permissive, so a reply that carries no number is kept as
/// [`Level::Invalid`] instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Value(i32),
    Invalid,
}

impl Level {
    /// Parse the leading integer of `text`
    ///
    /// Leading whitespace and an optional sign are accepted, anything after
    /// the digits is ignored (`"6 dB"` is 6).
    pub fn parse(text: &str) -> Self {
        let text = text.trim_start();
        let digits_start = usize::from(text.starts_with(['+', '-']));
        let digits_len = text[digits_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();

        if digits_len == 0 {
            return Self::Invalid;
        }

        text[..digits_start + digits_len]
            .parse()
            .map(Self::Value)
            .unwrap_or(Self::Invalid)
    }

    pub fn value(self) -> Option<i32> {
        match self {
            Self::Value(v) => Some(v),
            Self::Invalid => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::Invalid => f.write_str("NaN"),
        }
    }
}

/// Last known camera attributes
///
/// Values persist across reconnects and are only replaced by fresh replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraState {
    pub auto_focus: String,
    pub auto_iris: String,
    pub auto_white_balance: String,
    pub backlight_compensation: String,
    pub blue_gain: Level,
    pub chroma: Level,
    pub detail: Level,
    pub gain: Level,
    pub gamma: Level,
    pub iris: Level,
    pub led: String,
    pub mute: String,
    pub red_gain: Level,
    pub standby: String,
    pub wide_dynamic_range: String,
}

impl CameraState {
    /// Token of a flag field, `None` for level fields
    pub fn flag(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::AutoFocus => &self.auto_focus,
            Field::AutoIris => &self.auto_iris,
            Field::AutoWhiteBalance => &self.auto_white_balance,
            Field::BacklightCompensation => &self.backlight_compensation,
            Field::Led => &self.led,
            Field::Mute => &self.mute,
            Field::Standby => &self.standby,
            Field::WideDynamicRange => &self.wide_dynamic_range,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Value of a level field, `None` for flag fields
    pub fn level(&self, field: Field) -> Option<Level> {
        match field {
            Field::BlueGain => Some(self.blue_gain),
            Field::Chroma => Some(self.chroma),
            Field::Detail => Some(self.detail),
            Field::Gain => Some(self.gain),
            Field::Gamma => Some(self.gamma),
            Field::Iris => Some(self.iris),
            Field::RedGain => Some(self.red_gain),
            _ => None,
        }
    }

    /// Store a flag token; level fields are left untouched
    pub fn set_flag(&mut self, field: Field, token: impl Into<String>) -> bool {
        let slot = match field {
            Field::AutoFocus => &mut self.auto_focus,
            Field::AutoIris => &mut self.auto_iris,
            Field::AutoWhiteBalance => &mut self.auto_white_balance,
            Field::BacklightCompensation => &mut self.backlight_compensation,
            Field::Led => &mut self.led,
            Field::Mute => &mut self.mute,
            Field::Standby => &mut self.standby,
            Field::WideDynamicRange => &mut self.wide_dynamic_range,
            _ => return false,
        };
        *slot = token.into();
        true
    }

    /// Store a level; flag fields are left untouched
    pub fn set_level(&mut self, field: Field, level: Level) -> bool {
        let slot = match field {
            Field::BlueGain => &mut self.blue_gain,
            Field::Chroma => &mut self.chroma,
            Field::Detail => &mut self.detail,
            Field::Gain => &mut self.gain,
            Field::Gamma => &mut self.gamma,
            Field::Iris => &mut self.iris,
            Field::RedGain => &mut self.red_gain,
            _ => return false,
        };
        *slot = level;
        true
    }

    /// Whether the device reported it is awake
    ///
    /// Only the literal `off` counts as awake; anything else (including
    /// a mode token the device has not documented) is treated as standby.
    pub fn is_awake(&self) -> bool {
        self.standby == "off"
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            auto_focus: "on".to_string(),
            auto_iris: "on".to_string(),
            auto_white_balance: "on".to_string(),
            backlight_compensation: "off".to_string(),
            blue_gain: Level::Value(128),
            chroma: Level::Value(7),
            detail: Level::Value(7),
            gain: Level::Value(0),
            gamma: Level::Value(0),
            iris: Level::Value(6),
            led: "on".to_string(),
            mute: "off".to_string(),
            red_gain: Level::Value(128),
            standby: "off".to_string(),
            wide_dynamic_range: "off".to_string(),
        }
    }
}
