//! Camera shell command vocabulary
//!
//! Renders the fixed command grammar of the Vaddio telnet shell. Each
//! command is one line; [`CameraCommand::to_string`] gives the text without
//! the trailing CRLF, which the dispatcher adds.

use std::fmt;

use vaddrust_types::{Axis, Field, FieldKind, Speeds};

use crate::constants::{CCU_GET_ALL, STANDBY_QUERY};
use crate::error::{Error, Result};

/// Highest preset slot
pub const MAX_PRESET: u8 = 16;

/// Number of custom CCU scenes
pub const MAX_CUSTOM_SCENE: u8 = 3;

/// Number of factory CCU scenes
pub const MAX_FACTORY_SCENE: u8 = 6;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TiltDirection {
    Up,
    Down,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FocusDirection {
    Near,
    Far,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FocusMode {
    Auto,
    Manual,
}

/// `on`/`off`/`toggle` argument
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

/// CCU scene bank
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SceneBank {
    Custom,
    Factory,
}

impl SceneBank {
    fn max(self) -> u8 {
        match self {
            Self::Custom => MAX_CUSTOM_SCENE,
            Self::Factory => MAX_FACTORY_SCENE,
        }
    }
}

/// One command line for the camera shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraCommand {
    Pan(PanDirection, u8),
    PanStop,
    Tilt(TiltDirection, u8),
    TiltStop,
    Zoom(ZoomDirection, u8),
    ZoomStop,
    Focus(FocusDirection, u8),
    FocusStop,
    SetFocusMode(FocusMode),
    GetFocusMode,
    Home,
    CcuSetLevel(Field, i32),
    CcuSetMode(Field, Switch),
    CcuGet(Field),
    CcuGetAll,
    PresetStore {
        preset: u8,
        speed: Option<u8>,
        save_ccu: bool,
    },
    PresetRecall(u8),
    SceneStore(u8),
    SceneRecall(SceneBank, u8),
    Led(Switch),
    GetLed,
    Standby(Switch),
    GetStandby,
    VideoMute(Switch),
    GetVideoMute,
}

impl CameraCommand {
    /// Pan at the current pan speed
    pub fn pan(direction: PanDirection, speeds: &Speeds) -> Self {
        Self::Pan(direction, speeds.pan)
    }

    /// Tilt at the current tilt speed
    pub fn tilt(direction: TiltDirection, speeds: &Speeds) -> Self {
        Self::Tilt(direction, speeds.tilt)
    }

    /// Zoom at the current zoom speed
    pub fn zoom(direction: ZoomDirection, speeds: &Speeds) -> Self {
        Self::Zoom(direction, speeds.zoom)
    }

    /// Focus at the current focus speed
    pub fn focus(direction: FocusDirection, speeds: &Speeds) -> Self {
        Self::Focus(direction, speeds.focus)
    }

    /// Diagonal move, sent as a pan followed by a tilt
    pub fn diagonal(pan: PanDirection, tilt: TiltDirection, speeds: &Speeds) -> [Self; 2] {
        [Self::pan(pan, speeds), Self::tilt(tilt, speeds)]
    }

    /// Stop both pan and tilt
    pub fn stop() -> [Self; 2] {
        [Self::PanStop, Self::TiltStop]
    }

    /// Set a numeric CCU field, checked against the field's range
    pub fn ccu_set_level(field: Field, value: i32) -> Result<Self> {
        let range = match field.level_range() {
            Some(range) if field.is_ccu() => range,
            _ => {
                return Err(Error::UnsupportedField {
                    field,
                    command: "camera ccu set (level)",
                });
            }
        };

        if !range.contains(&value) {
            return Err(Error::InvalidLevel {
                field,
                value,
                min: *range.start(),
                max: *range.end(),
            });
        }

        Ok(Self::CcuSetLevel(field, value))
    }

    /// Set an on/off CCU field
    pub fn ccu_set_mode(field: Field, mode: Switch) -> Result<Self> {
        if !field.is_ccu() || field.kind() != FieldKind::Flag || mode == Switch::Toggle {
            return Err(Error::UnsupportedField {
                field,
                command: "camera ccu set (mode)",
            });
        }
        Ok(Self::CcuSetMode(field, mode))
    }

    /// Query a single CCU field
    pub fn ccu_get(field: Field) -> Result<Self> {
        if !field.is_ccu() {
            return Err(Error::UnsupportedField {
                field,
                command: "camera ccu get",
            });
        }
        Ok(Self::CcuGet(field))
    }

    /// Store the current position into a preset slot
    ///
    /// Older firmware rejects the speed argument; pass
    /// `store_without_speed` from the connection config to leave it out.
    pub fn preset_store(preset: u8, speed: u8, save_ccu: bool, store_without_speed: bool) -> Result<Self> {
        check_preset(preset)?;

        let speed = if store_without_speed {
            None
        } else {
            let range = Axis::Pan.range();
            if !range.contains(&speed) {
                return Err(Error::InvalidSpeed {
                    axis: Axis::Pan,
                    speed,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
            Some(speed)
        };

        Ok(Self::PresetStore {
            preset,
            speed,
            save_ccu,
        })
    }

    pub fn preset_recall(preset: u8) -> Result<Self> {
        check_preset(preset)?;
        Ok(Self::PresetRecall(preset))
    }

    /// Store the current CCU settings as a custom scene
    pub fn scene_store(scene: u8) -> Result<Self> {
        check_scene(SceneBank::Custom, scene)?;
        Ok(Self::SceneStore(scene))
    }

    pub fn scene_recall(bank: SceneBank, scene: u8) -> Result<Self> {
        check_scene(bank, scene)?;
        Ok(Self::SceneRecall(bank, scene))
    }

    /// Follow-up query that refreshes the state this command changes
    ///
    /// CCU setters are followed by a get of the same field and a scene
    /// recall by a full CCU refresh.
    pub fn refresh(&self) -> Option<Self> {
        match self {
            Self::CcuSetLevel(field, _) | Self::CcuSetMode(field, _) => Some(Self::CcuGet(*field)),
            Self::SceneRecall(..) => Some(Self::CcuGetAll),
            _ => None,
        }
    }
}

fn check_preset(preset: u8) -> Result<()> {
    if (1..=MAX_PRESET).contains(&preset) {
        Ok(())
    } else {
        Err(Error::InvalidPreset(preset))
    }
}

fn check_scene(bank: SceneBank, scene: u8) -> Result<()> {
    if (1..=bank.max()).contains(&scene) {
        Ok(())
    } else {
        Err(Error::InvalidScene {
            bank: bank.as_str(),
            scene,
            max: bank.max(),
        })
    }
}

impl PanDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl TiltDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl ZoomDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl FocusDirection {
    fn as_str(self) -> &'static str {
        match self {
            Self::Near => "near",
            Self::Far => "far",
        }
    }
}

impl FocusMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

impl Switch {
    fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Toggle => "toggle",
        }
    }
}

impl SceneBank {
    fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Factory => "factory",
        }
    }
}

impl fmt::Display for CameraCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pan(dir, speed) => write!(f, "camera pan {} {}", dir.as_str(), speed),
            Self::PanStop => f.write_str("camera pan stop"),
            Self::Tilt(dir, speed) => write!(f, "camera tilt {} {}", dir.as_str(), speed),
            Self::TiltStop => f.write_str("camera tilt stop"),
            Self::Zoom(dir, speed) => write!(f, "camera zoom {} {}", dir.as_str(), speed),
            Self::ZoomStop => f.write_str("camera zoom stop"),
            Self::Focus(dir, speed) => write!(f, "camera focus {} {}", dir.as_str(), speed),
            Self::FocusStop => f.write_str("camera focus stop"),
            Self::SetFocusMode(mode) => write!(f, "camera focus mode {}", mode.as_str()),
            Self::GetFocusMode => f.write_str("camera focus mode get"),
            Self::Home => f.write_str("camera home"),
            Self::CcuSetLevel(field, value) => write!(f, "camera ccu set {} {}", field, value),
            Self::CcuSetMode(field, mode) => write!(f, "camera ccu set {} {}", field, mode.as_str()),
            Self::CcuGet(field) => write!(f, "camera ccu get {}", field),
            Self::CcuGetAll => f.write_str(CCU_GET_ALL),
            Self::PresetStore {
                preset,
                speed,
                save_ccu,
            } => {
                write!(f, "camera preset store {}", preset)?;
                if let Some(speed) = speed {
                    write!(f, " {}", speed)?;
                }
                if *save_ccu {
                    f.write_str(" save-ccu")?;
                }
                Ok(())
            }
            Self::PresetRecall(preset) => write!(f, "camera preset recall {}", preset),
            Self::SceneStore(scene) => write!(f, "camera ccu scene store custom {}", scene),
            Self::SceneRecall(bank, scene) => {
                write!(f, "camera ccu scene recall {} {}", bank.as_str(), scene)
            }
            Self::Led(mode) => write!(f, "camera led {}", mode.as_str()),
            Self::GetLed => f.write_str("camera led get"),
            Self::Standby(mode) => write!(f, "camera standby {}", mode.as_str()),
            Self::GetStandby => f.write_str(STANDBY_QUERY),
            Self::VideoMute(mode) => write!(f, "video mute {}", mode.as_str()),
            Self::GetVideoMute => f.write_str("video mute get"),
        }
    }
}
