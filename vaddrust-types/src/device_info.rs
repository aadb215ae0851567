//! Device identification

use std::fmt;

use chrono::{DateTime, Utc};

/// Identity reported by the camera's `version` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Model name, taken from `Robo` onward (e.g. `RoboSHOT 12`)
    pub device_name: String,

    /// Full `System Version` line as received
    pub version_line: String,

    /// When the version line was parsed
    pub identified_at: DateTime<Utc>,
}

impl DeviceInfo {
    /// Build from a `System Version` reply line
    ///
    /// The model name starts at `Robo`; a line without it is kept whole.
    pub fn from_version_line(line: &str) -> Self {
        let device_name = line
            .find("Robo")
            .map(|start| &line[start..])
            .unwrap_or(line);

        Self {
            device_name: device_name.to_string(),
            version_line: line.to_string(),
            identified_at: Utc::now(),
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Device[{}]", self.device_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name_from_version_line() {
        let info = DeviceInfo::from_version_line("System Version 2.1 RoboSHOT");
        assert_eq!(info.device_name, "RoboSHOT");
        assert_eq!(info.version_line, "System Version 2.1 RoboSHOT");
        assert_eq!(info.to_string(), "Device[RoboSHOT]");
    }

    #[test]
    fn test_device_name_without_robo() {
        let info = DeviceInfo::from_version_line("System Version 3.0.1");
        assert_eq!(info.device_name, "System Version 3.0.1");
    }
}
