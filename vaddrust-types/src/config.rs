//! Connection configuration

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Connection settings for one camera
///
/// A config is treated as immutable for the lifetime of a connection
/// attempt. Changing the host (or port) requires a full reconnect, see
/// [`ConnectionConfig::requires_reconnect`].
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Camera host name or IP address
    pub host: String,

    /// Telnet port (default: 23)
    pub port: u16,

    /// Shell login name
    pub username: String,

    /// Shell password
    pub password: String,

    /// Run the recurring status poll after catch-up
    pub polling_enabled: bool,

    /// Seconds between status polls (1..=999)
    pub polling_interval_secs: u64,

    /// Store presets without a speed argument (older firmware)
    pub store_without_speed: bool,
}

impl ConnectionConfig {
    /// Default telnet port
    pub const DEFAULT_PORT: u16 = 23;

    /// Default polling interval in seconds
    pub const DEFAULT_POLLING_INTERVAL: u64 = 5;

    /// Largest accepted polling interval in seconds
    pub const MAX_POLLING_INTERVAL: u64 = 999;

    /// Create a config for `host` with factory credentials
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Set telnet port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set login credentials
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Enable or disable the recurring status poll
    pub fn with_polling(mut self, enabled: bool) -> Self {
        self.polling_enabled = enabled;
        self
    }

    /// Set polling interval in seconds
    pub fn with_polling_interval(mut self, secs: u64) -> Self {
        self.polling_interval_secs = secs;
        self
    }

    /// Store presets without a speed argument
    pub fn with_store_without_speed(mut self, enabled: bool) -> Self {
        self.store_without_speed = enabled;
        self
    }

    /// Polling interval as a [`Duration`]
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }

    /// `host:port` string used for address resolution
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that the config can be used for a connection attempt
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Validation("host must not be empty".into()));
        }

        if self.username.is_empty() {
            return Err(Error::Validation("username must not be empty".into()));
        }

        if !(1..=Self::MAX_POLLING_INTERVAL).contains(&self.polling_interval_secs) {
            return Err(Error::Validation(format!(
                "polling interval must be 1..={} seconds, got {}",
                Self::MAX_POLLING_INTERVAL,
                self.polling_interval_secs
            )));
        }

        Ok(())
    }

    /// Whether switching from `self` to `next` needs a new connection
    pub fn requires_reconnect(&self, next: &ConnectionConfig) -> bool {
        self.host != next.host || self.port != next.port
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: Self::DEFAULT_PORT,
            username: "admin".to_string(),
            password: "password".to_string(),
            polling_enabled: true,
            polling_interval_secs: Self::DEFAULT_POLLING_INTERVAL,
            store_without_speed: false,
        }
    }
}

// Keep the password out of logs
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("polling_enabled", &self.polling_enabled)
            .field("polling_interval_secs", &self.polling_interval_secs)
            .field("store_without_speed", &self.store_without_speed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = ConnectionConfig::new("10.0.0.5");

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 23);
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "password");
        assert!(config.polling_enabled);
        assert_eq!(config.polling_interval(), Duration::from_secs(5));
        assert!(!config.store_without_speed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(ConnectionConfig::default().validate().is_err());
        assert!(ConnectionConfig::new("cam").with_polling_interval(0).validate().is_err());
        assert!(ConnectionConfig::new("cam").with_polling_interval(1000).validate().is_err());
        assert!(ConnectionConfig::new("cam").with_credentials("", "x").validate().is_err());
        assert!(ConnectionConfig::new("cam").with_polling_interval(999).validate().is_ok());
    }

    #[test]
    fn test_requires_reconnect() {
        let config = ConnectionConfig::new("cam-a");

        assert!(config.requires_reconnect(&ConnectionConfig::new("cam-b")));
        assert!(config.requires_reconnect(&config.clone().with_port(2323)));
        assert!(!config.requires_reconnect(&config.clone().with_polling(false)));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = ConnectionConfig::new("cam").with_credentials("admin", "hunter2");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("hunter2"));
    }
}
