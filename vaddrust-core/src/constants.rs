//! Shell protocol constants

/// Line terminator for everything sent to the camera
pub const CRLF: &str = "\r\n";

/// Tail patterns, lowercase, checked in this order
pub const LOGIN_PROMPT: &[u8] = b"login:";
pub const PASSWORD_PROMPT: &[u8] = b"password:";
pub const SHELL_PROMPT: &[u8] = b">";

/// Fallback login confirmation is `Welcome <username>`
pub const WELCOME_PREFIX: &str = "Welcome ";

/// Marker of the identification reply to `version`
pub const SYSTEM_VERSION: &str = "System Version";

/// Identification query sent on the first shell prompt
pub const VERSION_QUERY: &str = "version";

/// Wake check used while the camera is in standby
pub const STANDBY_QUERY: &str = "camera standby get";

/// Full CCU refresh, requested once the device is identified
pub const CCU_GET_ALL: &str = "camera ccu get all";

/// Status queries: run once in order after login, then rotated by the poll
pub const POLL_COMMANDS: [&str; 5] = [
    STANDBY_QUERY,
    "camera focus mode get",
    CCU_GET_ALL,
    "camera led get",
    "video mute get",
];
