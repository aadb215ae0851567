//! Session engine for the camera's telnet shell
//!
//! A session tracks one persistent connection:
//! - Login handshake driven by the `login:`/`Password:` prompts
//! - Identification and the one-time status catch-up
//! - The outbound command gate and recurring poll
//!
//! The engine does no I/O. Every handler returns the [`Output`]s the
//! driver has to carry out, in order.

use std::time::Duration;

use tracing::{debug, info, trace, warn};
use vaddrust_types::{CameraState, ConnectionConfig, DeviceInfo};

use crate::constants::{CCU_GET_ALL, CRLF, VERSION_QUERY, WELCOME_PREFIX};
use crate::dispatcher::Dispatcher;
use crate::framer::{LineFramer, Prompt};
use crate::listener::{Listeners, StateListener};
use crate::poll::{CatchUp, PollScheduler};
use crate::reply::{self, Reply};

/// Credential the shell asked for last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Username,
    Password,
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No connection
    Disconnected,

    /// Transport is (being) connected, no prompt seen yet
    Connecting,

    /// Logging in
    AwaitingCredentials(Credential),

    /// Shell reached, waiting for the `version` reply
    Identifying,

    /// Running the post-login status queries
    CatchingUp,

    /// Accepting commands
    Ready,
}

/// Action the driver must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Write this text (already CRLF terminated)
    Send(String),

    /// Start the recurring poll timer
    ArmPollTimer(Duration),

    /// Stop the recurring poll timer
    DisarmPollTimer,
}

/// Per-connection flags, rebuilt on every connect attempt
#[derive(Debug, Default)]
pub struct SessionRuntime {
    logged_in: bool,
    device_name: String,
    framer: LineFramer,
    dispatcher: Dispatcher,
    poll: PollScheduler,
}

impl SessionRuntime {
    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn ok_to_send(&self) -> bool {
        self.dispatcher.ok_to_send()
    }

    pub fn pending_command(&self) -> Option<&str> {
        self.dispatcher.pending()
    }

    pub fn catch_up(&self) -> bool {
        self.poll.is_catching_up()
    }

    pub fn last_poll_index(&self) -> isize {
        self.poll.last_index()
    }

    /// Model name, empty until the camera is identified
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

/// Session manager
///
/// Owns the runtime flags, the mirrored camera state and the listener
/// list. All mutation happens through `&mut self` handlers, one event at
/// a time.
#[derive(Debug)]
pub struct Session {
    config: ConnectionConfig,
    state: SessionState,
    runtime: SessionRuntime,
    camera: CameraState,
    device: Option<DeviceInfo>,
    listeners: Listeners,
}

impl Session {
    /// Create a disconnected session
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            state: SessionState::Disconnected,
            runtime: SessionRuntime::default(),
            camera: CameraState::default(),
            device: None,
            listeners: Listeners::default(),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Replace the config, returning whether a reconnect is required
    ///
    /// The new config takes effect on the next connect attempt (and for
    /// polling, the next completed catch-up).
    pub fn replace_config(&mut self, config: ConnectionConfig) -> bool {
        let reconnect = self.config.requires_reconnect(&config);
        self.config = config;
        reconnect
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn runtime(&self) -> &SessionRuntime {
        &self.runtime
    }

    /// Last known camera attributes
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device.as_ref()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        !matches!(self.state, SessionState::Disconnected)
    }

    pub fn is_logged_in(&self) -> bool {
        self.runtime.logged_in
    }

    pub fn add_listener(&mut self, listener: Box<dyn StateListener + Send>) {
        self.listeners.push(listener);
        debug!("{} state listener(s) registered", self.listeners.len());
    }

    /// Start a connect attempt with a fresh runtime
    pub fn begin_connect(&mut self) {
        self.runtime = SessionRuntime::default();
        self.set_state(SessionState::Connecting);
    }

    /// Transport is up; the shell speaks first
    pub fn on_connected(&mut self) {
        debug!("Connected to {}, waiting for prompt", self.config.address());
    }

    /// Feed received bytes
    pub fn on_data(&mut self, chunk: &[u8]) -> Vec<Output> {
        let mut out = Vec::new();

        if self.state == SessionState::Disconnected {
            warn!("Ignoring {} bytes received while disconnected", chunk.len());
            return out;
        }

        let framed = self.runtime.framer.feed(chunk);

        for line in &framed.lines {
            self.handle_line(line, &mut out);
        }

        if let Some(prompt) = framed.prompt {
            self.handle_prompt(prompt, &mut out);
        }

        out
    }

    /// Transport closed or failed
    ///
    /// The runtime is discarded, including any pending command. Camera
    /// state survives until fresh replies overwrite it.
    pub fn on_disconnected(&mut self) -> Vec<Output> {
        if let Some(pending) = self.runtime.pending_command() {
            debug!("Dropping pending command {:?}", pending);
        }

        self.runtime = SessionRuntime::default();
        self.set_state(SessionState::Disconnected);

        vec![Output::DisarmPollTimer]
    }

    /// Request a command through the gate
    ///
    /// Sent immediately when the shell is idle, otherwise parked in the
    /// single pending slot (replacing anything parked before).
    pub fn send_command(&mut self, cmd: &str) -> Vec<Output> {
        self.runtime
            .dispatcher
            .request(cmd)
            .map(Output::Send)
            .into_iter()
            .collect()
    }

    /// Recurring poll timer fired
    pub fn poll_tick(&mut self) -> Vec<Output> {
        if self.state != SessionState::Ready {
            trace!("Poll tick ignored in state {:?}", self.state);
            return Vec::new();
        }

        let cmd = self.runtime.poll.tick(self.camera.is_awake());
        trace!("Poll tick: {}", cmd);

        self.send_command(cmd)
    }

    fn handle_prompt(&mut self, prompt: Prompt, out: &mut Vec<Output>) {
        match prompt {
            Prompt::Username => {
                debug!("Login prompt, sending username");
                out.push(Output::Send(format!("{}{}", self.config.username, CRLF)));
                self.set_state(SessionState::AwaitingCredentials(Credential::Username));
            }
            Prompt::Password => {
                debug!("Password prompt, sending password");
                out.push(Output::Send(format!("{}{}", self.config.password, CRLF)));
                self.set_state(SessionState::AwaitingCredentials(Credential::Password));
            }
            Prompt::Ready => self.handle_shell_prompt(out),
        }
    }

    fn handle_shell_prompt(&mut self, out: &mut Vec<Output>) {
        self.runtime.logged_in = true;

        if self.runtime.device_name.is_empty() {
            out.push(Output::Send(format!("{}{}", VERSION_QUERY, CRLF)));
            self.runtime.poll.begin_catch_up();
            self.set_state(SessionState::Identifying);
        } else if self.runtime.poll.is_catching_up() {
            match self.runtime.poll.next_catch_up() {
                CatchUp::Send(cmd) => {
                    debug!("Catch-up query {}: {}", self.runtime.poll.last_index(), cmd);
                    out.push(Output::Send(format!("{}{}", cmd, CRLF)));
                }
                CatchUp::Done => {
                    debug!("Catch-up complete");

                    if self.config.polling_enabled {
                        out.push(Output::ArmPollTimer(self.config.polling_interval()));
                    }

                    self.set_state(SessionState::Ready);
                    // This prompt also means the shell is idle. Opening the
                    // gate here releases the `camera ccu get all` parked while
                    // identifying; nothing else would ever reopen it.
                    self.open_gate(out);
                }
            }
        } else {
            self.open_gate(out);
        }
    }

    fn open_gate(&mut self, out: &mut Vec<Output>) {
        self.runtime.dispatcher.open();

        if let Some(line) = self.runtime.dispatcher.flush() {
            out.push(Output::Send(line));
        }
    }

    fn handle_line(&mut self, line: &str, out: &mut Vec<Output>) {
        let line = line.trim_end_matches('\r');

        if !self.runtime.logged_in {
            self.check_welcome(line);
            return;
        }

        let Some(reply) = reply::parse(line) else {
            trace!("Unrecognized line: {:?}", line);
            return;
        };

        match reply {
            Reply::SystemVersion(text) => self.identify(&text, out),
            reply => {
                if let Some(field) = reply.apply(&mut self.camera) {
                    debug!("{} updated: {:?}", field, reply);
                    self.listeners.field_changed(field, &self.camera);
                }
            }
        }
    }

    fn check_welcome(&mut self, line: &str) {
        let welcome = line
            .strip_prefix(WELCOME_PREFIX)
            .is_some_and(|name| name == self.config.username);

        if welcome {
            debug!("Welcome line received, logged in");
            self.runtime.logged_in = true;
        }
    }

    fn identify(&mut self, line: &str, out: &mut Vec<Output>) {
        let info = DeviceInfo::from_version_line(line);
        info!("Connected to a {}", info.device_name);

        self.runtime.device_name = info.device_name.clone();
        self.listeners.identified(&info);
        self.device = Some(info);

        if self.state == SessionState::Identifying {
            self.set_state(SessionState::CatchingUp);
        }

        out.extend(self.send_command(CCU_GET_ALL));
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state == state {
            return;
        }

        debug!("Session {:?} -> {:?}", self.state, state);
        self.state = state;
        self.listeners.status(state);
    }
}
