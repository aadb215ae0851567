//! High-level camera interface
//!
//! [`Camera`] configures a connection and spawns its driver task. The task
//! owns the transport, the [`Session`] and the poll timer and handles one
//! event at a time: received bytes, timer ticks and requests coming from
//! any number of [`CameraHandle`] clones.

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use vaddrust_core::{CameraCommand, Output, Session, SessionState, StateListener};
use vaddrust_transport::{TcpTransport, Transport};
use vaddrust_types::{Axis, CameraState, ConnectionConfig, DeviceInfo, Speeds};

use crate::error::{Error, Result};

/// Vaddio PTZ camera
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use vaddrust::{Camera, ConnectionConfig, SessionState};
///
/// #[tokio::main]
/// async fn main() -> vaddrust::Result<()> {
///     let config = ConnectionConfig::new("192.168.1.50");
///     let camera = Camera::new(config).spawn()?;
///
///     camera.wait_for(SessionState::Ready, Duration::from_secs(10)).await?;
///     camera.send_command("camera home")?;
///     println!("standby: {}", camera.state().standby);
///
///     camera.shutdown().await
/// }
/// ```
pub struct Camera {
    config: ConnectionConfig,
    listeners: Vec<Box<dyn StateListener + Send>>,
    connect_timeout: Duration,
}

impl Camera {
    /// Configure a camera connection
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            listeners: Vec::new(),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Register a listener for state changes
    pub fn with_listener(mut self, listener: impl StateListener + Send + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Set TCP connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Validate the config and start the driver task
    ///
    /// Must be called from within a tokio runtime. The first connect
    /// attempt starts immediately.
    pub fn spawn(self) -> Result<CameraHandle> {
        self.config.validate()?;

        let config = self.config.clone();
        let mut session = Session::new(self.config);
        for listener in self.listeners {
            session.add_listener(listener);
        }

        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SessionState::Disconnected);
        let shared = Arc::new(Shared {
            config: RwLock::new(config),
            camera: RwLock::new(session.camera().clone()),
            speeds: RwLock::new(Speeds::default()),
            device: RwLock::new(None),
        });

        let driver = Driver {
            session,
            transport: None,
            timer: None,
            requests: request_rx,
            status: status_tx,
            shared: Arc::clone(&shared),
            connect_timeout: self.connect_timeout,
        };

        tokio::spawn(driver.run());

        Ok(CameraHandle {
            requests: request_tx,
            status: status_rx,
            shared,
        })
    }
}

/// Snapshot written by the driver, read by handles
struct Shared {
    config: RwLock<ConnectionConfig>,
    camera: RwLock<CameraState>,
    speeds: RwLock<Speeds>,
    device: RwLock<Option<DeviceInfo>>,
}

enum Request {
    Command(String),
    Reconfigure(ConnectionConfig),
    Reconnect,
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle to a running camera
#[derive(Clone)]
pub struct CameraHandle {
    requests: mpsc::UnboundedSender<Request>,
    status: watch::Receiver<SessionState>,
    shared: Arc<Shared>,
}

impl CameraHandle {
    /// Request a raw shell command
    ///
    /// The command is sent when the shell is idle. While another command is
    /// outstanding only the most recent request is kept.
    pub fn send_command(&self, cmd: impl Into<String>) -> Result<()> {
        self.request(Request::Command(cmd.into()))
    }

    /// Request a typed command
    pub fn send(&self, cmd: &CameraCommand) -> Result<()> {
        self.send_command(cmd.to_string())
    }

    /// Request a command followed by the query that refreshes its state
    ///
    /// If the shell is busy, the refresh replaces the command in the
    /// pending slot, as any later request would.
    pub fn send_and_refresh(&self, cmd: &CameraCommand) -> Result<()> {
        self.send(cmd)?;
        if let Some(refresh) = cmd.refresh() {
            self.send(&refresh)?;
        }
        Ok(())
    }

    /// Store the current position into a preset slot
    ///
    /// `speed` is left out of the command when the config says the
    /// firmware does not accept it.
    pub fn store_preset(&self, preset: u8, speed: u8, save_ccu: bool) -> Result<()> {
        let store_without_speed = self.shared.config.read().store_without_speed;
        let cmd = CameraCommand::preset_store(preset, speed, save_ccu, store_without_speed)?;
        self.send(&cmd)
    }

    /// Replace the connection config
    ///
    /// A different host or port forces a full reconnect; other changes
    /// apply to the next connect attempt and the next completed catch-up.
    pub fn reconfigure(&self, config: ConnectionConfig) -> Result<()> {
        config.validate()?;
        *self.shared.config.write() = config.clone();
        self.request(Request::Reconfigure(config))
    }

    /// Config the camera is currently driven with
    pub fn config(&self) -> ConnectionConfig {
        self.shared.config.read().clone()
    }

    /// Drop the current connection and restart the handshake
    pub fn reconnect(&self) -> Result<()> {
        self.request(Request::Reconnect)
    }

    /// Disconnect and stop the driver task
    pub async fn shutdown(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.request(Request::Shutdown(done_tx))?;
        done_rx.await.map_err(|_| Error::Stopped)
    }

    /// Current session state
    pub fn status(&self) -> SessionState {
        *self.status.borrow()
    }

    pub fn is_ready(&self) -> bool {
        self.status() == SessionState::Ready
    }

    /// Wait until the session reaches `wanted`
    pub async fn wait_for(&self, wanted: SessionState, timeout: Duration) -> Result<()> {
        let mut status = self.status.clone();

        tokio::time::timeout(timeout, status.wait_for(|state| *state == wanted))
            .await
            .map_err(|_| Error::Timeout {
                wanted,
                after: timeout,
            })?
            .map_err(|_| Error::Stopped)?;

        Ok(())
    }

    /// Last known camera attributes
    pub fn state(&self) -> CameraState {
        self.shared.camera.read().clone()
    }

    /// Identity of the connected camera, once it answered `version`
    pub fn device_info(&self) -> Option<DeviceInfo> {
        self.shared.device.read().clone()
    }

    /// Locally tracked movement speeds
    pub fn speeds(&self) -> Speeds {
        *self.shared.speeds.read()
    }

    /// Set a movement speed, clamped into range. Returns the stored value.
    pub fn set_speed(&self, axis: Axis, speed: u8) -> u8 {
        self.shared.speeds.write().set(axis, speed)
    }

    pub fn speed_up(&self, axis: Axis) -> u8 {
        self.shared.speeds.write().step_up(axis)
    }

    pub fn speed_down(&self, axis: Axis) -> u8 {
        self.shared.speeds.write().step_down(axis)
    }

    fn request(&self, request: Request) -> Result<()> {
        self.requests.send(request).map_err(|_| Error::Stopped)
    }
}

struct Driver {
    session: Session,
    transport: Option<Box<dyn Transport>>,
    timer: Option<Interval>,
    requests: mpsc::UnboundedReceiver<Request>,
    status: watch::Sender<SessionState>,
    shared: Arc<Shared>,
    connect_timeout: Duration,
}

impl Driver {
    async fn run(mut self) {
        self.connect().await;
        self.publish();

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => {
                        if !self.handle_request(request).await {
                            break;
                        }
                    }
                    None => {
                        debug!("All camera handles dropped");
                        self.disconnect().await;
                        break;
                    }
                },
                received = receive(&mut self.transport) => match received {
                    Ok(chunk) => {
                        let outputs = self.session.on_data(&chunk);
                        self.execute(outputs).await;
                    }
                    Err(e) => self.transport_failed(e),
                },
                _ = tick(&mut self.timer) => {
                    let outputs = self.session.poll_tick();
                    self.execute(outputs).await;
                }
            }

            self.publish();
        }

        info!("Camera task stopped");
    }

    /// Returns false once the task should stop
    async fn handle_request(&mut self, request: Request) -> bool {
        match request {
            Request::Command(cmd) => {
                let outputs = self.session.send_command(&cmd);
                self.execute(outputs).await;
            }
            Request::Reconfigure(config) => {
                if self.session.replace_config(config) {
                    info!("Camera address changed to {}, reconnecting", self.session.config().address());
                    self.disconnect().await;
                    self.connect().await;
                }
            }
            Request::Reconnect => {
                self.disconnect().await;
                self.connect().await;
            }
            Request::Shutdown(done) => {
                self.disconnect().await;
                self.publish();
                let _ = done.send(());
                return false;
            }
        }

        true
    }

    async fn connect(&mut self) {
        let config = self.session.config();
        let mut transport = TcpTransport::new(config.host.clone(), config.port)
            .with_connect_timeout(self.connect_timeout);

        self.session.begin_connect();
        self.publish();

        info!("Connecting to {}...", transport.remote_addr());

        match transport.connect().await {
            Ok(()) => {
                self.session.on_connected();
                self.transport = Some(Box::new(transport));
            }
            Err(e) => {
                warn!("Network error: {}", e);
                let outputs = self.session.on_disconnected();
                self.apply_offline(outputs);
            }
        }
    }

    async fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            info!("Disconnecting from {}...", transport.remote_addr());

            if let Err(e) = transport.disconnect().await {
                warn!("Failed to close connection: {}", e);
            }
        }

        if self.session.is_connected() {
            let outputs = self.session.on_disconnected();
            self.apply_offline(outputs);
        }
    }

    fn transport_failed(&mut self, err: vaddrust_transport::Error) {
        if !err.requires_reconnect() {
            warn!("Transport error: {}", err);
            return;
        }

        warn!("Connection to {} lost: {}", self.session.config().address(), err);

        self.transport = None;
        let outputs = self.session.on_disconnected();
        self.apply_offline(outputs);
    }

    async fn execute(&mut self, outputs: Vec<Output>) {
        for output in outputs {
            match output {
                Output::Send(text) => {
                    let Some(transport) = self.transport.as_mut() else {
                        debug!("Not connected, dropping {:?}", text.trim_end());
                        continue;
                    };

                    if let Err(e) = transport.send(text.as_bytes()).await {
                        self.transport_failed(e);
                        return;
                    }
                }
                Output::ArmPollTimer(period) => self.arm_timer(period),
                Output::DisarmPollTimer => self.timer = None,
            }
        }
    }

    /// Apply outputs produced while there is no transport
    fn apply_offline(&mut self, outputs: Vec<Output>) {
        for output in outputs {
            match output {
                Output::Send(text) => debug!("Not connected, dropping {:?}", text.trim_end()),
                Output::ArmPollTimer(period) => self.arm_timer(period),
                Output::DisarmPollTimer => self.timer = None,
            }
        }
    }

    fn arm_timer(&mut self, period: Duration) {
        debug!("Polling every {:?}", period);

        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
    }

    fn publish(&self) {
        *self.shared.camera.write() = self.session.camera().clone();
        *self.shared.device.write() = self.session.device_info().cloned();
        self.status.send_replace(self.session.state());
    }
}

async fn receive(transport: &mut Option<Box<dyn Transport>>) -> vaddrust_transport::Result<BytesMut> {
    match transport {
        Some(transport) => transport.receive().await,
        None => pending().await,
    }
}

async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
    use tokio::net::TcpListener;
    use vaddrust_core::Credential;
    use vaddrust_types::Level;

    const WAIT: Duration = Duration::from_secs(5);

    /// Scripted stand-in for the camera's telnet shell
    struct FakeShell {
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
    }

    impl FakeShell {
        async fn accept(listener: &TcpListener) -> Self {
            let (socket, _) = listener.accept().await.unwrap();
            let (read, writer) = socket.into_split();
            Self {
                reader: BufReader::new(read),
                writer,
            }
        }

        async fn write(&mut self, text: &str) {
            self.writer.write_all(text.as_bytes()).await.unwrap();
        }

        async fn next_line(&mut self) -> String {
            let mut line = String::new();
            self.reader.read_line(&mut line).await.unwrap();
            line
        }

        async fn expect(&mut self, wanted: &str) {
            assert_eq!(self.next_line().await, format!("{}\r\n", wanted));
        }

        async fn exchange(&mut self, wanted: &str, reply: &str) {
            self.expect(wanted).await;
            self.write(reply).await;
        }

        async fn login(&mut self) {
            self.write("Vaddio RoboSHOT 12\r\nlogin: ").await;
            self.exchange("admin", "Password: ").await;
            self.exchange("password", "Welcome admin\r\ncamera> ").await;
        }

        /// Log in, identify and answer the catch-up queries
        async fn handshake(&mut self, standby: &str) {
            self.login().await;
            self.exchange("version", "System Version 2.1 RoboSHOT 12\r\ncamera> ").await;
            self.exchange("camera standby get", &format!("standby: {}\r\ncamera> ", standby))
                .await;
            self.exchange("camera focus mode get", "auto_focus: auto\r\ncamera> ").await;
            self.exchange("camera ccu get all", "gain 6\r\ncamera> ").await;
            self.exchange("camera led get", "led: on\r\ncamera> ").await;
            self.exchange("video mute get", "mute: off\r\ncamera> ").await;
            // refresh parked during identification
            self.exchange("camera ccu get all", "gain 6\r\ncamera> ").await;
        }
    }

    async fn listen() -> (TcpListener, ConnectionConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = ConnectionConfig::new("127.0.0.1")
            .with_port(port)
            .with_polling(false);
        (listener, config)
    }

    async fn eventually(mut check: impl FnMut() -> bool) {
        for _ in 0..200 {
            if check() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_spawn_rejects_invalid_config() {
        let result = Camera::new(ConnectionConfig::default()).spawn();
        assert!(matches!(result, Err(Error::Types(_))));
    }

    #[tokio::test]
    async fn test_session_against_fake_shell() {
        let (listener, config) = listen().await;
        let camera = Camera::new(config).spawn().unwrap();

        let mut shell = FakeShell::accept(&listener).await;
        shell.login().await;
        shell.exchange("version", "System Version 2.1 RoboSHOT 12\r\ncamera> ").await;
        shell.exchange("camera standby get", "standby: off\r\ncamera> ").await;
        shell.exchange("camera focus mode get", "auto_focus: manual\r\ncamera> ").await;
        shell
            .exchange("camera ccu get all", "gain 6\r\nred_gain 100\r\niris 9\r\ncamera> ")
            .await;
        shell.exchange("camera led get", "led: off\r\ncamera> ").await;
        shell.exchange("video mute get", "mute: on\r\ncamera> ").await;

        camera.wait_for(SessionState::Ready, WAIT).await.unwrap();
        camera.send(&CameraCommand::Home).unwrap();

        // refresh parked during identification goes out first
        shell.exchange("camera ccu get all", "gain 7\r\ncamera> ").await;
        shell.exchange("camera home", "camera> ").await;

        eventually(|| camera.state().gain == Level::Value(7)).await;

        let state = camera.state();
        assert_eq!(state.standby, "off");
        assert_eq!(state.auto_focus, "manual");
        assert_eq!(state.red_gain, Level::Value(100));
        assert_eq!(state.iris, Level::Value(9));
        assert_eq!(state.led, "off");
        assert_eq!(state.mute, "on");
        assert_eq!(camera.device_info().unwrap().device_name, "RoboSHOT 12");

        camera.shutdown().await.unwrap();
        assert_eq!(camera.status(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_poll_timer_queries_standby_while_asleep() {
        let (listener, config) = listen().await;
        let config = config.with_polling(true).with_polling_interval(1);
        let camera = Camera::new(config).spawn().unwrap();

        let mut shell = FakeShell::accept(&listener).await;
        shell.handshake("on").await;
        camera.wait_for(SessionState::Ready, WAIT).await.unwrap();

        // idle runtime jumps straight to the next tick
        tokio::time::pause();

        for _ in 0..3 {
            shell.exchange("camera standby get", "standby: on\r\ncamera> ").await;
        }

        // once awake the rotation restarts from the top of the list
        shell.exchange("camera standby get", "standby: off\r\ncamera> ").await;
        let mut standby_queries = 0;
        loop {
            let line = shell.next_line().await;
            if line == "camera focus mode get\r\n" {
                break;
            }
            assert_eq!(line, "camera standby get\r\n");
            standby_queries += 1;
            assert!(standby_queries <= 2, "rotation did not resume");
            shell.write("standby: off\r\ncamera> ").await;
        }

        assert!(camera.state().is_awake());
        camera.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_store_preset_follows_config() {
        let (listener, config) = listen().await;
        let camera = Camera::new(config.clone()).spawn().unwrap();

        let mut shell = FakeShell::accept(&listener).await;
        shell.handshake("off").await;
        camera.wait_for(SessionState::Ready, WAIT).await.unwrap();

        camera.store_preset(2, 10, true).unwrap();
        shell.exchange("camera preset store 2 10 save-ccu", "camera> ").await;

        // same address, no reconnect
        camera.reconfigure(config.with_store_without_speed(true)).unwrap();
        assert!(camera.config().store_without_speed);
        camera.store_preset(3, 10, false).unwrap();
        shell.exchange("camera preset store 3", "camera> ").await;

        assert!(matches!(camera.store_preset(17, 10, false), Err(Error::Core(_))));
        assert_eq!(camera.status(), SessionState::Ready);

        camera.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_reconnect_after_remote_close() {
        let (listener, config) = listen().await;
        let camera = Camera::new(config).spawn().unwrap();

        let mut shell = FakeShell::accept(&listener).await;
        shell.write("login: ").await;
        shell.expect("admin").await;
        camera
            .wait_for(SessionState::AwaitingCredentials(Credential::Username), WAIT)
            .await
            .unwrap();

        // parked, must not leak into the next connection
        camera.send_command("camera preset recall 4").unwrap();
        drop(shell);
        camera.wait_for(SessionState::Disconnected, WAIT).await.unwrap();

        camera.reconnect().unwrap();
        let mut shell = FakeShell::accept(&listener).await;
        shell.login().await;
        shell.exchange("version", "System Version 2.1 RoboSHOT 12\r\ncamera> ").await;
        shell.expect("camera standby get").await;

        camera.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let (listener, config) = listen().await;
        drop(listener);

        let camera = Camera::new(config)
            .with_connect_timeout(Duration::from_millis(500))
            .spawn()
            .unwrap();

        camera.wait_for(SessionState::Disconnected, WAIT).await.unwrap();
        assert!(camera.send_command("camera home").is_ok());
        assert!(!camera.is_ready());

        camera.shutdown().await.unwrap();
        assert!(matches!(camera.send_command("camera home"), Err(Error::Stopped)));
    }

    #[tokio::test]
    async fn test_speeds_are_local() {
        let (listener, config) = listen().await;
        drop(listener);
        let camera = Camera::new(config).spawn().unwrap();

        assert_eq!(camera.speeds(), Speeds::default());
        assert_eq!(camera.set_speed(Axis::Pan, 40), 24);
        assert_eq!(camera.speed_down(Axis::Pan), 23);
        assert_eq!(camera.clone().speeds().pan, 23);

        camera.shutdown().await.unwrap();
    }
}
