//! Connect, identify the camera and print its state

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use vaddrust::{Camera, ConnectionConfig, SessionState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = std::env::var("CAMERA_HOST").unwrap_or_else(|_| "192.168.1.50".to_string());
    let user = std::env::var("CAMERA_USER").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("CAMERA_PASSWORD").unwrap_or_else(|_| "password".to_string());

    let config = ConnectionConfig::new(host).with_credentials(user, password);
    let camera = Camera::new(config).spawn()?;

    camera.wait_for(SessionState::Ready, Duration::from_secs(15)).await?;

    if let Some(info) = camera.device_info() {
        println!("{} ({})", info, info.version_line);
    }

    let state = camera.state();
    println!("Standby:    {}", state.standby);
    println!("Auto focus: {}", state.auto_focus);
    println!("Gain:       {}", state.gain);
    println!("Iris:       {}", state.iris);
    println!("LED:        {}", state.led);
    println!("Mute:       {}", state.mute);

    camera.shutdown().await?;

    Ok(())
}
