//! Camera control example

use std::time::Duration;

use tokio::time::sleep;
use vaddrust::{
    Camera, CameraCommand, ConnectionConfig, Field, PanDirection, SessionState, StateListener,
};

/// Prints every change the camera reports
struct PrintChanges;

impl StateListener for PrintChanges {
    fn on_field_changed(&mut self, field: Field, state: &vaddrust::CameraState) {
        match state.level(field) {
            Some(level) => println!("{} -> {}", field, level),
            None => println!("{} -> {}", field, state.flag(field).unwrap_or_default()),
        }
    }

    fn on_identified(&mut self, info: &vaddrust::DeviceInfo) {
        println!("Identified {}", info);
    }

    fn on_status(&mut self, status: SessionState) {
        println!("Status: {:?}", status);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let host = std::env::var("CAMERA_HOST").unwrap_or_else(|_| "192.168.1.50".to_string());

    let camera = Camera::new(ConnectionConfig::new(host))
        .with_listener(PrintChanges)
        .spawn()?;

    camera.wait_for(SessionState::Ready, Duration::from_secs(15)).await?;

    // Pan right for a second
    println!("Panning...");
    camera.send(&CameraCommand::pan(PanDirection::Right, &camera.speeds()))?;
    sleep(Duration::from_secs(1)).await;
    camera.send(&CameraCommand::PanStop)?;
    sleep(Duration::from_millis(500)).await;

    // Raise gain and read it back
    println!("Setting gain...");
    camera.send_and_refresh(&CameraCommand::ccu_set_level(Field::Gain, 6)?)?;
    sleep(Duration::from_secs(1)).await;

    println!("Recalling preset 1...");
    camera.send(&CameraCommand::preset_recall(1)?)?;
    sleep(Duration::from_secs(3)).await;

    println!("Done!");

    camera.shutdown().await?;

    Ok(())
}
