//! Device access seam.
//!
//! The protocol client owns discovery, capability negotiation and the
//! transport; this module defines the narrow view the control loop consumes,
//! plus the fan-out that applies one intensity to every vibration-capable
//! device.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Result;
use crate::intensity::Intensity;

pub mod intiface;

pub use intiface::IntifaceHub;

/// Read-only view of one discovered device.
#[async_trait]
pub trait DeviceHandle: Send + Sync {
    /// Display name reported by the server.
    fn name(&self) -> String;

    /// Number of independently addressable vibration channels. Zero means
    /// the device does not support vibration.
    fn vibrator_count(&self) -> usize;

    /// Sends one vibration command, one speed per channel.
    async fn vibrate(&self, speeds: &[f64]) -> Result<()>;
}

/// Session-scoped handle to the device server.
#[async_trait]
pub trait DeviceHub: Send + Sync {
    /// Runs one discovery pass: start scanning, then immediately stop.
    async fn scan_once(&self) -> Result<()>;

    /// Devices the client currently knows about.
    fn devices(&self) -> Vec<Arc<dyn DeviceHandle>>;

    /// Stops every device the server knows about.
    async fn stop_all(&self) -> Result<()>;

    /// Tears the connection down.
    async fn disconnect(&self) -> Result<()>;
}

/// Outcome of one per-device command, reported back to the console.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceReport {
    pub name: String,
    pub vibrators: usize,
    pub sent: bool,
    pub error: Option<String>,
}

/// Applies `intensity` to every vibration-capable device, replicating the
/// value across each device's channels.
///
/// A failure on one device is recorded in its report and does not stop the
/// pass; the remaining devices are still attempted.
pub async fn apply_intensity(hub: &dyn DeviceHub, intensity: Intensity) -> Vec<DeviceReport> {
    let mut reports = Vec::new();
    for device in hub.devices() {
        let name = device.name();
        let vibrators = device.vibrator_count();
        if vibrators == 0 {
            reports.push(DeviceReport {
                name,
                vibrators,
                sent: false,
                error: None,
            });
            continue;
        }
        let speeds = vec![intensity.value(); vibrators];
        match device.vibrate(&speeds).await {
            Ok(()) => {
                debug!(
                    target = "vibectl",
                    device = %name,
                    intensity = intensity.value(),
                    channels = vibrators,
                    "vibrate"
                );
                reports.push(DeviceReport {
                    name,
                    vibrators,
                    sent: true,
                    error: None,
                });
            }
            Err(err) => {
                warn!(target = "vibectl", device = %name, error = %err, "vibrate failed");
                reports.push(DeviceReport {
                    name,
                    vibrators,
                    sent: false,
                    error: Some(err.to_string()),
                });
            }
        }
    }
    reports
}
