//! Test doubles for the device and screen seams.
//!
//! Lets the control loop be exercised without a device server or a
//! capturable screen: configure the mocks up front, run the code under
//! test, then assert on the recorded actions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::device::{DeviceHandle, DeviceHub};
use crate::error::{Error, Result};
use crate::mapping::Rgb;
use crate::sampler::{PixelPoint, PixelSource};

/// Hub-level action recorded by [`MockHub`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubAction {
    ScanOnce,
    StopAll,
    Disconnect,
}

/// Mock device hub holding a fixed set of [`MockDevice`]s.
#[derive(Default)]
pub struct MockHub {
    devices: Mutex<Vec<Arc<MockDevice>>>,
    actions: Mutex<Vec<HubAction>>,
}

impl MockHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device and returns a handle for later assertions.
    pub fn add_device(&self, name: &str, vibrators: usize) -> Arc<MockDevice> {
        let device = Arc::new(MockDevice::new(name, vibrators));
        self.devices.lock().unwrap().push(Arc::clone(&device));
        device
    }

    /// Hub-level actions in call order.
    pub fn actions(&self) -> Vec<HubAction> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceHub for MockHub {
    async fn scan_once(&self) -> Result<()> {
        self.actions.lock().unwrap().push(HubAction::ScanOnce);
        Ok(())
    }

    fn devices(&self) -> Vec<Arc<dyn DeviceHandle>> {
        self.devices
            .lock()
            .unwrap()
            .iter()
            .map(|device| Arc::clone(device) as Arc<dyn DeviceHandle>)
            .collect()
    }

    async fn stop_all(&self) -> Result<()> {
        self.actions.lock().unwrap().push(HubAction::StopAll);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.actions.lock().unwrap().push(HubAction::Disconnect);
        Ok(())
    }
}

/// Mock device recording every vibrate command it receives.
pub struct MockDevice {
    name: String,
    vibrators: usize,
    fail_vibrate: AtomicBool,
    commands: Mutex<Vec<Vec<f64>>>,
}

impl MockDevice {
    pub fn new(name: &str, vibrators: usize) -> Self {
        Self {
            name: name.to_string(),
            vibrators,
            fail_vibrate: AtomicBool::new(false),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Makes every subsequent vibrate call fail.
    pub fn set_fail_vibrate(&self, fail: bool) {
        self.fail_vibrate.store(fail, Ordering::SeqCst);
    }

    /// Every speed vector received so far, in arrival order.
    pub fn commands(&self) -> Vec<Vec<f64>> {
        self.commands.lock().unwrap().clone()
    }

    /// The most recent speed vector, if any command arrived.
    pub fn last_command(&self) -> Option<Vec<f64>> {
        self.commands.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DeviceHandle for MockDevice {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn vibrator_count(&self) -> usize {
        self.vibrators
    }

    async fn vibrate(&self, speeds: &[f64]) -> Result<()> {
        if self.fail_vibrate.load(Ordering::SeqCst) {
            return Err(Error::Vibrate {
                device: self.name.clone(),
                source: anyhow::anyhow!("injected failure"),
            });
        }
        self.commands.lock().unwrap().push(speeds.to_vec());
        Ok(())
    }
}

/// Pixel source fed from a script of colors.
///
/// Each sample pops one scripted color; once the script runs out the last
/// color repeats forever. An empty script fails every sample, standing in
/// for a machine without a capturable screen.
pub struct ScriptedPixels {
    frames: Mutex<VecDeque<Rgb>>,
    last: Mutex<Option<Rgb>>,
    samples: Mutex<Vec<PixelPoint>>,
}

impl ScriptedPixels {
    pub fn new(frames: impl IntoIterator<Item = Rgb>) -> Self {
        Self {
            frames: Mutex::new(frames.into_iter().collect()),
            last: Mutex::new(None),
            samples: Mutex::new(Vec::new()),
        }
    }

    /// A source that always returns `color`.
    pub fn solid(color: Rgb) -> Self {
        Self::new([color])
    }

    /// Points sampled so far.
    pub fn samples(&self) -> Vec<PixelPoint> {
        self.samples.lock().unwrap().clone()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.lock().unwrap().len()
    }
}

impl PixelSource for ScriptedPixels {
    fn sample(&self, point: PixelPoint) -> Result<Rgb> {
        self.samples.lock().unwrap().push(point);
        let mut frames = self.frames.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(color) = frames.pop_front() {
            *last = Some(color);
        }
        last.ok_or_else(|| Error::Sample {
            x: point.x,
            y: point.y,
            source: anyhow::anyhow!("no scripted frames left"),
        })
    }
}
