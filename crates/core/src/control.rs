//! Console command parsing and dispatch.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::device::{DeviceHub, DeviceReport, apply_intensity};
use crate::intensity::Intensity;
use crate::sampler::{PixelPoint, PixelSource, run_sampler};
use crate::state::{ControlHandle, ControlState};

/// One parsed line of console input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Manual intensity, already validated and normalized.
    Level(Intensity),
    /// Hand control to the screen-pixel sampler.
    Auto,
    /// Leave the loop, stop every device and disconnect.
    Quit,
}

/// Locally recoverable input problems. The loop prints these and re-prompts
/// without touching state or devices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid input. Please enter a number between 0 and 100, 'auto', or 'quit'.")]
    NotANumber,
    #[error("Invalid value. Please enter a number between 0 and 100.")]
    OutOfRange,
}

/// Parses one console line.
///
/// `auto` and `quit` are matched case-insensitively after trimming;
/// anything else must parse as a number in `[0, 100]`.
pub fn parse_line(line: &str) -> std::result::Result<Command, InputError> {
    let input = line.trim();
    if input.eq_ignore_ascii_case("auto") {
        return Ok(Command::Auto);
    }
    if input.eq_ignore_ascii_case("quit") {
        return Ok(Command::Quit);
    }
    let value: f64 = input.parse().map_err(|_| InputError::NotANumber)?;
    Intensity::from_percent(value)
        .map(Command::Level)
        .map_err(|_| InputError::OutOfRange)
}

/// Result of dispatching one command.
#[derive(Debug)]
pub enum Dispatch {
    /// The command was applied; `reports` carries per-device outcomes.
    Applied {
        state: ControlState,
        auto_started: bool,
        reports: Vec<DeviceReport>,
    },
    /// The session was shut down.
    Quit,
}

/// Owns the control state and the at-most-one sampler task.
pub struct Controller {
    hub: Arc<dyn DeviceHub>,
    source: Arc<dyn PixelSource>,
    point: PixelPoint,
    state: ControlHandle,
    sampler: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new(hub: Arc<dyn DeviceHub>, source: Arc<dyn PixelSource>, point: PixelPoint) -> Self {
        Self {
            hub,
            source,
            point,
            state: ControlHandle::new(),
            sampler: None,
        }
    }

    /// Snapshot of the shared control state.
    pub fn state(&self) -> ControlState {
        self.state.snapshot()
    }

    /// True while a sampler task is alive.
    pub fn sampler_running(&self) -> bool {
        self.sampler
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Applies one console command.
    ///
    /// Level and Auto both end with a foreground pass over the devices so
    /// the console can report what was sent; in auto mode the sampler keeps
    /// going in the background afterwards.
    pub async fn dispatch(&mut self, command: Command) -> Dispatch {
        match command {
            Command::Level(intensity) => {
                self.state.set_manual(intensity);
                let reports = apply_intensity(self.hub.as_ref(), intensity).await;
                Dispatch::Applied {
                    state: self.state.snapshot(),
                    auto_started: false,
                    reports,
                }
            }
            Command::Auto => {
                self.state.enter_auto();
                let auto_started = self.ensure_sampler();
                let intensity = self.state.snapshot().intensity;
                let reports = apply_intensity(self.hub.as_ref(), intensity).await;
                Dispatch::Applied {
                    state: self.state.snapshot(),
                    auto_started,
                    reports,
                }
            }
            Command::Quit => {
                self.shutdown().await;
                Dispatch::Quit
            }
        }
    }

    /// Spawns the sampler unless one is already running.
    fn ensure_sampler(&mut self) -> bool {
        if self.sampler_running() {
            return false;
        }
        let task = tokio::spawn(run_sampler(
            Arc::clone(&self.hub),
            Arc::clone(&self.source),
            self.point,
            self.state.clone(),
        ));
        self.sampler = Some(task);
        true
    }

    /// Winds the sampler down, stops every device and disconnects.
    ///
    /// Failures past this point are logged rather than surfaced; the
    /// session is over either way.
    async fn shutdown(&mut self) {
        self.state.set_manual(Intensity::ZERO);
        if let Some(task) = self.sampler.take() {
            if let Err(err) = task.await {
                debug!(target = "vibectl", error = %err, "sampler join failed");
            }
        }
        if let Err(err) = self.hub.stop_all().await {
            warn!(target = "vibectl", error = %err, "stop-all on shutdown failed");
        }
        if let Err(err) = self.hub.disconnect().await {
            warn!(target = "vibectl", error = %err, "disconnect failed");
        }
    }
}
