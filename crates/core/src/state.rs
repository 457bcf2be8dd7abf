//! Shared control state for the console loop and the auto-sampler task.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::intensity::Intensity;

/// Which input source currently drives the intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Typed console values are authoritative.
    #[default]
    Manual,
    /// The screen sampler is authoritative.
    Auto,
}

/// Snapshot of the authoritative mode and intensity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    pub mode: Mode,
    pub intensity: Intensity,
}

/// Clonable handle to the single control state.
///
/// All mutation goes through this handle, so the console loop and the
/// sampler task never observe a torn mode/intensity pair. The sampler
/// writes through [`apply_sample`](ControlHandle::apply_sample), which
/// commits only while the mode is still [`Mode::Auto`]; a manual value
/// entered while a sampler cycle is in flight therefore always wins.
#[derive(Debug, Clone, Default)]
pub struct ControlHandle {
    inner: Arc<Mutex<ControlState>>,
}

impl ControlHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ControlState {
        *self.inner.lock()
    }

    /// Manual branch: the typed value becomes authoritative and the mode
    /// leaves Auto.
    pub fn set_manual(&self, intensity: Intensity) {
        let mut state = self.inner.lock();
        state.mode = Mode::Manual;
        state.intensity = intensity;
    }

    /// Auto branch: the intensity keeps its last value until the first
    /// sample lands.
    pub fn enter_auto(&self) {
        self.inner.lock().mode = Mode::Auto;
    }

    /// Sampler write: commits `intensity` only while the mode is still
    /// Auto, and returns whatever value is authoritative afterwards.
    pub fn apply_sample(&self, intensity: Intensity) -> Intensity {
        let mut state = self.inner.lock();
        if state.mode == Mode::Auto {
            state.intensity = intensity;
        }
        state.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_manual_at_zero() {
        let handle = ControlHandle::new();
        let state = handle.snapshot();
        assert_eq!(state.mode, Mode::Manual);
        assert_eq!(state.intensity, Intensity::ZERO);
    }

    #[test]
    fn set_manual_updates_mode_and_value() {
        let handle = ControlHandle::new();
        handle.enter_auto();
        handle.set_manual(Intensity::from_percent(25.0).unwrap());
        let state = handle.snapshot();
        assert_eq!(state.mode, Mode::Manual);
        assert_eq!(state.intensity.value(), 0.25);
    }

    #[test]
    fn apply_sample_commits_while_auto() {
        let handle = ControlHandle::new();
        handle.enter_auto();
        let committed = handle.apply_sample(Intensity::from_unit(0.8).unwrap());
        assert_eq!(committed.value(), 0.8);
        assert_eq!(handle.snapshot().intensity.value(), 0.8);
    }

    #[test]
    fn manual_wins_over_an_in_flight_sample() {
        let handle = ControlHandle::new();
        handle.enter_auto();
        handle.set_manual(Intensity::from_percent(25.0).unwrap());

        // A sampler cycle that read the pixel before the mode flipped
        // must not overwrite the manual value.
        let committed = handle.apply_sample(Intensity::MAX);

        assert_eq!(committed.value(), 0.25);
        assert_eq!(handle.snapshot().mode, Mode::Manual);
        assert_eq!(handle.snapshot().intensity.value(), 0.25);
    }
}
