//! Screen sampling seam and the auto-mode task.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::device::{DeviceHub, apply_intensity};
use crate::error::Result;
use crate::mapping::{Rgb, map_color};
use crate::state::{ControlHandle, Mode};

/// Screen coordinate sampled in auto mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        PixelPoint { x, y }
    }
}

/// Narrow interface over the OS screen-capture call: one pixel, one color.
pub trait PixelSource: Send + Sync {
    fn sample(&self, point: PixelPoint) -> Result<Rgb>;
}

/// Delay between sampler cycles.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the auto-mode sampler until the mode leaves [`Mode::Auto`].
///
/// The mode is checked only at the top of each cycle; an in-flight cycle
/// finishes normally, and the value it commits is whatever
/// [`ControlHandle::apply_sample`] decides is authoritative.
pub async fn run_sampler(
    hub: Arc<dyn DeviceHub>,
    source: Arc<dyn PixelSource>,
    point: PixelPoint,
    state: ControlHandle,
) {
    debug!(target = "vibectl", x = point.x, y = point.y, "sampler started");
    loop {
        if state.snapshot().mode != Mode::Auto {
            break;
        }
        run_cycle(hub.as_ref(), source.as_ref(), point, &state).await;
        tokio::time::sleep(SAMPLE_INTERVAL).await;
    }
    debug!(target = "vibectl", "sampler stopped");
}

/// One sampler cycle: sample, map, commit, fan out to devices.
///
/// A failed sample skips the cycle and keeps the current intensity; the
/// loop retries on the next tick.
pub(crate) async fn run_cycle(
    hub: &dyn DeviceHub,
    source: &dyn PixelSource,
    point: PixelPoint,
    state: &ControlHandle,
) {
    let current = state.snapshot().intensity;
    let color = match source.sample(point) {
        Ok(color) => color,
        Err(err) => {
            warn!(target = "vibectl", error = %err, "pixel sample failed, keeping intensity");
            return;
        }
    };
    let committed = state.apply_sample(map_color(color, current));
    debug!(
        target = "vibectl",
        r = color.r,
        g = color.g,
        b = color.b,
        intensity = committed.value(),
        "auto cycle"
    );
    apply_intensity(hub, committed).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intensity::Intensity;
    use crate::testing::{MockHub, ScriptedPixels};

    #[tokio::test]
    async fn cycle_samples_maps_and_applies() {
        let hub = MockHub::new();
        let toy = hub.add_device("Test Vibe", 2);
        let pixels = ScriptedPixels::solid(Rgb::new(128, 0, 0));
        let state = ControlHandle::new();
        state.enter_auto();

        run_cycle(&hub, &pixels, PixelPoint::new(3, 4), &state).await;

        assert_eq!(pixels.samples(), vec![PixelPoint::new(3, 4)]);
        assert_eq!(
            toy.last_command(),
            Some(vec![128.0 / 255.0, 128.0 / 255.0])
        );
        assert_eq!(state.snapshot().intensity.value(), 128.0 / 255.0);
    }

    #[tokio::test]
    async fn failed_sample_skips_the_cycle() {
        let hub = MockHub::new();
        let toy = hub.add_device("Test Vibe", 1);
        // An empty script fails every sample.
        let pixels = ScriptedPixels::new([]);
        let state = ControlHandle::new();
        state.enter_auto();
        state.apply_sample(Intensity::from_unit(0.7).unwrap());

        run_cycle(&hub, &pixels, PixelPoint::new(0, 0), &state).await;

        assert!(toy.commands().is_empty());
        assert_eq!(state.snapshot().intensity.value(), 0.7);
    }

    #[tokio::test]
    async fn non_signal_color_still_sends_the_held_value() {
        let hub = MockHub::new();
        let toy = hub.add_device("Test Vibe", 1);
        let pixels = ScriptedPixels::solid(Rgb::new(0, 5, 0));
        let state = ControlHandle::new();
        state.enter_auto();
        state.apply_sample(Intensity::from_unit(0.4).unwrap());

        run_cycle(&hub, &pixels, PixelPoint::new(0, 0), &state).await;

        // The mapping is a pass-through but the device still gets commanded
        // with the held value every tick.
        assert_eq!(toy.last_command(), Some(vec![0.4]));
        assert_eq!(state.snapshot().intensity.value(), 0.4);
    }

    #[tokio::test]
    async fn sampler_exits_once_the_mode_leaves_auto() {
        let hub = Arc::new(MockHub::new());
        let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(255, 0, 0)));
        let state = ControlHandle::new();
        state.enter_auto();

        let task = tokio::spawn(run_sampler(
            hub,
            pixels,
            PixelPoint::new(0, 0),
            state.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(30)).await;
        state.set_manual(Intensity::ZERO);

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("sampler did not stop after leaving auto")
            .unwrap();
    }
}
