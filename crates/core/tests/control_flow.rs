//! Scenario coverage for the control loop over mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use vibectl_core::testing::{HubAction, MockHub, ScriptedPixels};
use vibectl_core::{Command, Controller, Dispatch, Intensity, Mode, PixelPoint, Rgb, parse_line};

const POINT: PixelPoint = PixelPoint::new(1147, 878);

async fn wait_for(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{what} not reached within 1s");
}

#[tokio::test]
async fn manual_value_reaches_every_capable_device() {
    let hub = Arc::new(MockHub::new());
    let toy = hub.add_device("Test Vibe", 2);
    let plain = hub.add_device("No Motor", 0);
    let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(0, 0, 0)));
    let mut controller = Controller::new(hub, pixels, POINT);

    let command = parse_line("50").unwrap();
    let Dispatch::Applied { state, reports, .. } = controller.dispatch(command).await else {
        panic!("expected an applied dispatch");
    };

    assert_eq!(state.mode, Mode::Manual);
    assert_eq!(state.intensity.value(), 0.5);
    assert_eq!(toy.last_command(), Some(vec![0.5, 0.5]));
    assert!(plain.commands().is_empty());
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().any(|r| r.name == "No Motor" && !r.sent));
}

#[tokio::test]
async fn rejected_input_leaves_state_and_devices_untouched() {
    let hub = Arc::new(MockHub::new());
    let toy = hub.add_device("Test Vibe", 1);
    let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(0, 0, 0)));
    let mut controller = Controller::new(hub.clone(), pixels, POINT);

    controller.dispatch(parse_line("50").unwrap()).await;

    // Parse failures never reach the controller.
    assert!(parse_line("sideways").is_err());
    assert!(parse_line("250").is_err());

    assert_eq!(controller.state().intensity.value(), 0.5);
    assert_eq!(toy.commands().len(), 1);
    assert!(hub.actions().is_empty());
}

#[tokio::test]
async fn auto_spawns_exactly_one_sampler() {
    let hub = Arc::new(MockHub::new());
    hub.add_device("Test Vibe", 1);
    let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(0, 0, 0)));
    let mut controller = Controller::new(hub, pixels, POINT);

    let Dispatch::Applied {
        state,
        auto_started,
        ..
    } = controller.dispatch(Command::Auto).await
    else {
        panic!("expected an applied dispatch");
    };
    assert_eq!(state.mode, Mode::Auto);
    assert!(auto_started);
    assert!(controller.sampler_running());

    let Dispatch::Applied { auto_started, .. } = controller.dispatch(Command::Auto).await else {
        panic!("expected an applied dispatch");
    };
    assert!(!auto_started, "a second auto must not spawn another task");

    controller.dispatch(Command::Quit).await;
}

#[tokio::test]
async fn red_pixel_drives_full_intensity() {
    let hub = Arc::new(MockHub::new());
    let toy = hub.add_device("Test Vibe", 1);
    let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(255, 0, 0)));
    let mut controller = Controller::new(hub, pixels, POINT);

    controller.dispatch(Command::Auto).await;

    wait_for("full intensity", || {
        toy.last_command() == Some(vec![1.0])
    })
    .await;
    assert_eq!(controller.state().intensity, Intensity::MAX);
    assert_eq!(controller.state().mode, Mode::Auto);

    controller.dispatch(Command::Quit).await;
}

#[tokio::test]
async fn non_red_pixel_keeps_the_previous_intensity() {
    let hub = Arc::new(MockHub::new());
    let toy = hub.add_device("Test Vibe", 1);
    let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(0, 5, 0)));
    let mut controller = Controller::new(hub, pixels.clone(), POINT);

    controller.dispatch(parse_line("40").unwrap()).await;
    controller.dispatch(Command::Auto).await;

    wait_for("three sampler cycles", || pixels.sample_count() >= 3).await;

    assert_eq!(controller.state().intensity.value(), 0.4);
    assert!(toy.commands().iter().all(|speeds| speeds == &vec![0.4]));

    controller.dispatch(Command::Quit).await;
}

#[tokio::test]
async fn manual_input_overrides_auto() {
    let hub = Arc::new(MockHub::new());
    let toy = hub.add_device("Test Vibe", 1);
    let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(255, 0, 0)));
    let mut controller = Controller::new(hub, pixels, POINT);

    controller.dispatch(Command::Auto).await;
    wait_for("auto intensity", || toy.last_command() == Some(vec![1.0])).await;

    controller.dispatch(parse_line("20").unwrap()).await;

    assert_eq!(controller.state().mode, Mode::Manual);
    assert_eq!(controller.state().intensity.value(), 0.2);
    wait_for("sampler exit", || !controller.sampler_running()).await;

    // Any cycle that was in flight when the mode flipped committed the
    // manual value, not its own sample.
    assert_eq!(toy.last_command(), Some(vec![0.2]));

    controller.dispatch(Command::Quit).await;
}

#[tokio::test]
async fn quit_stops_devices_and_disconnects() {
    let hub = Arc::new(MockHub::new());
    hub.add_device("Test Vibe", 1);
    let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(255, 0, 0)));
    let mut controller = Controller::new(hub.clone(), pixels, POINT);

    controller.dispatch(Command::Auto).await;
    let outcome = controller.dispatch(Command::Quit).await;

    assert!(matches!(outcome, Dispatch::Quit));
    assert!(!controller.sampler_running());
    assert_eq!(hub.actions(), vec![HubAction::StopAll, HubAction::Disconnect]);
}

#[tokio::test]
async fn failing_device_does_not_block_the_next_one() {
    let hub = Arc::new(MockHub::new());
    let bad = hub.add_device("Flaky", 1);
    let good = hub.add_device("Solid", 1);
    bad.set_fail_vibrate(true);
    let pixels = Arc::new(ScriptedPixels::solid(Rgb::new(0, 0, 0)));
    let mut controller = Controller::new(hub, pixels, POINT);

    let Dispatch::Applied { reports, .. } = controller.dispatch(parse_line("50").unwrap()).await
    else {
        panic!("expected an applied dispatch");
    };

    assert!(!reports[0].sent);
    assert!(reports[0].error.is_some());
    assert!(reports[1].sent);
    assert_eq!(good.last_command(), Some(vec![0.5]));
}
