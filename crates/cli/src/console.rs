//! Interactive console session: connect, discover, loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use vibectl_core::{
    Command, Controller, DeviceHandle, DeviceHub, Dispatch, IntifaceHub, PixelPoint,
    ScreenSampler, parse_line,
};

/// Fixed local server endpoint.
const SERVER_ENDPOINT: &str = "ws://127.0.0.1:12345";
/// Name this client presents to the server.
const CLIENT_NAME: &str = "vibectl";
/// Screen coordinate the auto sampler watches.
const SAMPLE_POINT: PixelPoint = PixelPoint::new(1147, 878);
/// Pause after each applied command before re-prompting.
const LOOP_DELAY: Duration = Duration::from_secs(1);

pub async fn run() -> vibectl_core::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let hub = match IntifaceHub::connect(SERVER_ENDPOINT, CLIENT_NAME).await {
        Ok(hub) => Arc::new(hub),
        Err(err) => {
            // Connection failure is fatal but not a crash: report, wait for
            // an acknowledging keypress, leave with status 0.
            println!("Can't connect, exiting!");
            println!("Message: {}", root_message(&err));
            wait_for_enter(&mut lines).await?;
            return Ok(());
        }
    };

    println!("Connected!");

    hub.scan_once().await?;
    println!("Client knows about these devices:");
    for device in hub.devices() {
        println!("- {}", device.name());
    }
    wait_for_enter(&mut lines).await?;

    let sampler = Arc::new(ScreenSampler::new());
    let mut controller = Controller::new(hub, sampler, SAMPLE_POINT);

    loop {
        println!("Enter vibration value (0-100), 'auto' for screen control, or 'quit' to exit:");
        let Some(line) = lines.next_line().await? else {
            // stdin closed; shut down as if the user typed quit
            controller.dispatch(Command::Quit).await;
            break;
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match controller.dispatch(command).await {
            Dispatch::Quit => break,
            Dispatch::Applied {
                state,
                auto_started,
                reports,
            } => {
                match command {
                    Command::Auto if auto_started => {
                        println!("Auto mode enabled; following the screen pixel.");
                    }
                    Command::Auto => println!("Auto mode already active."),
                    Command::Level(_) => {
                        println!("Manual vibration intensity set to {}.", state.intensity);
                    }
                    Command::Quit => unreachable!("handled by the quit dispatch"),
                }
                for report in &reports {
                    println!("{} supports vibration: {}", report.name, report.vibrators > 0);
                    if report.sent {
                        println!(
                            "Sent vibration command to {} with intensity {}.",
                            report.name, state.intensity
                        );
                    } else if let Some(error) = &report.error {
                        println!("Could not command {}: {}", report.name, error);
                    }
                }
            }
        }

        tokio::time::sleep(LOOP_DELAY).await;
    }

    println!("Disconnected!");
    Ok(())
}

async fn wait_for_enter(lines: &mut Lines<BufReader<Stdin>>) -> std::io::Result<()> {
    println!("Press enter to continue.");
    lines.next_line().await?;
    Ok(())
}

/// Innermost cause of an error, for user-facing messages.
fn root_message(err: &vibectl_core::Error) -> String {
    let mut cause: &dyn std::error::Error = err;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}
