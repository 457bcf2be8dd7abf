use clap::Parser;

/// Console client for a local Intiface-compatible device server.
///
/// Connects to the server, runs one discovery pass, then reads intensity
/// commands from stdin: a number between 0 and 100 sets the vibration
/// level, `auto` hands control to a screen-pixel sampler, `quit` stops all
/// devices and disconnects.
#[derive(Parser, Debug)]
#[command(name = "vibectl")]
#[command(version)]
#[command(about = "Drive device vibration from the console or a screen pixel")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
