//! Error types for vibectl-core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The device server could not be reached or rejected the handshake.
    #[error("connection to {endpoint} failed")]
    Connect {
        endpoint: String,
        #[source]
        source: anyhow::Error,
    },

    /// A discovery pass could not be started or stopped.
    #[error("device scan failed")]
    Scan(#[source] anyhow::Error),

    /// A vibrate command was not accepted by one device.
    #[error("vibrate command to {device} failed")]
    Vibrate {
        device: String,
        #[source]
        source: anyhow::Error,
    },

    /// The server rejected the stop-all-devices request.
    #[error("stop-all command failed")]
    Stop(#[source] anyhow::Error),

    /// Tearing the connection down failed.
    #[error("disconnect failed")]
    Disconnect(#[source] anyhow::Error),

    /// The screen could not be opened for capture at all.
    #[error("screen capture unavailable")]
    Screen(#[source] anyhow::Error),

    /// Reading one pixel failed.
    #[error("pixel sample at ({x}, {y}) failed")]
    Sample {
        x: i32,
        y: i32,
        #[source]
        source: anyhow::Error,
    },

    /// An intensity was built from a value outside its accepted range.
    #[error("intensity value {0} out of range")]
    IntensityRange(f64),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
