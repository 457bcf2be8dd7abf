//! Core library for vibectl: console-driven vibration control against a
//! local Intiface/buttplug device server.
//!
//! The protocol client and the screen grab sit behind narrow traits
//! ([`DeviceHub`], [`PixelSource`]); everything this crate owns is the
//! control loop around them: parsing console input, the shared manual/auto
//! state, the red-channel color mapping and the 50 ms sampler task.

pub mod control;
pub mod device;
pub mod error;
pub mod intensity;
pub mod mapping;
pub mod sampler;
pub mod screen;
pub mod state;
pub mod testing;

pub use control::{Command, Controller, Dispatch, InputError, parse_line};
pub use device::{DeviceHandle, DeviceHub, DeviceReport, IntifaceHub, apply_intensity};
pub use error::{Error, Result};
pub use intensity::Intensity;
pub use mapping::{RED_FLOOR, Rgb, map_color};
pub use sampler::{PixelPoint, PixelSource, SAMPLE_INTERVAL, run_sampler};
pub use screen::ScreenSampler;
pub use state::{ControlHandle, ControlState, Mode};
