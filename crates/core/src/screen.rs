//! X11-backed pixel source.
//!
//! One `GetImage` round trip for a 1x1 rectangle on the root window per
//! sample. x11rb speaks the X protocol directly over the socket, so nothing
//! here links against C graphics libraries.

use parking_lot::Mutex;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, ImageFormat, Window};
use x11rb::rust_connection::RustConnection;

use crate::error::{Error, Result};
use crate::mapping::Rgb;
use crate::sampler::{PixelPoint, PixelSource};

/// Samples single pixels from the default X11 screen.
///
/// The display connection is opened lazily on first sample, so manual-only
/// sessions work on machines without one. A failed open is reported per
/// sample and retried on the next tick.
#[derive(Default)]
pub struct ScreenSampler {
    display: Mutex<Option<Display>>,
}

impl ScreenSampler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PixelSource for ScreenSampler {
    fn sample(&self, point: PixelPoint) -> Result<Rgb> {
        let mut guard = self.display.lock();
        match &mut *guard {
            Some(display) => display.fetch(point),
            None => {
                let display = Display::open()?;
                let color = display.fetch(point);
                *guard = Some(display);
                color
            }
        }
    }
}

struct Display {
    conn: RustConnection,
    root: Window,
}

impl Display {
    fn open() -> Result<Self> {
        let (conn, screen_num) =
            x11rb::connect(None).map_err(|err| Error::Screen(err.into()))?;
        let root = conn.setup().roots[screen_num].root;
        Ok(Display { conn, root })
    }

    fn fetch(&self, point: PixelPoint) -> Result<Rgb> {
        let sample_err = |source: anyhow::Error| Error::Sample {
            x: point.x,
            y: point.y,
            source,
        };
        let reply = self
            .conn
            .get_image(
                ImageFormat::Z_PIXMAP,
                self.root,
                point.x as i16,
                point.y as i16,
                1,
                1,
                u32::MAX,
            )
            .map_err(|err| sample_err(err.into()))?
            .reply()
            .map_err(|err| sample_err(err.into()))?;
        // ZPixmap data for the usual little-endian truecolor visuals is BGRx.
        match reply.data.as_slice() {
            [b, g, r, ..] => Ok(Rgb {
                r: *r,
                g: *g,
                b: *b,
            }),
            _ => Err(sample_err(anyhow::anyhow!(
                "GetImage returned {} bytes for a 1x1 rectangle (depth {})",
                reply.data.len(),
                reply.depth
            ))),
        }
    }
}
