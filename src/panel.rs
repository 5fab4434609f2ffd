//! Panel driver capability set
//!
//! [`PanelDriver`] is the seam between the refresh policy in
//! [`AdaptiveDisplay`](crate::AdaptiveDisplay) and a concrete panel protocol
//! such as [`Epd1in54`](crate::Epd1in54). Any panel that can load a waveform,
//! accept frame memory and refresh can sit behind it.

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::display::RefreshMode;

/// Rectangle of frame memory in panel coordinates
///
/// Both ends are inclusive: `Window::new(5, 0, 12, 9)` covers columns 5
/// through 12 and rows 0 through 9.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    /// First column
    pub x_start: u16,
    /// First row
    pub y_start: u16,
    /// Last column (inclusive)
    pub x_end: u16,
    /// Last row (inclusive)
    pub y_end: u16,
}

impl Window {
    /// Create a new window from inclusive corners
    pub fn new(x_start: u16, y_start: u16, x_end: u16, y_end: u16) -> Self {
        Self {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    /// Window covering a whole `width` x `height` panel
    pub fn full(width: u16, height: u16) -> Self {
        Self::new(0, 0, width.saturating_sub(1), height.saturating_sub(1))
    }

    /// Whether start does not exceed end and both ends lie on a `width` x `height` panel
    pub fn fits(&self, width: u16, height: u16) -> bool {
        self.x_start <= self.x_end
            && self.y_start <= self.y_end
            && self.x_end < width
            && self.y_end < height
    }

    /// Number of rows covered
    pub fn height(&self) -> u16 {
        self.y_end - self.y_start + 1
    }
}

/// Operations a panel must provide to be driven by the refresh policy
///
/// Frame buffers are packed 1 bit per pixel, row-major, MSB first, with a row
/// stride of `width / 8` bytes.
pub trait PanelDriver {
    /// Error type for panel operations
    type Error: core::fmt::Debug;

    /// Reset the controller and load the waveform for `mode`
    fn init<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> Result<(), Self::Error>;

    /// Write the whole frame buffer into panel memory
    fn set_frame_memory<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        delay: &mut D,
    ) -> Result<(), Self::Error>;

    /// Write the part of a full frame buffer covered by `window`
    ///
    /// Columns are widened to whole bytes; rows are read from `buffer` at the
    /// full panel stride.
    fn set_frame_memory_region<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        window: Window,
        delay: &mut D,
    ) -> Result<(), Self::Error>;

    /// Fill panel memory with a single color
    fn clear_frame<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> Result<(), Self::Error>;

    /// Show panel memory on the glass, blocking until the refresh completes
    fn display_frame<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// Enter deep sleep; a new [`init`](Self::init) is required afterward
    fn sleep(&mut self) -> Result<(), Self::Error>;

    /// Panel width in pixels
    fn width(&self) -> u16;

    /// Panel height in pixels
    fn height(&self) -> u16;
}
