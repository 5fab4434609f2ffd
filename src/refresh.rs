//! Adaptive refresh policy
//!
//! [`AdaptiveDisplay`] owns a panel and a framebuffer, records the region
//! touched by drawing calls, and on [`flush`](AdaptiveDisplay::flush) picks
//! between a full and a partial refresh:
//!
//! - **Full** when the dirty box is wider than the width threshold *and*
//!   taller than the height threshold, or when the configured number of
//!   partial refreshes has been reached.
//! - **Partial** otherwise, transferring only the dirty box widened to whole
//!   bytes.
//!
//! Every refresh ends with the panel asleep; the next flush runs `init` again.
//!
//! ## Example
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use epd1in54::interface::DisplayInterface;
//! # struct MockInterface;
//! # impl DisplayInterface for MockInterface {
//! #     type Error = Infallible;
//! #     fn send_command(&mut self, _: u8) -> Result<(), Infallible> { Ok(()) }
//! #     fn send_data(&mut self, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn send_command_with_data(&mut self, _: u8, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn reset<D: DelayNs>(&mut self, _: &mut D) {}
//! #     fn busy_wait<D: DelayNs>(&mut self, _: &mut D) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! use epd1in54::{AdaptiveDisplay, Builder, Color, Epd1in54, RefreshMode, BUFFER_SIZE};
//!
//! let config = match Builder::new().full_refresh_interval(5).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut display = match AdaptiveDisplay::new(
//!     Epd1in54::new(MockInterface),
//!     [0u8; BUFFER_SIZE],
//!     config,
//! ) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//!
//! display.draw_pixel(10, 10, Color::Black);
//! assert_eq!(display.next_refresh(), Some(RefreshMode::Partial));
//! let _ = display.flush(&mut delay);
//! ```

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::config::{BuilderError, Config};
use crate::dirty::DirtyBox;
use crate::display::RefreshMode;
use crate::framebuffer::Framebuffer;
use crate::panel::{PanelDriver, Window};
use crate::rotation::to_physical;

type RefreshResult<P, T> = core::result::Result<T, <P as PanelDriver>::Error>;

/// Number of clear-and-display cycles run by [`AdaptiveDisplay::clear`]
const CLEAR_PASSES: usize = 2;

/// What the next flush will send
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Plan {
    Full,
    Partial(Window),
}

/// Panel plus framebuffer with automatic full/partial refresh selection
///
/// ## Type Parameters
///
/// * `P` - Panel implementing [`PanelDriver`]
/// * `B` - Framebuffer storage, at least `width * height / 8` bytes
pub struct AdaptiveDisplay<P, B>
where
    P: PanelDriver,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Panel driver
    panel: P,
    /// Drawing surface
    framebuffer: Framebuffer<B>,
    /// Region touched since the last refresh, physical coordinates
    dirty: DirtyBox,
    /// Refresh policy
    config: Config,
    /// Dirty width that must be exceeded for a full refresh
    width_threshold: u16,
    /// Dirty height that must be exceeded for a full refresh
    height_threshold: u16,
    /// Partial refreshes since the last full one
    partial_refreshes: u8,
}

impl<P, B> AdaptiveDisplay<P, B>
where
    P: PanelDriver,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a display over `panel` drawing into `buffer`
    ///
    /// The framebuffer is filled white. The panel is not touched.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::BufferTooSmall` if `buffer` cannot hold the panel.
    pub fn new(panel: P, buffer: B, config: Config) -> Result<Self, BuilderError> {
        let (width, height) = (panel.width(), panel.height());
        let mut framebuffer = Framebuffer::try_new(buffer, width, height, config.rotation)?;
        framebuffer.fill(Color::White);

        let width_threshold = config.threshold(width);
        let height_threshold = config.threshold(height);
        log::debug!(
            "refresh thresholds {width_threshold}x{height_threshold}, full refresh every {} partials",
            config.full_refresh_interval
        );

        Ok(Self {
            panel,
            framebuffer,
            dirty: DirtyBox::new(width, height),
            config,
            width_threshold,
            height_threshold,
            partial_refreshes: 0,
        })
    }

    /// Refresh mode the next [`flush`](Self::flush) will use
    ///
    /// `None` when nothing visible changed and no full refresh is due.
    pub fn next_refresh(&self) -> Option<RefreshMode> {
        self.plan().map(|plan| match plan {
            Plan::Full => RefreshMode::Full,
            Plan::Partial(_) => RefreshMode::Partial,
        })
    }

    fn plan(&self) -> Option<Plan> {
        if self.partial_refreshes >= self.config.full_refresh_interval {
            return Some(Plan::Full);
        }
        let (width, height) = self.dirty.size()?;
        if width > i32::from(self.width_threshold) && height > i32::from(self.height_threshold) {
            return Some(Plan::Full);
        }
        self.dirty.window().map(Plan::Partial)
    }

    /// Send pending changes to the panel
    ///
    /// Runs `init` for the chosen mode, transfers the frame (or the dirty
    /// region), refreshes, and puts the panel to sleep. Returns the mode used,
    /// or `None` without any bus traffic when there was nothing to send.
    ///
    /// On error the dirty box and refresh count are left as they were, so the
    /// same flush can be retried.
    pub fn flush<D: DelayNs>(&mut self, delay: &mut D) -> RefreshResult<P, Option<RefreshMode>> {
        let Some(plan) = self.plan() else {
            log::trace!("flush skipped: nothing on screen changed");
            self.dirty.reset();
            return Ok(None);
        };

        let mode = match plan {
            Plan::Full => {
                log::debug!("full refresh after {} partial", self.partial_refreshes);
                self.panel.init(RefreshMode::Full, delay)?;
                self.panel
                    .set_frame_memory(self.framebuffer.as_bytes(), delay)?;
                RefreshMode::Full
            }
            Plan::Partial(window) => {
                log::debug!("partial refresh of {window:?}");
                self.panel.init(RefreshMode::Partial, delay)?;
                self.panel
                    .set_frame_memory_region(self.framebuffer.as_bytes(), window, delay)?;
                RefreshMode::Partial
            }
        };
        self.panel.display_frame(delay)?;
        self.panel.sleep()?;

        self.partial_refreshes = match mode {
            RefreshMode::Full => 0,
            RefreshMode::Partial => self.partial_refreshes.saturating_add(1),
        };
        self.dirty.reset();
        Ok(Some(mode))
    }

    /// Fill the framebuffer and the panel with `color`
    ///
    /// Runs two clear-and-display cycles to wash out ghosting from the
    /// previous image, then puts the panel to sleep.
    pub fn clear<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> RefreshResult<P, ()> {
        self.clear_buffer(color);
        self.partial_refreshes = 0;

        self.panel.init(RefreshMode::Full, delay)?;
        for _ in 0..CLEAR_PASSES {
            self.panel.clear_frame(color, delay)?;
            self.panel.display_frame(delay)?;
        }
        self.panel.sleep()?;
        log::debug!("panel cleared to {color:?}");
        Ok(())
    }

    /// Clear the panel to black
    pub fn dark_mode<D: DelayNs>(&mut self, delay: &mut D) -> RefreshResult<P, ()> {
        self.clear(Color::Black, delay)
    }

    /// Fill the framebuffer with `color` without touching the panel
    ///
    /// The dirty box is reset, so the next flush only sends what is drawn
    /// afterward.
    pub fn clear_buffer(&mut self, color: Color) {
        self.framebuffer.fill(color);
        self.dirty.reset();
    }

    /// Set one pixel in logical coordinates
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.touch(x, y);
        self.framebuffer.set_pixel(x, y, color);
    }

    /// Grow the dirty box to cover a logical point
    pub(crate) fn touch(&mut self, x: i32, y: i32) {
        let (px, py) = to_physical(
            x,
            y,
            self.framebuffer.physical_width(),
            self.framebuffer.physical_height(),
            self.config.rotation,
        );
        self.dirty.include(px, py);
    }

    #[cfg(feature = "graphics")]
    pub(crate) fn framebuffer_mut(&mut self) -> &mut Framebuffer<B> {
        &mut self.framebuffer
    }

    /// Drawing surface
    pub fn framebuffer(&self) -> &Framebuffer<B> {
        &self.framebuffer
    }

    /// Underlying panel
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Underlying panel, mutably
    ///
    /// Changes made through the panel directly are not tracked.
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Partial refreshes since the last full refresh or clear
    pub fn partial_refresh_count(&self) -> u8 {
        self.partial_refreshes
    }

    /// Region touched since the last refresh, in physical coordinates
    pub fn dirty_box(&self) -> &DirtyBox {
        &self.dirty
    }

    /// `(width, height)` a dirty box must both exceed for a full refresh
    pub fn thresholds(&self) -> (u16, u16) {
        (self.width_threshold, self.height_threshold)
    }

    /// Refresh policy in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Logical width
    pub fn width(&self) -> u16 {
        self.framebuffer.width()
    }

    /// Logical height
    pub fn height(&self) -> u16 {
        self.framebuffer.height()
    }

    /// Release the panel and the framebuffer storage
    pub fn release(self) -> (P, B) {
        (self.panel, self.framebuffer.release())
    }
}
