//! Dirty bounding box
//!
//! Tracks the smallest rectangle, in physical panel coordinates, that covers
//! every point touched since the last reset. Points may lie off the panel;
//! they are kept as-is and only clamped when a transfer window is derived.

use crate::panel::Window;

/// Bounding box of drawn points
///
/// After [`reset`](Self::reset) the box holds `min = panel extent, max = 0`,
/// which [`is_valid`](Self::is_valid) reports as empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyBox {
    /// Smallest x seen
    pub min_x: i32,
    /// Smallest y seen
    pub min_y: i32,
    /// Largest x seen
    pub max_x: i32,
    /// Largest y seen
    pub max_y: i32,
    width: u16,
    height: u16,
}

impl DirtyBox {
    /// Create an empty box for a `width` x `height` panel
    pub fn new(width: u16, height: u16) -> Self {
        let mut dirty = Self {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            width,
            height,
        };
        dirty.reset();
        dirty
    }

    /// Forget every tracked point
    pub fn reset(&mut self) {
        self.min_x = i32::from(self.width);
        self.min_y = i32::from(self.height);
        self.max_x = 0;
        self.max_y = 0;
    }

    /// Grow the box to cover `(x, y)`
    pub fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Whether any point has been included since the last reset
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// `(max_x - min_x, max_y - min_y)`, or `None` for an empty box
    ///
    /// Saturates at `i32::MAX` for boxes spanning extreme coordinates.
    pub fn size(&self) -> Option<(i32, i32)> {
        self.is_valid().then(|| {
            (
                self.max_x.saturating_sub(self.min_x),
                self.max_y.saturating_sub(self.min_y),
            )
        })
    }

    /// Part of the box that lies on the panel, as an inclusive window
    ///
    /// `None` if the box is empty or entirely off the panel.
    pub fn window(&self) -> Option<Window> {
        if !self.is_valid() {
            return None;
        }
        let last_x = i32::from(self.width) - 1;
        let last_y = i32::from(self.height) - 1;
        let x_start = self.min_x.max(0);
        let y_start = self.min_y.max(0);
        let x_end = self.max_x.min(last_x);
        let y_end = self.max_y.min(last_y);
        if x_start > x_end || y_start > y_end {
            return None;
        }
        Some(Window::new(
            x_start as u16,
            y_start as u16,
            x_end as u16,
            y_end as u16,
        ))
    }
}
