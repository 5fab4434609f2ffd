//! Coordinate rotation utilities
//!
//! Drawing happens in logical coordinates; the framebuffer and the dirty box
//! work in physical panel coordinates. This module maps one onto the other.
//!
//! ## Rotation Modes
//!
//! - **Rotate0**: Native orientation
//! - **Rotate90**: 90° clockwise, width and height swapped
//! - **Rotate180**: 180° rotation, origin at bottom-right
//! - **Rotate270**: 270° clockwise (or 90° counter-clockwise)
//!
//! Points outside the panel map to points outside the panel, so the same
//! function serves bounds-checked pixel writes and unclipped dirty-box corners.
//!
//! ## Example
//!
//! ```
//! use epd1in54::{rotation::to_physical, Rotation};
//!
//! // On a 200x200 panel the logical origin rotated 90° lands on the top-right column
//! assert_eq!(to_physical(0, 0, 200, 200, Rotation::Rotate90), (199, 0));
//! assert_eq!(to_physical(0, 0, 200, 200, Rotation::Rotate180), (199, 199));
//! ```

use crate::config::Rotation;

/// Map a logical point onto the physical panel
///
/// # Arguments
///
/// * `x`, `y` - Logical coordinates (may lie outside the panel; extreme
///   values saturate and stay outside)
/// * `width`, `height` - Physical (unrotated) panel dimensions
/// * `rotation` - Rotation mode
///
/// # Returns
///
/// The physical `(x, y)` pair.
pub fn to_physical(x: i32, y: i32, width: u16, height: u16, rotation: Rotation) -> (i32, i32) {
    let w = i32::from(width);
    let h = i32::from(height);
    match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => ((w - 1).saturating_sub(y), x),
        Rotation::Rotate180 => ((w - 1).saturating_sub(x), (h - 1).saturating_sub(y)),
        Rotation::Rotate270 => (y, (h - 1).saturating_sub(x)),
    }
}

/// Logical dimensions for a rotation
///
/// Returns `(width, height)` as seen by drawing code.
pub fn logical_size(width: u16, height: u16, rotation: Rotation) -> (u16, u16) {
    if rotation.is_transposed() {
        (height, width)
    } else {
        (width, height)
    }
}
