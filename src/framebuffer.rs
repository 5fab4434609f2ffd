//! Packed 1-bit framebuffer
//!
//! One bit per pixel, row-major, most significant bit first:
//!
//! ```text
//! bit  = y * width + x
//! byte = bit / 8
//! mask = 0x80 >> (bit % 8)
//! ```
//!
//! A set bit is white, a cleared bit is black. Coordinates passed in are
//! logical (after rotation); storage is always laid out in physical panel
//! order so [`as_bytes`](Framebuffer::as_bytes) can go straight to the panel.

use crate::color::Color;
use crate::config::{BuilderError, Rotation};
use crate::rotation::{logical_size, to_physical};

/// Bytes needed to hold a `width` x `height` image
pub const fn buffer_size(width: u16, height: u16) -> usize {
    (width as usize * height as usize).div_ceil(8)
}

/// 1-bit framebuffer over caller-provided storage
///
/// ## Type Parameters
///
/// * `B` - Storage, e.g. `[u8; N]` or `Vec<u8>`
///
/// ## Example
///
/// ```
/// use epd1in54::{Color, Framebuffer, Rotation, BUFFER_SIZE};
///
/// let mut fb = Framebuffer::new([0xFFu8; BUFFER_SIZE], 200, 200, Rotation::Rotate0);
/// fb.set_pixel(0, 0, Color::Black);
/// assert_eq!(fb.as_bytes()[0], 0x7F);
/// assert_eq!(fb.get_pixel(0, 0), Some(Color::Black));
/// ```
pub struct Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Packed pixel storage
    buffer: B,
    /// Physical width
    width: u16,
    /// Physical height
    height: u16,
    /// Logical to physical mapping
    rotation: Rotation,
}

impl<B> Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Create a framebuffer over `buffer`
    ///
    /// `width` and `height` are the physical panel dimensions. Existing
    /// contents of `buffer` are kept.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is smaller than [`buffer_size`]`(width, height)`.
    pub fn new(buffer: B, width: u16, height: u16, rotation: Rotation) -> Self {
        let required = buffer_size(width, height);
        assert!(
            buffer.as_ref().len() >= required,
            "framebuffer too small: required {} bytes, got {}",
            required,
            buffer.as_ref().len()
        );
        Self {
            buffer,
            width,
            height,
            rotation,
        }
    }

    /// Try to create a framebuffer, returning an error if `buffer` is too small
    ///
    /// This is the fallible version of [`new`](Self::new).
    pub fn try_new(
        buffer: B,
        width: u16,
        height: u16,
        rotation: Rotation,
    ) -> Result<Self, BuilderError> {
        let required = buffer_size(width, height);
        if buffer.as_ref().len() < required {
            return Err(BuilderError::BufferTooSmall {
                required,
                provided: buffer.as_ref().len(),
            });
        }
        Ok(Self {
            buffer,
            width,
            height,
            rotation,
        })
    }

    /// Logical width (swapped with height for 90° and 270°)
    pub fn width(&self) -> u16 {
        logical_size(self.width, self.height, self.rotation).0
    }

    /// Logical height
    pub fn height(&self) -> u16 {
        logical_size(self.width, self.height, self.rotation).1
    }

    /// Physical panel width
    pub fn physical_width(&self) -> u16 {
        self.width
    }

    /// Physical panel height
    pub fn physical_height(&self) -> u16 {
        self.height
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Packed bytes in physical panel order
    ///
    /// Only the first [`buffer_size`] bytes are covered by pixels.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[..buffer_size(self.width, self.height)]
    }

    /// Release the storage
    pub fn release(self) -> B {
        self.buffer
    }

    /// Locate a logical pixel; `None` when off the panel
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        let (w, h) = (i32::from(self.width()), i32::from(self.height()));
        if x < 0 || y < 0 || x >= w || y >= h {
            return None;
        }
        let (px, py) = to_physical(x, y, self.width, self.height, self.rotation);
        let bit = py as usize * usize::from(self.width) + px as usize;
        Some((bit / 8, 0x80 >> (bit % 8)))
    }

    /// Set one pixel; ignored outside the panel
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        let Some((index, mask)) = self.locate(x, y) else {
            return;
        };
        let byte = &mut self.buffer.as_mut()[index];
        if color.is_set() {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Read one pixel back; `None` outside the panel
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (index, mask) = self.locate(x, y)?;
        Some(Color::from_bit(self.buffer.as_ref()[index] & mask != 0))
    }

    /// Fill every pixel with `color`
    pub fn fill(&mut self, color: Color) {
        let len = buffer_size(self.width, self.height);
        self.buffer.as_mut()[..len].fill(color.byte());
    }
}
