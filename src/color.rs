//! Color type for monochrome e-paper panels
//!
//! This module defines the [`Color`] enum for the two states a bistable
//! black/white panel can show.
//!
//! ## Color Representation
//!
//! Each pixel is a single bit in the frame memory:
//!
//! | Color | Bit | Fill byte |
//! |-------|-----|-----------|
//! | Black | 0   | 0x00      |
//! | White | 1   | 0xFF      |
//!
//! ## Example
//!
//! ```
//! use epd1in54::Color;
//!
//! assert_eq!(Color::Black.byte(), 0x00);
//! assert_eq!(Color::White.byte(), 0xFF);
//! ```

/// Colors supported by monochrome e-paper panels
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    /// Black pixels (bit cleared)
    Black,
    /// White pixels (bit set)
    White,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    /// `On` draws ink (black), `Off` leaves paper (white).
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::White,
        }
    }
}

impl Color {
    /// Get the byte value that fills 8 pixels of this color
    ///
    /// This mapping is fixed by the controller:
    /// - Black: 0x00 (all bits 0)
    /// - White: 0xFF (all bits 1)
    pub fn byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }

    /// Whether this color is stored as a set bit
    pub fn is_set(self) -> bool {
        self == Self::White
    }

    /// Decode a single frame-memory bit
    pub fn from_bit(set: bool) -> Self {
        if set { Self::White } else { Self::Black }
    }
}
