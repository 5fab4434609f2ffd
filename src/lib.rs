//! 1.54" 200x200 E-Paper Display Driver
//!
//! A driver for 200x200 black/white e-paper panels that picks a full or a
//! partial refresh for every update based on how much of the screen changed.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Dirty region tracking with automatic full/partial refresh selection
//! - Periodic forced full refresh against ghosting
//! - Protocol state checks (no transfers to a sleeping panel)
//! - Rotation support
//! - Diagnostics through the `log` facade
//!
//! ## Layers
//!
//! | Type | Role |
//! |------|------|
//! | [`Interface`] | Command/data framing on an SPI bus with CS, D/C, RST and BUSY pins |
//! | [`Epd1in54`] | Panel protocol: init, LUT upload, windowed frame transfer, refresh, sleep |
//! | [`Framebuffer`] | Packed 1-bit image in panel byte order |
//! | [`AdaptiveDisplay`] | Dirty box tracking and refresh mode selection |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epd1in54::{AdaptiveDisplay, Builder, Color, Epd1in54, Interface, BUFFER_SIZE};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiBus for MockSpi {
//! #     fn read(&mut self, _: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn write(&mut self, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn transfer(&mut self, _: &mut [u8], _: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn transfer_in_place(&mut self, _: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn flush(&mut self) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let (spi, cs, dc, rst, busy) = (MockSpi, MockPin, MockPin, MockPin, MockPin);
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, cs, dc, rst, busy);
//! let config = match Builder::new().refresh_ratio(0.7).full_refresh_interval(10).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = match AdaptiveDisplay::new(Epd1in54::new(interface), [0u8; BUFFER_SIZE], config) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//! let _ = display.clear(Color::White, &mut delay);
//!
//! display.draw_pixel(100, 100, Color::Black);
//! let _ = display.flush(&mut delay);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Color type for monochrome e-paper panels
pub mod color;
/// Controller command definitions
pub mod command;
/// Refresh policy configuration and builder
pub mod config;
/// Dirty bounding box
pub mod dirty;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Packed 1-bit framebuffer
pub mod framebuffer;
/// Hardware interface abstraction
pub mod interface;
/// Look-Up Tables for refresh modes
pub mod lut;
/// Panel driver capability set
pub mod panel;
/// Adaptive refresh policy
pub mod refresh;
/// Coordinate rotation utilities
pub mod rotation;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use color::Color;
pub use config::{
    Builder, Config, DEFAULT_FULL_REFRESH_INTERVAL, DEFAULT_REFRESH_RATIO, Rotation,
};
pub use dirty::DirtyBox;
pub use display::{BUFFER_SIZE, Epd1in54, HEIGHT, PanelState, RefreshMode, WIDTH};
pub use error::{BuilderError, Error};
pub use framebuffer::Framebuffer;
pub use interface::InterfaceError;
pub use interface::{DEFAULT_BUSY_TIMEOUT_MS, DisplayInterface, Interface};
pub use panel::{PanelDriver, Window};
pub use refresh::AdaptiveDisplay;
