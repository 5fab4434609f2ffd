//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and panel operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors while constructing configuration or framebuffers
//! - [`Error`] - Runtime errors during panel operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! Argument errors are detected before any bus traffic is issued, so a
//! rejected call leaves the panel exactly as it was.
//!
//! ## Example
//!
//! ```
//! use epd1in54::{Builder, BuilderError};
//!
//! let result = Builder::new().refresh_ratio(1.5).build();
//! assert!(matches!(result, Err(BuilderError::InvalidRefreshRatio)));
//!
//! let result = Builder::new().full_refresh_interval(0).build();
//! assert!(matches!(result, Err(BuilderError::InvalidRefreshInterval)));
//! ```

use crate::display::PanelState;
use crate::interface::DisplayInterface;

/// Errors that can occur when driving the panel
///
/// Generic over the interface type to preserve the specific error type.
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Interface(I::Error),
    /// Image buffer is too small for the panel
    ///
    /// The provided buffer must be at least `width * height / 8` bytes.
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// Invalid frame memory window
    ///
    /// Start must not exceed end, and both ends must lie on the panel.
    InvalidWindow {
        /// First column
        x_start: u16,
        /// First row
        y_start: u16,
        /// Last column
        x_end: u16,
        /// Last row
        y_end: u16,
    },
    /// Operation not allowed in the current panel state
    ///
    /// Frame transfers and refreshes need a prior `init`; after `sleep` the
    /// panel must be initialized again.
    InvalidState(PanelState),
}

impl<I: DisplayInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::BufferTooSmall { required, provided } => f
                .debug_struct("BufferTooSmall")
                .field("required", required)
                .field("provided", provided)
                .finish(),
            Self::InvalidWindow {
                x_start,
                y_start,
                x_end,
                y_end,
            } => f
                .debug_struct("InvalidWindow")
                .field("x_start", x_start)
                .field("y_start", y_start)
                .field("x_end", x_end)
                .field("y_end", y_end)
                .finish(),
            Self::InvalidState(state) => f.debug_tuple("InvalidState").field(state).finish(),
        }
    }
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::InvalidWindow {
                x_start,
                y_start,
                x_end,
                y_end,
            } => {
                write!(
                    f,
                    "Invalid window: x={x_start}..={x_end}, y={y_start}..={y_end}"
                )
            }
            Self::InvalidState(state) => write!(f, "Panel not ready: {state:?}"),
        }
    }
}

impl<I: DisplayInterface> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur before the display is driven.
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Refresh area ratio outside (0, 1]
    InvalidRefreshRatio,
    /// Full refresh interval must be at least 1
    InvalidRefreshInterval,
    /// Framebuffer storage is too small for the requested dimensions
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidRefreshRatio => write!(f, "Refresh ratio must be in (0, 1]"),
            Self::InvalidRefreshInterval => {
                write!(f, "Full refresh interval must be at least 1")
            }
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Framebuffer too small: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
