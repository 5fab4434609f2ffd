//! Look-Up Tables for refresh modes
//!
//! Waveform tables uploaded with [`WRITE_LUT`](crate::command::WRITE_LUT)
//! during [`init`](crate::PanelDriver::init). The panel only ever holds one of
//! them at a time, so switching refresh mode means re-running `init`.

use crate::display::RefreshMode;

/// LUT size required by the controller
pub const LUT_SIZE: usize = 30;

/// Full refresh waveform
///
/// Drives every pixel through several black/white phases. Slow, clears ghosting.
pub const LUT_FULL_UPDATE: [u8; LUT_SIZE] = [
    0x02, 0x02, 0x01, 0x11, 0x12, 0x12, 0x22, 0x22, 0x66, 0x69, 0x69, 0x59, 0x58, 0x99, 0x99,
    0x88, 0x00, 0x00, 0x00, 0x00, 0xF8, 0xB4, 0x13, 0x51, 0x35, 0x51, 0x51, 0x19, 0x01, 0x00,
];

/// Partial refresh waveform
///
/// Single short phase that only moves changed pixels. Fast, accumulates ghosting.
pub const LUT_PARTIAL_UPDATE: [u8; LUT_SIZE] = [
    0x10, 0x18, 0x18, 0x08, 0x18, 0x18, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x13, 0x14, 0x44, 0x12, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Select the waveform table for a refresh mode
pub fn for_mode(mode: RefreshMode) -> &'static [u8; LUT_SIZE] {
    match mode {
        RefreshMode::Full => &LUT_FULL_UPDATE,
        RefreshMode::Partial => &LUT_PARTIAL_UPDATE,
    }
}
