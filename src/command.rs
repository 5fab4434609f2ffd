//! Panel command definitions
//!
//! Command bytes understood by the 1.54 inch 200x200 panel controller.
//! Commands are sent with the D/C line low, their parameters with D/C high.
//!
//! ## Command Structure
//!
//! A command with parameters is framed as a single bus transaction:
//! 1. Assert CS (Chip Select)
//! 2. Set D/C low (command mode)
//! 3. Send command byte
//! 4. Set D/C high (data mode)
//! 5. Send parameter bytes
//! 6. Deassert CS
//!
//! ## Example
//!
//! ```rust,no_run
//! use epd1in54::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::SpiBus;
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//! // VCOM register
//! let _ = interface.send_command_with_data(command::WRITE_VCOM, &[0xA8]);
//!
//! // Deep sleep
//! let _ = interface.send_command_with_data(command::DEEP_SLEEP, &[0x01]);
//! ```

// System control commands

/// Driver output control command (0x01)
///
/// Sets the number of gate outputs (rows) and scanning direction.
/// Requires 3 bytes: [rows-1 (LSB), rows-1 (MSB), scanning mode]
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;

/// Booster soft-start control command (0x0C)
///
/// Requires 3 bytes for this controller.
pub const BOOSTER_SOFT_START: u8 = 0x0C;

/// Write VCOM command (0x2C)
///
/// Sets the VCOM voltage for the common electrode.
/// Requires 1 byte.
pub const WRITE_VCOM: u8 = 0x2C;

/// Dummy line period command (0x3A)
///
/// Requires 1 byte (number of dummy lines per gate).
pub const DUMMY_LINE_PERIOD: u8 = 0x3A;

/// Gate line width command (0x3B)
///
/// Requires 1 byte (gate time per line).
pub const GATE_TIME: u8 = 0x3B;

/// Write LUT command (0x32)
///
/// Loads the waveform lookup table. Requires 30 bytes.
pub const WRITE_LUT: u8 = 0x32;

// RAM and data commands

/// Data entry mode command (0x11)
///
/// Controls the address counter auto-increment direction.
/// - Bit 0 (ID0): X direction (0=decrement, 1=increment)
/// - Bit 1 (ID1): Y direction (0=decrement, 1=increment)
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// Set RAM X address range command (0x44)
///
/// Requires 2 bytes: [start, end], both in units of 8 pixels.
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// Set RAM Y address range command (0x45)
///
/// Requires 4 bytes: [start_LSB, start_MSB, end_LSB, end_MSB]
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// Set RAM X address counter command (0x4E)
///
/// Requires 1 byte, in units of 8 pixels.
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y address counter command (0x4F)
///
/// Requires 2 bytes: [address_LSB, address_MSB]
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

/// Write RAM command (0x24)
///
/// Streams pixel data into frame memory at the address counter.
/// Bit=0: Black, Bit=1: White
pub const WRITE_RAM: u8 = 0x24;

// Display update commands

/// Display update control 2 command (0x22)
///
/// Requires 1 byte selecting the update sequence.
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

/// Master activation command (0x20)
///
/// Triggers the display update sequence. BUSY goes high during update.
pub const MASTER_ACTIVATION: u8 = 0x20;

/// Terminate frame read / NOP command (0xFF)
pub const TERMINATE_FRAME_READ: u8 = 0xFF;

// Power management commands

/// Deep sleep command (0x10)
///
/// Enters ultra-low power mode. Only a hardware reset can wake the panel.
/// Requires 1 byte: 0x01 = enter deep sleep
pub const DEEP_SLEEP: u8 = 0x10;

// Fixed parameter values

/// Booster soft-start parameters
pub const BOOSTER_SOFT_START_VALUES: [u8; 3] = [0xD7, 0xD6, 0x9D];
/// VCOM register value
pub const VCOM_VALUE: u8 = 0xA8;
/// 4 dummy lines per gate
pub const DUMMY_LINE_VALUE: u8 = 0x1A;
/// 2us per line
pub const GATE_TIME_VALUE: u8 = 0x08;
/// X increment, Y increment
pub const DATA_ENTRY_X_INC_Y_INC: u8 = 0x03;
/// Update sequence: enable clock and analog, display pattern
pub const DISPLAY_UPDATE_SEQUENCE: u8 = 0xC4;
/// Deep sleep mode 1
pub const DEEP_SLEEP_MODE_1: u8 = 0x01;
