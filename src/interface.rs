//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for framing commands and data onto the panel's 4-wire serial bus.
//!
//! ## Hardware Requirements
//!
//! The panel requires:
//! - SPI bus (MOSI + SCK), MSB first, mode 0
//! - 4 GPIO pins:
//!   - **CS**: Chip select (output, active low)
//!   - **DC**: Data/Command select (output, low=command, high=data)
//!   - **RST**: Reset (output, active low)
//!   - **BUSY**: Busy status (input, active high)
//!
//! Chip select is driven by the interface itself rather than by an
//! [`SpiDevice`](embedded_hal::spi::SpiDevice), because a command with
//! parameters must toggle D/C while CS stays asserted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::SpiBus;
//! use epd1in54::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! # let mut delay = MockDelay;
//! // SPI bus, then CS, DC, RST and BUSY pins
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin, MockPin);
//!
//! // Command with parameters, one CS window
//! let _ = interface.send_command_with_data(0x2C, &[0xA8]);
//!
//! // Wait for display ready
//! let _ = interface.busy_wait(&mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Reset line hold time in milliseconds, used for each phase of the pulse
pub const RESET_DELAY_MS: u32 = 100;

/// Busy line poll interval in milliseconds
pub const BUSY_POLL_INTERVAL_MS: u32 = 1;

/// Default timeout for busy-wait in milliseconds (0 = wait forever)
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 0;

/// Chunk size used when streaming a repeated byte
const REPEAT_CHUNK: usize = 64;

/// Trait for the bus transport to the panel controller
///
/// Every method is one complete bus transaction: chip select is asserted
/// before the D/C line is set and released after the last byte is clocked out.
/// Transactions never interleave because each call takes `&mut self`.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Implement this trait
/// on your own type for different pin polarities or a transport that is not SPI.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a single command byte (D/C low)
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes (D/C high) in one transaction
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Send a command followed by its parameter bytes
    ///
    /// Chip select stays asserted for the whole exchange; D/C goes low for the
    /// command byte and high for the parameters.
    fn send_command_with_data(
        &mut self,
        command: u8,
        data: &[u8],
    ) -> InterfaceResult<(), Self::Error>;

    /// Send `count` copies of `value` as data
    ///
    /// The default implementation issues one [`send_data`](Self::send_data)
    /// per chunk.
    fn send_data_repeated(&mut self, value: u8, count: usize) -> InterfaceResult<(), Self::Error> {
        let chunk = [value; REPEAT_CHUNK];
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(REPEAT_CHUNK);
            self.send_data(&chunk[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Perform hardware reset
    ///
    /// The implementation must:
    /// 1. Set RST pin high, wait
    /// 2. Set RST pin low, wait
    /// 3. Set RST pin high, wait
    fn reset<D: DelayNs>(&mut self, delay: &mut D);

    /// Wait for the busy pin to go low
    ///
    /// Polls the BUSY pin every millisecond until the panel reports idle.
    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
    /// Timeout waiting for busy pin (only when a timeout is configured)
    Timeout,
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for display"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface over an SPI bus and four GPIO lines
///
/// Pin roles are bound at construction and cannot be rebound.
///
/// ## Type Parameters
///
/// * `SPI` - SPI bus implementing [`SpiBus`]
/// * `CS` - Chip select pin implementing [`OutputPin`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BUSY` - Busy pin implementing [`InputPin`]
pub struct Interface<SPI, CS, DC, RST, BUSY> {
    /// SPI bus for communication
    spi: SPI,
    /// Chip select pin (active low)
    cs: CS,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Busy pin (active high)
    busy: BUSY,
    /// Timeout for busy-wait in milliseconds, 0 disables it
    busy_timeout_ms: u32,
}

impl<SPI, CS, DC, RST, BUSY, PinErr> Interface<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    CS: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
{
    /// Create a new Interface
    ///
    /// Chip select is released immediately so the panel ignores the bus until
    /// the first transaction.
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus (must implement [`SpiBus`])
    /// * `cs` - Chip select pin (output, active low)
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `busy` - Busy pin (input, active high)
    pub fn new(spi: SPI, mut cs: CS, dc: DC, mut rst: RST, busy: BUSY) -> Self {
        let _ = cs.set_high();
        let _ = rst.set_high();
        Self {
            spi,
            cs,
            dc,
            rst,
            busy,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// Default is 0, which waits for as long as the panel stays busy.
    pub fn set_busy_timeout(&mut self, timeout_ms: u32) -> &mut Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Get the current busy-wait timeout in milliseconds
    pub fn busy_timeout(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, CS, DC, RST, BUSY) {
        (self.spi, self.cs, self.dc, self.rst, self.busy)
    }

    /// Run `body` with chip select asserted
    ///
    /// The bus is flushed before CS is released. CS is released even when
    /// `body` fails; the first error wins.
    fn transaction<F>(&mut self, body: F) -> InterfaceResult<(), InterfaceError<SPI::Error, PinErr>>
    where
        F: FnOnce(&mut SPI, &mut DC) -> InterfaceResult<(), InterfaceError<SPI::Error, PinErr>>,
    {
        self.cs.set_low().map_err(InterfaceError::Pin)?;
        let result = body(&mut self.spi, &mut self.dc)
            .and_then(|()| self.spi.flush().map_err(InterfaceError::Spi));
        let released = self.cs.set_high().map_err(InterfaceError::Pin);
        result.and(released)
    }
}

impl<SPI, CS, DC, RST, BUSY, PinErr> DisplayInterface for Interface<SPI, CS, DC, RST, BUSY>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    CS: OutputPin<Error = PinErr>,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BUSY: InputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.transaction(|spi, dc| {
            dc.set_low().map_err(InterfaceError::Pin)?;
            spi.write(&[command]).map_err(InterfaceError::Spi)
        })
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.transaction(|spi, dc| {
            dc.set_high().map_err(InterfaceError::Pin)?;
            spi.write(data).map_err(InterfaceError::Spi)
        })
    }

    fn send_command_with_data(
        &mut self,
        command: u8,
        data: &[u8],
    ) -> InterfaceResult<(), Self::Error> {
        self.transaction(|spi, dc| {
            dc.set_low().map_err(InterfaceError::Pin)?;
            spi.write(&[command]).map_err(InterfaceError::Spi)?;
            // D/C is sampled with the last bit of the command byte
            spi.flush().map_err(InterfaceError::Spi)?;
            dc.set_high().map_err(InterfaceError::Pin)?;
            spi.write(data).map_err(InterfaceError::Spi)
        })
    }

    fn send_data_repeated(&mut self, value: u8, count: usize) -> InterfaceResult<(), Self::Error> {
        let chunk = [value; REPEAT_CHUNK];
        self.transaction(|spi, dc| {
            dc.set_high().map_err(InterfaceError::Pin)?;
            let mut remaining = count;
            while remaining > 0 {
                let n = remaining.min(REPEAT_CHUNK);
                spi.write(&chunk[..n]).map_err(InterfaceError::Spi)?;
                remaining -= n;
            }
            Ok(())
        })
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        let _ = self.rst.set_high();
        delay.delay_ms(RESET_DELAY_MS);
        let _ = self.rst.set_low();
        delay.delay_ms(RESET_DELAY_MS);
        let _ = self.rst.set_high();
        delay.delay_ms(RESET_DELAY_MS);
    }

    fn busy_wait<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        let mut waited_ms = 0u32;
        let timeout_ms = self.busy_timeout_ms;

        while self.busy.is_high().map_err(InterfaceError::Pin)? {
            delay.delay_ms(BUSY_POLL_INTERVAL_MS);
            waited_ms = waited_ms.saturating_add(BUSY_POLL_INTERVAL_MS);
            if timeout_ms > 0 && waited_ms >= timeout_ms {
                log::warn!("busy line still high after {} ms", waited_ms);
                return Err(InterfaceError::Timeout);
            }
        }
        Ok(())
    }
}
