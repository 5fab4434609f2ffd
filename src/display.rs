//! Core display operations
//!
//! [`Epd1in54`] drives the 200x200 panel controller through a
//! [`DisplayInterface`]. It tracks the controller's protocol state so that
//! transfers and refreshes issued out of order are rejected before they reach
//! the bus.
//!
//! ```text
//!                 init(mode)
//!  Uninitialized ------------> Initialized(mode) --display_frame--> Displaying(mode)
//!        |                         ^      |                                |
//!        | sleep                   | init | sleep                          | sleep
//!        v                         |      v                                v
//!      Asleep ---------------------+---- Asleep <--------------------------+
//! ```

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::command::{
    BOOSTER_SOFT_START, BOOSTER_SOFT_START_VALUES, DATA_ENTRY_MODE, DATA_ENTRY_X_INC_Y_INC,
    DEEP_SLEEP, DEEP_SLEEP_MODE_1, DISPLAY_UPDATE_CTRL2, DISPLAY_UPDATE_SEQUENCE,
    DRIVER_OUTPUT_CONTROL, DUMMY_LINE_PERIOD, DUMMY_LINE_VALUE, GATE_TIME, GATE_TIME_VALUE,
    MASTER_ACTIVATION, SET_RAM_X_COUNTER, SET_RAM_X_RANGE, SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE,
    TERMINATE_FRAME_READ, VCOM_VALUE, WRITE_LUT, WRITE_RAM, WRITE_VCOM,
};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::lut;
use crate::panel::{PanelDriver, Window};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Panel width in pixels
pub const WIDTH: u16 = 200;

/// Panel height in pixels
pub const HEIGHT: u16 = 200;

/// Frame buffer size in bytes (1 bit per pixel)
pub const BUFFER_SIZE: usize = WIDTH as usize * HEIGHT as usize / 8;

/// Settle time between the update control write and master activation
const UPDATE_SETTLE_MS: u32 = 10;

/// Refresh mode for display updates
///
/// Selects which waveform table [`init`](PanelDriver::init) loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshMode {
    /// Full refresh (slow, flashes, removes ghosting)
    ///
    /// Best for: first image, large changes, periodic ghost cleanup.
    #[default]
    Full,
    /// Partial refresh (fast, no flash, ghosting builds up)
    ///
    /// Best for: small UI changes.
    Partial,
}

/// Protocol state of the panel controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelState {
    /// No `init` since power-up
    #[default]
    Uninitialized,
    /// Waveform loaded, frame memory may be written
    Initialized(RefreshMode),
    /// At least one refresh completed since the last `init`
    Displaying(RefreshMode),
    /// Deep sleep; only `init` leaves this state
    Asleep,
}

impl PanelState {
    /// Whether frame memory may be written and refreshed
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Initialized(_) | Self::Displaying(_))
    }

    /// Waveform currently loaded, if any
    pub fn mode(self) -> Option<RefreshMode> {
        match self {
            Self::Initialized(mode) | Self::Displaying(mode) => Some(mode),
            Self::Uninitialized | Self::Asleep => None,
        }
    }
}

/// Round a column down to a byte boundary
fn floor_to_byte(x: u16) -> u16 {
    x & !0x07
}

/// Round a column up to a byte boundary
fn ceil_to_byte(x: u16) -> u16 {
    (x + 7) & !0x07
}

/// Driver for the 1.54" 200x200 black/white panel
///
/// Implements [`PanelDriver`]; bring that trait into scope to use it.
///
/// # Example
///
/// ```rust,no_run
/// # use core::convert::Infallible;
/// # use embedded_hal::delay::DelayNs;
/// # use epd1in54::interface::DisplayInterface;
/// # struct MockInterface;
/// # impl DisplayInterface for MockInterface {
/// #     type Error = Infallible;
/// #     fn send_command(&mut self, _: u8) -> Result<(), Infallible> { Ok(()) }
/// #     fn send_data(&mut self, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn send_command_with_data(&mut self, _: u8, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
/// #     fn reset<D: DelayNs>(&mut self, _: &mut D) {}
/// #     fn busy_wait<D: DelayNs>(&mut self, _: &mut D) -> Result<(), Infallible> { Ok(()) }
/// # }
/// # struct MockDelay;
/// # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
/// use epd1in54::{Color, Epd1in54, PanelDriver, RefreshMode, BUFFER_SIZE};
///
/// let mut delay = MockDelay;
/// let mut epd = Epd1in54::new(MockInterface);
///
/// let frame = [Color::White.byte(); BUFFER_SIZE];
/// epd.init(RefreshMode::Full, &mut delay).ok();
/// epd.set_frame_memory(&frame, &mut delay).ok();
/// epd.display_frame(&mut delay).ok();
/// epd.sleep().ok();
/// ```
pub struct Epd1in54<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Controller protocol state
    state: PanelState,
}

impl<I> Epd1in54<I>
where
    I: DisplayInterface,
{
    /// Create a new driver; the panel is not touched until `init`
    pub fn new(interface: I) -> Self {
        Self {
            interface,
            state: PanelState::Uninitialized,
        }
    }

    /// Current protocol state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Get a reference to the interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Get a mutable reference to the interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Release the interface
    pub fn release(self) -> I {
        self.interface
    }

    fn ensure_ready(&self, operation: &str) -> DisplayResult<I> {
        if self.state.is_ready() {
            Ok(())
        } else {
            log::warn!("{operation} rejected: panel is {:?}", self.state);
            Err(Error::InvalidState(self.state))
        }
    }

    fn check_buffer(buffer: &[u8]) -> DisplayResult<I> {
        if buffer.len() < BUFFER_SIZE {
            log::warn!(
                "frame buffer too small: {} of {BUFFER_SIZE} bytes",
                buffer.len()
            );
            return Err(Error::BufferTooSmall {
                required: BUFFER_SIZE,
                provided: buffer.len(),
            });
        }
        Ok(())
    }

    /// Program the RAM address window; x values are pixel columns
    fn set_window(&mut self, window: Window) -> DisplayResult<I> {
        let x_range = [(window.x_start >> 3) as u8, (window.x_end >> 3) as u8];
        self.send_command_with_data(SET_RAM_X_RANGE, &x_range)?;
        let [ys_lo, ys_hi] = window.y_start.to_le_bytes();
        let [ye_lo, ye_hi] = window.y_end.to_le_bytes();
        self.send_command_with_data(SET_RAM_Y_RANGE, &[ys_lo, ys_hi, ye_lo, ye_hi])
    }

    /// Move the RAM address counter and wait for the controller to settle
    fn set_cursor<D: DelayNs>(&mut self, x: u16, y: u16, delay: &mut D) -> DisplayResult<I> {
        self.send_command_with_data(SET_RAM_X_COUNTER, &[(x >> 3) as u8])?;
        self.send_command_with_data(SET_RAM_Y_COUNTER, &y.to_le_bytes())?;
        self.interface.busy_wait(delay).map_err(Error::Interface)
    }

    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }

    fn send_command_with_data(&mut self, cmd: u8, data: &[u8]) -> DisplayResult<I> {
        self.interface
            .send_command_with_data(cmd, data)
            .map_err(Error::Interface)
    }
}

impl<I> PanelDriver for Epd1in54<I>
where
    I: DisplayInterface,
{
    type Error = Error<I>;

    fn init<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> DisplayResult<I> {
        self.interface.reset(delay);

        let [rows_lo, rows_hi] = (HEIGHT - 1).to_le_bytes();
        self.send_command_with_data(DRIVER_OUTPUT_CONTROL, &[rows_lo, rows_hi, 0x00])?;
        self.send_command_with_data(BOOSTER_SOFT_START, &BOOSTER_SOFT_START_VALUES)?;
        self.send_command_with_data(WRITE_VCOM, &[VCOM_VALUE])?;
        self.send_command_with_data(DUMMY_LINE_PERIOD, &[DUMMY_LINE_VALUE])?;
        self.send_command_with_data(GATE_TIME, &[GATE_TIME_VALUE])?;
        self.send_command_with_data(DATA_ENTRY_MODE, &[DATA_ENTRY_X_INC_Y_INC])?;
        self.send_command_with_data(WRITE_LUT, lut::for_mode(mode))?;

        self.state = PanelState::Initialized(mode);
        log::debug!("panel initialized for {mode:?} refresh");
        Ok(())
    }

    fn set_frame_memory<D: DelayNs>(&mut self, buffer: &[u8], delay: &mut D) -> DisplayResult<I> {
        self.ensure_ready("set_frame_memory")?;
        Self::check_buffer(buffer)?;

        self.set_window(Window::full(WIDTH, HEIGHT))?;
        self.set_cursor(0, 0, delay)?;
        self.send_command(WRITE_RAM)?;
        self.send_data(&buffer[..BUFFER_SIZE])?;
        log::trace!("full frame written");
        Ok(())
    }

    fn set_frame_memory_region<D: DelayNs>(
        &mut self,
        buffer: &[u8],
        window: Window,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.ensure_ready("set_frame_memory_region")?;
        Self::check_buffer(buffer)?;
        if !window.fits(WIDTH, HEIGHT) {
            log::warn!("window rejected: {window:?}");
            return Err(Error::InvalidWindow {
                x_start: window.x_start,
                y_start: window.y_start,
                x_end: window.x_end,
                y_end: window.y_end,
            });
        }

        // Exclusive column end, widened to whole bytes
        let x0 = floor_to_byte(window.x_start);
        let x1 = ceil_to_byte(window.x_end + 1);
        let stride = usize::from(WIDTH / 8);
        let line_size = usize::from((x1 - x0) / 8);

        self.set_window(Window::new(x0, window.y_start, x1 - 1, window.y_end))?;
        self.set_cursor(x0, window.y_start, delay)?;
        self.send_command(WRITE_RAM)?;

        let mut offset = usize::from(window.y_start) * stride + usize::from(x0 / 8);
        for _ in 0..window.height() {
            self.send_data(&buffer[offset..offset + line_size])?;
            offset += stride;
        }
        log::trace!(
            "region written: columns {x0}..{x1}, rows {}..={}",
            window.y_start,
            window.y_end
        );
        Ok(())
    }

    fn clear_frame<D: DelayNs>(&mut self, color: Color, delay: &mut D) -> DisplayResult<I> {
        self.ensure_ready("clear_frame")?;

        self.set_window(Window::full(WIDTH, HEIGHT))?;
        self.set_cursor(0, 0, delay)?;
        self.send_command(WRITE_RAM)?;
        self.interface
            .send_data_repeated(color.byte(), BUFFER_SIZE)
            .map_err(Error::Interface)?;
        log::trace!("frame memory cleared to {color:?}");
        Ok(())
    }

    fn display_frame<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.ensure_ready("display_frame")?;
        let mode = self.state.mode().unwrap_or_default();

        self.send_command_with_data(DISPLAY_UPDATE_CTRL2, &[DISPLAY_UPDATE_SEQUENCE])?;
        delay.delay_ms(UPDATE_SETTLE_MS);
        self.send_command(MASTER_ACTIVATION)?;
        self.send_command(TERMINATE_FRAME_READ)?;
        self.interface.busy_wait(delay).map_err(Error::Interface)?;

        self.state = PanelState::Displaying(mode);
        log::debug!("{mode:?} refresh complete");
        Ok(())
    }

    fn sleep(&mut self) -> DisplayResult<I> {
        if self.state == PanelState::Asleep {
            return Ok(());
        }
        self.send_command_with_data(DEEP_SLEEP, &[DEEP_SLEEP_MODE_1])?;
        self.state = PanelState::Asleep;
        log::debug!("panel asleep");
        Ok(())
    }

    fn width(&self) -> u16 {
        WIDTH
    }

    fn height(&self) -> u16 {
        HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::{LUT_FULL_UPDATE, LUT_PARTIAL_UPDATE};
    use alloc::vec::Vec;

    #[derive(Debug)]
    struct MockInterface {
        commands: Vec<u8>,
        data: Vec<Vec<u8>>,
        command_data: Vec<(u8, Vec<u8>)>,
        repeated: Vec<(u8, usize)>,
        last_command: Option<u8>,
        resets: usize,
        busy_waits: usize,
    }

    impl MockInterface {
        fn new() -> Self {
            Self {
                commands: Vec::new(),
                data: Vec::new(),
                command_data: Vec::new(),
                repeated: Vec::new(),
                last_command: None,
                resets: 0,
                busy_waits: 0,
            }
        }

        fn traffic(&self) -> usize {
            self.commands.len() + self.data.len() + self.repeated.len()
        }

        fn data_for(&self, command: u8) -> Vec<&Vec<u8>> {
            self.command_data
                .iter()
                .filter(|(cmd, _)| *cmd == command)
                .map(|(_, data)| data)
                .collect()
        }
    }

    impl DisplayInterface for MockInterface {
        type Error = core::convert::Infallible;

        fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
            self.commands.push(command);
            self.last_command = Some(command);
            Ok(())
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.data.push(data.to_vec());
            if let Some(cmd) = self.last_command {
                self.command_data.push((cmd, data.to_vec()));
            }
            Ok(())
        }

        fn send_command_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), Self::Error> {
            self.send_command(command)?;
            self.send_data(data)
        }

        fn send_data_repeated(&mut self, value: u8, count: usize) -> Result<(), Self::Error> {
            self.repeated.push((value, count));
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, _delay: &mut D) {
            self.resets += 1;
        }

        fn busy_wait<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            self.busy_waits += 1;
            Ok(())
        }
    }

    struct MockDelay {
        total_ms: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    fn delay() -> MockDelay {
        MockDelay { total_ms: 0 }
    }

    fn ready_display(mode: RefreshMode) -> Epd1in54<MockInterface> {
        let mut display = Epd1in54::new(MockInterface::new());
        display.init(mode, &mut delay()).unwrap();
        display.interface_mut().commands.clear();
        display.interface_mut().data.clear();
        display.interface_mut().command_data.clear();
        display
    }

    /// Buffer where every byte holds its own index (mod 256)
    fn indexed_buffer() -> Vec<u8> {
        (0..BUFFER_SIZE).map(|i| i as u8).collect()
    }

    #[test]
    fn test_byte_alignment() {
        assert_eq!(floor_to_byte(5), 0);
        assert_eq!(floor_to_byte(8), 8);
        assert_eq!(floor_to_byte(15), 8);
        assert_eq!(ceil_to_byte(13), 16);
        assert_eq!(ceil_to_byte(16), 16);
        assert_eq!(ceil_to_byte(200), 200);
    }

    #[test]
    fn test_new_is_uninitialized() {
        let display = Epd1in54::new(MockInterface::new());
        assert_eq!(display.state(), PanelState::Uninitialized);
        assert_eq!(display.interface().traffic(), 0);
    }

    #[test]
    fn test_init_full_sequence() {
        let mut display = Epd1in54::new(MockInterface::new());
        display.init(RefreshMode::Full, &mut delay()).unwrap();

        let iface = display.interface();
        assert_eq!(iface.resets, 1);
        assert_eq!(
            iface.commands,
            [0x01, 0x0C, 0x2C, 0x3A, 0x3B, 0x11, 0x32]
        );
        assert_eq!(iface.data[0], [199, 0x00, 0x00]);
        assert_eq!(iface.data[1], [0xD7, 0xD6, 0x9D]);
        assert_eq!(iface.data[2], [0xA8]);
        assert_eq!(iface.data[3], [0x1A]);
        assert_eq!(iface.data[4], [0x08]);
        assert_eq!(iface.data[5], [0x03]);
        assert_eq!(iface.data[6], LUT_FULL_UPDATE);
        assert_eq!(display.state(), PanelState::Initialized(RefreshMode::Full));
    }

    #[test]
    fn test_init_partial_loads_partial_lut() {
        let mut display = Epd1in54::new(MockInterface::new());
        display.init(RefreshMode::Partial, &mut delay()).unwrap();

        let luts = display.interface().data_for(WRITE_LUT);
        assert_eq!(luts.len(), 1);
        assert_eq!(luts[0].as_slice(), LUT_PARTIAL_UPDATE);
        assert_eq!(
            display.state(),
            PanelState::Initialized(RefreshMode::Partial)
        );
    }

    #[test]
    fn test_set_frame_memory_full() {
        let mut display = ready_display(RefreshMode::Full);
        let buffer = indexed_buffer();
        display.set_frame_memory(&buffer, &mut delay()).unwrap();

        let iface = display.interface();
        assert_eq!(iface.commands, [0x44, 0x45, 0x4E, 0x4F, 0x24]);
        assert_eq!(iface.data_for(SET_RAM_X_RANGE)[0].as_slice(), [0, 24]);
        assert_eq!(iface.data_for(SET_RAM_Y_RANGE)[0].as_slice(), [0, 0, 199, 0]);
        assert_eq!(iface.data_for(SET_RAM_X_COUNTER)[0].as_slice(), [0]);
        assert_eq!(iface.data_for(SET_RAM_Y_COUNTER)[0].as_slice(), [0, 0]);
        assert_eq!(iface.busy_waits, 1);

        let ram = iface.data_for(WRITE_RAM);
        assert_eq!(ram.len(), 1);
        assert_eq!(ram[0].as_slice(), buffer.as_slice());
    }

    #[test]
    fn test_set_frame_memory_sends_only_panel_bytes() {
        let mut display = ready_display(RefreshMode::Full);
        let buffer = vec_of(BUFFER_SIZE + 10, 0xAA);
        display.set_frame_memory(&buffer, &mut delay()).unwrap();
        assert_eq!(display.interface().data_for(WRITE_RAM)[0].len(), BUFFER_SIZE);
    }

    fn vec_of(len: usize, value: u8) -> Vec<u8> {
        alloc::vec![value; len]
    }

    #[test]
    fn test_set_frame_memory_buffer_too_small() {
        let mut display = ready_display(RefreshMode::Full);
        let buffer = vec_of(BUFFER_SIZE - 1, 0xFF);
        let result = display.set_frame_memory(&buffer, &mut delay());

        assert!(matches!(
            result,
            Err(Error::BufferTooSmall {
                required: BUFFER_SIZE,
                provided: 4999
            })
        ));
        assert_eq!(display.interface().traffic(), 0);
    }

    #[test]
    fn test_region_columns_widen_to_bytes() {
        let mut display = ready_display(RefreshMode::Partial);
        let buffer = indexed_buffer();
        display
            .set_frame_memory_region(&buffer, Window::new(5, 3, 12, 6), &mut delay())
            .unwrap();

        let iface = display.interface();
        // Columns [0, 16): X window bytes 0..=1
        assert_eq!(iface.data_for(SET_RAM_X_RANGE)[0].as_slice(), [0, 1]);
        assert_eq!(iface.data_for(SET_RAM_Y_RANGE)[0].as_slice(), [3, 0, 6, 0]);
        assert_eq!(iface.data_for(SET_RAM_X_COUNTER)[0].as_slice(), [0]);
        assert_eq!(iface.data_for(SET_RAM_Y_COUNTER)[0].as_slice(), [3, 0]);

        let rows = iface.data_for(WRITE_RAM);
        assert_eq!(rows.len(), 4);
        for (i, row) in rows.iter().enumerate() {
            let offset = (3 + i) * 25;
            assert_eq!(row.as_slice(), &buffer[offset..offset + 2]);
        }
    }

    #[test]
    fn test_region_uses_full_row_stride() {
        let mut display = ready_display(RefreshMode::Partial);
        let buffer = indexed_buffer();
        display
            .set_frame_memory_region(&buffer, Window::new(20, 10, 35, 11), &mut delay())
            .unwrap();

        let iface = display.interface();
        // Columns [16, 40): bytes 2..=4
        assert_eq!(iface.data_for(SET_RAM_X_RANGE)[0].as_slice(), [2, 4]);
        assert_eq!(iface.data_for(SET_RAM_X_COUNTER)[0].as_slice(), [2]);
        let rows = iface.data_for(WRITE_RAM);
        assert_eq!(rows[0].as_slice(), &buffer[252..255]);
        assert_eq!(rows[1].as_slice(), &buffer[277..280]);
    }

    #[test]
    fn test_region_last_column() {
        let mut display = ready_display(RefreshMode::Partial);
        let buffer = indexed_buffer();
        display
            .set_frame_memory_region(&buffer, Window::new(199, 199, 199, 199), &mut delay())
            .unwrap();

        let iface = display.interface();
        assert_eq!(iface.data_for(SET_RAM_X_RANGE)[0].as_slice(), [24, 24]);
        let rows = iface.data_for(WRITE_RAM);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_slice(), &buffer[BUFFER_SIZE - 1..]);
    }

    #[test]
    fn test_region_rejected_before_traffic() {
        let mut display = ready_display(RefreshMode::Partial);
        let buffer = indexed_buffer();

        for window in [
            Window::new(0, 0, 200, 10),
            Window::new(0, 0, 10, 200),
            Window::new(12, 0, 5, 10),
            Window::new(0, 9, 10, 3),
        ] {
            let result = display.set_frame_memory_region(&buffer, window, &mut delay());
            assert!(matches!(result, Err(Error::InvalidWindow { .. })));
        }
        assert_eq!(display.interface().traffic(), 0);
    }

    #[test]
    fn test_region_buffer_too_small() {
        let mut display = ready_display(RefreshMode::Partial);
        let result =
            display.set_frame_memory_region(&[0xFF; 16], Window::new(0, 0, 7, 0), &mut delay());
        assert!(matches!(result, Err(Error::BufferTooSmall { .. })));
        assert_eq!(display.interface().traffic(), 0);
    }

    #[test]
    fn test_clear_frame_white_is_ff() {
        let mut display = ready_display(RefreshMode::Full);
        display.clear_frame(Color::White, &mut delay()).unwrap();

        let iface = display.interface();
        assert_eq!(iface.commands, [0x44, 0x45, 0x4E, 0x4F, 0x24]);
        assert_eq!(iface.data_for(SET_RAM_X_RANGE)[0].as_slice(), [0, 24]);
        assert_eq!(iface.data_for(SET_RAM_Y_RANGE)[0].as_slice(), [0, 0, 199, 0]);
        assert_eq!(iface.repeated, [(0xFF, BUFFER_SIZE)]);
    }

    #[test]
    fn test_clear_frame_black_is_00() {
        let mut display = ready_display(RefreshMode::Full);
        display.clear_frame(Color::Black, &mut delay()).unwrap();
        assert_eq!(display.interface().repeated, [(0x00, BUFFER_SIZE)]);
    }

    #[test]
    fn test_display_frame_sequence() {
        let mut display = ready_display(RefreshMode::Partial);
        let mut delay = delay();
        display.display_frame(&mut delay).unwrap();

        let iface = display.interface();
        assert_eq!(iface.commands, [0x22, 0x20, 0xFF]);
        assert_eq!(iface.data_for(DISPLAY_UPDATE_CTRL2)[0].as_slice(), [0xC4]);
        assert_eq!(iface.busy_waits, 1);
        assert_eq!(delay.total_ms, UPDATE_SETTLE_MS);
        assert_eq!(
            display.state(),
            PanelState::Displaying(RefreshMode::Partial)
        );
    }

    #[test]
    fn test_transfer_allowed_after_display() {
        let mut display = ready_display(RefreshMode::Full);
        display.display_frame(&mut delay()).unwrap();
        let buffer = indexed_buffer();
        assert!(display.set_frame_memory(&buffer, &mut delay()).is_ok());
    }

    #[test]
    fn test_sleep() {
        let mut display = ready_display(RefreshMode::Full);
        display.sleep().unwrap();

        let iface = display.interface();
        assert_eq!(iface.commands, [0x10]);
        assert_eq!(iface.data[0], [0x01]);
        assert_eq!(display.state(), PanelState::Asleep);
    }

    #[test]
    fn test_sleep_twice_is_noop() {
        let mut display = ready_display(RefreshMode::Full);
        display.sleep().unwrap();
        display.sleep().unwrap();
        assert_eq!(display.interface().commands, [0x10]);
    }

    #[test]
    fn test_operations_after_sleep_rejected() {
        let mut display = ready_display(RefreshMode::Full);
        display.sleep().unwrap();
        display.interface_mut().commands.clear();
        display.interface_mut().data.clear();
        let buffer = indexed_buffer();
        let mut delay = delay();

        assert!(matches!(
            display.set_frame_memory(&buffer, &mut delay),
            Err(Error::InvalidState(PanelState::Asleep))
        ));
        assert!(matches!(
            display.set_frame_memory_region(&buffer, Window::new(0, 0, 7, 7), &mut delay),
            Err(Error::InvalidState(PanelState::Asleep))
        ));
        assert!(matches!(
            display.clear_frame(Color::White, &mut delay),
            Err(Error::InvalidState(PanelState::Asleep))
        ));
        assert!(matches!(
            display.display_frame(&mut delay),
            Err(Error::InvalidState(PanelState::Asleep))
        ));
        assert_eq!(display.interface().traffic(), 0);
    }

    #[test]
    fn test_init_wakes_from_sleep() {
        let mut display = ready_display(RefreshMode::Full);
        display.sleep().unwrap();
        display.init(RefreshMode::Partial, &mut delay()).unwrap();
        assert_eq!(display.interface().resets, 2);
        assert_eq!(
            display.state(),
            PanelState::Initialized(RefreshMode::Partial)
        );
        let buffer = indexed_buffer();
        assert!(display.set_frame_memory(&buffer, &mut delay()).is_ok());
    }

    #[test]
    fn test_operations_before_init_rejected() {
        let mut display = Epd1in54::new(MockInterface::new());
        let result = display.display_frame(&mut delay());
        assert!(matches!(
            result,
            Err(Error::InvalidState(PanelState::Uninitialized))
        ));
        assert_eq!(display.interface().traffic(), 0);
    }

    #[test]
    fn test_panel_dimensions() {
        let display = Epd1in54::new(MockInterface::new());
        assert_eq!(display.width(), 200);
        assert_eq!(display.height(), 200);
        assert_eq!(BUFFER_SIZE, 5000);
    }

    #[test]
    fn test_refresh_mode_default_is_full() {
        assert_eq!(RefreshMode::default(), RefreshMode::Full);
    }

    #[test]
    fn test_state_mode() {
        assert_eq!(PanelState::Uninitialized.mode(), None);
        assert_eq!(PanelState::Asleep.mode(), None);
        assert_eq!(
            PanelState::Displaying(RefreshMode::Partial).mode(),
            Some(RefreshMode::Partial)
        );
        assert!(PanelState::Initialized(RefreshMode::Full).is_ready());
        assert!(!PanelState::Asleep.is_ready());
    }
}
