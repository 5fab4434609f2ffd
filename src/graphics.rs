//! Graphics support via embedded-graphics
//!
//! This module implements [`DrawTarget`] for [`Framebuffer`] and for
//! [`AdaptiveDisplay`], and adds shape, text and bitmap helpers to
//! [`AdaptiveDisplay`] that record the region they cover before drawing.
//!
//! Rendering itself (Bresenham lines, circle rasterizing, glyphs) is done by
//! embedded-graphics; the framebuffer only ever receives single pixels.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     mono_font::{ascii::FONT_6X10, MonoTextStyle},
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle},
//! };
//! use epd1in54::{AdaptiveDisplay, Color, Config, Epd1in54, BUFFER_SIZE};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use epd1in54::interface::DisplayInterface;
//! # struct MockInterface;
//! # impl DisplayInterface for MockInterface {
//! #     type Error = Infallible;
//! #     fn send_command(&mut self, _: u8) -> Result<(), Infallible> { Ok(()) }
//! #     fn send_data(&mut self, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn send_command_with_data(&mut self, _: u8, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn reset<D: DelayNs>(&mut self, _: &mut D) {}
//! #     fn busy_wait<D: DelayNs>(&mut self, _: &mut D) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let mut display = match AdaptiveDisplay::new(
//!     Epd1in54::new(MockInterface),
//!     [0u8; BUFFER_SIZE],
//!     Config::default(),
//! ) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//!
//! // Helpers
//! display.fill_rect(10, 10, 50, 30, Color::Black);
//! display.draw_text("Hello, E-Paper!", 10, 100, MonoTextStyle::new(&FONT_6X10, Color::Black));
//!
//! // Or any embedded-graphics drawable
//! let _ = Circle::new(Point::new(100, 50), 40)
//!     .into_styled(PrimitiveStyle::with_stroke(Color::Black, 2))
//!     .draw(&mut display);
//!
//! // Send the changes, full or partial as needed
//! let _ = display.flush(&mut delay);
//! ```

use core::convert::Infallible;
use embedded_graphics::{
    Drawable,
    image::{Image, ImageRaw},
    primitives::{Circle, Line, Primitive, PrimitiveStyle, Rectangle},
    text::{Text, renderer::TextRenderer},
};
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::BinaryColor,
    prelude::Pixel,
};

use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::panel::PanelDriver;
use crate::refresh::AdaptiveDisplay;

impl<B> DrawTarget for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.set_pixel(x, y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

impl<B> OriginDimensions for Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}

/// Every pixel drawn on the panel grows the dirty box
impl<P, B> DrawTarget for AdaptiveDisplay<P, B>
where
    P: PanelDriver,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = (i32::from(self.width()), i32::from(self.height()));
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= width || y >= height {
                continue;
            }
            self.touch(x, y);
            self.framebuffer_mut().set_pixel(x, y, color);
        }
        Ok(())
    }
}

impl<P, B> OriginDimensions for AdaptiveDisplay<P, B>
where
    P: PanelDriver,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        Size::new(u32::from(self.width()), u32::from(self.height()))
    }
}

/// Draws a 1-bit image with chosen foreground and background colors
struct BitmapTarget<'a, B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    framebuffer: &'a mut Framebuffer<B>,
    foreground: Color,
    background: Color,
}

impl<B> DrawTarget for BitmapTarget<'_, B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, bit) in pixels {
            let color = match bit {
                BinaryColor::On => self.foreground,
                BinaryColor::Off => self.background,
            };
            self.framebuffer.set_pixel(x, y, color);
        }
        Ok(())
    }
}

impl<B> OriginDimensions for BitmapTarget<'_, B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn size(&self) -> Size {
        self.framebuffer.size()
    }
}

/// Clamp a helper coordinate to the 16-bit range
fn coord(v: i32) -> i32 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX))
}

/// Clamp a helper width, height or radius to the 16-bit range
fn extent(v: u32) -> u32 {
    v.min(u32::from(u16::MAX))
}

fn offset(start: i32, len: u32) -> i32 {
    start.saturating_add(i32::try_from(len).unwrap_or(i32::MAX))
}

/// Shape helpers
///
/// Coordinates are clamped to the `i16` range and sizes to the `u16` range
/// before drawing, so far off-panel shapes are ignored instead of overflowing.
impl<P, B> AdaptiveDisplay<P, B>
where
    P: PanelDriver,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    fn render<T>(&mut self, item: &T)
    where
        T: Drawable<Color = Color>,
    {
        // Framebuffer drawing is infallible
        let _ = item.draw(self.framebuffer_mut());
    }

    /// Draw a one pixel wide line between two points
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (x0, y0, x1, y1) = (coord(x0), coord(y0), coord(x1), coord(y1));
        self.touch(x0, y0);
        self.touch(x1, y1);
        let line = Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1));
        self.render(&line);
    }

    /// Draw a rectangle outline with its top-left corner at `(x, y)`
    pub fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let (x, y, w, h) = (coord(x), coord(y), extent(w), extent(h));
        self.touch(x, y);
        self.touch(offset(x, w), offset(y, h));
        let rect = Rectangle::new(Point::new(x, y), Size::new(w, h))
            .into_styled(PrimitiveStyle::with_stroke(color, 1));
        self.render(&rect);
    }

    /// Draw a filled rectangle with its top-left corner at `(x, y)`
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let (x, y, w, h) = (coord(x), coord(y), extent(w), extent(h));
        self.touch(x, y);
        self.touch(offset(x, w), offset(y, h));
        let rect = Rectangle::new(Point::new(x, y), Size::new(w, h))
            .into_styled(PrimitiveStyle::with_fill(color));
        self.render(&rect);
    }

    /// Draw a circle outline of radius `r` around `(x0, y0)`
    pub fn draw_circle(&mut self, x0: i32, y0: i32, r: u32, color: Color) {
        let (x0, y0, r) = (coord(x0), coord(y0), extent(r));
        self.touch_circle(x0, y0, r);
        let circle = Circle::with_center(Point::new(x0, y0), 2 * r + 1)
            .into_styled(PrimitiveStyle::with_stroke(color, 1));
        self.render(&circle);
    }

    /// Draw a filled circle of radius `r` around `(x0, y0)`
    pub fn fill_circle(&mut self, x0: i32, y0: i32, r: u32, color: Color) {
        let (x0, y0, r) = (coord(x0), coord(y0), extent(r));
        self.touch_circle(x0, y0, r);
        let circle = Circle::with_center(Point::new(x0, y0), 2 * r + 1)
            .into_styled(PrimitiveStyle::with_fill(color));
        self.render(&circle);
    }

    fn touch_circle(&mut self, x0: i32, y0: i32, r: u32) {
        let r = r as i32;
        self.touch(x0 - r, y0 - r);
        self.touch(x0 + r, y0 + r);
    }

    /// Draw `text` with its baseline starting at `(x, y)`
    ///
    /// Works with any embedded-graphics text style, e.g. `MonoTextStyle`.
    /// Returns the position following the last glyph.
    pub fn draw_text<S>(&mut self, text: &str, x: i32, y: i32, style: S) -> Point
    where
        S: TextRenderer<Color = Color>,
    {
        let (x, y) = (coord(x), coord(y));
        let text = Text::new(text, Point::new(x, y), style);
        let bounds = text.bounding_box();
        if bounds.size.width > 0 && bounds.size.height > 0 {
            let top_left = bounds.top_left;
            self.touch(top_left.x, top_left.y);
            self.touch(
                offset(top_left.x, bounds.size.width),
                offset(top_left.y, bounds.size.height),
            );
        }
        text.draw(self.framebuffer_mut()).unwrap_or(text.position)
    }

    /// Draw a packed 1-bit image with its top-left corner at `(x, y)`
    ///
    /// `bitmap` holds `h` rows of `ceil(w / 8)` bytes, most significant bit
    /// first. Set bits are drawn in `foreground`, cleared bits in `background`.
    /// A bitmap too short for `w` x `h` is skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &[u8],
        w: u32,
        h: u32,
        foreground: Color,
        background: Color,
    ) {
        let (x, y) = (coord(x), coord(y));
        let required = (w.div_ceil(8) as usize).saturating_mul(h as usize);
        let Some(data) = bitmap.get(..required) else {
            log::warn!(
                "bitmap skipped: {w}x{h} needs {required} bytes, got {}",
                bitmap.len()
            );
            return;
        };
        if data.is_empty() {
            return;
        }

        self.touch(x, y);
        self.touch(offset(x, w), offset(y, h));

        let raw: ImageRaw<'_, BinaryColor> = ImageRaw::new(data, w);
        let mut target = BitmapTarget {
            framebuffer: self.framebuffer_mut(),
            foreground,
            background,
        };
        let _ = Image::new(&raw, Point::new(x, y)).draw(&mut target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, Rotation};
    use crate::display::RefreshMode;
    use crate::panel::Window;
    use crate::refresh::tests::{MockDelay, display_with};
    use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};

    fn display() -> AdaptiveDisplay<crate::refresh::tests::MockPanel, alloc::vec::Vec<u8>> {
        display_with(Builder::new().build().unwrap())
    }

    fn dirty_corners<P, B>(display: &AdaptiveDisplay<P, B>) -> (i32, i32, i32, i32)
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let dirty = display.dirty_box();
        (dirty.min_x, dirty.min_y, dirty.max_x, dirty.max_y)
    }

    #[test]
    fn test_framebuffer_size_follows_rotation() {
        let fb = Framebuffer::new(alloc::vec![0u8; 16], 16, 8, Rotation::Rotate270);
        assert_eq!(fb.size(), Size::new(8, 16));
    }

    #[test]
    fn test_framebuffer_draw_target() {
        let mut fb = Framebuffer::new(alloc::vec![0xFFu8; 5000], 200, 200, Rotation::Rotate0);
        let _ = Pixel(Point::new(1, 0), Color::Black).draw(&mut fb);
        let _ = Pixel(Point::new(-1, 0), Color::Black).draw(&mut fb);
        assert_eq!(fb.as_bytes()[0], 0xBF);

        let _ = fb.clear(Color::Black);
        assert!(fb.as_bytes().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_fill_rect_pixels_and_box() {
        let mut display = display();
        display.fill_rect(8, 0, 8, 2, Color::Black);

        let bytes = display.framebuffer().as_bytes();
        assert_eq!(bytes[1], 0x00);
        assert_eq!(bytes[26], 0x00);
        assert_eq!(bytes[0], 0xFF);
        assert_eq!(bytes[51], 0xFF);
        assert_eq!(dirty_corners(&display), (8, 0, 16, 2));
    }

    #[test]
    fn test_draw_rect_large_triggers_full() {
        let mut display = display();
        display.draw_rect(10, 10, 150, 150, Color::Black);
        assert_eq!(display.dirty_box().size(), Some((150, 150)));
        assert_eq!(display.next_refresh(), Some(RefreshMode::Full));
        // Outline only
        assert_eq!(display.framebuffer().get_pixel(80, 80), Some(Color::White));
        assert_eq!(display.framebuffer().get_pixel(10, 80), Some(Color::Black));
    }

    #[test]
    fn test_fill_rect_wide_short_is_partial() {
        let mut display = display();
        display.fill_rect(10, 10, 150, 50, Color::Black);
        assert_eq!(display.next_refresh(), Some(RefreshMode::Partial));
    }

    #[test]
    fn test_draw_line() {
        let mut display = display();
        display.draw_line(0, 0, 9, 0, Color::Black);

        let bytes = display.framebuffer().as_bytes();
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[1], 0x3F);
        assert_eq!(dirty_corners(&display), (0, 0, 9, 0));
    }

    #[test]
    fn test_circle_box_is_center_plus_radius() {
        let mut display = display();
        display.draw_circle(100, 100, 20, Color::Black);
        assert_eq!(dirty_corners(&display), (80, 80, 120, 120));
        assert_eq!(display.framebuffer().get_pixel(100, 100), Some(Color::White));

        display.fill_circle(50, 50, 5, Color::Black);
        assert_eq!(dirty_corners(&display), (45, 45, 120, 120));
        assert_eq!(display.framebuffer().get_pixel(50, 50), Some(Color::Black));
    }

    #[test]
    fn test_draw_text_box_matches_glyphs() {
        let mut display = display();
        let style = MonoTextStyle::new(&FONT_6X10, Color::Black);
        let bounds = Text::new("Hi", Point::new(10, 20), style).bounding_box();

        let next = display.draw_text("Hi", 10, 20, style);
        assert_eq!(next, Point::new(22, 20));
        assert_eq!(
            dirty_corners(&display),
            (
                bounds.top_left.x,
                bounds.top_left.y,
                bounds.top_left.x + 12,
                bounds.top_left.y + 10
            )
        );

        let fb = display.framebuffer();
        let inked = (bounds.top_left.y..bounds.top_left.y + 10)
            .flat_map(|y| (10..22).map(move |x| (x, y)))
            .any(|(x, y)| fb.get_pixel(x, y) == Some(Color::Black));
        assert!(inked);
    }

    #[test]
    fn test_draw_empty_text_leaves_box() {
        let mut display = display();
        display.draw_text("", 10, 20, MonoTextStyle::new(&FONT_6X10, Color::Black));
        assert!(!display.dirty_box().is_valid());
    }

    #[test]
    fn test_draw_bitmap_colors() {
        let mut display = display();
        display.draw_bitmap(0, 0, &[0xF0, 0x0F], 8, 2, Color::Black, Color::White);

        let bytes = display.framebuffer().as_bytes();
        assert_eq!(bytes[0], 0x0F);
        assert_eq!(bytes[25], 0xF0);
        assert_eq!(dirty_corners(&display), (0, 0, 8, 2));
    }

    #[test]
    fn test_draw_bitmap_padded_rows() {
        let mut display = display();
        // 10 pixels wide: 2 bytes per row
        display.draw_bitmap(0, 0, &[0xFF, 0xC0], 10, 1, Color::Black, Color::White);

        let bytes = display.framebuffer().as_bytes();
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[1], 0x3F);
    }

    #[test]
    fn test_draw_bitmap_too_short_is_skipped() {
        let mut display = display();
        display.draw_bitmap(0, 0, &[0x00], 8, 2, Color::Black, Color::White);
        assert!(display.framebuffer().as_bytes().iter().all(|&b| b == 0xFF));
        assert!(!display.dirty_box().is_valid());
    }

    #[test]
    fn test_adaptive_draw_target_tracks_pixels() {
        let mut display = display();
        let _ = Pixel(Point::new(3, 4), Color::Black).draw(&mut display);
        let _ = Pixel(Point::new(300, 4), Color::Black).draw(&mut display);

        assert_eq!(display.dirty_box().window(), Some(Window::new(3, 4, 3, 4)));
        assert_eq!(display.framebuffer().get_pixel(3, 4), Some(Color::Black));
    }

    #[test]
    fn test_adaptive_draw_target_with_rotation() {
        let config = Builder::new().rotation(Rotation::Rotate90).build().unwrap();
        let mut display = display_with(config);
        let _ = Line::new(Point::new(0, 0), Point::new(0, 7))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut display);

        // Logical column 0 is physical row 0, columns 192..=199
        assert_eq!(display.dirty_box().window(), Some(Window::new(192, 0, 199, 0)));
        assert_eq!(display.framebuffer().as_bytes()[24], 0x00);
    }

    #[test]
    fn test_fill_rect_partial_count_cycle() {
        let config = Builder::new()
            .refresh_ratio(0.7)
            .full_refresh_interval(3)
            .build()
            .unwrap();
        let mut display = display_with(config);

        for step in 1..=3u8 {
            display.fill_rect(20 * i32::from(step), 20, 10, 10, Color::Black);
            assert_eq!(display.dirty_box().size(), Some((10, 10)));
            let mode = display.flush(&mut MockDelay).unwrap();
            assert_eq!(mode, Some(RefreshMode::Partial));
            assert_eq!(display.partial_refresh_count(), step);
        }

        display.fill_rect(100, 100, 10, 10, Color::Black);
        assert_eq!(display.flush(&mut MockDelay).unwrap(), Some(RefreshMode::Full));
        assert_eq!(display.partial_refresh_count(), 0);

        display.fill_rect(100, 100, 10, 10, Color::White);
        assert_eq!(display.flush(&mut MockDelay).unwrap(), Some(RefreshMode::Partial));
        assert_eq!(display.framebuffer().get_pixel(105, 105), Some(Color::White));
    }

    #[test]
    fn test_rects_far_off_panel_are_ignored() {
        let mut display = display();
        display.draw_rect(i32::MAX - 5, 0, 10, 10, Color::Black);
        display.fill_rect(i32::MIN, i32::MIN, 10, 10, Color::Black);
        display.fill_rect(0, i32::MAX - 5, u32::MAX, 10, Color::Black);

        assert_eq!(display.next_refresh(), None);
        assert!(display.framebuffer().as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_circles_far_off_panel_are_ignored() {
        let mut display = display();
        display.draw_circle(i32::MAX, 0, 3, Color::Black);
        display.fill_circle(i32::MIN, i32::MIN, 3, Color::Black);

        assert_eq!(display.next_refresh(), None);
        assert!(display.framebuffer().as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_line_across_extreme_points_keeps_on_panel_part() {
        let mut display = display();
        display.draw_line(i32::MIN, 0, i32::MAX, 0, Color::Black);

        assert_eq!(display.dirty_box().window(), Some(Window::new(0, 0, 199, 0)));
        assert!(display.framebuffer().as_bytes()[..25].iter().all(|&b| b == 0x00));
        assert_eq!(display.framebuffer().as_bytes()[25], 0xFF);
    }

    #[test]
    fn test_text_and_bitmap_far_off_panel_are_ignored() {
        let mut display = display();
        let style = MonoTextStyle::new(&FONT_6X10, Color::Black);
        display.draw_text("Hi", i32::MAX, i32::MAX, style);
        display.draw_bitmap(i32::MAX, 0, &[0x00], 8, 1, Color::Black, Color::White);

        assert_eq!(display.next_refresh(), None);
        assert!(display.framebuffer().as_bytes().iter().all(|&b| b == 0xFF));
    }
}
