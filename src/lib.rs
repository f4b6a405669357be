#![deny(unsafe_code)]
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

use embedded_hal::blocking::delay::DelayMs;

mod font;
mod ili9341_spi;
pub mod demo;

pub use crate::ili9341_spi::Ili9341Spi;

/// Panel width in pixels.
pub const WIDTH: u16 = 240;
/// Panel height in pixels.
pub const HEIGHT: u16 = 320;

const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const PASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const PIXFMT: u8 = 0x3A;
const PWCTR1: u8 = 0xC0;
const PWCTR2: u8 = 0xC1;
const VMCTR1: u8 = 0xC5;
const VMCTR2: u8 = 0xC7;

/// An ILI9341 panel behind some command/data transport.
///
/// Implementors provide the two wire-level methods; all drawing is built on
/// top of them. Colors are RGB565 and go out high byte first.
pub trait Ili9341 {
    /// Transmit one command byte (DC low for the transfer).
    fn command(&mut self, cmd: u8);
    /// Transmit parameter or pixel bytes (DC high for the transfer).
    fn data(&mut self, data: &[u8]);

    fn init<D: DelayMs<u8>>(&mut self, delay: &mut D) {
        self.command(SWRESET);
        delay.delay_ms(150);

        self.command(PWCTR1); // power control 1: 4.60 V
        self.data(&[0x23]);
        self.command(PWCTR2); // power control 2
        self.data(&[0x10]);
        self.command(VMCTR1); // VCOM 3.45 V / -1.5 V
        self.data(&[0x3E, 0x28]);
        self.command(VMCTR2); // VCOM offset
        self.data(&[0x86]);
        self.command(MADCTL); // column order flipped, BGR subpixel order
        self.data(&[0x48]);
        self.command(PIXFMT); // 16 bits per pixel
        self.data(&[0x55]);

        self.command(SLPOUT);
        delay.delay_ms(120);
        self.command(DISPON);
    }

    /// Open the write window (x0,y0)-(x1,y1), both corners inclusive.
    ///
    /// After this every data byte pair is one pixel; the panel advances
    /// column first, then row, until the window area is exhausted. The
    /// caller must push exactly that many pixels or the write pointer is
    /// left mid-window for the next operation.
    fn set_address_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) {
        self.command(CASET);
        self.data(&[(x0 >> 8) as u8, x0 as u8, (x1 >> 8) as u8, x1 as u8]);
        self.command(PASET);
        self.data(&[(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8]);
        self.command(RAMWR);
    }

    fn draw_pixel(&mut self, x: u16, y: u16, color: u16) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        // TODO: try a 1x1 window here on hardware; the 2x2 window leaves the
        // write pointer one pixel into the window after the color goes out
        self.set_address_window(x, y, x + 1, y + 1);
        self.data(&[(color >> 8) as u8, color as u8]);
    }

    /// Fill a w*h rectangle anchored at (x,y), clipped to the panel edges.
    /// Off-panel or zero-area rectangles touch the bus not at all.
    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: u16) {
        if x >= WIDTH || y >= HEIGHT || w == 0 || h == 0 {
            return;
        }
        let w = if x as u32 + w as u32 > WIDTH as u32 {
            WIDTH - x
        } else {
            w
        };
        let h = if y as u32 + h as u32 > HEIGHT as u32 {
            HEIGHT - y
        } else {
            h
        };
        self.set_address_window(x, y, x + w - 1, y + h - 1);

        let mut row = [0u8; WIDTH as usize * 2];
        for px in row[..w as usize * 2].chunks_exact_mut(2) {
            px[0] = (color >> 8) as u8;
            px[1] = color as u8;
        }
        for _ in 0..h {
            self.data(&row[..w as usize * 2]);
        }
    }

    fn fill_screen(&mut self, color: u16) {
        self.fill_rect(0, 0, WIDTH, HEIGHT, color);
    }

    /// Draw one character cell: 5 glyph columns by 8 rows, scaled by `size`.
    /// Clear bits paint `bg` unless `bg == fg`, which leaves them untouched.
    fn draw_char(&mut self, x: u16, y: u16, c: u8, fg: u16, bg: u16, size: u8) {
        let size = size as u16;
        let glyph = font::glyph(c);
        for i in 0..5u16 {
            let mut line = glyph[i as usize];
            for j in 0..8u16 {
                if line & 0x01 != 0 || bg != fg {
                    let color = if line & 0x01 != 0 { fg } else { bg };
                    if size == 1 {
                        self.draw_pixel(x + i, y + j, color);
                    } else {
                        self.fill_rect(x + i * size, y + j * size, size, size, color);
                    }
                }
                line >>= 1;
            }
        }
    }

    /// Draw `s` left to right starting at (x,y). The cursor advances
    /// `6 * size` per byte (5 glyph columns plus one blank). No wrapping:
    /// glyph cells past the panel edge degrade to no-ops.
    fn draw_string(&mut self, x: u16, y: u16, s: &str, fg: u16, bg: u16, size: u8) {
        let mut x = x;
        for c in s.bytes() {
            self.draw_char(x, y, c, fg, bg, size);
            x += 6 * size as u16;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Command(u8),
        Data(Vec<u8>),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Ili9341 for Recorder {
        fn command(&mut self, cmd: u8) {
            self.ops.push(Op::Command(cmd));
        }
        fn data(&mut self, data: &[u8]) {
            self.ops.push(Op::Data(data.to_vec()));
        }
    }

    #[derive(Default)]
    struct RecDelay(Vec<u8>);

    impl DelayMs<u8> for RecDelay {
        fn delay_ms(&mut self, ms: u8) {
            self.0.push(ms);
        }
    }

    /// One RAMWR burst: the window opened for it and the pixel bytes pushed.
    #[derive(Debug, PartialEq)]
    struct Burst {
        window: (u16, u16, u16, u16),
        pixels: Vec<u8>,
    }

    fn be16(hi: u8, lo: u8) -> u16 {
        (hi as u16) << 8 | lo as u16
    }

    fn bursts(ops: &[Op]) -> Vec<Burst> {
        let mut out = Vec::new();
        let mut i = 0;
        while i < ops.len() {
            assert_eq!(ops[i], Op::Command(CASET), "burst must open with CASET");
            let cols = match &ops[i + 1] {
                Op::Data(d) => d.clone(),
                other => panic!("expected column bytes, got {:?}", other),
            };
            assert_eq!(ops[i + 2], Op::Command(PASET));
            let rows = match &ops[i + 3] {
                Op::Data(d) => d.clone(),
                other => panic!("expected page bytes, got {:?}", other),
            };
            assert_eq!(ops[i + 4], Op::Command(RAMWR));
            i += 5;
            let mut pixels = Vec::new();
            while i < ops.len() {
                match &ops[i] {
                    Op::Data(d) => pixels.extend_from_slice(d),
                    Op::Command(_) => break,
                }
                i += 1;
            }
            out.push(Burst {
                window: (
                    be16(cols[0], cols[1]),
                    be16(rows[0], rows[1]),
                    be16(cols[2], cols[3]),
                    be16(rows[2], rows[3]),
                ),
                pixels,
            });
        }
        out
    }

    fn glyph_pixels(c: u8) -> Vec<(u16, u16)> {
        let glyph = font::glyph(c);
        let mut on = Vec::new();
        for i in 0..5u16 {
            for j in 0..8u16 {
                if glyph[i as usize] >> j & 0x01 != 0 {
                    on.push((i, j));
                }
            }
        }
        on
    }

    #[test]
    fn address_window_encodes_big_endian_bounds() {
        let mut rec = Recorder::default();
        rec.set_address_window(10, 20, 50, 60);
        assert_eq!(
            rec.ops,
            vec![
                Op::Command(CASET),
                Op::Data(vec![0x00, 0x0A, 0x00, 0x32]),
                Op::Command(PASET),
                Op::Data(vec![0x00, 0x14, 0x00, 0x3C]),
                Op::Command(RAMWR),
            ]
        );
    }

    #[test]
    fn pixel_in_bounds_writes_one_color() {
        let mut rec = Recorder::default();
        rec.draw_pixel(3, 7, 0xABCD);
        let bursts = bursts(&rec.ops);
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].window, (3, 7, 4, 8));
        assert_eq!(bursts[0].pixels, vec![0xAB, 0xCD]);
    }

    #[test]
    fn pixel_outside_panel_is_dropped() {
        let mut rec = Recorder::default();
        rec.draw_pixel(WIDTH, 0, 0xFFFF);
        rec.draw_pixel(0, HEIGHT, 0xFFFF);
        rec.draw_pixel(u16::MAX, u16::MAX, 0xFFFF);
        assert!(rec.ops.is_empty());
    }

    #[test]
    fn rect_streams_exact_area() {
        let mut rec = Recorder::default();
        rec.fill_rect(5, 10, 7, 3, 0x1234);
        let bursts = bursts(&rec.ops);
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].window, (5, 10, 11, 12));
        assert_eq!(bursts[0].pixels.len(), 7 * 3 * 2);
        for px in bursts[0].pixels.chunks_exact(2) {
            assert_eq!(px, [0x12, 0x34]);
        }
    }

    #[test]
    fn rect_clips_to_panel_edge() {
        let mut rec = Recorder::default();
        rec.fill_rect(230, 310, 20, 20, 0xFFFF);
        let bursts = bursts(&rec.ops);
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].window, (230, 310, WIDTH - 1, HEIGHT - 1));
        assert_eq!(bursts[0].pixels.len(), 10 * 10 * 2);
    }

    #[test]
    fn rect_off_panel_or_empty_is_dropped() {
        let mut rec = Recorder::default();
        rec.fill_rect(WIDTH, 0, 4, 4, 0xFFFF);
        rec.fill_rect(0, HEIGHT, 4, 4, 0xFFFF);
        rec.fill_rect(10, 10, 0, 4, 0xFFFF);
        rec.fill_rect(10, 10, 4, 0, 0xFFFF);
        assert!(rec.ops.is_empty());
    }

    #[test]
    fn fill_screen_covers_every_pixel() {
        let mut rec = Recorder::default();
        rec.fill_screen(0x07E0);
        let bursts = bursts(&rec.ops);
        assert_eq!(bursts.len(), 1);
        assert_eq!(bursts[0].window, (0, 0, WIDTH - 1, HEIGHT - 1));
        assert_eq!(
            bursts[0].pixels.len(),
            WIDTH as usize * HEIGHT as usize * 2
        );
        for px in bursts[0].pixels.chunks_exact(2) {
            assert_eq!(px, [0x07, 0xE0]);
        }
    }

    #[test]
    fn char_reproduces_font_pattern() {
        let mut rec = Recorder::default();
        rec.draw_char(0, 0, b'A', 0xFFFF, 0x0000, 1);
        let bursts = bursts(&rec.ops);
        // every bit of the 5x8 cell painted, one pixel each
        assert_eq!(bursts.len(), 40);
        let mut on = Vec::new();
        for b in &bursts {
            let (x, y, _, _) = b.window;
            match b.pixels.as_slice() {
                [0xFF, 0xFF] => on.push((x, y)),
                [0x00, 0x00] => {}
                other => panic!("unexpected pixel bytes {:?}", other),
            }
        }
        assert_eq!(on, glyph_pixels(b'A'));
    }

    #[test]
    fn char_skips_background_when_it_matches_foreground() {
        let mut rec = Recorder::default();
        rec.draw_char(0, 0, b'A', 0xFFFF, 0xFFFF, 1);
        let bursts = bursts(&rec.ops);
        assert_eq!(bursts.len(), glyph_pixels(b'A').len());
        for b in &bursts {
            assert_eq!(b.pixels, vec![0xFF, 0xFF]);
        }
    }

    #[test]
    fn char_scales_bits_to_blocks() {
        let mut rec = Recorder::default();
        rec.draw_char(10, 20, b'!', 0xF800, 0xF800, 3);
        let bursts = bursts(&rec.ops);
        for b in &bursts {
            assert_eq!(b.pixels.len(), 3 * 3 * 2);
        }
        let windows: Vec<_> = bursts.iter().map(|b| b.window).collect();
        let expected: Vec<_> = glyph_pixels(b'!')
            .iter()
            .map(|&(i, j)| {
                let bx = 10 + i * 3;
                let by = 20 + j * 3;
                (bx, by, bx + 2, by + 2)
            })
            .collect();
        assert_eq!(windows, expected);
    }

    #[test]
    fn string_advances_six_columns_per_char() {
        // '!' lights only glyph column 2, making the cursor step visible
        let mut rec = Recorder::default();
        rec.draw_string(0, 0, "!!", 0xFFFF, 0xFFFF, 1);
        let xs: Vec<u16> = bursts(&rec.ops).iter().map(|b| b.window.0).collect();
        assert_eq!(xs.len(), 12);
        assert!(xs[..6].iter().all(|&x| x == 2));
        assert!(xs[6..].iter().all(|&x| x == 8));

        let mut rec = Recorder::default();
        rec.draw_string(0, 0, "!!", 0xFFFF, 0xFFFF, 4);
        let xs: Vec<u16> = bursts(&rec.ops).iter().map(|b| b.window.0).collect();
        assert!(xs[..6].iter().all(|&x| x == 8));
        assert!(xs[6..].iter().all(|&x| x == 32));
    }

    #[test]
    fn init_replays_identical_sequence() {
        let mut rec = Recorder::default();
        let mut delay = RecDelay::default();
        rec.init(&mut delay);
        let ops = rec.ops.len();
        let delays = delay.0.len();
        rec.init(&mut delay);
        assert_eq!(rec.ops[..ops], rec.ops[ops..]);
        assert_eq!(delay.0[..delays], delay.0[delays..]);
    }
}
