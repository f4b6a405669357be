//! Test pattern exercising every drawing primitive.

use crate::{Ili9341, WIDTH};

const BLACK: u16 = 0x0000;
const BLUE: u16 = 0x001F;
const RED: u16 = 0xF800;
const GREEN: u16 = 0x07E0;
const CYAN: u16 = 0x07FF;
const MAGENTA: u16 = 0xF81F;
const YELLOW: u16 = 0xFFE0;
const WHITE: u16 = 0xFFFF;

pub fn demo<T: Ili9341>(display: &mut T) {
    display.fill_screen(BLACK);

    // color bars across the top
    let bars = [WHITE, YELLOW, CYAN, GREEN, MAGENTA, RED, BLUE, BLACK];
    let bar_w = WIDTH / bars.len() as u16;
    for (i, &color) in bars.iter().enumerate() {
        display.fill_rect(i as u16 * bar_w, 0, bar_w, 60, color);
    }

    display.draw_string(12, 90, "ILI9341", WHITE, BLACK, 4);
    display.draw_string(12, 130, "240x320 RGB565", GREEN, BLACK, 2);
    display.draw_string(12, 150, "!\"#$%&'()*+,-./0123456789", YELLOW, BLACK, 1);

    // dotted frame around the text block
    for x in (8..WIDTH - 8).step_by(4) {
        display.draw_pixel(x, 80, WHITE);
        display.draw_pixel(x, 170, WHITE);
    }
    for y in (80..172).step_by(4) {
        display.draw_pixel(8, y, WHITE);
        display.draw_pixel(WIDTH - 9, y, WHITE);
    }
}
