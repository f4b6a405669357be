use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

use crate::Ili9341;

/// ILI9341 on a hardware SPI bus, with dedicated DC and CS pins.
///
/// The reset pin is only pulsed during construction and is borrowed rather
/// than owned, so the caller keeps it afterwards.
pub struct Ili9341Spi<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
}

impl<SPI, DC, CS> Ili9341Spi<SPI, DC, CS>
where
    SPI: Write<u8>,
    DC: OutputPin,
    CS: OutputPin,
{
    /// Resets the panel and runs the power-on sequence, leaving the display
    /// on and ready to draw.
    pub fn new<RST, D>(
        spi: SPI,
        dc: DC,
        cs: CS,
        rst: &mut RST,
        delay: &mut D,
    ) -> Ili9341Spi<SPI, DC, CS>
    where
        RST: OutputPin,
        D: DelayMs<u8>,
    {
        rst.set_low().ok().unwrap();
        delay.delay_ms(10);
        rst.set_high().ok().unwrap();
        delay.delay_ms(120);

        let mut ili = Ili9341Spi { spi, dc, cs };
        ili.init(delay);
        ili
    }
}

impl<SPI, DC, CS> Ili9341 for Ili9341Spi<SPI, DC, CS>
where
    SPI: Write<u8>,
    DC: OutputPin,
    CS: OutputPin,
{
    fn command(&mut self, cmd: u8) {
        self.dc.set_low().ok().unwrap();
        self.cs.set_low().ok().unwrap();
        self.spi.write(&[cmd]).ok();
        self.cs.set_high().ok().unwrap();
    }

    fn data(&mut self, data: &[u8]) {
        self.dc.set_high().ok().unwrap();
        self.cs.set_low().ok().unwrap();
        self.spi.write(data).ok();
        self.cs.set_high().ok().unwrap();
    }
}
