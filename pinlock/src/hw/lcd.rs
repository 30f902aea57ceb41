// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! HD44780 16x2 character LCD driven in 4-bit mode.
//!
//! RW is strapped low, so the busy flag is never read and every command is followed by a fixed
//! delay long enough for the slowest controller variant.

use cortex_m::asm;
use embedded_hal::digital::v2::OutputPin;

use pinlock_core::CharDisplay;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY_ON: u8 = 0x0C; // cursor off, blink off
const CMD_FUNCTION_SET: u8 = 0x28; // 4-bit, 2 lines, 5x8 font
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];
pub const COLUMNS: u8 = 16;

/// A control or data line could not be driven.
#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
pub struct PinError;

pub struct Hd44780<RS, EN, D4, D5, D6, D7> {
    rs: RS,
    en: EN,
    data: (D4, D5, D6, D7),
    cycles_per_us: u32,
}

impl<RS, EN, D4, D5, D6, D7> Hd44780<RS, EN, D4, D5, D6, D7>
where
    RS: OutputPin,
    EN: OutputPin,
    D4: OutputPin,
    D5: OutputPin,
    D6: OutputPin,
    D7: OutputPin,
{
    /// Wrap the pins. Call [`Hd44780::init`] before drawing.
    pub fn new(rs: RS, en: EN, d4: D4, d5: D5, d6: D6, d7: D7, sysclk_hz: u32) -> Self {
        Self {
            rs,
            en,
            data: (d4, d5, d6, d7),
            cycles_per_us: (sysclk_hz / 1_000_000).max(1),
        }
    }

    /// Power-on reset sequence into 4-bit mode.
    pub fn init(&mut self) -> Result<(), PinError> {
        self.delay_us(50_000);
        self.rs.set_low().map_err(|_| PinError)?;
        self.en.set_low().map_err(|_| PinError)?;

        // Three 8-bit "function set" nibbles resynchronize the interface from any state.
        self.write_nibble(0x3)?;
        self.delay_us(4_500);
        self.write_nibble(0x3)?;
        self.delay_us(150);
        self.write_nibble(0x3)?;
        self.delay_us(150);
        self.write_nibble(0x2)?;
        self.delay_us(150);

        self.command(CMD_FUNCTION_SET)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear_screen()?;
        self.command(CMD_ENTRY_MODE)
    }

    fn delay_us(&self, us: u32) {
        asm::delay(us.saturating_mul(self.cycles_per_us));
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), PinError> {
        set(&mut self.data.0, nibble & 0x1 != 0)?;
        set(&mut self.data.1, nibble & 0x2 != 0)?;
        set(&mut self.data.2, nibble & 0x4 != 0)?;
        set(&mut self.data.3, nibble & 0x8 != 0)?;

        self.en.set_high().map_err(|_| PinError)?;
        self.delay_us(1);
        self.en.set_low().map_err(|_| PinError)?;
        self.delay_us(1);
        Ok(())
    }

    fn write_byte(&mut self, b: u8, is_data: bool) -> Result<(), PinError> {
        set(&mut self.rs, is_data)?;
        self.write_nibble(b >> 4)?;
        self.write_nibble(b & 0x0F)?;
        self.delay_us(50);
        Ok(())
    }

    fn command(&mut self, cmd: u8) -> Result<(), PinError> {
        self.write_byte(cmd, false)
    }

    fn clear_screen(&mut self) -> Result<(), PinError> {
        self.command(CMD_CLEAR)?;
        self.delay_us(2_000);
        Ok(())
    }
}

fn set<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), PinError> {
    if high {
        pin.set_high().map_err(|_| PinError)
    } else {
        pin.set_low().map_err(|_| PinError)
    }
}

impl<RS, EN, D4, D5, D6, D7> CharDisplay for Hd44780<RS, EN, D4, D5, D6, D7>
where
    RS: OutputPin,
    EN: OutputPin,
    D4: OutputPin,
    D5: OutputPin,
    D6: OutputPin,
    D7: OutputPin,
{
    type Error = PinError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.clear_screen()
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), Self::Error> {
        let base = ROW_OFFSETS[usize::from(row.min(1))];
        self.command(CMD_SET_DDRAM | (base + col.min(COLUMNS - 1)))
    }

    fn print(&mut self, s: &str) -> Result<(), Self::Error> {
        for &b in s.as_bytes() {
            self.write_byte(b, true)?;
        }
        Ok(())
    }
}
