// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART transport for the keypad protocol.
//!
//! Wraps both halves of a HAL serial port so the lock controller can poll for single bytes and
//! write one status byte per transition. Only the raw byte stream crosses this boundary.
//!
//! To talk to the lock from the host, connect to the ST-LINK USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```

use embedded_hal::serial;

use stm32f7xx_hal::serial::{Instance, Pins, Rx, Serial, Tx};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
    rx: Rx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, rx) = serial.split();
        Self { tx, rx }
    }
}

impl<U: Instance> serial::Read<u8> for Usart<U> {
    type Error = <Rx<U> as serial::Read<u8>>::Error;

    #[inline]
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        serial::Read::read(&mut self.rx)
    }
}

impl<U: Instance> serial::Write<u8> for Usart<U> {
    type Error = <Tx<U> as serial::Write<u8>>::Error;

    #[inline]
    fn write(&mut self, b: u8) -> nb::Result<(), Self::Error> {
        serial::Write::write(&mut self.tx, b)
    }

    #[inline]
    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        serial::Write::flush(&mut self.tx)
    }
}
