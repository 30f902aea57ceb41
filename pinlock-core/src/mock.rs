// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! In-memory collaborators for host tests. Fixed-size and allocation-free, so the module also
//! builds for the target with the `mock` feature.

use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial;

use crate::config::RECORD_LEN;
use crate::credential::NvStore;
use crate::display::CharDisplay;

const MEM_LEN: usize = 32;

/// Byte-addressable store with injectable faults.
#[derive(Clone, Debug)]
pub struct MemStore {
    pub mem: [u8; MEM_LEN],
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Successful writes so far
    pub writes: usize,
}

impl MemStore {
    fn filled(byte: u8) -> Self {
        Self {
            mem: [byte; MEM_LEN],
            fail_reads: false,
            fail_writes: false,
            writes: 0,
        }
    }

    /// Fresh flash: every byte reads `0xFF`.
    pub fn erased() -> Self {
        Self::filled(0xFF)
    }

    /// Fresh EEPROM that reads back zeros.
    pub fn zeroed() -> Self {
        Self::filled(0x00)
    }

    /// Store whose PIN record at address 0 holds `record`.
    pub fn with_record(record: &[u8; RECORD_LEN]) -> Self {
        let mut store = Self::erased();
        store.mem[..RECORD_LEN].copy_from_slice(record);
        store
    }

    /// The record at address 0.
    pub fn record(&self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        record.copy_from_slice(&self.mem[..RECORD_LEN]);
        record
    }

    fn span(&self, addr: u32, len: usize) -> Result<core::ops::Range<usize>, ()> {
        let start = addr as usize;
        let end = start.checked_add(len).ok_or(())?;
        if end > MEM_LEN {
            return Err(());
        }
        Ok(start..end)
    }
}

impl NvStore for MemStore {
    type Error = ();

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), ()> {
        if self.fail_reads {
            return Err(());
        }
        let span = self.span(addr, buf.len())?;
        buf.copy_from_slice(&self.mem[span]);
        Ok(())
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), ()> {
        if self.fail_writes {
            return Err(());
        }
        let span = self.span(addr, data.len())?;
        self.mem[span].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}

const SERIAL_CAP: usize = 128;

/// Loopback-free serial port: tests queue inbound bytes and inspect what was sent.
#[derive(Clone, Debug)]
pub struct Serial {
    rx: [u8; SERIAL_CAP],
    rx_head: usize,
    rx_len: usize,
    tx: [u8; SERIAL_CAP],
    tx_len: usize,
    /// Report a receive error on the next read
    pub fail_next_read: bool,
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            rx: [0; SERIAL_CAP],
            rx_head: 0,
            rx_len: 0,
            tx: [0; SERIAL_CAP],
            tx_len: 0,
            fail_next_read: false,
        }
    }
}

impl Serial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue inbound bytes. Bytes past capacity are dropped, like a full UART FIFO.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.copy_within(self.rx_head..self.rx_len, 0);
        self.rx_len -= self.rx_head;
        self.rx_head = 0;

        for &b in bytes {
            if self.rx_len == SERIAL_CAP {
                break;
            }
            self.rx[self.rx_len] = b;
            self.rx_len += 1;
        }
    }

    /// Inbound bytes not yet read.
    pub fn pending(&self) -> usize {
        self.rx_len - self.rx_head
    }

    /// Everything written so far.
    pub fn sent(&self) -> &[u8] {
        &self.tx[..self.tx_len]
    }

    pub fn clear_sent(&mut self) {
        self.tx_len = 0;
    }
}

impl serial::Read<u8> for Serial {
    type Error = ();

    fn read(&mut self) -> nb::Result<u8, ()> {
        if self.fail_next_read {
            self.fail_next_read = false;
            return Err(nb::Error::Other(()));
        }
        if self.rx_head == self.rx_len {
            return Err(nb::Error::WouldBlock);
        }
        let b = self.rx[self.rx_head];
        self.rx_head += 1;
        Ok(b)
    }
}

impl serial::Write<u8> for Serial {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        if self.tx_len < SERIAL_CAP {
            self.tx[self.tx_len] = word;
            self.tx_len += 1;
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

const COLS: usize = 16;
const ROWS: usize = 2;

/// 16x2 character grid.
#[derive(Clone, Debug)]
pub struct Lcd {
    cells: [[u8; COLS]; ROWS],
    row: usize,
    col: usize,
    pub clears: usize,
}

impl Default for Lcd {
    fn default() -> Self {
        Self {
            cells: [[b' '; COLS]; ROWS],
            row: 0,
            col: 0,
            clears: 0,
        }
    }
}

impl Lcd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row contents without trailing blanks.
    pub fn line(&self, row: usize) -> &str {
        core::str::from_utf8(&self.cells[row])
            .unwrap_or_default()
            .trim_end()
    }
}

impl CharDisplay for Lcd {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        self.cells = [[b' '; COLS]; ROWS];
        self.row = 0;
        self.col = 0;
        self.clears += 1;
        Ok(())
    }

    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), Infallible> {
        self.row = (row as usize).min(ROWS - 1);
        self.col = col as usize;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), Infallible> {
        for &b in text.as_bytes() {
            if self.col < COLS {
                self.cells[self.row][self.col] = b;
            }
            self.col += 1;
        }
        Ok(())
    }
}

/// Output pin that remembers its level.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gpio {
    pub high: bool,
}

impl OutputPin for Gpio {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}
