// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PIN record storage in on-chip flash.
//!
//! The record lives at the start of the last 256 KiB sector (sector 11 in single-bank mode), well
//! clear of the firmware image. Flash can only be cleared a whole sector at a time, so a write
//! reads back the small window at the start of the sector, patches it, erases, and reprograms it.

use core::ptr;

use pinlock_core::NvStore;
use stm32f7xx_hal::flash::{self, Flash};

const FLASH_BASE: usize = 0x0800_0000;
const SECTOR: u8 = 11;
const SECTOR_BASE: usize = 0x081C_0000;

/// Bytes preserved across a rewrite.
const WINDOW: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq, defmt::Format)]
pub enum RecordError {
    /// Access falls outside the preserved window.
    OutOfRange,
    /// Read-back after programming did not match.
    Verify,
    /// Erase or program reported an error.
    Flash,
}

pub struct FlashRecord {
    flash: Flash,
}

impl FlashRecord {
    pub fn new(flash: Flash) -> Self {
        Self { flash }
    }

    fn window(addr: u32, len: usize) -> Result<core::ops::Range<usize>, RecordError> {
        let start = addr as usize;
        match start.checked_add(len) {
            Some(end) if end <= WINDOW => Ok(start..end),
            _ => Err(RecordError::OutOfRange),
        }
    }

    fn read_window(&self) -> [u8; WINDOW] {
        let mut buf = [0u8; WINDOW];
        for (i, b) in buf.iter_mut().enumerate() {
            // SAFETY: the sector is memory-mapped and always readable.
            *b = unsafe { ptr::read_volatile((SECTOR_BASE + i) as *const u8) };
        }
        buf
    }

    fn rewrite(&mut self, buf: &[u8; WINDOW]) -> Result<(), flash::Error> {
        self.flash.blocking_erase_sector(SECTOR)?;
        self.flash.blocking_program(SECTOR_BASE - FLASH_BASE, buf)
    }
}

impl NvStore for FlashRecord {
    type Error = RecordError;

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        let range = Self::window(addr, buf.len())?;
        buf.copy_from_slice(&self.read_window()[range]);
        Ok(())
    }

    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), Self::Error> {
        let range = Self::window(addr, data.len())?;
        let mut buf = self.read_window();
        buf[range].copy_from_slice(data);

        self.flash.unlock();
        let res = self.rewrite(&buf);
        self.flash.lock();

        let res = match res {
            Err(_) => Err(RecordError::Flash),
            Ok(()) if self.read_window() != buf => Err(RecordError::Verify),
            Ok(()) => Ok(()),
        };
        if let Err(e) = res {
            defmt::warn!("flash write at {=u32}: {}", addr, e);
        }
        res
    }
}
