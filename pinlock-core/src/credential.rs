// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PIN persistence.
//!
//! The PIN lives in a fixed-size record of [`RECORD_LEN`] bytes (four ASCII digits and a NUL) at
//! [`PIN_RECORD_ADDR`] of a byte-addressable non-volatile store. An erased record (first byte
//! `0xFF` or `0x00`) means the device has never been provisioned: [`CredentialStore::load`] then
//! writes [`DEFAULT_PIN`] and returns it.
//!
//! Example:
//! ```ignore
//! let mut creds = CredentialStore::new(flash);
//! let pin = creds.load()?;
//! ```

use core::fmt;

use crate::config::{DEFAULT_PIN, PASSWORD_LENGTH, PIN_RECORD_ADDR, RECORD_LEN};
use crate::error::StorageFault;

/// Byte-addressable non-volatile storage.
///
/// Wear-leveling and redundancy, if any, are the implementor's business.
pub trait NvStore {
    type Error;

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), Self::Error>;
}

/// A PIN: exactly [`PASSWORD_LENGTH`] ASCII digits.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Pin([u8; PASSWORD_LENGTH]);

impl Pin {
    pub const DEFAULT: Pin = Pin(DEFAULT_PIN);

    /// Returns `None` unless every byte is an ASCII digit.
    pub fn new(digits: [u8; PASSWORD_LENGTH]) -> Option<Self> {
        if digits.iter().all(u8::is_ascii_digit) {
            Some(Self(digits))
        } else {
            None
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; PASSWORD_LENGTH] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Compare without an early exit on the first differing digit.
    pub fn matches(&self, other: &Pin) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    fn from_record(record: &[u8; RECORD_LEN]) -> Option<Self> {
        if is_erased(record) {
            return None;
        }
        let mut digits = [0u8; PASSWORD_LENGTH];
        digits.copy_from_slice(&record[..PASSWORD_LENGTH]);
        Self::new(digits)
    }

    fn to_record(self) -> [u8; RECORD_LEN] {
        let mut record = [0u8; RECORD_LEN];
        record[..PASSWORD_LENGTH].copy_from_slice(&self.0);
        record
    }
}

impl TryFrom<&str> for Pin {
    type Error = ();

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let digits: [u8; PASSWORD_LENGTH] = s.as_bytes().try_into().map_err(|_| ())?;
        Pin::new(digits).ok_or(())
    }
}

// Never print the digits.
impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Pin {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Pin(****)")
    }
}

/// First byte of a never-written record: flash reads back all ones, some EEPROMs all zeros.
#[inline]
fn is_erased(record: &[u8]) -> bool {
    matches!(record.first(), Some(0xFF) | Some(0x00))
}

/// Owner of the stored PIN, with an in-memory copy that is refreshed on every write.
pub struct CredentialStore<S> {
    store: S,
    addr: u32,
    cached: Option<Pin>,
}

impl<S: NvStore> CredentialStore<S> {
    /// Use the record at [`PIN_RECORD_ADDR`].
    pub fn new(store: S) -> Self {
        Self::at(store, PIN_RECORD_ADDR)
    }

    /// Use the record at `addr`.
    pub fn at(store: S, addr: u32) -> Self {
        Self {
            store,
            addr,
            cached: None,
        }
    }

    /// Return the stored PIN, provisioning [`DEFAULT_PIN`] if the record is erased.
    ///
    /// A record that is neither erased nor four digits is also re-provisioned, so the returned PIN
    /// is always valid.
    pub fn load(&mut self) -> Result<Pin, StorageFault> {
        if let Some(pin) = self.cached {
            return Ok(pin);
        }

        let mut record = [0u8; RECORD_LEN];
        self.store
            .read(self.addr, &mut record)
            .map_err(|_| StorageFault::Read)?;

        let pin = match Pin::from_record(&record) {
            Some(pin) => pin,
            None => {
                if is_erased(&record) {
                    info!("PIN record erased, provisioning default");
                } else {
                    warn!("PIN record corrupt, provisioning default");
                }
                self.write_record(Pin::DEFAULT)?;
                Pin::DEFAULT
            }
        };

        self.cached = Some(pin);
        Ok(pin)
    }

    /// Persist `pin`. The cached copy changes only if the write succeeded.
    pub fn save(&mut self, pin: Pin) -> Result<(), StorageFault> {
        self.write_record(pin)?;
        self.cached = Some(pin);
        Ok(())
    }

    /// Check a candidate against the stored PIN.
    pub fn verify(&mut self, candidate: &Pin) -> Result<bool, StorageFault> {
        Ok(self.load()?.matches(candidate))
    }

    fn write_record(&mut self, pin: Pin) -> Result<(), StorageFault> {
        self.store
            .write(self.addr, &pin.to_record())
            .map_err(|_| StorageFault::Write)
    }

    pub fn free(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemStore;

    fn pin(s: &str) -> Pin {
        Pin::try_from(s).unwrap()
    }

    #[test]
    fn pin_rejects_non_digits() {
        assert!(Pin::new(*b"12a4").is_none());
        assert!(Pin::try_from("123").is_err());
        assert!(Pin::try_from("12345").is_err());
        assert_eq!(pin("0042").as_str(), "0042");
    }

    #[test]
    fn pin_debug_is_masked() {
        assert_eq!(format!("{:?}", pin("9876")), "Pin(****)");
    }

    #[test]
    fn load_provisions_default_on_erased_flash() {
        let mut creds = CredentialStore::new(MemStore::erased());
        assert_eq!(creds.load().unwrap().as_str(), "1234");

        let store = creds.free();
        assert_eq!(&store.record(), b"1234\0");

        // A fresh store over the same memory sees the provisioned PIN without rewriting it.
        let writes = store.writes;
        let mut creds = CredentialStore::new(store);
        assert_eq!(creds.load().unwrap().as_str(), "1234");
        assert_eq!(creds.free().writes, writes);
    }

    #[test]
    fn load_provisions_default_on_zeroed_eeprom() {
        let mut creds = CredentialStore::new(MemStore::zeroed());
        assert_eq!(creds.load().unwrap(), Pin::DEFAULT);
        assert_eq!(&creds.free().record(), b"1234\0");
    }

    #[test]
    fn load_reprovisions_corrupt_record() {
        let mut creds = CredentialStore::new(MemStore::with_record(b"7x9?\0"));
        assert_eq!(creds.load().unwrap(), Pin::DEFAULT);
        assert_eq!(&creds.free().record(), b"1234\0");
    }

    #[test]
    fn load_keeps_existing_record() {
        let mut creds = CredentialStore::new(MemStore::with_record(b"8080\0"));
        assert_eq!(creds.load().unwrap().as_str(), "8080");
        assert_eq!(creds.free().writes, 0);
    }

    #[test]
    fn save_updates_cache_and_backing() {
        let mut creds = CredentialStore::new(MemStore::erased());
        creds.load().unwrap();
        creds.save(pin("5555")).unwrap();
        assert_eq!(creds.load().unwrap().as_str(), "5555");
        assert_eq!(&creds.free().record(), b"5555\0");
    }

    #[test]
    fn failed_save_leaves_pin_unchanged() {
        let mut creds = CredentialStore::new(MemStore::with_record(b"1111\0"));
        creds.load().unwrap();
        creds.store.fail_writes = true;

        assert_eq!(creds.save(pin("2222")), Err(StorageFault::Write));
        assert!(creds.verify(&pin("1111")).unwrap());
        assert!(!creds.verify(&pin("2222")).unwrap());
    }

    #[test]
    fn read_fault_is_reported() {
        let mut store = MemStore::erased();
        store.fail_reads = true;
        let mut creds = CredentialStore::new(store);
        assert_eq!(creds.load(), Err(StorageFault::Read));
    }

    #[test]
    fn provisioning_write_fault_is_reported() {
        let mut store = MemStore::erased();
        store.fail_writes = true;
        let mut creds = CredentialStore::new(store);
        assert_eq!(creds.load(), Err(StorageFault::Write));
    }

    #[test]
    fn record_at_custom_address() {
        let mut creds = CredentialStore::at(MemStore::erased(), 8);
        creds.save(pin("4321")).unwrap();
        let store = creds.free();
        assert_eq!(&store.mem[8..13], b"4321\0");
        assert_eq!(store.mem[0], 0xFF);
    }
}
