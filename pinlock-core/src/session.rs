// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Authentication and PIN-change state machine.
//!
//! The session consumes one inbound byte at a time and owns every piece of lock state except the
//! PIN itself, which it reaches through a [`CredentialStore`]. It has no notion of time: lockout
//! seconds arrive through [`Session::tick`], and timed messages are cleared by the caller.
//!
//! | Mode | Digits | `E` | `C` | `N` |
//! | ---- | ------ | --- | --- | --- |
//! | `Authenticating` | fill frame | verify full frame | reset | start PIN change |
//! | `VerifyOld` | fill frame, verify at 4 | ignored | back to `Authenticating` | restart |
//! | `EnterNew` | fill frame, save at 4 | ignored | back to `Authenticating` | restart |
//! | `LockedOut` | ignored | ignored | ignored | ignored |

use crate::config::Config;
use crate::credential::{CredentialStore, NvStore, Pin};
use crate::error::StorageFault;
use crate::framer::{FrameState, InputFramer};
use crate::lockout::{LockoutTimer, Tick};
use crate::protocol::{classify, Command, Input, Status};

/// Which sub-flow is accepting input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Waiting for a PIN followed by `E`
    Authenticating,
    /// PIN change: waiting for the current PIN
    VerifyOld,
    /// PIN change: waiting for the replacement PIN
    EnterNew,
    /// Too many failures; all input is dropped until the countdown ends
    LockedOut,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockStatus {
    Locked,
    Unlocked,
}

impl LockStatus {
    pub fn label(self) -> &'static str {
        match self {
            LockStatus::Locked => "LOCKED",
            LockStatus::Unlocked => "UNLOCKED",
        }
    }
}

/// Transient message shown after a completed transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    WrongPin,
    WrongOldPin,
    PinSet,
    SaveFailed,
    StorageError,
}

impl Notice {
    pub fn text(self) -> &'static str {
        match self {
            Notice::WrongPin => "Wrong PIN",
            Notice::WrongOldPin => "Wrong Old PIN",
            Notice::PinSet => "PIN Set",
            Notice::SaveFailed => "Save Failed",
            Notice::StorageError => "Storage Error",
        }
    }
}

/// A completed transition. Each one is reported exactly once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Unlocked,
    Rejected { locked_out: bool },
    WrongOldPin,
    PinSet,
    /// The new PIN could not be written; the old one is still in force.
    SaveFailed(StorageFault),
    /// The stored PIN could not be read, so the attempt was not judged.
    StorageError(StorageFault),
}

impl Outcome {
    /// Status byte owed to the controlling side, if any.
    pub fn status(self) -> Option<Status> {
        match self {
            Outcome::Unlocked => Some(Status::Unlocked),
            Outcome::Rejected { .. } => Some(Status::Rejected),
            Outcome::WrongOldPin => Some(Status::WrongOldPin),
            Outcome::PinSet => Some(Status::PinSet),
            Outcome::SaveFailed(_) | Outcome::StorageError(_) => None,
        }
    }
}

/// All lock state apart from the stored PIN.
#[derive(Clone, Debug)]
pub struct Session {
    config: Config,
    mode: Mode,
    lock: LockStatus,
    framer: InputFramer,
    lockout: LockoutTimer,
    failures: u8,
    notice: Option<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            mode: Mode::Authenticating,
            lock: LockStatus::Locked,
            framer: InputFramer::new(),
            lockout: LockoutTimer::new(),
            failures: 0,
            notice: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn lock_status(&self) -> LockStatus {
        self.lock
    }

    /// Consecutive rejected authentication attempts.
    #[inline]
    pub fn failures(&self) -> u8 {
        self.failures
    }

    /// Digits entered into the current frame.
    #[inline]
    pub fn entered(&self) -> usize {
        self.framer.len()
    }

    #[inline]
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Seconds left on the lockout countdown.
    #[inline]
    pub fn lockout_remaining(&self) -> Option<u16> {
        self.lockout.remaining()
    }

    /// Process one inbound byte.
    pub fn handle<S: NvStore>(
        &mut self,
        byte: u8,
        creds: &mut CredentialStore<S>,
    ) -> Option<Outcome> {
        if self.mode == Mode::LockedOut {
            trace!("locked out, byte dropped");
            return None;
        }

        match classify(byte) {
            Input::Digit(d) => self.on_digit(d, creds),
            Input::Command(Command::Enter) => self.on_enter(creds),
            Input::Command(Command::Cancel) => {
                self.enter_mode(Mode::Authenticating);
                None
            }
            Input::Command(Command::NewPin) => {
                self.enter_mode(Mode::VerifyOld);
                None
            }
            Input::Other => None,
        }
    }

    /// Advance the lockout countdown by one second.
    ///
    /// On expiry the failure count is cleared and the session returns to `Authenticating`.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.mode != Mode::LockedOut {
            return None;
        }

        let tick = self.lockout.tick()?;
        if tick == Tick::Expired {
            info!("lockout expired");
            self.failures = 0;
            self.enter_mode(Mode::Authenticating);
        }
        Some(tick)
    }

    /// End an unlock pulse.
    pub fn relock(&mut self) {
        self.lock = LockStatus::Locked;
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn enter_mode(&mut self, mode: Mode) {
        self.framer.reset();
        self.mode = mode;
    }

    fn on_digit<S: NvStore>(&mut self, d: u8, creds: &mut CredentialStore<S>) -> Option<Outcome> {
        if self.framer.push(d) != FrameState::Complete {
            return None;
        }

        // Authentication waits for `E`; PIN-change frames submit themselves.
        match self.mode {
            Mode::VerifyOld => self.verify_old(creds),
            Mode::EnterNew => self.store_new(creds),
            Mode::Authenticating | Mode::LockedOut => None,
        }
    }

    fn on_enter<S: NvStore>(&mut self, creds: &mut CredentialStore<S>) -> Option<Outcome> {
        if self.mode != Mode::Authenticating {
            return None;
        }
        let candidate = self.framer.frame()?;
        self.framer.reset();

        match creds.verify(&candidate) {
            Ok(true) => Some(self.grant()),
            Ok(false) => Some(self.reject()),
            Err(fault) => Some(self.storage_error(fault)),
        }
    }

    fn grant(&mut self) -> Outcome {
        info!("PIN accepted");
        self.lock = LockStatus::Unlocked;
        self.failures = 0;
        Outcome::Unlocked
    }

    fn reject(&mut self) -> Outcome {
        self.lock = LockStatus::Locked;
        self.failures = (self.failures + 1).min(self.config.max_attempts);
        self.notice = Some(Notice::WrongPin);
        warn!("wrong PIN ({}/{})", self.failures, self.config.max_attempts);

        let locked_out = self.failures >= self.config.max_attempts;
        if locked_out {
            info!("locking out for {} s", self.config.lockout_secs);
            self.lockout.enter(self.config.lockout_secs);
            self.enter_mode(Mode::LockedOut);
        }
        Outcome::Rejected { locked_out }
    }

    fn verify_old<S: NvStore>(&mut self, creds: &mut CredentialStore<S>) -> Option<Outcome> {
        let candidate = self.framer.frame()?;

        match creds.verify(&candidate) {
            Ok(true) => {
                self.enter_mode(Mode::EnterNew);
                None
            }
            Ok(false) => {
                warn!("wrong old PIN, PIN change abandoned");
                self.enter_mode(Mode::Authenticating);
                self.notice = Some(Notice::WrongOldPin);
                Some(Outcome::WrongOldPin)
            }
            Err(fault) => Some(self.storage_error(fault)),
        }
    }

    fn store_new<S: NvStore>(&mut self, creds: &mut CredentialStore<S>) -> Option<Outcome> {
        let pin: Pin = self.framer.frame()?;
        self.enter_mode(Mode::Authenticating);

        match creds.save(pin) {
            Ok(()) => {
                info!("PIN changed");
                self.notice = Some(Notice::PinSet);
                Some(Outcome::PinSet)
            }
            Err(fault) => {
                warn!("PIN change not saved: {}", fault);
                self.notice = Some(Notice::SaveFailed);
                Some(Outcome::SaveFailed(fault))
            }
        }
    }

    fn storage_error(&mut self, fault: StorageFault) -> Outcome {
        warn!("PIN record unreadable: {}", fault);
        self.enter_mode(Mode::Authenticating);
        self.notice = Some(Notice::StorageError);
        Outcome::StorageError(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemStore;

    fn fresh() -> (Session, CredentialStore<MemStore>) {
        let mut creds = CredentialStore::new(MemStore::erased());
        creds.load().unwrap();
        (Session::default(), creds)
    }

    /// Feed every byte, collecting the outcomes that were produced.
    fn feed(
        session: &mut Session,
        creds: &mut CredentialStore<MemStore>,
        bytes: &[u8],
    ) -> Vec<Outcome> {
        bytes
            .iter()
            .filter_map(|&b| session.handle(b, creds))
            .collect()
    }

    #[test]
    fn starts_locked_and_authenticating() {
        let session = Session::default();
        assert_eq!(session.mode(), Mode::Authenticating);
        assert_eq!(session.lock_status(), LockStatus::Locked);
        assert_eq!(session.failures(), 0);
    }

    #[test]
    fn correct_pin_unlocks() {
        let (mut s, mut creds) = fresh();
        assert_eq!(feed(&mut s, &mut creds, b"1234E"), [Outcome::Unlocked]);
        assert_eq!(s.lock_status(), LockStatus::Unlocked);
        assert_eq!(s.entered(), 0);
        assert_eq!(Outcome::Unlocked.status(), Some(Status::Unlocked));
    }

    #[test]
    fn digits_alone_never_submit() {
        let (mut s, mut creds) = fresh();
        assert!(feed(&mut s, &mut creds, b"1234").is_empty());
        assert_eq!(s.entered(), 4);
        assert_eq!(s.lock_status(), LockStatus::Locked);
    }

    #[test]
    fn enter_on_short_frame_is_noop() {
        let (mut s, mut creds) = fresh();
        assert!(feed(&mut s, &mut creds, b"12E").is_empty());
        assert_eq!(s.entered(), 2);
        assert_eq!(s.failures(), 0);
        assert_eq!(feed(&mut s, &mut creds, b"34E"), [Outcome::Unlocked]);
    }

    #[test]
    fn overrun_digits_are_ignored() {
        let (mut s, mut creds) = fresh();
        assert_eq!(feed(&mut s, &mut creds, b"123456E"), [Outcome::Unlocked]);
    }

    #[test]
    fn unknown_bytes_are_ignored() {
        let (mut s, mut creds) = fresh();
        assert_eq!(feed(&mut s, &mut creds, b"1 2\r3x4\nE"), [Outcome::Unlocked]);
    }

    #[test]
    fn wrong_pin_counts_failure() {
        let (mut s, mut creds) = fresh();
        assert_eq!(
            feed(&mut s, &mut creds, b"9999E"),
            [Outcome::Rejected { locked_out: false }]
        );
        assert_eq!(s.failures(), 1);
        assert_eq!(s.notice(), Some(Notice::WrongPin));
        assert_eq!(s.mode(), Mode::Authenticating);
        assert_eq!(s.entered(), 0);
    }

    #[test]
    fn success_resets_failures() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"9999E9999E");
        assert_eq!(s.failures(), 2);
        feed(&mut s, &mut creds, b"1234E");
        assert_eq!(s.failures(), 0);
    }

    #[test]
    fn third_failure_locks_out_second_does_not() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"9999E");
        assert_eq!(
            feed(&mut s, &mut creds, b"9999E"),
            [Outcome::Rejected { locked_out: false }]
        );
        assert_eq!(s.mode(), Mode::Authenticating);

        assert_eq!(
            feed(&mut s, &mut creds, b"9999E"),
            [Outcome::Rejected { locked_out: true }]
        );
        assert_eq!(s.mode(), Mode::LockedOut);
        assert_eq!(s.failures(), 3);
        assert_eq!(s.lockout_remaining(), Some(30));
    }

    #[test]
    fn lockout_ignores_all_input() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"9999E9999E9999E");

        assert!(feed(&mut s, &mut creds, b"1234ECN0").is_empty());
        assert_eq!(s.mode(), Mode::LockedOut);
        assert_eq!(s.lock_status(), LockStatus::Locked);
        assert_eq!(s.failures(), 3);
        assert_eq!(s.entered(), 0);
    }

    #[test]
    fn lockout_expiry_resets_failures() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"9999E9999E9999E");

        for left in (1..30).rev() {
            assert_eq!(s.tick(), Some(Tick::Remaining(left)));
            assert_eq!(s.mode(), Mode::LockedOut);
        }
        assert_eq!(s.tick(), Some(Tick::Expired));
        assert_eq!(s.mode(), Mode::Authenticating);
        assert_eq!(s.failures(), 0);
        assert_eq!(s.tick(), None);

        assert_eq!(feed(&mut s, &mut creds, b"1234E"), [Outcome::Unlocked]);
    }

    #[test]
    fn tick_outside_lockout_is_noop() {
        let (mut s, _) = fresh();
        assert_eq!(s.tick(), None);
    }

    #[test]
    fn configured_attempts_and_lockout() {
        let mut creds = CredentialStore::new(MemStore::erased());
        let cfg = Config::default().with_max_attempts(1).with_lockout_secs(2);
        let mut s = Session::new(cfg);

        assert_eq!(
            feed(&mut s, &mut creds, b"0000E"),
            [Outcome::Rejected { locked_out: true }]
        );
        assert_eq!(s.tick(), Some(Tick::Remaining(1)));
        assert_eq!(s.tick(), Some(Tick::Expired));
    }

    #[test]
    fn cancel_clears_entry() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"12C");
        assert_eq!(s.entered(), 0);
        assert!(feed(&mut s, &mut creds, b"34E").is_empty());
    }

    #[test]
    fn cancel_leaves_pin_change() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"N12");
        assert_eq!(s.mode(), Mode::VerifyOld);
        feed(&mut s, &mut creds, b"C");
        assert_eq!(s.mode(), Mode::Authenticating);
        assert_eq!(s.entered(), 0);

        feed(&mut s, &mut creds, b"N1234");
        assert_eq!(s.mode(), Mode::EnterNew);
        feed(&mut s, &mut creds, b"C");
        assert_eq!(s.mode(), Mode::Authenticating);
    }

    #[test]
    fn pin_change_then_authenticate_with_new_pin() {
        let (mut s, mut creds) = fresh();

        assert!(feed(&mut s, &mut creds, b"N").is_empty());
        assert_eq!(s.mode(), Mode::VerifyOld);

        // Old PIN is verified without `E`.
        assert!(feed(&mut s, &mut creds, b"1234").is_empty());
        assert_eq!(s.mode(), Mode::EnterNew);
        assert_eq!(s.entered(), 0);

        assert_eq!(feed(&mut s, &mut creds, b"5555"), [Outcome::PinSet]);
        assert_eq!(s.mode(), Mode::Authenticating);
        assert_eq!(s.notice(), Some(Notice::PinSet));
        assert_eq!(Outcome::PinSet.status(), Some(Status::PinSet));

        assert_eq!(
            feed(&mut s, &mut creds, b"1234E"),
            [Outcome::Rejected { locked_out: false }]
        );
        assert_eq!(feed(&mut s, &mut creds, b"5555E"), [Outcome::Unlocked]);
        assert_eq!(&creds.free().record(), b"5555\0");
    }

    #[test]
    fn wrong_old_pin_abandons_change() {
        let (mut s, mut creds) = fresh();
        assert_eq!(feed(&mut s, &mut creds, b"N0000"), [Outcome::WrongOldPin]);
        assert_eq!(s.mode(), Mode::Authenticating);
        assert_eq!(s.notice(), Some(Notice::WrongOldPin));
        // Not an authentication attempt.
        assert_eq!(s.failures(), 0);
        assert_eq!(Outcome::WrongOldPin.status(), Some(Status::WrongOldPin));
    }

    #[test]
    fn enter_is_ignored_during_pin_change() {
        let (mut s, mut creds) = fresh();
        assert!(feed(&mut s, &mut creds, b"N12E").is_empty());
        assert_eq!(s.mode(), Mode::VerifyOld);
        assert_eq!(s.entered(), 2);
        assert!(feed(&mut s, &mut creds, b"34E56E").is_empty());
        assert_eq!(s.mode(), Mode::EnterNew);
        assert_eq!(s.entered(), 2);
    }

    #[test]
    fn new_pin_request_restarts_change() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"N1234");
        assert_eq!(s.mode(), Mode::EnterNew);
        feed(&mut s, &mut creds, b"55N");
        assert_eq!(s.mode(), Mode::VerifyOld);
        assert_eq!(s.entered(), 0);
    }

    #[test]
    fn new_pin_request_discards_auth_entry() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"12N");
        assert_eq!(s.mode(), Mode::VerifyOld);
        assert_eq!(s.entered(), 0);
    }

    #[test]
    fn failed_save_keeps_old_pin() {
        let mut store = MemStore::with_record(b"1234\0");
        store.fail_writes = true;
        let mut creds = CredentialStore::new(store);
        let mut s = Session::default();

        let out = feed(&mut s, &mut creds, b"N12345555");
        assert_eq!(out, [Outcome::SaveFailed(StorageFault::Write)]);
        assert_eq!(out[0].status(), None);
        assert_eq!(s.notice(), Some(Notice::SaveFailed));
        assert_eq!(s.mode(), Mode::Authenticating);
        assert_eq!(feed(&mut s, &mut creds, b"1234E"), [Outcome::Unlocked]);
    }

    #[test]
    fn unreadable_store_is_not_a_failed_attempt() {
        let mut store = MemStore::erased();
        store.fail_reads = true;
        let mut creds = CredentialStore::new(store);
        let mut s = Session::default();

        let out = feed(&mut s, &mut creds, b"1234E");
        assert_eq!(out, [Outcome::StorageError(StorageFault::Read)]);
        assert_eq!(out[0].status(), None);
        assert_eq!(s.failures(), 0);
        assert_eq!(s.lock_status(), LockStatus::Locked);
        assert_eq!(s.notice(), Some(Notice::StorageError));
    }

    #[test]
    fn relock_and_clear_notice() {
        let (mut s, mut creds) = fresh();
        feed(&mut s, &mut creds, b"1234E");
        s.relock();
        assert_eq!(s.lock_status(), LockStatus::Locked);

        feed(&mut s, &mut creds, b"0000E");
        s.clear_notice();
        assert_eq!(s.notice(), None);
    }
}
