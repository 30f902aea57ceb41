// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Cooperative control loop.
//!
//! [`Lock`] owns the collaborators and the [`Session`] and exposes a single non-blocking
//! [`poll`](Lock::poll) that the firmware calls from its main loop with the current time. Each
//! call does at most one unit of work: read and process one byte, finish a timed hold, or deliver
//! one lockout second.
//!
//! Message pauses and the lockout are deadlines rather than busy waits. Bytes that arrive while
//! one is pending are read and discarded, never queued: the serial protocol is at-most-once with
//! no retransmission, and the controlling side has to resend after it sees the lock respond again.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! lock.start(clock.now())?;
//!
//! loop {
//!     if let Err(e) = lock.poll(clock.now()) {
//!         defmt::warn!("poll: {}", e);
//!     }
//! }
//! ```

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial;

use crate::config::Config;
use crate::credential::{CredentialStore, NvStore};
use crate::display::{CharDisplay, Screen};
use crate::error::Error;
use crate::indicator::Indicator;
use crate::lockout::Tick;
use crate::session::{Mode, Outcome, Session};
use crate::time::{Duration, Instant};

const TICK: Duration = Duration::secs(1);

/// A timed pause during which input is dropped.
#[derive(Copy, Clone, Debug)]
struct Hold {
    until: Instant,
    /// End of an unlock pulse: relock and turn the LED off
    relock: bool,
}

pub struct Lock<T, D, S, P: OutputPin> {
    transport: T,
    display: D,
    creds: CredentialStore<S>,
    led: Indicator<P>,
    session: Session,
    hold: Option<Hold>,
    next_tick: Option<Instant>,
    dropped: u32,
}

impl<T, D, S, P> Lock<T, D, S, P>
where
    T: serial::Read<u8> + serial::Write<u8>,
    D: CharDisplay,
    S: NvStore,
    P: OutputPin,
{
    pub fn new(transport: T, display: D, store: S, led: Indicator<P>, config: Config) -> Self {
        Self {
            transport,
            display,
            creds: CredentialStore::new(store),
            led,
            session: Session::new(config),
            hold: None,
            next_tick: None,
            dropped: 0,
        }
    }

    /// Load (or provision) the PIN and draw the idle screen.
    ///
    /// A storage fault is returned so the caller can retry; the lock stays usable either way,
    /// since the PIN is read again on the first attempt.
    pub fn start(&mut self, _now: Instant) -> Result<(), Error> {
        self.led.set(false);
        self.refresh();
        self.creds.load()?;
        info!("lock ready");
        Ok(())
    }

    /// Run one iteration of the control loop.
    pub fn poll(&mut self, now: Instant) -> Result<(), Error> {
        if let Some(hold) = self.hold {
            self.drain();
            if now < hold.until {
                return Ok(());
            }
            self.finish_hold(hold, now);
            return Ok(());
        }

        if self.session.mode() == Mode::LockedOut {
            self.drain();
            self.countdown(now);
            return Ok(());
        }

        let byte = match self.transport.read() {
            Ok(byte) => byte,
            Err(nb::Error::WouldBlock) => return Ok(()),
            Err(nb::Error::Other(_)) => return Err(Error::Transport),
        };

        let outcome = self.session.handle(byte, &mut self.creds);
        let result = match outcome {
            Some(outcome) => self.complete(outcome, now),
            None => Ok(()),
        };
        self.refresh();
        result
    }

    /// Emit the status byte, drive the LED and start the message hold.
    fn complete(&mut self, outcome: Outcome, now: Instant) -> Result<(), Error> {
        debug!("transition: {}", outcome);
        let unlocked = outcome == Outcome::Unlocked;
        if unlocked {
            self.led.set(true);
        }
        self.hold = Some(Hold {
            until: now + self.session.config().message,
            relock: unlocked,
        });

        if let Some(status) = outcome.status() {
            nb::block!(self.transport.write(status.as_byte())).map_err(|_| Error::Transport)?;
        }
        Ok(())
    }

    fn finish_hold(&mut self, hold: Hold, now: Instant) {
        self.hold = None;
        if hold.relock {
            self.session.relock();
            self.led.set(false);
        }
        self.session.clear_notice();
        if self.session.mode() == Mode::LockedOut {
            self.next_tick = Some(now + TICK);
        }
        self.refresh();
    }

    fn countdown(&mut self, now: Instant) {
        let mut due = *self.next_tick.get_or_insert(now + TICK);
        if now < due {
            return;
        }

        // Catch up from the previous deadline so a late poll does not stretch the lockout.
        while now >= due {
            match self.session.tick() {
                Some(Tick::Remaining(_)) => due = due + TICK,
                Some(Tick::Expired) | None => {
                    self.next_tick = None;
                    self.refresh();
                    return;
                }
            }
        }
        self.next_tick = Some(due);
        self.refresh();
    }

    /// Read and discard whatever the transport has buffered.
    fn drain(&mut self) {
        while let Ok(_byte) = self.transport.read() {
            self.dropped = self.dropped.wrapping_add(1);
            trace!("dropped byte {=u8:#x}", _byte);
        }
    }

    fn refresh(&mut self) {
        Screen::of(&self.session).draw(&mut self.display).ok();
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Bytes discarded because they arrived during a hold or lockout.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    #[inline]
    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    #[inline]
    pub fn led(&self) -> &Indicator<P> {
        &self.led
    }

    #[inline]
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Access the transport, e.g. to inject bytes in tests.
    #[inline]
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn free(self) -> (T, D, S, P) {
        (
            self.transport,
            self.display,
            self.creds.free(),
            self.led.free(),
        )
    }
}
