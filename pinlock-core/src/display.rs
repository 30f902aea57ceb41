// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! What the 16x2 character display shows.
//!
//! [`Screen::of`] is a pure projection of the [`Session`]; [`Screen::draw`] pushes it through any
//! [`CharDisplay`]. Row 0 carries the lock status, row 1 the prompt, masked entry, a transient
//! notice or the lockout countdown.

use crate::config::PASSWORD_LENGTH;
use crate::session::{LockStatus, Mode, Notice, Session};

/// Position-addressable character output.
pub trait CharDisplay {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;
    fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), Self::Error>;
    fn print(&mut self, text: &str) -> Result<(), Self::Error>;
}

const MASK: &str = "****";
const LABEL_COL: u8 = 8;

/// Second-row content.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Detail {
    /// `Enter PIN:`
    Prompt,
    /// One `*` per digit entered
    Masked(usize),
    /// `Old PIN:` followed by masks
    OldPin(usize),
    /// `New PIN:` followed by masks
    NewPin(usize),
    Notice(Notice),
    /// `Locked Out: NN s`
    Countdown(u16),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Screen {
    pub status: LockStatus,
    pub detail: Detail,
}

impl Screen {
    /// Project the session onto the display. Notices take precedence over everything else.
    pub fn of(session: &Session) -> Self {
        let entered = session.entered();
        let detail = match (session.notice(), session.mode()) {
            (Some(notice), _) => Detail::Notice(notice),
            (None, Mode::LockedOut) => Detail::Countdown(session.lockout_remaining().unwrap_or(0)),
            (None, Mode::VerifyOld) => Detail::OldPin(entered),
            (None, Mode::EnterNew) => Detail::NewPin(entered),
            (None, Mode::Authenticating) if entered == 0 => Detail::Prompt,
            (None, Mode::Authenticating) => Detail::Masked(entered),
        };

        Self {
            status: session.lock_status(),
            detail,
        }
    }

    /// Redraw both rows from scratch.
    pub fn draw<D: CharDisplay>(&self, lcd: &mut D) -> Result<(), D::Error> {
        lcd.clear()?;
        lcd.set_cursor(0, 0)?;
        lcd.print(self.status.label())?;

        lcd.set_cursor(1, 0)?;
        match self.detail {
            Detail::Prompt => lcd.print("Enter PIN:"),
            Detail::Masked(n) => lcd.print(masks(n)),
            Detail::OldPin(n) => labelled(lcd, "Old PIN:", n),
            Detail::NewPin(n) => labelled(lcd, "New PIN:", n),
            Detail::Notice(notice) => lcd.print(notice.text()),
            Detail::Countdown(secs) => {
                let mut buf = itoa::Buffer::new();
                let digits = buf.format(secs);
                lcd.print("Locked Out: ")?;
                if digits.len() < 2 {
                    lcd.print(" ")?;
                }
                lcd.print(digits)?;
                lcd.print(" s")
            }
        }
    }
}

fn labelled<D: CharDisplay>(lcd: &mut D, label: &str, n: usize) -> Result<(), D::Error> {
    lcd.print(label)?;
    lcd.set_cursor(1, LABEL_COL)?;
    lcd.print(masks(n))
}

#[inline]
fn masks(n: usize) -> &'static str {
    &MASK[..n.min(PASSWORD_LENGTH)]
}
