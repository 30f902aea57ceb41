// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # PinLock Core
//!
//! Platform-agnostic logic for the PinLock serial keypad lock. Nothing in this crate touches a
//! peripheral directly: the transport, display, PIN storage and LED are reached through traits,
//! so the whole state machine builds and tests on the host.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`protocol`] | Command bytes in, status bytes out |
//! | [`credential`] | PIN record persistence with first-boot provisioning |
//! | [`framer`] | Fixed-length digit entry |
//! | [`lockout`] | One-second countdown after repeated failures |
//! | [`session`] | The authentication / PIN-change state machine |
//! | [`display`] | Projection of the session onto a 16x2 character display |
//! | [`indicator`] | Unlock LED |
//! | [`lock`] | Cooperative control loop tying it all together |
//!
//! ## Testing
//!
//! ```bash
//! cargo test -p pinlock-core
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod credential;
pub mod display;
pub mod error;
pub mod framer;
pub mod indicator;
pub mod lock;
pub mod lockout;
pub mod protocol;
pub mod session;
pub mod time;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use config::Config;
pub use credential::{CredentialStore, NvStore, Pin};
pub use display::{CharDisplay, Screen};
pub use error::{Error, StorageFault};
pub use indicator::Indicator;
pub use lock::Lock;
pub use session::{LockStatus, Mode, Notice, Outcome, Session};
pub use time::{Duration, Instant};
