// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # PinLock Firmware
//!
//! Board support for the PinLock serial keypad lock on a NUCLEO-F767ZI. The lock logic itself
//! lives in `pinlock-core`; this crate binds it to USART3, an HD44780 LCD, on-chip flash and the
//! board LEDs.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around USART, flash, SysTick, GPIO and the LCD |
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc -p pinlock --no-deps --open
//! ```
//!
//! Flash the board (from this directory, so `.cargo/config.toml` applies):
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod hw;
