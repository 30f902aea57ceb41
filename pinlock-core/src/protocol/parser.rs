// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Byte classifier for the command protocol.

use crate::protocol::messages::*;

/// Classify a single inbound byte. Commands are case-sensitive.
pub fn classify(byte: u8) -> Input {
    match byte {
        b'0'..=b'9' => Input::Digit(byte),
        CMD_ENTER => Input::Command(Command::Enter),
        CMD_CANCEL => Input::Command(Command::Cancel),
        CMD_NEW_PIN => Input::Command(Command::NewPin),
        _ => Input::Other,
    }
}
