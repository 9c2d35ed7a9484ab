//! The four single-digit OTP boxes and their focus behaviour.

use serde::{Deserialize, Serialize};

pub const OTP_LEN: usize = 4;

/// Four one-character boxes plus the index of the focused one.
///
/// A digit typed into a box moves focus right; Backspace in an empty box
/// moves focus left. Anything that is not a single digit is refused and
/// leaves both contents and focus untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpInput {
    boxes: [Option<char>; OTP_LEN],
    focus: usize,
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn digit(&self, index: usize) -> Option<char> {
        self.boxes.get(index).copied().flatten()
    }

    /// Apply what the user typed into box `index`. Empty text clears the
    /// box. Returns whether the input was accepted.
    pub fn input(&mut self, index: usize, text: &str) -> bool {
        if index >= OTP_LEN {
            return false;
        }
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (None, _) => {
                self.boxes[index] = None;
                self.focus = index;
                true
            }
            (Some(c), None) if c.is_ascii_digit() => {
                self.boxes[index] = Some(c);
                self.focus = (index + 1).min(OTP_LEN - 1);
                true
            }
            _ => false,
        }
    }

    /// Backspace in box `index`: clear it, or step back when already empty.
    pub fn backspace(&mut self, index: usize) -> bool {
        if index >= OTP_LEN {
            return false;
        }
        if self.boxes[index].take().is_some() {
            self.focus = index;
            return true;
        }
        if index > 0 {
            self.focus = index - 1;
            return true;
        }
        false
    }

    /// Filled digits joined left to right.
    pub fn value(&self) -> String {
        self.boxes.iter().flatten().collect()
    }

    pub fn filled(&self) -> usize {
        self.boxes.iter().flatten().count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled() == OTP_LEN
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
