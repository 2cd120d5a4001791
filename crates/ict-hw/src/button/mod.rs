//! Button input module.
//!
//! Debounced, edge-triggered polling of the six table buttons.

mod debounce;

pub use debounce::{ButtonEngine, ButtonHandler};

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of buttons on the table.
pub const NUM_BUTTONS: usize = 6;

/// Table buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Button {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Red = 4,
    Blue = 5,
}

impl Button {
    /// Every button, in index order.
    pub const ALL: [Button; NUM_BUTTONS] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Red,
        Button::Blue,
    ];

    /// Returns the storage index of this button.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a raw index to a button.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidButton(index))
    }
}

impl FromStr for Button {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Button::Up),
            "down" => Ok(Button::Down),
            "left" => Ok(Button::Left),
            "right" => Ok(Button::Right),
            "red" => Ok(Button::Red),
            "blue" => Ok(Button::Blue),
            _ => Err(Error::InvalidName {
                kind: "button",
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Button::Up => write!(f, "up"),
            Button::Down => write!(f, "down"),
            Button::Left => write!(f, "left"),
            Button::Right => write!(f, "right"),
            Button::Red => write!(f, "red"),
            Button::Blue => write!(f, "blue"),
        }
    }
}

/// Source of raw button pin levels.
///
/// Buttons are wired active-low with pull-ups: `false` means the contact is
/// closed (pressed).
pub trait RawInput {
    /// Samples the electrical level of a button pin.
    fn read_raw(&mut self, button: Button) -> bool;
}

impl<F> RawInput for F
where
    F: FnMut(Button) -> bool,
{
    fn read_raw(&mut self, button: Button) -> bool {
        self(button)
    }
}
