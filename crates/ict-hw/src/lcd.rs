//! Character LCDs.
//!
//! The table carries a 20x4 and a 40x2 HD44780-style display. Text
//! rendering belongs to the [`TextDisplay`] collaborator; this module only
//! knows which display is which and how big it is.

use crate::{Error, Result};
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

/// Number of character displays.
pub const NUM_LCDS: usize = 2;

/// Character displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Lcd {
    /// 20 columns x 4 rows.
    #[serde(rename = "20x4")]
    Lcd20x4 = 0,
    /// 40 columns x 2 rows.
    #[serde(rename = "40x2")]
    Lcd40x2 = 1,
}

impl Lcd {
    /// Every display, in index order.
    pub const ALL: [Lcd; NUM_LCDS] = [Lcd::Lcd20x4, Lcd::Lcd40x2];

    /// Returns the storage index of this display.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a raw index to a display.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL.get(index).copied().ok_or(Error::InvalidLcd(index))
    }

    /// Returns the display size as (columns, rows).
    pub fn dimensions(&self) -> (u8, u8) {
        match self {
            Lcd::Lcd20x4 => (20, 4),
            Lcd::Lcd40x2 => (40, 2),
        }
    }

    /// Validates a cursor position and clips `text` to the columns left on
    /// that row.
    pub fn clip<'a>(&self, row: u8, column: u8, text: &'a str) -> Result<&'a str> {
        let (columns, rows) = self.dimensions();
        if row >= rows || column >= columns {
            return Err(Error::CursorOutOfRange {
                row,
                column,
                columns,
                rows,
            });
        }

        let room = usize::from(columns - column);
        match text.char_indices().nth(room) {
            Some((end, _)) => {
                debug!(
                    "Text truncated to {} characters on LCD {} row {}",
                    room, self, row
                );
                Ok(&text[..end])
            }
            None => Ok(text),
        }
    }
}

impl FromStr for Lcd {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "20x4" | "lcd20x4" => Ok(Lcd::Lcd20x4),
            "40x2" | "lcd40x2" => Ok(Lcd::Lcd40x2),
            _ => Err(Error::InvalidName {
                kind: "LCD",
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Lcd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lcd::Lcd20x4 => write!(f, "20x4"),
            Lcd::Lcd40x2 => write!(f, "40x2"),
        }
    }
}

/// Character display driver.
pub trait TextDisplay {
    /// Moves the cursor. Both coordinates are zero-based.
    fn set_cursor(&mut self, column: u8, row: u8);

    /// Writes text at the cursor, advancing it.
    fn print(&mut self, text: &str);

    /// Blanks the display and homes the cursor.
    fn clear(&mut self);
}
