//! Interactive Coffee Table Hardware Library
//!
//! Provides hardware abstraction for the buttons, indicator LEDs, power
//! controls, character LCDs and chained LED matrix of the interactive
//! coffee table. Raw pins, LCD text rendering and the matrix chip protocol
//! are external collaborators reached through the traits in this crate.

pub mod button;
pub mod config;
pub mod error;
pub mod lcd;
pub mod matrix;
pub mod output;
pub mod sim;
pub mod table;

pub use button::{Button, ButtonEngine, RawInput};
pub use config::{MatrixConfig, TableConfig};
pub use error::{Error, Result};
pub use lcd::{Lcd, TextDisplay};
pub use matrix::{ChainOrder, Frame, MatrixDisplay, MatrixLayout, PixelAddress, SegmentDriver};
pub use output::{Control, Led, Output, OutputPins};
pub use table::CoffeeTable;

/// Millisecond timestamp from a wrapping 32-bit monotonic counter.
pub type Millis = u32;

/// Default button debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u16 = 200;

/// Default matrix brightness (0-15).
pub const DEFAULT_INTENSITY: u8 = 8;

/// Side length of one matrix driver segment in pixels.
pub const SEGMENT_SIZE: usize = 8;
