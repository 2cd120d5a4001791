//! Error types for the coffee table hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when addressing the hardware.
///
/// Apart from `Config`, every variant is a caller contract violation: the
/// operation was rejected before any state was touched.
#[derive(Error, Debug)]
pub enum Error {
    /// Button index outside the fixed button set.
    #[error("Invalid button index: {0}")]
    InvalidButton(usize),

    /// LED index outside the fixed LED set.
    #[error("Invalid LED index: {0}")]
    InvalidLed(usize),

    /// Control index outside the fixed control set.
    #[error("Invalid control index: {0}")]
    InvalidControl(usize),

    /// LCD index outside the fixed display set.
    #[error("Invalid LCD index: {0}")]
    InvalidLcd(usize),

    /// Unrecognised device name.
    #[error("Invalid {kind} name: {name}")]
    InvalidName { kind: &'static str, name: String },

    /// Segment address outside the configured chain.
    #[error("Segment {segment} out of range (chain has {count} segments)")]
    SegmentOutOfRange { segment: usize, count: usize },

    /// Row index outside a segment.
    #[error("Row {0} out of range (must be 0-7)")]
    RowOutOfRange(usize),

    /// Pixel coordinates outside the logical grid.
    #[error("Pixel ({x}, {y}) out of range for {width}x{height} grid")]
    PixelOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// LCD cursor position outside the display.
    #[error("Cursor (row {row}, column {column}) out of range for {columns}x{rows} LCD")]
    CursorOutOfRange {
        row: u8,
        column: u8,
        columns: u8,
        rows: u8,
    },

    /// Matrix brightness above the chip maximum.
    #[error("Invalid intensity (must be 0-15): {0}")]
    InvalidIntensity(u8),

    /// Matrix layout with no segments or too many to address.
    #[error("Invalid matrix layout: {0}")]
    InvalidLayout(String),

    /// Frame dimensions do not match the grid.
    #[error("Frame size mismatch: expected {expected:?}, got {actual:?}")]
    FrameSize {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Malformed ASCII frame.
    #[error("Frame parse error on line {line}: {reason}")]
    FrameParse { line: usize, reason: String },

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}
