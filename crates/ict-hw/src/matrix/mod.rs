//! LED matrix module.
//!
//! Presents a chain of 8x8 matrix driver chips as one logical pixel grid.

mod display;
mod frame;
mod layout;

pub use display::MatrixDisplay;
pub use frame::Frame;
pub use layout::{ChainOrder, MatrixLayout, PixelAddress};

/// Maximum brightness accepted by the driver chips.
pub const MAX_INTENSITY: u8 = 15;

/// Row mask with every LED lit.
pub const ROW_ALL_ON: u8 = 0xFF;

/// Register-level interface to a daisy chain of 8x8 matrix driver chips.
///
/// Chips only accept whole-row writes; bit-level updates are the caller's
/// business. `segment` is the chip's position in the chain and `row` is
/// always in `0..8`.
pub trait SegmentDriver {
    /// Writes one row register. Bit 7 is column 0.
    fn write_row(&mut self, segment: usize, row: usize, bits: u8);

    /// Turns every LED of a chip off.
    fn clear(&mut self, segment: usize);

    /// Sets a chip's brightness (0-15).
    fn set_intensity(&mut self, segment: usize, level: u8);

    /// Puts a chip into (`true`) or out of (`false`) power-saving shutdown.
    fn set_shutdown(&mut self, segment: usize, shutdown: bool);
}

impl<D: SegmentDriver + ?Sized> SegmentDriver for &mut D {
    fn write_row(&mut self, segment: usize, row: usize, bits: u8) {
        (**self).write_row(segment, row, bits)
    }

    fn clear(&mut self, segment: usize) {
        (**self).clear(segment)
    }

    fn set_intensity(&mut self, segment: usize, level: u8) {
        (**self).set_intensity(segment, level)
    }

    fn set_shutdown(&mut self, segment: usize, shutdown: bool) {
        (**self).set_shutdown(segment, shutdown)
    }
}
