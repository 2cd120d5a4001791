//! Logical pixel grid over a chain of matrix driver chips.

use super::frame::Frame;
use super::layout::MatrixLayout;
use super::{SegmentDriver, MAX_INTENSITY, ROW_ALL_ON};
use crate::{Error, Result, SEGMENT_SIZE};
use tracing::{debug, info};

/// Row registers of one chip as last written.
type SegmentRows = [u8; SEGMENT_SIZE];

/// LED matrix controller.
///
/// The chips only take whole-row writes, so the controller caches every
/// row it has written. Single-pixel updates read the cached row, flip one
/// bit and write the row back.
pub struct MatrixDisplay<D: SegmentDriver> {
    driver: D,
    layout: MatrixLayout,
    rows: Vec<SegmentRows>,
    intensity: u8,
}

impl<D: SegmentDriver> MatrixDisplay<D> {
    /// Takes ownership of the chain and brings every chip up: out of
    /// shutdown, at the given brightness, blank.
    pub fn new(mut driver: D, layout: MatrixLayout, intensity: u8) -> Result<Self> {
        if intensity > MAX_INTENSITY {
            return Err(Error::InvalidIntensity(intensity));
        }

        let count = layout.segment_count();
        for segment in 0..count {
            driver.set_shutdown(segment, false);
            driver.set_intensity(segment, intensity);
            driver.clear(segment);
        }

        info!(
            "LED matrix initialized ({} segments, {}x{} pixels, {} chain)",
            count,
            layout.width(),
            layout.height(),
            layout.order()
        );

        Ok(Self {
            driver,
            layout,
            rows: vec![[0; SEGMENT_SIZE]; count],
            intensity,
        })
    }

    /// Returns the chain geometry.
    pub fn layout(&self) -> &MatrixLayout {
        &self.layout
    }

    /// Returns the grid width in pixels.
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    /// Returns the grid height in pixels.
    pub fn height(&self) -> usize {
        self.layout.height()
    }

    /// Returns a reference to the chip driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Releases the chip driver.
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Returns the current brightness.
    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Sets the brightness of every chip.
    pub fn set_intensity(&mut self, level: u8) -> Result<()> {
        if level > MAX_INTENSITY {
            return Err(Error::InvalidIntensity(level));
        }
        for segment in 0..self.rows.len() {
            self.driver.set_intensity(segment, level);
        }
        self.intensity = level;
        debug!("Matrix intensity set to {}", level);
        Ok(())
    }

    /// Turns every pixel off.
    pub fn clear_all(&mut self) {
        for (segment, rows) in self.rows.iter_mut().enumerate() {
            *rows = [0; SEGMENT_SIZE];
            self.driver.clear(segment);
        }
        debug!("Matrix cleared");
    }

    /// Turns every pixel on.
    pub fn set_all_on(&mut self) {
        for (segment, rows) in self.rows.iter_mut().enumerate() {
            for (row, bits) in rows.iter_mut().enumerate() {
                *bits = ROW_ALL_ON;
                self.driver.write_row(segment, row, ROW_ALL_ON);
            }
        }
        debug!("Matrix filled");
    }

    /// Writes a raw row pattern to one chip, bypassing pixel translation.
    pub fn set_row(&mut self, segment: usize, row: usize, bits: u8) -> Result<()> {
        self.check_row(segment, row)?;
        self.rows[segment][row] = bits;
        self.driver.write_row(segment, row, bits);
        Ok(())
    }

    /// Returns the last row pattern written to a chip.
    pub fn row(&self, segment: usize, row: usize) -> Result<u8> {
        self.check_row(segment, row)?;
        Ok(self.rows[segment][row])
    }

    /// Sets one pixel, rewriting the row that contains it.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> Result<()> {
        let addr = self.layout.locate(x, y)?;
        let bits = &mut self.rows[addr.segment][addr.row];

        if on {
            *bits |= addr.mask();
        } else {
            *bits &= !addr.mask();
        }
        self.driver.write_row(addr.segment, addr.row, *bits);
        Ok(())
    }

    /// Gets one pixel from the row cache.
    pub fn pixel(&self, x: usize, y: usize) -> Result<bool> {
        let addr = self.layout.locate(x, y)?;
        Ok(self.rows[addr.segment][addr.row] & addr.mask() != 0)
    }

    /// Snapshots the whole grid.
    pub fn frame(&self) -> Frame {
        let mut frame = Frame::new(self.width(), self.height());
        for y in 0..self.height() {
            for x in 0..self.width() {
                if let Ok(on) = self.pixel(x, y) {
                    frame.set_pixel(x, y, on);
                }
            }
        }
        frame
    }

    /// Displays a whole frame. Only rows whose pattern changed are sent to
    /// the chips; returns the number of row writes issued.
    pub fn draw(&mut self, frame: &Frame) -> Result<usize> {
        let expected = (self.width(), self.height());
        let actual = (frame.width(), frame.height());
        if expected != actual {
            return Err(Error::FrameSize { expected, actual });
        }

        let mut writes = 0;
        for segment in 0..self.rows.len() {
            let (ox, oy) = self.layout.segment_origin(segment)?;
            for row in 0..SEGMENT_SIZE {
                let bits = (0..SEGMENT_SIZE).fold(0u8, |acc, col| {
                    if frame.get_pixel(ox + col, oy + row) == Some(true) {
                        acc | (0x80 >> col)
                    } else {
                        acc
                    }
                });
                if self.rows[segment][row] != bits {
                    self.rows[segment][row] = bits;
                    self.driver.write_row(segment, row, bits);
                    writes += 1;
                }
            }
        }

        debug!("Frame drawn ({} row writes)", writes);
        Ok(writes)
    }

    fn check_row(&self, segment: usize, row: usize) -> Result<()> {
        self.layout.check_segment(segment)?;
        if row >= SEGMENT_SIZE {
            return Err(Error::RowOutOfRange(row));
        }
        Ok(())
    }
}
