//! Tiling geometry of the matrix chain.
//!
//! The chain is a grid of `segments_wide` x `segments_high` tiles. Which
//! tile a chip drives depends on how the data line was routed between
//! chips; [`ChainOrder`] captures the supported routings.

use crate::{Error, Result, SEGMENT_SIZE};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Wiring order of segments across the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainOrder {
    /// Left to right, then top to bottom.
    #[default]
    RowMajor,
    /// Top to bottom, then left to right.
    ColumnMajor,
    /// Row-major with every odd tile row running right to left.
    Serpentine,
}

impl FromStr for ChainOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "row-major" | "row_major" => Ok(ChainOrder::RowMajor),
            "column-major" | "column_major" => Ok(ChainOrder::ColumnMajor),
            "serpentine" => Ok(ChainOrder::Serpentine),
            _ => Err(Error::InvalidName {
                kind: "chain order",
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ChainOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainOrder::RowMajor => write!(f, "row-major"),
            ChainOrder::ColumnMajor => write!(f, "column-major"),
            ChainOrder::Serpentine => write!(f, "serpentine"),
        }
    }
}

/// Physical location of one logical pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelAddress {
    /// Chip position in the chain.
    pub segment: usize,
    /// Row within the chip (0-7).
    pub row: usize,
    /// Column within the chip (0-7).
    pub column: usize,
}

impl PixelAddress {
    /// Returns the row register bit for this pixel.
    pub fn mask(&self) -> u8 {
        0x80 >> self.column
    }
}

/// Geometry of a chain of 8x8 segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixLayout {
    segments_wide: usize,
    segments_high: usize,
    order: ChainOrder,
}

impl Default for MatrixLayout {
    /// Four chips tiled 2x2 for a 16x16 grid.
    fn default() -> Self {
        Self {
            segments_wide: 2,
            segments_high: 2,
            order: ChainOrder::RowMajor,
        }
    }
}

impl MatrixLayout {
    /// Creates a layout, rejecting empty grids.
    pub fn new(segments_wide: usize, segments_high: usize, order: ChainOrder) -> Result<Self> {
        if segments_wide == 0 || segments_high == 0 {
            return Err(Error::InvalidLayout(format!(
                "{}x{} segments",
                segments_wide, segments_high
            )));
        }
        segments_wide
            .checked_mul(segments_high)
            .and_then(|n| n.checked_mul(SEGMENT_SIZE * SEGMENT_SIZE))
            .ok_or_else(|| {
                Error::InvalidLayout(format!("{}x{} segments", segments_wide, segments_high))
            })?;

        Ok(Self {
            segments_wide,
            segments_high,
            order,
        })
    }

    /// Returns the number of segments across.
    pub fn segments_wide(&self) -> usize {
        self.segments_wide
    }

    /// Returns the number of segments down.
    pub fn segments_high(&self) -> usize {
        self.segments_high
    }

    /// Returns the chain wiring order.
    pub fn order(&self) -> ChainOrder {
        self.order
    }

    /// Returns the number of chips in the chain.
    pub fn segment_count(&self) -> usize {
        self.segments_wide * self.segments_high
    }

    /// Returns the grid width in pixels.
    pub fn width(&self) -> usize {
        self.segments_wide * SEGMENT_SIZE
    }

    /// Returns the grid height in pixels.
    pub fn height(&self) -> usize {
        self.segments_high * SEGMENT_SIZE
    }

    /// Maps pixel coordinates to a chip, row and column.
    pub fn locate(&self, x: usize, y: usize) -> Result<PixelAddress> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::PixelOutOfRange {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }

        Ok(PixelAddress {
            segment: self.tile_segment(x / SEGMENT_SIZE, y / SEGMENT_SIZE),
            row: y % SEGMENT_SIZE,
            column: x % SEGMENT_SIZE,
        })
    }

    /// Returns the top-left pixel driven by a segment.
    pub fn segment_origin(&self, segment: usize) -> Result<(usize, usize)> {
        self.check_segment(segment)?;
        let (tx, ty) = self.segment_tile(segment);
        Ok((tx * SEGMENT_SIZE, ty * SEGMENT_SIZE))
    }

    pub(crate) fn check_segment(&self, segment: usize) -> Result<()> {
        if segment >= self.segment_count() {
            return Err(Error::SegmentOutOfRange {
                segment,
                count: self.segment_count(),
            });
        }
        Ok(())
    }

    fn tile_segment(&self, tx: usize, ty: usize) -> usize {
        match self.order {
            ChainOrder::RowMajor => ty * self.segments_wide + tx,
            ChainOrder::ColumnMajor => tx * self.segments_high + ty,
            ChainOrder::Serpentine => {
                if ty % 2 == 0 {
                    ty * self.segments_wide + tx
                } else {
                    ty * self.segments_wide + (self.segments_wide - 1 - tx)
                }
            }
        }
    }

    fn segment_tile(&self, segment: usize) -> (usize, usize) {
        match self.order {
            ChainOrder::RowMajor => (segment % self.segments_wide, segment / self.segments_wide),
            ChainOrder::ColumnMajor => {
                (segment / self.segments_high, segment % self.segments_high)
            }
            ChainOrder::Serpentine => {
                let ty = segment / self.segments_wide;
                let offset = segment % self.segments_wide;
                if ty % 2 == 0 {
                    (offset, ty)
                } else {
                    (self.segments_wide - 1 - offset, ty)
                }
            }
        }
    }
}
