//! Off-device monochrome bitmap for the matrix.

use crate::{Error, Result};
use std::str::FromStr;

/// Character used for a lit pixel in ASCII form.
pub const ON_CHAR: char = '#';

/// Character used for an unlit pixel in ASCII form.
pub const OFF_CHAR: char = '.';

/// Monochrome bitmap, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<bool>,
    width: usize,
    height: usize,
}

impl Frame {
    /// Creates a frame with every pixel off.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![false; width * height],
            width,
            height,
        }
    }

    /// Returns the width of the frame.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the frame.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sets every pixel to the same state.
    pub fn fill(&mut self, on: bool) {
        self.data.fill(on);
    }

    /// Sets a pixel at the given coordinates. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = on;
        }
    }

    /// Gets a pixel at the given coordinates.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Returns the number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.data.iter().filter(|p| **p).count()
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.data.chunks(self.width.max(1)) {
            let line: String = row
                .iter()
                .map(|on| if *on { ON_CHAR } else { OFF_CHAR })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FromStr for Frame {
    type Err = Error;

    /// Parses `#`/`.` art. Blank lines are skipped; every other line must
    /// have the same length.
    fn from_str(s: &str) -> Result<Self> {
        let mut data = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (i, line) in s.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let len = line.chars().count();
            match width {
                None => width = Some(len),
                Some(w) if w != len => {
                    return Err(Error::FrameParse {
                        line: i + 1,
                        reason: format!("expected {} columns, got {}", w, len),
                    });
                }
                Some(_) => {}
            }

            for c in line.chars() {
                match c {
                    ON_CHAR => data.push(true),
                    OFF_CHAR => data.push(false),
                    other => {
                        return Err(Error::FrameParse {
                            line: i + 1,
                            reason: format!("unexpected character {:?}", other),
                        });
                    }
                }
            }
            height += 1;
        }

        Ok(Self {
            data,
            width: width.unwrap_or(0),
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_ops() {
        let mut frame = Frame::new(16, 16);
        frame.set_pixel(3, 4, true);
        assert_eq!(frame.get_pixel(3, 4), Some(true));
        assert_eq!(frame.get_pixel(4, 3), Some(false));
        assert_eq!(frame.get_pixel(16, 0), None);

        frame.set_pixel(99, 99, true);
        assert_eq!(frame.lit_count(), 1);

        frame.fill(true);
        assert_eq!(frame.lit_count(), 256);
    }

    #[test]
    fn test_ascii_format() {
        let mut frame = Frame::new(3, 2);
        frame.set_pixel(0, 0, true);
        frame.set_pixel(2, 1, true);
        assert_eq!(frame.to_string(), "#..\n..#\n");
        assert_eq!(frame.to_string().parse::<Frame>().unwrap(), frame);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "##\n#".parse::<Frame>(),
            Err(Error::FrameParse { line: 2, .. })
        ));
        assert!(matches!(
            "#x".parse::<Frame>(),
            Err(Error::FrameParse { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let frame: Frame = "\n#.\n\n.#\n\n".parse().unwrap();
        assert_eq!((frame.width(), frame.height()), (2, 2));
        assert_eq!(frame.get_pixel(1, 1), Some(true));
    }
}
