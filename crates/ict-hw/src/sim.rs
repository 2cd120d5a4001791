//! In-memory stand-ins for the board collaborators.
//!
//! Used by the host tools to run the full stack without hardware, and by
//! tests to observe exactly what the core sends to each device.

use crate::button::{Button, RawInput, NUM_BUTTONS};
use crate::lcd::{Lcd, TextDisplay};
use crate::matrix::{SegmentDriver, MAX_INTENSITY};
use crate::output::{Output, OutputPins, NUM_CONTROLS, NUM_LEDS};
use crate::SEGMENT_SIZE;
use serde::Serialize;

/// Simulated button and output pins.
#[derive(Debug, Clone)]
pub struct SimPins {
    /// Raw button levels; pull-ups hold them high until pressed.
    buttons: [bool; NUM_BUTTONS],
    leds: [bool; NUM_LEDS],
    controls: [bool; NUM_CONTROLS],
    /// Number of raw button samples taken.
    reads: usize,
}

impl Default for SimPins {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPins {
    /// Creates pins with every button released and every output low.
    pub fn new() -> Self {
        Self {
            buttons: [true; NUM_BUTTONS],
            leds: [false; NUM_LEDS],
            controls: [false; NUM_CONTROLS],
            reads: 0,
        }
    }

    /// Closes (`true`) or opens a button contact.
    pub fn set_pressed(&mut self, button: Button, pressed: bool) {
        self.buttons[button.index()] = !pressed;
    }

    /// Returns true if the button contact is currently closed.
    pub fn is_pressed(&self, button: Button) -> bool {
        !self.buttons[button.index()]
    }

    /// Returns the level an output is driving.
    pub fn output(&self, output: Output) -> bool {
        match output {
            Output::Led(led) => self.leds[led as usize],
            Output::Control(control) => self.controls[control as usize],
        }
    }

    /// Returns the number of raw button samples taken so far.
    pub fn read_count(&self) -> usize {
        self.reads
    }
}

impl RawInput for SimPins {
    fn read_raw(&mut self, button: Button) -> bool {
        self.reads += 1;
        self.buttons[button.index()]
    }
}

impl OutputPins for SimPins {
    fn write_output(&mut self, output: Output, high: bool) {
        match output {
            Output::Led(led) => self.leds[led as usize] = high,
            Output::Control(control) => self.controls[control as usize] = high,
        }
    }

    fn read_output(&mut self, output: Output) -> bool {
        self.output(output)
    }
}

/// A command received by a simulated matrix chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum ChipCommand {
    WriteRow { segment: usize, row: usize, bits: u8 },
    Clear { segment: usize },
    Intensity { segment: usize, level: u8 },
    Shutdown { segment: usize, shutdown: bool },
}

/// Register state of one simulated chip.
#[derive(Debug, Clone, Copy)]
struct Chip {
    rows: [u8; SEGMENT_SIZE],
    intensity: u8,
    shutdown: bool,
}

/// Simulated chain of 8x8 matrix driver chips.
///
/// Chips power up in shutdown, like the real parts. Commands addressed past
/// the end of the chain fall off the end of the shift register and are
/// only recorded in the log.
///
/// Every command is counted. The full command log is only kept when the
/// chain was built with [`SimMatrix::new`].
#[derive(Debug, Clone)]
pub struct SimMatrix {
    chips: Vec<Chip>,
    log: Vec<ChipCommand>,
    logging: bool,
    commands: usize,
}

impl SimMatrix {
    /// Creates a chain of `segments` chips that logs every command.
    pub fn new(segments: usize) -> Self {
        Self {
            chips: vec![
                Chip {
                    rows: [0; SEGMENT_SIZE],
                    intensity: 0,
                    shutdown: true,
                };
                segments
            ],
            log: Vec::new(),
            logging: true,
            commands: 0,
        }
    }

    /// Creates a chain of `segments` chips that only counts commands.
    pub fn unlogged(segments: usize) -> Self {
        Self {
            logging: false,
            ..Self::new(segments)
        }
    }

    /// Returns the number of chips.
    pub fn segment_count(&self) -> usize {
        self.chips.len()
    }

    /// Returns the row registers of a chip (blank for unknown chips).
    pub fn rows(&self, segment: usize) -> [u8; SEGMENT_SIZE] {
        self.chips
            .get(segment)
            .map(|c| c.rows)
            .unwrap_or([0; SEGMENT_SIZE])
    }

    /// Returns the brightness of a chip.
    pub fn intensity(&self, segment: usize) -> u8 {
        self.chips.get(segment).map(|c| c.intensity).unwrap_or(0)
    }

    /// Returns true if a chip is in shutdown.
    pub fn is_shutdown(&self, segment: usize) -> bool {
        self.chips.get(segment).map(|c| c.shutdown).unwrap_or(true)
    }

    /// Returns every command received, oldest first. Empty for an
    /// unlogged chain.
    pub fn log(&self) -> &[ChipCommand] {
        &self.log
    }

    /// Returns the number of commands received.
    pub fn command_count(&self) -> usize {
        self.commands
    }

    fn record(&mut self, command: ChipCommand) {
        self.commands += 1;
        if self.logging {
            self.log.push(command);
        }
    }
}

impl SegmentDriver for SimMatrix {
    fn write_row(&mut self, segment: usize, row: usize, bits: u8) {
        self.record(ChipCommand::WriteRow { segment, row, bits });
        if let Some(reg) = self
            .chips
            .get_mut(segment)
            .and_then(|c| c.rows.get_mut(row))
        {
            *reg = bits;
        }
    }

    fn clear(&mut self, segment: usize) {
        self.record(ChipCommand::Clear { segment });
        if let Some(chip) = self.chips.get_mut(segment) {
            chip.rows = [0; SEGMENT_SIZE];
        }
    }

    fn set_intensity(&mut self, segment: usize, level: u8) {
        self.record(ChipCommand::Intensity { segment, level });
        if let Some(chip) = self.chips.get_mut(segment) {
            chip.intensity = level.min(MAX_INTENSITY);
        }
    }

    fn set_shutdown(&mut self, segment: usize, shutdown: bool) {
        self.record(ChipCommand::Shutdown { segment, shutdown });
        if let Some(chip) = self.chips.get_mut(segment) {
            chip.shutdown = shutdown;
        }
    }
}

/// Simulated character LCD holding its screen contents.
#[derive(Debug, Clone)]
pub struct SimLcd {
    lines: Vec<Vec<char>>,
    cursor: (usize, usize),
}

impl SimLcd {
    /// Creates a blank display sized for `lcd`.
    pub fn new(lcd: Lcd) -> Self {
        let (columns, rows) = lcd.dimensions();
        Self {
            lines: vec![vec![' '; usize::from(columns)]; usize::from(rows)],
            cursor: (0, 0),
        }
    }

    /// Returns the text of one row, trailing blanks included.
    pub fn line(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|l| l.iter().collect())
            .unwrap_or_default()
    }

    /// Returns every row.
    pub fn lines(&self) -> Vec<String> {
        (0..self.lines.len()).map(|r| self.line(r)).collect()
    }
}

impl TextDisplay for SimLcd {
    fn set_cursor(&mut self, column: u8, row: u8) {
        self.cursor = (usize::from(column), usize::from(row));
    }

    fn print(&mut self, text: &str) {
        let (mut column, row) = self.cursor;
        if let Some(line) = self.lines.get_mut(row) {
            for c in text.chars() {
                match line.get_mut(column) {
                    Some(cell) => *cell = c,
                    None => break,
                }
                column += 1;
            }
        }
        self.cursor = (column, row);
    }

    fn clear(&mut self) {
        for line in &mut self.lines {
            line.fill(' ');
        }
        self.cursor = (0, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Led;

    #[test]
    fn test_pins_active_low() {
        let mut pins = SimPins::new();
        assert!(pins.read_raw(Button::Up));
        pins.set_pressed(Button::Up, true);
        assert!(!pins.read_raw(Button::Up));
        assert!(pins.is_pressed(Button::Up));
        assert_eq!(pins.read_count(), 2);
    }

    #[test]
    fn test_pins_outputs() {
        let mut pins = SimPins::new();
        pins.write_output(Output::Led(Led::Green), true);
        assert!(pins.read_output(Output::Led(Led::Green)));
        assert!(!pins.read_output(Output::Led(Led::Orange)));
    }

    #[test]
    fn test_matrix_starts_shut_down() {
        let mut chips = SimMatrix::new(2);
        assert!(chips.is_shutdown(0));
        chips.set_shutdown(0, false);
        assert!(!chips.is_shutdown(0));
        assert!(chips.is_shutdown(1));
    }

    #[test]
    fn test_matrix_ignores_writes_past_chain() {
        let mut chips = SimMatrix::new(1);
        chips.write_row(1, 0, 0xFF);
        chips.write_row(0, 8, 0xFF);
        assert_eq!(chips.rows(0), [0; 8]);
        assert_eq!(chips.log().len(), 2);
        assert_eq!(chips.command_count(), 2);
    }

    #[test]
    fn test_unlogged_matrix_only_counts() {
        let mut chips = SimMatrix::unlogged(4);
        for i in 0..10_000 {
            chips.write_row(i % 4, (i / 4) % 8, 0xAA);
        }
        chips.clear(3);

        assert!(chips.log().is_empty());
        assert_eq!(chips.command_count(), 10_001);
        assert_eq!(chips.rows(0), [0xAA; 8]);
        assert_eq!(chips.rows(3), [0; 8]);
    }

    #[test]
    fn test_lcd_print_and_clear() {
        let mut lcd = SimLcd::new(Lcd::Lcd20x4);
        lcd.set_cursor(2, 1);
        lcd.print("hi");
        lcd.print("!");
        assert_eq!(lcd.line(1), "  hi!               ");

        lcd.clear();
        assert!(lcd.lines().iter().all(|l| l.trim().is_empty()));
    }
}
