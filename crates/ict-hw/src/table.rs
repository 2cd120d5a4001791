//! Board facade.
//!
//! `CoffeeTable` owns every device handle for its whole lifetime and hands
//! them back through [`CoffeeTable::into_parts`].

use crate::button::{Button, ButtonEngine, ButtonHandler, RawInput};
use crate::config::TableConfig;
use crate::lcd::{Lcd, TextDisplay};
use crate::matrix::{MatrixDisplay, SegmentDriver};
use crate::output::{Control, Led, Output, OutputPins};
use crate::{Millis, Result};
use tracing::{debug, info};

/// The interactive coffee table.
///
/// `P` provides the button and output pins, `M` drives the matrix chain
/// and `L` renders text on each character LCD.
pub struct CoffeeTable<P, M, L>
where
    P: RawInput + OutputPins,
    M: SegmentDriver,
    L: TextDisplay,
{
    pins: P,
    buttons: ButtonEngine,
    matrix: MatrixDisplay<M>,
    lcds: [L; 2],
}

impl<P, M, L> CoffeeTable<P, M, L>
where
    P: RawInput + OutputPins,
    M: SegmentDriver,
    L: TextDisplay,
{
    /// Brings the board up: outputs low, matrix initialised and blank,
    /// both LCDs cleared. `lcds` is indexed by [`Lcd`].
    pub fn new(mut pins: P, matrix: M, mut lcds: [L; 2], config: &TableConfig) -> Result<Self> {
        let layout = config.matrix.layout()?;
        let matrix = MatrixDisplay::new(matrix, layout, config.matrix.intensity)?;

        for output in Output::all() {
            pins.write_output(output, false);
        }
        for lcd in &mut lcds {
            lcd.clear();
        }

        info!(
            "Coffee table initialized (debounce {}ms)",
            config.debounce_ms
        );

        Ok(Self {
            pins,
            buttons: ButtonEngine::new(config.debounce_ms),
            matrix,
            lcds,
        })
    }

    /// Polls every button against the pins. Returns the number of confirmed
    /// transitions.
    pub fn poll_buttons(&mut self, now: Millis) -> usize {
        self.buttons.poll(&mut self.pins, now)
    }

    /// Returns the last confirmed state of a button.
    pub fn button_state(&self, button: Button) -> bool {
        self.buttons.state(button)
    }

    /// Replaces the button transition handler.
    pub fn set_button_handler(&mut self, handler: Option<ButtonHandler>) {
        self.buttons.set_handler(handler);
    }

    /// Returns the debounce interval in milliseconds.
    pub fn debounce_interval(&self) -> u16 {
        self.buttons.debounce_interval()
    }

    /// Sets the debounce interval in milliseconds.
    pub fn set_debounce_interval(&mut self, ms: u16) {
        self.buttons.set_debounce_interval(ms);
        debug!("Debounce interval set to {}ms", ms);
    }

    /// Returns whether an LED is lit.
    pub fn led(&mut self, led: Led) -> bool {
        self.pins.read_output(Output::Led(led))
    }

    /// Turns an LED on or off.
    pub fn set_led(&mut self, led: Led, on: bool) {
        self.pins.write_output(Output::Led(led), on);
        debug!("LED {} {}", led, on_off(on));
    }

    /// Returns whether a control output is on.
    pub fn control(&mut self, control: Control) -> bool {
        self.pins.read_output(Output::Control(control))
    }

    /// Switches a control output.
    pub fn set_control(&mut self, control: Control, on: bool) {
        self.pins.write_output(Output::Control(control), on);
        debug!("Control {} {}", control, on_off(on));
    }

    /// Prints text on an LCD starting at (row, column). Text that would run
    /// past the last column is cut off.
    pub fn lcd_print(&mut self, lcd: Lcd, row: u8, column: u8, text: &str) -> Result<()> {
        let text = lcd.clip(row, column, text)?;
        let display = &mut self.lcds[lcd.index()];
        display.set_cursor(column, row);
        display.print(text);
        Ok(())
    }

    /// Clears an LCD.
    pub fn lcd_clear(&mut self, lcd: Lcd) {
        self.lcds[lcd.index()].clear();
    }

    /// Returns a reference to an LCD driver.
    pub fn lcd(&self, lcd: Lcd) -> &L {
        &self.lcds[lcd.index()]
    }

    /// Returns the LED matrix.
    pub fn matrix(&self) -> &MatrixDisplay<M> {
        &self.matrix
    }

    /// Returns the LED matrix for drawing.
    pub fn matrix_mut(&mut self) -> &mut MatrixDisplay<M> {
        &mut self.matrix
    }

    /// Returns a reference to the pins.
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Returns a mutable reference to the pins.
    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }

    /// Shuts the board down and releases the device handles.
    pub fn into_parts(self) -> (P, M, [L; 2]) {
        (self.pins, self.matrix.into_driver(), self.lcds)
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimLcd, SimMatrix, SimPins};
    use std::cell::RefCell;
    use std::rc::Rc;

    type SimTable = CoffeeTable<SimPins, SimMatrix, SimLcd>;

    fn table() -> SimTable {
        CoffeeTable::new(
            SimPins::new(),
            SimMatrix::new(4),
            [SimLcd::new(Lcd::Lcd20x4), SimLcd::new(Lcd::Lcd40x2)],
            &TableConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_six_button_scenario() {
        let mut table = table();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        table.set_button_handler(Some(Box::new(move |b: Button, s: bool| {
            sink.borrow_mut().push((b, s))
        })));

        table.pins_mut().set_pressed(Button::Up, true);
        table.poll_buttons(210);
        assert_eq!(*events.borrow(), vec![(Button::Up, true)]);

        table.poll_buttons(400);
        assert_eq!(events.borrow().len(), 1);

        table.pins_mut().set_pressed(Button::Up, false);
        table.poll_buttons(620);
        assert_eq!(
            *events.borrow(),
            vec![(Button::Up, true), (Button::Up, false)]
        );
        assert!(Button::ALL.iter().all(|b| !table.button_state(*b)));
    }

    #[test]
    fn test_poll_skips_reads_while_settling() {
        let mut table = table();
        table.poll_buttons(100);
        assert_eq!(table.pins().read_count(), 0);
        table.poll_buttons(200);
        assert_eq!(table.pins().read_count(), 6);
    }

    #[test]
    fn test_debounce_interval() {
        let mut table = table();
        assert_eq!(table.debounce_interval(), 200);
        table.set_debounce_interval(20);
        assert_eq!(table.debounce_interval(), 20);
    }

    #[test]
    fn test_outputs() {
        let mut table = table();
        assert!(!table.led(Led::Orange));
        table.set_led(Led::Orange, true);
        assert!(table.led(Led::Orange));
        assert!(!table.led(Led::Green));

        table.set_control(Control::AmpPower, true);
        assert!(table.control(Control::AmpPower));
        table.set_control(Control::AmpPower, false);
        assert!(!table.control(Control::AmpPower));
    }

    #[test]
    fn test_lcd_print() {
        let mut table = table();
        table.lcd_print(Lcd::Lcd40x2, 1, 36, "score").unwrap();
        assert_eq!(table.lcd(Lcd::Lcd40x2).line(1).trim_start(), "scor");
        assert!(table.lcd(Lcd::Lcd20x4).line(0).trim().is_empty());

        assert!(table.lcd_print(Lcd::Lcd40x2, 2, 0, "x").is_err());

        table.lcd_clear(Lcd::Lcd40x2);
        assert!(table.lcd(Lcd::Lcd40x2).line(1).trim().is_empty());
    }

    #[test]
    fn test_matrix_access() {
        let mut table = table();
        table.matrix_mut().set_pixel(15, 0, true).unwrap();
        assert!(table.matrix().pixel(15, 0).unwrap());
        assert_eq!(table.matrix().driver().rows(1)[0], 0x01);
    }

    #[test]
    fn test_invalid_matrix_config() {
        let mut config = TableConfig::default();
        config.matrix.intensity = 99;
        let result = CoffeeTable::new(
            SimPins::new(),
            SimMatrix::new(4),
            [SimLcd::new(Lcd::Lcd20x4), SimLcd::new(Lcd::Lcd40x2)],
            &config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_into_parts() {
        let mut table = table();
        table.set_led(Led::Green, true);
        table.matrix_mut().set_all_on();

        let (pins, chips, _lcds) = table.into_parts();
        assert!(pins.output(Output::Led(Led::Green)));
        assert_eq!(chips.rows(0), [0xFF; 8]);
    }
}
