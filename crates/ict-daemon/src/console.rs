//! Line-oriented console for driving the simulated board.

use anyhow::{bail, Context, Result};
use ict_hw::sim::{SimLcd, SimMatrix, SimPins};
use ict_hw::{Button, CoffeeTable, Control, Lcd, Led};
use std::str::SplitWhitespace;

/// Board wired to simulated hardware.
pub type SimTable = CoffeeTable<SimPins, SimMatrix, SimLcd>;

/// A console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Change a button's raw contact state.
    Button { button: Button, pressed: bool },
    Led { led: Led, on: bool },
    Control { control: Control, on: bool },
    Pixel { x: usize, y: usize, on: bool },
    Row { segment: usize, row: usize, bits: u8 },
    Clear,
    Fill,
    Intensity(u8),
    /// Show (`None`) or set the debounce interval.
    Debounce(Option<u16>),
    Print {
        lcd: Lcd,
        row: u8,
        column: u8,
        text: String,
    },
    LcdClear(Lcd),
    Show,
    Status,
    Quit,
}

/// Parses one console line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_lowercase();
    let mut args = Args { words, verb: &verb };

    let command = match verb.as_str() {
        "press" | "release" => Command::Button {
            button: args.next("button")?.parse()?,
            pressed: verb == "press",
        },
        "led" => Command::Led {
            led: args.next("led")?.parse()?,
            on: parse_switch(args.next("on|off")?)?,
        },
        "control" => Command::Control {
            control: args.next("control")?.parse()?,
            on: parse_switch(args.next("on|off")?)?,
        },
        "pixel" => Command::Pixel {
            x: args.next("x")?.parse().context("Invalid x")?,
            y: args.next("y")?.parse().context("Invalid y")?,
            on: parse_switch(args.next("on|off")?)?,
        },
        "row" => Command::Row {
            segment: args.next("segment")?.parse().context("Invalid segment")?,
            row: args.next("row")?.parse().context("Invalid row")?,
            bits: parse_bits(args.next("bits")?)?,
        },
        "clear" => Command::Clear,
        "fill" => Command::Fill,
        "intensity" => Command::Intensity(args.next("level")?.parse().context("Invalid level")?),
        "debounce" => match args.words.next() {
            Some(ms) => Command::Debounce(Some(ms.parse().context("Invalid interval")?)),
            None => Command::Debounce(None),
        },
        "print" => {
            let lcd = args.next("lcd")?.parse()?;
            let row = args.next("row")?.parse().context("Invalid row")?;
            let column = args.next("column")?.parse().context("Invalid column")?;
            let text = args.rest();
            Command::Print {
                lcd,
                row,
                column,
                text,
            }
        }
        "lcd-clear" => Command::LcdClear(args.next("lcd")?.parse()?),
        "show" => Command::Show,
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        other => bail!("Unknown command: {}", other),
    };

    Ok(Some(command))
}

/// Remaining words of a command line.
struct Args<'a> {
    words: SplitWhitespace<'a>,
    verb: &'a str,
}

impl<'a> Args<'a> {
    fn next(&mut self, name: &str) -> Result<&'a str> {
        self.words
            .next()
            .with_context(|| format!("{}: missing <{}>", self.verb, name))
    }

    fn rest(self) -> String {
        self.words.collect::<Vec<_>>().join(" ")
    }
}

fn parse_switch(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        _ => bail!("Expected on or off, got {}", s),
    }
}

fn parse_bits(s: &str) -> Result<u8> {
    let bits = if let Some(hex) = s.strip_prefix("0x") {
        u8::from_str_radix(hex, 16)
    } else if let Some(bin) = s.strip_prefix("0b") {
        u8::from_str_radix(bin, 2)
    } else {
        s.parse()
    };
    bits.with_context(|| format!("Invalid row bits: {}", s))
}

/// Applies a command to the board. Returns text to show the user, if any.
pub fn apply(table: &mut SimTable, command: Command) -> Result<Option<String>> {
    match command {
        Command::Button { button, pressed } => table.pins_mut().set_pressed(button, pressed),
        Command::Led { led, on } => table.set_led(led, on),
        Command::Control { control, on } => table.set_control(control, on),
        Command::Pixel { x, y, on } => table.matrix_mut().set_pixel(x, y, on)?,
        Command::Row { segment, row, bits } => table.matrix_mut().set_row(segment, row, bits)?,
        Command::Clear => table.matrix_mut().clear_all(),
        Command::Fill => table.matrix_mut().set_all_on(),
        Command::Intensity(level) => table.matrix_mut().set_intensity(level)?,
        Command::Debounce(Some(ms)) => table.set_debounce_interval(ms),
        Command::Debounce(None) => {
            return Ok(Some(format!("debounce {}ms", table.debounce_interval())));
        }
        Command::Print {
            lcd,
            row,
            column,
            text,
        } => table.lcd_print(lcd, row, column, &text)?,
        Command::LcdClear(lcd) => table.lcd_clear(lcd),
        Command::Show => return Ok(Some(show(table))),
        Command::Status => return Ok(Some(status(table))),
        Command::Quit => {}
    }
    Ok(None)
}

fn show(table: &SimTable) -> String {
    let mut out = table.matrix().frame().to_string();
    for lcd in Lcd::ALL {
        let (columns, _) = lcd.dimensions();
        let border = "-".repeat(usize::from(columns));
        out.push_str(&format!("+{}+ {}\n", border, lcd));
        for line in table.lcd(lcd).lines() {
            out.push_str(&format!("|{}|\n", line));
        }
        out.push_str(&format!("+{}+\n", border));
    }
    out
}

fn status(table: &mut SimTable) -> String {
    let mut out = String::new();
    for button in Button::ALL {
        out.push_str(&format!(
            "button {:<6} {}\n",
            button.to_string(),
            if table.button_state(button) {
                "pressed"
            } else {
                "released"
            }
        ));
    }
    for led in Led::ALL {
        out.push_str(&format!("led {:<9} {}\n", led.to_string(), on_off(table.led(led))));
    }
    for control in Control::ALL {
        out.push_str(&format!(
            "control {:<16} {}\n",
            control.to_string(),
            on_off(table.control(control))
        ));
    }
    out.push_str(&format!("debounce {}ms\n", table.debounce_interval()));
    out.push_str(&format!("intensity {}\n", table.matrix().intensity()));
    out
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
