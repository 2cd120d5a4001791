//! Indicator LEDs and power/signal controls.
//!
//! Both are plain digital outputs; the state reported back is whatever the
//! output pin currently drives.

use crate::{Error, Result};
use serde::Serialize;
use std::str::FromStr;

/// Number of indicator LEDs.
pub const NUM_LEDS: usize = 2;

/// Number of control outputs.
pub const NUM_CONTROLS: usize = 3;

/// Indicator LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Led {
    Orange = 0,
    Green = 1,
}

impl Led {
    /// Every LED, in index order.
    pub const ALL: [Led; NUM_LEDS] = [Led::Orange, Led::Green];

    /// Converts a raw index to an LED.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL.get(index).copied().ok_or(Error::InvalidLed(index))
    }
}

impl FromStr for Led {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "orange" => Ok(Led::Orange),
            "green" => Ok(Led::Green),
            _ => Err(Error::InvalidName {
                kind: "LED",
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Led {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Led::Orange => write!(f, "orange"),
            Led::Green => write!(f, "green"),
        }
    }
}

/// Switched outputs for the audio hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Control {
    /// Amplifier power relay.
    AmpPower = 0,
    /// Bluetooth receiver power.
    BluetoothPower = 1,
    /// Audio signal routing.
    AudioSignal = 2,
}

impl Control {
    /// Every control, in index order.
    pub const ALL: [Control; NUM_CONTROLS] = [
        Control::AmpPower,
        Control::BluetoothPower,
        Control::AudioSignal,
    ];

    /// Converts a raw index to a control.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidControl(index))
    }
}

impl FromStr for Control {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "amp-power" | "amp" => Ok(Control::AmpPower),
            "bluetooth-power" | "bluetooth" | "bt" => Ok(Control::BluetoothPower),
            "audio-signal" | "audio" => Ok(Control::AudioSignal),
            _ => Err(Error::InvalidName {
                kind: "control",
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Control::AmpPower => write!(f, "amp-power"),
            Control::BluetoothPower => write!(f, "bluetooth-power"),
            Control::AudioSignal => write!(f, "audio-signal"),
        }
    }
}

/// Any digital output on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    Led(Led),
    Control(Control),
}

impl Output {
    /// Every output: LEDs first, then controls.
    pub fn all() -> impl Iterator<Item = Output> {
        Led::ALL
            .into_iter()
            .map(Output::Led)
            .chain(Control::ALL.into_iter().map(Output::Control))
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Led(led) => write!(f, "LED {}", led),
            Output::Control(control) => write!(f, "control {}", control),
        }
    }
}

/// Digital output pins.
pub trait OutputPins {
    /// Drives an output high (`true`) or low.
    fn write_output(&mut self, output: Output, high: bool);

    /// Reads back the level an output is driving.
    fn read_output(&mut self, output: Output) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_from_index() {
        assert_eq!(Led::from_index(1).unwrap(), Led::Green);
        assert!(matches!(Led::from_index(2), Err(Error::InvalidLed(2))));
    }

    #[test]
    fn test_control_from_index() {
        assert_eq!(Control::from_index(0).unwrap(), Control::AmpPower);
        assert!(matches!(
            Control::from_index(3),
            Err(Error::InvalidControl(3))
        ));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Orange".parse::<Led>().unwrap(), Led::Orange);
        assert!("red".parse::<Led>().is_err());
        assert_eq!("bt".parse::<Control>().unwrap(), Control::BluetoothPower);
        assert_eq!(
            "audio-signal".parse::<Control>().unwrap(),
            Control::AudioSignal
        );
    }

    #[test]
    fn test_all_outputs() {
        let outputs: Vec<_> = Output::all().collect();
        assert_eq!(outputs.len(), NUM_LEDS + NUM_CONTROLS);
        assert_eq!(outputs[0], Output::Led(Led::Orange));
        assert_eq!(outputs[4], Output::Control(Control::AudioSignal));
    }
}
