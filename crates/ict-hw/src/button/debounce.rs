//! Per-button debounce logic.
//!
//! Each button keeps its own stable state and the time of its last
//! confirmed edge. A button is only sampled again once the debounce
//! interval has elapsed since that edge, so contact bounce inside the
//! settling window is never observed.

use super::{Button, RawInput, NUM_BUTTONS};
use crate::{Millis, DEFAULT_DEBOUNCE_MS};
use tracing::debug;

/// Callback invoked once per confirmed transition with the new logical state
/// (`true` = pressed).
pub type ButtonHandler = Box<dyn FnMut(Button, bool)>;

/// Debounced, edge-triggered button poller.
pub struct ButtonEngine {
    /// Confirmed logical states: false = released, true = pressed.
    stable: [bool; NUM_BUTTONS],
    /// Time of the last confirmed edge per button.
    last_edge: [Millis; NUM_BUTTONS],
    debounce_ms: u16,
    handler: Option<ButtonHandler>,
}

impl Default for ButtonEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl ButtonEngine {
    /// Creates an engine with every button released and no handler.
    pub fn new(debounce_ms: u16) -> Self {
        Self {
            stable: [false; NUM_BUTTONS],
            last_edge: [0; NUM_BUTTONS],
            debounce_ms,
            handler: None,
        }
    }

    /// Returns the last confirmed state of a button. Never samples the pin.
    pub fn state(&self, button: Button) -> bool {
        self.stable[button.index()]
    }

    /// Replaces the transition handler. `None` disables notification;
    /// state tracking continues either way.
    pub fn set_handler(&mut self, handler: Option<ButtonHandler>) {
        self.handler = handler;
    }

    /// Returns the debounce interval in milliseconds.
    pub fn debounce_interval(&self) -> u16 {
        self.debounce_ms
    }

    /// Sets the debounce interval. Applies from the next poll.
    pub fn set_debounce_interval(&mut self, ms: u16) {
        self.debounce_ms = ms;
    }

    /// Polls every button once and returns the number of confirmed
    /// transitions.
    ///
    /// `now` is a wrapping millisecond counter; elapsed time is computed
    /// modulo 2^32 so the engine keeps working across counter rollover.
    pub fn poll<R: RawInput + ?Sized>(&mut self, input: &mut R, now: Millis) -> usize {
        let mut transitions = 0;

        for button in Button::ALL {
            let i = button.index();

            if now.wrapping_sub(self.last_edge[i]) < Millis::from(self.debounce_ms) {
                continue;
            }

            // Active low: a closed contact pulls the pin to ground
            let pressed = !input.read_raw(button);
            if pressed == self.stable[i] {
                continue;
            }

            self.stable[i] = pressed;
            self.last_edge[i] = now;
            transitions += 1;
            debug!("Button {} {} at {}ms", button, edge_name(pressed), now);

            if let Some(handler) = self.handler.as_mut() {
                handler(button, pressed);
            }
        }

        transitions
    }
}

fn edge_name(pressed: bool) -> &'static str {
    if pressed {
        "pressed"
    } else {
        "released"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Events = Rc<RefCell<Vec<(Button, bool)>>>;

    /// Raw pin levels, all high (released) initially.
    struct Pins([bool; NUM_BUTTONS]);

    impl Pins {
        fn new() -> Self {
            Self([true; NUM_BUTTONS])
        }

        fn set_pressed(&mut self, button: Button, pressed: bool) {
            self.0[button.index()] = !pressed;
        }
    }

    impl RawInput for Pins {
        fn read_raw(&mut self, button: Button) -> bool {
            self.0[button.index()]
        }
    }

    fn recording_engine(debounce_ms: u16) -> (ButtonEngine, Events) {
        let events: Events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let mut engine = ButtonEngine::new(debounce_ms);
        engine.set_handler(Some(Box::new(move |b: Button, s: bool| {
            sink.borrow_mut().push((b, s))
        })));
        (engine, events)
    }

    #[test]
    fn test_press_release_scenario() {
        let (mut engine, events) = recording_engine(200);
        let mut pins = Pins::new();

        pins.set_pressed(Button::Up, true);
        engine.poll(&mut pins, 0);
        assert!(events.borrow().is_empty());

        engine.poll(&mut pins, 210);
        assert_eq!(*events.borrow(), vec![(Button::Up, true)]);
        assert!(engine.state(Button::Up));

        engine.poll(&mut pins, 400);
        assert_eq!(events.borrow().len(), 1);

        pins.set_pressed(Button::Up, false);
        engine.poll(&mut pins, 620);
        assert_eq!(
            *events.borrow(),
            vec![(Button::Up, true), (Button::Up, false)]
        );
        assert!(!engine.state(Button::Up));
    }

    #[test]
    fn test_bounce_inside_window_is_not_sampled() {
        let (mut engine, events) = recording_engine(200);
        let mut pins = Pins::new();

        pins.set_pressed(Button::Red, true);
        assert_eq!(engine.poll(&mut pins, 1000), 1);

        // Contact bounces open and closed during the settling window
        pins.set_pressed(Button::Red, false);
        assert_eq!(engine.poll(&mut pins, 1050), 0);
        pins.set_pressed(Button::Red, true);
        assert_eq!(engine.poll(&mut pins, 1100), 0);

        // Stable again by the time the window closes
        assert_eq!(engine.poll(&mut pins, 1200), 0);
        assert_eq!(*events.borrow(), vec![(Button::Red, true)]);
    }

    #[test]
    fn test_steady_state_is_idempotent() {
        let (mut engine, events) = recording_engine(200);
        let mut pins = Pins::new();
        pins.set_pressed(Button::Blue, true);

        for t in (200..5000).step_by(37) {
            engine.poll(&mut pins, t);
        }
        assert_eq!(*events.borrow(), vec![(Button::Blue, true)]);
    }

    #[test]
    fn test_buttons_have_independent_timers() {
        let (mut engine, events) = recording_engine(200);
        let mut pins = Pins::new();

        pins.set_pressed(Button::Left, true);
        engine.poll(&mut pins, 300);

        // Right is pressed while Left is still inside its window
        pins.set_pressed(Button::Right, true);
        engine.poll(&mut pins, 350);

        assert_eq!(
            *events.borrow(),
            vec![(Button::Left, true), (Button::Right, true)]
        );
    }

    #[test]
    fn test_multiple_transitions_in_one_poll() {
        let (mut engine, events) = recording_engine(200);
        let mut pins = Pins::new();
        pins.set_pressed(Button::Down, true);
        pins.set_pressed(Button::Blue, true);

        assert_eq!(engine.poll(&mut pins, 500), 2);
        assert_eq!(
            *events.borrow(),
            vec![(Button::Down, true), (Button::Blue, true)]
        );
    }

    #[test]
    fn test_no_read_inside_window() {
        let mut engine = ButtonEngine::new(200);
        let mut reads = Vec::new();
        let mut reader = |b: Button| {
            reads.push(b);
            true
        };

        engine.poll(&mut reader, 100);
        assert!(reads.is_empty());
    }

    #[test]
    fn test_timestamp_wraparound() {
        let (mut engine, events) = recording_engine(200);
        let mut pins = Pins::new();

        pins.set_pressed(Button::Up, true);
        engine.poll(&mut pins, u32::MAX - 50);
        assert_eq!(events.borrow().len(), 1);

        pins.set_pressed(Button::Up, false);
        // 100ms elapsed across the rollover: still settling
        engine.poll(&mut pins, 49);
        assert_eq!(events.borrow().len(), 1);

        // 201ms elapsed
        engine.poll(&mut pins, 150);
        assert_eq!(
            *events.borrow(),
            vec![(Button::Up, true), (Button::Up, false)]
        );
    }

    #[test]
    fn test_handler_removed_still_tracks_state() {
        let (mut engine, events) = recording_engine(200);
        let mut pins = Pins::new();
        engine.set_handler(None);

        pins.set_pressed(Button::Red, true);
        assert_eq!(engine.poll(&mut pins, 300), 1);
        assert!(engine.state(Button::Red));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_handler_replacement() {
        let (mut engine, first) = recording_engine(200);
        let second: Events = Rc::new(RefCell::new(Vec::new()));
        let sink = second.clone();
        let mut pins = Pins::new();

        pins.set_pressed(Button::Up, true);
        engine.poll(&mut pins, 300);

        engine.set_handler(Some(Box::new(move |b: Button, s: bool| {
            sink.borrow_mut().push((b, s))
        })));
        pins.set_pressed(Button::Up, false);
        engine.poll(&mut pins, 600);

        assert_eq!(*first.borrow(), vec![(Button::Up, true)]);
        assert_eq!(*second.borrow(), vec![(Button::Up, false)]);
    }

    #[test]
    fn test_interval_change_applies_next_poll() {
        let (mut engine, events) = recording_engine(200);
        let mut pins = Pins::new();

        pins.set_pressed(Button::Left, true);
        engine.poll(&mut pins, 1000);
        pins.set_pressed(Button::Left, false);

        engine.set_debounce_interval(50);
        assert_eq!(engine.debounce_interval(), 50);
        engine.poll(&mut pins, 1060);
        assert_eq!(events.borrow().last(), Some(&(Button::Left, false)));
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(ButtonEngine::default().debounce_interval(), 200);
    }
}
