//! Debounce replay scripts.
//!
//! One step per line, each starting with a timestamp in milliseconds:
//!
//! ```text
//! 0    press up       # contact closes
//! 40   release up     # bounce
//! 60   press up
//! 210  poll
//! 300  debounce 100   # change the interval
//! ```

use anyhow::{bail, Context, Result};
use ict_hw::sim::SimPins;
use ict_hw::{Button, ButtonEngine, Millis};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// What happens at a script step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Change a button's raw contact state.
    Contact { button: Button, pressed: bool },
    Poll,
    Debounce(u16),
}

/// One timestamped script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub time: Millis,
    pub action: Action,
}

/// A confirmed button transition reported during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Event {
    pub time: Millis,
    pub button: Button,
    pub pressed: bool,
}

/// Parses a script. Timestamps must not go backwards.
pub fn parse(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut last: Millis = 0;

    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("Line {}: {}", i + 1, raw.trim()))?;
        if step.time < last {
            bail!("Line {}: time {} is before {}", i + 1, step.time, last);
        }
        last = step.time;
        steps.push(step);
    }

    Ok(steps)
}

fn parse_line(line: &str) -> Result<Step> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let time = words[0].parse().context("Invalid timestamp")?;

    let action = match words[1..] {
        ["press", button] => Action::Contact {
            button: button.parse()?,
            pressed: true,
        },
        ["release", button] => Action::Contact {
            button: button.parse()?,
            pressed: false,
        },
        ["poll"] => Action::Poll,
        ["debounce", ms] => Action::Debounce(ms.parse().context("Invalid interval")?),
        _ => bail!("Expected press <button>, release <button>, poll or debounce <ms>"),
    };

    Ok(Step { time, action })
}

/// Replays a script against a fresh engine and returns every confirmed
/// transition.
pub fn replay(steps: &[Step], debounce_ms: u16) -> Vec<Event> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let now = Rc::new(RefCell::new(0));

    let mut engine = ButtonEngine::new(debounce_ms);
    let sink = events.clone();
    let clock = now.clone();
    engine.set_handler(Some(Box::new(move |button: Button, pressed: bool| {
        sink.borrow_mut().push(Event {
            time: *clock.borrow(),
            button,
            pressed,
        });
    })));

    let mut pins = SimPins::new();
    for step in steps {
        *now.borrow_mut() = step.time;
        match step.action {
            Action::Contact { button, pressed } => pins.set_pressed(button, pressed),
            Action::Poll => {
                engine.poll(&mut pins, step.time);
            }
            Action::Debounce(ms) => engine.set_debounce_interval(ms),
        }
    }
    debug!("Replay sampled {} pins", pins.read_count());

    let confirmed = events.borrow().clone();
    confirmed
}
