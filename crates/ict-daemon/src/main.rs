//! Interactive Coffee Table Daemon
//!
//! Runs the button polling loop against simulated hardware and accepts
//! console commands on stdin for pressing buttons and drawing on the
//! matrix and LCDs.

mod config;
mod console;

use anyhow::{Context, Result};
use ict_hw::sim::{SimLcd, SimMatrix, SimPins};
use ict_hw::{Button, CoffeeTable, Lcd, Millis};
use std::io::BufRead;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use console::{Command, SimTable};

/// Monotonic millisecond clock starting at zero.
///
/// Truncating to 32 bits gives the same wrapping counter the board's
/// firmware clock produces.
struct Clock(Instant);

impl Clock {
    fn start() -> Self {
        Self(Instant::now())
    }

    fn now(&self) -> Millis {
        self.0.elapsed().as_millis() as Millis
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = Config::load(&config_path).context("Failed to load configuration")?;
    info!("Loaded configuration from: {}", config_path);

    let mut table = build_table(&config)?;
    table.set_button_handler(Some(Box::new(|button: Button, pressed: bool| {
        if pressed {
            info!("Button {} pressed", button);
        } else {
            info!("Button {} released", button);
        }
    })));

    // Plain thread: a read pending at exit must not keep the runtime alive
    let (command_tx, mut command_rx) = mpsc::channel::<Command>(16);
    std::thread::Builder::new()
        .name("console".to_string())
        .spawn(move || forward_commands(std::io::stdin().lock(), command_tx))
        .context("Failed to start console reader")?;

    let clock = Clock::start();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.poll_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!("Polling buttons every {}ms", config.poll_ms);

    // Setup Unix signal handlers
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
    let mut console_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                table.poll_buttons(clock.now());
            }
            command = command_rx.recv(), if console_open => match command {
                Some(Command::Quit) => {
                    info!("Shutdown requested from console");
                    break;
                }
                Some(command) => run_command(&mut table, command),
                None => {
                    debug!("Console closed, polling continues");
                    console_open = false;
                }
            },
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down");
                break;
            }
        }
    }

    // Leave the hardware dark on the way out
    table.matrix_mut().clear_all();
    let (_pins, chips, _lcds) = table.into_parts();
    debug!("Matrix received {} commands", chips.command_count());

    Ok(())
}

fn build_table(config: &Config) -> Result<SimTable> {
    let layout = config.table.matrix.layout()?;
    CoffeeTable::new(
        SimPins::new(),
        SimMatrix::unlogged(layout.segment_count()),
        [SimLcd::new(Lcd::Lcd20x4), SimLcd::new(Lcd::Lcd40x2)],
        &config.table,
    )
    .context("Failed to initialize coffee table")
}

fn run_command(table: &mut SimTable, command: Command) {
    match console::apply(table, command) {
        Ok(Some(output)) => print!("{}", ensure_newline(output)),
        Ok(None) => {}
        Err(e) => warn!("Command failed: {}", e),
    }
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Parses console lines and forwards them to the poll loop until input
/// ends, a `quit` is sent or the loop stops listening.
fn forward_commands<R: BufRead>(input: R, tx: mpsc::Sender<Command>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        };

        match console::parse(&line) {
            Ok(Some(command)) => {
                let quit = command == Command::Quit;
                if tx.blocking_send(command).is_err() || quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("{:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn forwarded(input: &str) -> Vec<Command> {
        let (tx, mut rx) = mpsc::channel(16);
        forward_commands(Cursor::new(input.to_string()), tx);

        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    #[test]
    fn test_forward_skips_bad_lines() {
        let commands = forwarded("clear\n# note\nbogus\n\nfill\n");
        assert_eq!(commands, vec![Command::Clear, Command::Fill]);
    }

    #[test]
    fn test_forward_stops_after_quit() {
        let commands = forwarded("show\nquit\nfill\n");
        assert_eq!(commands, vec![Command::Show, Command::Quit]);
    }

    #[test]
    fn test_forward_stops_when_loop_has_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        // Returns instead of blocking on a closed channel
        forward_commands(Cursor::new("clear\nfill\n"), tx);
    }
}
