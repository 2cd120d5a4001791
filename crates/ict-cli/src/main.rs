//! Interactive Coffee Table Tool
//!
//! Offline helper for checking matrix wiring and debounce timing without
//! the table attached.

mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ict_hw::sim::SimMatrix;
use ict_hw::{Frame, MatrixDisplay, TableConfig, SEGMENT_SIZE};
use serde::Deserialize;
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ictctl")]
#[command(about = "Matrix mapping and debounce tool for the interactive coffee table")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (same format as ictd)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which chip, row and column drive a pixel
    Map {
        /// Column, 0 at the left
        x: usize,
        /// Row, 0 at the top
        y: usize,
    },
    /// List every chip in the chain with the pixels it covers
    Layout,
    /// Replay a button script and print confirmed transitions
    Debounce {
        /// Script file, or - for stdin
        script: String,

        /// Override the configured debounce interval
        #[arg(long)]
        interval: Option<u16>,
    },
    /// Draw an ASCII bitmap (# on, . off) and print the row writes
    Render {
        /// Bitmap file, or - for stdin
        bitmap: String,
    },
}

/// The part of the daemon configuration this tool reads.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    table: TableConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TableConfig::default(),
    };

    match cli.command {
        Commands::Map { x, y } => handle_map(&config, x, y, cli.json),
        Commands::Layout => handle_layout(&config, cli.json),
        Commands::Debounce { script, interval } => {
            handle_debounce(&config, &script, interval, cli.json)
        }
        Commands::Render { bitmap } => handle_render(&config, &bitmap, cli.json),
    }
}

fn load_config(path: &Path) -> Result<TableConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content).context("Failed to parse configuration")?;
    debug!("Loaded configuration from: {}", path.display());
    Ok(config.table)
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

fn handle_map(config: &TableConfig, x: usize, y: usize, json: bool) -> Result<()> {
    let layout = config.matrix.layout()?;
    let addr = layout.locate(x, y)?;

    if json {
        println!(
            "{}",
            json!({
                "x": x,
                "y": y,
                "segment": addr.segment,
                "row": addr.row,
                "column": addr.column,
                "mask": addr.mask(),
            })
        );
    } else {
        println!("Pixel ({}, {}):", x, y);
        println!("  Segment: {}", addr.segment);
        println!("  Row: {}", addr.row);
        println!("  Column: {}", addr.column);
        println!("  Mask: 0x{:02X}", addr.mask());
    }
    Ok(())
}

fn handle_layout(config: &TableConfig, json: bool) -> Result<()> {
    let layout = config.matrix.layout()?;
    let mut segments = Vec::with_capacity(layout.segment_count());
    for segment in 0..layout.segment_count() {
        segments.push((segment, layout.segment_origin(segment)?));
    }

    if json {
        let list: Vec<_> = segments
            .iter()
            .map(|(segment, (x, y))| json!({ "segment": segment, "x": x, "y": y }))
            .collect();
        println!(
            "{}",
            json!({
                "width": layout.width(),
                "height": layout.height(),
                "order": layout.order().to_string(),
                "segments": list,
            })
        );
    } else {
        println!(
            "{}x{} pixels, {} segments, {} chain:",
            layout.width(),
            layout.height(),
            layout.segment_count(),
            layout.order()
        );
        for (segment, (x, y)) in segments {
            let (x_end, y_end) = segment_corner(x, y);
            println!(
                "  Segment {:>2}: x {:>3}-{:<3} y {:>3}-{}",
                segment, x, x_end, y, y_end
            );
        }
    }
    Ok(())
}

/// Bottom-right pixel of the segment whose origin is (x, y).
fn segment_corner(x: usize, y: usize) -> (usize, usize) {
    (x + SEGMENT_SIZE - 1, y + SEGMENT_SIZE - 1)
}

fn handle_debounce(
    config: &TableConfig,
    source: &str,
    interval: Option<u16>,
    json: bool,
) -> Result<()> {
    let steps = script::parse(&read_input(source)?)?;
    let interval = interval.unwrap_or(config.debounce_ms);
    let events = script::replay(&steps, interval);

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        println!(
            "{} steps, debounce {}ms, {} transitions:",
            steps.len(),
            interval,
            events.len()
        );
        for event in events {
            println!(
                "  {:>8}ms  {:<6} {}",
                event.time,
                event.button.to_string(),
                if event.pressed { "pressed" } else { "released" }
            );
        }
    }
    Ok(())
}

fn handle_render(config: &TableConfig, source: &str, json: bool) -> Result<()> {
    let frame: Frame = read_input(source)?.parse()?;
    let layout = config.matrix.layout()?;
    let mut display = MatrixDisplay::new(
        SimMatrix::new(layout.segment_count()),
        layout,
        config.matrix.intensity,
    )?;
    let startup = display.driver().log().len();

    let writes = display
        .draw(&frame)
        .context("Bitmap does not match the matrix size")?;
    let commands = &display.driver().log()[startup..];

    if json {
        println!("{}", serde_json::to_string_pretty(commands)?);
    } else {
        println!("{}", display.frame());
        println!("{} row writes:", writes);
        for segment in 0..layout.segment_count() {
            let rows = display.driver().rows(segment);
            let hex: Vec<String> = rows.iter().map(|r| format!("{:02X}", r)).collect();
            println!("  Segment {:>2}: {}", segment, hex.join(" "));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ict_hw::ChainOrder;

    #[test]
    fn test_reads_table_section_of_daemon_config() {
        let config: FileConfig = toml::from_str(
            r#"
            poll_ms = 10

            [table]
            debounce_ms = 80

            [table.matrix]
            order = "serpentine"
            "#,
        )
        .unwrap();
        assert_eq!(config.table.debounce_ms, 80);
        assert_eq!(config.table.matrix.order, ChainOrder::Serpentine);
    }

    #[test]
    fn test_missing_table_section_uses_defaults() {
        let config: FileConfig = toml::from_str("poll_ms = 10").unwrap();
        assert_eq!(config.table, TableConfig::default());
    }

    #[test]
    fn test_segment_corner() {
        assert_eq!(segment_corner(0, 0), (7, 7));
        assert_eq!(segment_corner(8, 16), (15, 23));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["ictctl", "--json", "map", "8", "0"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Map { x: 8, y: 0 }));

        let cli = Cli::try_parse_from(["ictctl", "debounce", "-", "--interval", "50"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Debounce {
                interval: Some(50),
                ..
            }
        ));
    }
}
