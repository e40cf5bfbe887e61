// SPDX-License-Identifier: MIT
//
// termsense — reports what the attached terminal can actually do.
//
// This is the diagnostic binary that wires together all the crates:
//
//   sense-console → platform access: tty backend, OSC round-trips
//   sense-palette → 16-color tables, register/ANSI order translation
//   sense-detect  → the capability ladder and live state queries
//
// One run captures the evidence, walks the detection ladder, and prints
// a plain-text report:
//
//   detection → support level, palette choice and its provenance
//   state     → theme verdict, cursor, title, background color
//   palette   → the sixteen RGB values in effect
//
// Output is deliberately unstyled — a capability reporter that assumed
// capabilities would make a poor diagnostic. Logging goes to stderr with
// RUST_LOG controlling verbosity, so the report on stdout stays
// pipeable.

use std::env;
use std::time::Duration;

use sense_console::backend::Console;
use sense_console::state::ColorTarget;
use sense_console::tty::TtyConsole;
use sense_detect::{DetectionSignals, Detector, StateQuery};
use tracing_subscriber::EnvFilter;

/// How long to wait for the terminal to answer a control-channel query.
const QUERY_TIMEOUT: Duration = Duration::from_millis(500);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let console = TtyConsole::new();
    let signals = DetectionSignals::from_env(&console);
    let detection = Detector::new(&console).detect(&signals);

    println!("termsense — terminal capability report");
    println!();
    println!("  color support   {}", detection.support);
    println!("  palette         {}", detection.source);
    println!(
        "  named colors    {}",
        if detection.named_colors {
            "available"
        } else {
            "unavailable"
        }
    );

    let mut query = StateQuery::new(&console);
    if let Some(palette) = detection.palette {
        query = query.with_palette(palette);
    }

    let hint = env::var("COLORFGBG").ok();
    println!(
        "  theme           {}",
        query.theme(hint.as_deref(), QUERY_TIMEOUT)
    );

    match query.cursor_position() {
        Ok((x, y)) => println!("  cursor          ({x}, {y})"),
        Err(error) => println!("  cursor          unavailable ({error})"),
    }

    match console.title() {
        Ok(title) => println!("  title           {title:?}"),
        Err(error) => println!("  title           unavailable ({error})"),
    }

    match query.color(ColorTarget::Background, QUERY_TIMEOUT) {
        Ok((r, g, b)) => println!("  background      #{r:02x}{g:02x}{b:02x}"),
        Err(error) => println!("  background      unavailable ({error})"),
    }

    if let Some(palette) = detection.palette {
        println!();
        println!("  basic palette");
        for (index, (r, g, b)) in palette.iter() {
            println!("    {:>2}  #{r:02x}{g:02x}{b:02x}  {index}", index.get());
        }
    }
}
