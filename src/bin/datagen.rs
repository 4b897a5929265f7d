//! Prints one year of random daily heat samples as `{"heat": [...]}`.
//!
//! Usage: `datagen > heat.json`

use heat_dashboard::datagen::{document, generate, to_pretty_json};
use std::io::{self, Write};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let samples = generate();
    debug!(samples = samples.len(), "generated heat samples");

    let text = to_pretty_json(&document(samples))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}
