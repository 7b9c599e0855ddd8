//! `enigma`: enciphers and deciphers message files with a configured machine.
//!
//! **Usage:**
//! ```text
//! enigma <CONFIG> [INPUT] [OUTPUT] [--verbose]
//! ```
//!
//! `CONFIG` is a machine description, JSON if its extension is `.json`.
//! `INPUT` holds settings lines (`* ...`) and message lines; it defaults to
//! stdin. Converted messages go to `OUTPUT`, or stdout.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use enigma::config::MachineConfig;
use enigma::session::Session;
use enigma::TracingObserver;

/// Rotor cipher machine simulator.
#[derive(Parser)]
#[command(name = "enigma", about = "Encipher or decipher messages with a rotor machine")]
struct Args {
    /// Machine description (text, or JSON with a .json extension).
    config: PathBuf,

    /// Settings and message lines (default: stdin).
    input: Option<PathBuf>,

    /// Destination for converted messages (default: stdout).
    output: Option<PathBuf>,

    /// Trace every rotor step and pipeline stage to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: &Path) -> Result<MachineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read machine description {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let config = if is_json {
        MachineConfig::from_json(&text)
    } else {
        MachineConfig::parse(&text)
    };
    config.with_context(|| format!("invalid machine description {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::TRACE } else { Level::WARN })
        .with_writer(io::stderr)
        .without_time()
        .init();

    let config = load_config(&args.config)?;
    let mut machine = config.build().context("cannot build machine")?;
    if args.verbose {
        machine.set_observer(Some(Box::new(TracingObserver)));
    }

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open input {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create output {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    Session::new(machine)
        .run(input, output)
        .context("conversion failed")?;
    Ok(())
}
