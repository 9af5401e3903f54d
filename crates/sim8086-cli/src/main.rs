use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sim8086::{Driver, Listing, RunConfig};
use sim8086_cli::{json_report, load_program, text_report, verify};

#[derive(Parser, Debug)]
#[command(author, version, about = "8086 disassembler and simulator", long_about = None)]
struct Cli {
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: PathBuf,
    /// Simulate the program and print per-instruction state changes
    #[arg(long)]
    exec: bool,
    /// Print each decoded instruction's structure before its line
    #[arg(long)]
    debug: bool,
    /// Reassemble the listing with nasm and compare it with the input
    #[arg(long)]
    check: bool,
    /// Stop after this many instructions
    #[arg(long, default_value_t = RunConfig::default().max_steps)]
    max_steps: u64,
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    /// Directory for the --check listing and reassembled binary
    #[arg(long, value_name = "DIR", default_value = ".")]
    check_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = RunConfig {
        debug: cli.debug,
        execute: cli.exec,
        check: cli.check,
        max_steps: cli.max_steps,
    };

    let program = load_program(&cli.input, cli.skip, cli.len)?;
    let mut driver = Driver::new(&program, cfg)?;

    // Keep what decoded before a failure so it is still printed.
    let mut steps = Vec::new();
    let outcome = loop {
        match driver.step() {
            Ok(Some(step)) => steps.push(step),
            Ok(None) => break Ok(()),
            Err(trap) => break Err(trap),
        }
    };
    let listing = Listing {
        steps,
        final_state: (cfg.execute && outcome.is_ok()).then(|| driver.cpu().snapshot()),
    };

    // The listing is emitted even when the check itself cannot run.
    let check = match (&outcome, cfg.check) {
        (Ok(()), true) => Some(verify(&cli.input, &program, &listing.asm_text(), &cli.check_dir)),
        _ => None,
    };

    let text = match cli.format {
        OutputFormat::Text => text_report(&cli.input, &listing, &cfg, check.as_ref()),
        OutputFormat::Json => json_report(&cli.input, &listing, check.as_ref())?,
    };
    if let Some(path) = &cli.out {
        std::fs::write(path, text).with_context(|| format!("could not write {}", path.display()))?;
    } else {
        print!("{text}");
    }

    outcome.with_context(|| format!("failed to process {}", cli.input.display()))?;
    if let Some(Err(e)) = check {
        return Err(e.context("verification did not complete"));
    }
    Ok(())
}
