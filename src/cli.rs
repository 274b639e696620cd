//! Command-line arguments and the front-end configuration derived from them.

use clap::{Parser, Subcommand};
use rhythm_core::{EngineConfig, LiteralFormat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rhythm")]
#[command(about = "Parse, convert and analyze rhythmic onset patterns", long_about = None)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Seed for R(...) patterns
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Read hex/octal/decimal with the first step as the most significant bit
    #[arg(long, global = true)]
    pub raw_bits: bool,

    /// Print analyses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Largest pattern length to build (default 10000)
    #[arg(long, global = true)]
    pub max_steps: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse an expression and print its compact summary
    Parse { expr: String },

    /// Run every analysis on an expression
    Analyze { expr: String },

    /// Re-encode an expression
    Convert {
        expr: String,

        /// binary, hex, octal, decimal or onsets
        #[arg(short, long, value_parser = parse_format)]
        to: LiteralFormat,
    },

    /// Analyze each line of a file
    File {
        path: PathBuf,

        /// Re-run whenever the file changes
        #[arg(short, long)]
        watch: bool,
    },
}

fn parse_format(s: &str) -> Result<LiteralFormat, String> {
    match LiteralFormat::from_name(s) {
        Some(LiteralFormat::Morse) => Err("morse has no general encoding".to_string()),
        Some(format) => Ok(format),
        None => Err(format!("unknown format '{}'", s)),
    }
}

/// Front-end settings, independent of how they were given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliConfig {
    pub reverse_for_rhythm: bool,
    pub seed: Option<u64>,
    pub verbosity: u8,
    pub json: bool,
    /// Overrides the engine's step ceiling
    pub max_steps: Option<usize>,
}

impl CliConfig {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::new().with_reverse_for_rhythm(self.reverse_for_rhythm);
        if let Some(max) = self.max_steps {
            config = config.with_max_steps(max);
        }
        match self.seed {
            Some(seed) => config.with_random_seed(seed),
            None => config,
        }
    }

    /// Log filter used when `RUST_LOG` is unset or overridden by `-v`
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            reverse_for_rhythm: true,
            seed: None,
            verbosity: 0,
            json: false,
            max_steps: None,
        }
    }
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            reverse_for_rhythm: !cli.raw_bits,
            seed: cli.seed,
            verbosity: cli.verbose,
            json: cli.json,
            max_steps: cli.max_steps,
        }
    }
}

/// Install the stderr subscriber. `-v` takes precedence over `RUST_LOG`.
pub fn init_tracing(config: &CliConfig) {
    let filter = if config.verbosity > 0 {
        EnvFilter::new(config.log_directive())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
