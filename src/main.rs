//! `rhythm`: parse, convert and analyze rhythm patterns, or explore them in a REPL.

use anyhow::{bail, Context, Result};
use clap::Parser as _;
use crossbeam_channel::unbounded;
use rhythm_explorer::cli::{init_tracing, Cli, CliConfig, Command};
use rhythm_explorer::repl::watcher::{FileEvent, FileWatcher};
use rhythm_explorer::repl::{self, run_file};
use rhythm_explorer::report::{analysis_json, render_analysis, render_parsed};
use rhythm_explorer::Session;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from(&cli);
    init_tracing(&config);

    let Some(command) = cli.command else {
        return repl::start(&config);
    };

    let mut session = Session::new(config.engine_config());
    match command {
        Command::Parse { expr } => {
            let parsed = session.evaluate(&expr)?;
            println!("{}", render_parsed(&session, &parsed));
        }
        Command::Analyze { expr } => {
            let pattern = session.resolve(&expr)?;
            let record = session.analyze(&pattern);
            if config.json {
                println!("{}", analysis_json(&record)?);
            } else {
                println!("{}", session.compact(&pattern));
                println!("{}", render_analysis(&record));
            }
        }
        Command::Convert { expr, to } => {
            let pattern = session.resolve(&expr)?;
            match session.encode(&pattern, to) {
                Some(text) => println!("{}", text),
                None => bail!(
                    "no {} encoding for a {}-step pattern",
                    to.name(),
                    pattern.step_count()
                ),
            }
        }
        Command::File { path, watch } => {
            run_file(&mut session, &path)?;
            if watch {
                watch_file(&mut session, &path)?;
            }
        }
    }
    Ok(())
}

/// Re-run `path` on every change until the watcher goes away
fn watch_file(session: &mut Session, path: &Path) -> Result<()> {
    let (tx, rx) = unbounded();
    let mut watcher = FileWatcher::new(tx).context("Failed to create watcher")?;
    watcher
        .watch(path)
        .with_context(|| format!("Failed to watch {}", path.display()))?;
    eprintln!("Watching {} for changes (Ctrl+C to stop)", path.display());

    for event in rx {
        match event {
            FileEvent::Changed(changed) => {
                println!("--- {}", changed.display());
                if let Err(e) = run_file(session, &changed) {
                    eprintln!("Error: {:#}", e);
                }
            }
            FileEvent::Failed(e) => eprintln!("Watch error: {}", e),
        }
    }
    Ok(())
}
