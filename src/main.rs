//! Text Morph configuration and diagnostics CLI.
//!
//! # Commands
//!
//! ```text
//! textmorph [--config config.yaml] check            validate required sections
//! textmorph [--config config.yaml] get app.name     print one value as JSON
//! textmorph [--config config.yaml] logs --lines 20  tail the log file
//! textmorph [--config config.yaml] logs --clear     truncate the log file
//! textmorph [--config config.yaml] watch            hot-reload until ctrl-c
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use textmorph::config::{ConfigStore, ConfigWatcher, ReloadEvent};
use textmorph::lifecycle::signals;
use textmorph::observability::rotating::tail_lines;
use textmorph::observability::{context, DiagnosticsLayer, RotatingFileSink};
use textmorph::{format_error_for_ui, AppContext, TextMorphError};

#[derive(Parser)]
#[command(name = "textmorph")]
#[command(about = "Configuration and diagnostics tooling for Text Morph", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the configuration file
    Check,
    /// Print the value at a dotted path
    Get {
        /// Dotted key path, e.g. `api.groq.model_name`
        path: String,
    },
    /// Show or clear the log file
    Logs {
        #[arg(short = 'n', long, default_value_t = 50)]
        lines: usize,

        #[arg(long)]
        clear: bool,
    },
    /// Reload the configuration whenever the file changes
    Watch,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            let store = match ConfigStore::load(&cli.config).and_then(|store| {
                store.validate()?;
                Ok(store)
            }) {
                Ok(store) => store,
                Err(e) => return Ok(report_failure(&e)),
            };
            println!("{} v{}", store.app_name(), store.app_version());
            println!("Configuration OK: {}", store.path().display());
        }
        Commands::Get { path } => {
            let store = match ConfigStore::load(&cli.config) {
                Ok(store) => store,
                Err(e) => return Ok(report_failure(&e)),
            };
            match store.get(&path) {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => {
                    eprintln!("Key not found: {path}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Logs { lines, clear } => {
            let store = match ConfigStore::load(&cli.config) {
                Ok(store) => store,
                Err(e) => return Ok(report_failure(&e)),
            };

            let settings = store.logging_settings();
            if !settings.file.enabled {
                eprintln!("File logging is disabled");
                return Ok(ExitCode::FAILURE);
            }
            let file = settings.file.file_path();

            // Direct file access: no logger, so nothing is appended.
            if clear {
                if file.exists() {
                    let cleared = RotatingFileSink::open(&file, 0, 0).and_then(|mut sink| sink.truncate());
                    if let Err(e) = cleared {
                        let err = TextMorphError::file_operation(
                            format!("Failed to clear log file: {e}"),
                            Some(file.clone()),
                        );
                        return Ok(report_failure(&err));
                    }
                }
                println!("Cleared {}", file.display());
            } else {
                match tail_lines(&file, lines) {
                    Ok(tail) => {
                        for line in tail {
                            println!("{line}");
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        eprintln!("No log file at {}", file.display());
                    }
                    Err(e) => {
                        let err = TextMorphError::file_operation(
                            format!("Failed to read log file: {e}"),
                            Some(file.clone()),
                        );
                        return Ok(report_failure(&err));
                    }
                }
            }
        }
        Commands::Watch => {
            let ctx = match AppContext::initialize(&cli.config) {
                Ok(ctx) => ctx,
                Err(e) => return Ok(report_failure(&e)),
            };
            watch(ctx).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn watch(ctx: AppContext) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textmorph=debug,notify=warn".into()),
        )
        .with(DiagnosticsLayer::new(ctx.log.clone()))
        .init();

    let (watcher, mut events) = ConfigWatcher::new(Arc::clone(&ctx.config));
    let _watcher = watcher.run()?;
    let log = ctx.log.child("watch");
    log.info_with(
        "Watching configuration",
        context([("path", ctx.config.path().display())]),
    );

    let interrupt = signals::wait_for_interrupt();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = &mut interrupt => break,
            event = events.recv() => match event {
                Some(ReloadEvent::Reloaded { generation }) => {
                    // Logging settings may have changed with the document.
                    ctx.log.setup(&ctx.config);
                    log.debug(format_args!("Applied configuration generation {generation}"));
                }
                Some(ReloadEvent::Failed { error }) => {
                    log.debug(format_args!("Reload rejected ({})", error.code()));
                }
                None => break,
            },
        }
    }

    ctx.log.flush();
    Ok(())
}

fn report_failure(err: &TextMorphError) -> ExitCode {
    eprintln!("{}", format_error_for_ui(err));
    ExitCode::FAILURE
}
