//! Till CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`till_engine`] (task state and frame loop) and
//! [`till_tui`] (rendering and input), providing RAII-based terminal
//! management with guaranteed cleanup.
//!
//! ```text
//! main() -> load config -> build task -> TerminalSession::new() -> run() -> TaskResult
//!                                                                              |
//!                                                                              v
//!                                                                       JSON on stdout
//! ```
//!
//! Configuration and asset errors are reported before the terminal is put
//! into raw mode.

use std::{
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        size as terminal_size,
    },
};
use ratatui::{backend::CrosstermBackend, layout::Rect};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use till_config::TillConfig;
use till_engine::{
    ChangePolicy, Harness, PacedClock, Task, TaskResult, VerifyChangeTask, WalletTask, run,
};
use till_tui::{CrosstermEvents, TerminalPresenter, UiOptions};

#[derive(Debug, Parser)]
#[command(name = "till", version, about = "Cash-handling practice in the terminal")]
struct Cli {
    /// Read configuration from this file instead of ~/.till/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use the high-contrast palette.
    #[arg(long, global = true)]
    high_contrast: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check the change handed back after a purchase.
    Verify {
        /// always-right, always-wrong or fifty-fifty.
        #[arg(long, value_parser = parse_policy)]
        policy: Option<ChangePolicy>,
    },
    /// Pay a grocery receipt from a fixed wallet.
    Wallet {
        /// Seconds per attempt.
        #[arg(long, value_name = "SECS")]
        max_time: Option<u64>,
        #[arg(long, value_name = "N")]
        max_attempts: Option<u32>,
    },
}

fn parse_policy(raw: &str) -> Result<ChangePolicy, String> {
    ChangePolicy::parse(raw).ok_or_else(|| {
        format!("unknown policy `{raw}` (expected always-right, always-wrong or fifty-fifty)")
    })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_till_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_till_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in till_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn till_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.till/logs/till.log
    if let Some(config_path) = TillConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("till.log"));
    }

    // Fallback: ./.till/logs/till.log
    candidates.push(PathBuf::from(".till").join("logs").join("till.log"));

    candidates
}

fn load_config(path: Option<&PathBuf>) -> Result<TillConfig> {
    let loaded = match path {
        Some(path) => TillConfig::load_from(path)?
            .with_context(|| format!("config file {} does not exist", path.display()))?,
        None => TillConfig::load()?.unwrap_or_default(),
    };
    Ok(loaded)
}

/// Build the selected task with CLI flags layered over the file.
fn build_task(command: &Command, config: &TillConfig) -> Result<Box<dyn Task>> {
    let catalog = config.catalog()?;
    let task: Box<dyn Task> = match command {
        Command::Verify { policy } => {
            let mut settings = config.verify_settings()?;
            if let Some(policy) = policy {
                settings.policy = *policy;
            }
            Box::new(VerifyChangeTask::new(settings, catalog)?)
        }
        Command::Wallet {
            max_time,
            max_attempts,
        } => {
            let mut settings = config.wallet_settings()?;
            if let Some(secs) = max_time {
                anyhow::ensure!(*secs > 0, "--max-time must be greater than zero");
                settings.max_time = Duration::from_secs(*secs);
            }
            if let Some(attempts) = max_attempts {
                anyhow::ensure!(*attempts > 0, "--max-attempts must be at least 1");
                settings.max_attempts = *attempts;
            }
            Box::new(WalletTask::new(settings, catalog)?)
        }
    };
    Ok(task)
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, the alternate screen and mouse capture are all undone on drop,
/// so the terminal stays usable after errors or early returns.
struct TerminalSession {
    presenter: TerminalPresenter<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new(options: UiOptions) -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            let _ = execute!(out, DisableMouseCapture, LeaveAlternateScreen);
            return Err(err.into());
        }

        match TerminalPresenter::new(CrosstermBackend::new(out), options) {
            Ok(presenter) => Ok(Self { presenter }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen);
                Err(err)
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let terminal = self.presenter.terminal_mut();
        let _ = disable_raw_mode();
        let _ = execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = terminal.show_cursor();
    }
}

fn run_in_terminal(task: &mut dyn Task, options: UiOptions, fps: u32) -> Result<TaskResult> {
    let (width, height) = terminal_size().context("querying terminal size")?;
    let mut events = CrosstermEvents::new(task.view().scene, Rect::new(0, 0, width, height));
    let mut session = TerminalSession::new(options)?;
    run(
        task,
        Harness {
            clock: &mut PacedClock::new(),
            events: &mut events,
            presenter: &mut session.presenter,
            fps,
        },
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_ref())?;
    let fps = config.fps()?;
    let options = UiOptions {
        ascii_only: config.ascii_only(),
        high_contrast: cli.high_contrast || config.high_contrast(),
    };
    let mut task = build_task(&cli.command, &config)?;

    let result = run_in_terminal(task.as_mut(), options, fps);
    let result = match result {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("Run failed: {err:?}");
            return Err(err);
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("serializing task result")?
    );
    Ok(())
}
