use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use batch_rename::cancel::{install_interrupt_handler, CancellationToken};
use batch_rename::cli::Args;
use batch_rename::config::{config_from_env, RenameConfig};
use batch_rename::engine::{apply_plan, prepare_plan, BatchError};
use batch_rename::error::AppError;
use batch_rename::history::write_history;
use batch_rename::logging;
use batch_rename::output::{
    display_dry_run, display_execution_result, display_revert_result, display_rollback_report,
};
use batch_rename::progress::{should_use_colors, Progress};
use batch_rename::prompt::Prompter;
use batch_rename::rewrite::{RegexRewriter, RewriteError};
use batch_rename::rollback::{revert_from_history, RevertError, RevertOptions};
use batch_rename::spinner::SpinnerGuard;
use clap::Parser;
use indicatif::ProgressDrawTarget;
use tracing::{debug, error, info, warn};

fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let config = config_from_env();
    debug!(?config, "Configuration loaded");

    let colors = should_use_colors();
    let mut progress = Progress::new_with_ui(args.verbose > 0, colors);

    if let Some(history_file) = &args.revert {
        info!("Revert mode: {:?}", history_file);
        return revert(history_file, args.dry, &mut progress);
    }

    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stderr());
    let interactive = args.pattern.is_none();

    // Step 1: Gather inputs
    let mut requested = config.default_exclusions.clone();
    if interactive && args.exclude.is_empty() {
        requested.extend(prompter.ask_exclusions()?);
    } else {
        requested.extend(args.exclude.iter().cloned());
    }
    let exclusions: Vec<PathBuf> = requested.iter().map(|p| root.join(p)).collect();
    progress.exclusions(&exclusions.iter().map(PathBuf::as_path).collect::<Vec<_>>());

    let pattern = match args.pattern {
        Some(pattern) => pattern,
        None => prompter.ask_pattern()?,
    };
    if pattern.is_empty() {
        println!("Empty pattern provided. Bye");
        return Ok(());
    }

    let replacement = match args.replace {
        Some(replacement) => replacement,
        None => prompter.ask_replacement()?,
    };

    let rewriter = RegexRewriter::new(&pattern, &replacement).map_err(|e| match e {
        RewriteError::Pattern(e) => AppError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        },
        other => AppError::InvalidReplacement {
            replacement: replacement.clone(),
            message: other.to_string(),
        },
    })?;

    // Step 2: Collect, plan and validate
    let prepared = prepare_plan(&root, &exclusions, &rewriter)?;

    if prepared.plan.is_empty() {
        println!("No matches found for provided pattern: {}. Bye", pattern);
        return Ok(());
    }

    progress.plan_summary(prepared.plan.len(), &pattern);
    for warning in &prepared.report.warnings {
        progress.warn(&warning.message());
    }

    if args.dry {
        display_dry_run(&prepared.plan, &prepared.report, &mut io::stdout())
            .map_err(display_failed)?;
        return Ok(());
    }

    // Step 3: Confirm
    if !args.yes && !prompter.confirm(&pattern, &replacement)? {
        println!("Abort");
        return Ok(());
    }

    // Step 4: Execute, rolling back on failure or interrupt
    let token = CancellationToken::new();
    install_interrupt_handler(token.clone())
        .map_err(|e| AppError::Other(format!("Failed to install interrupt handler: {}", e)))?;

    let result = {
        let spinner = start_spinner(&progress, &config, colors);
        apply_plan(&prepared.plan, &token, spinner.sink())
    };

    match result {
        Ok(ledger) => {
            display_execution_result(&ledger, &mut io::stdout()).map_err(display_failed)?;
            progress.execution_complete(ledger.len());

            if config.write_history && !args.no_history {
                match write_history(&ledger, &root, &pattern, &replacement) {
                    Ok(path) => progress.history_written(&path),
                    Err(e) => {
                        warn!("Failed to write history: {}", e);
                        progress.warn(&format!("Failed to write history file: {}", e));
                    }
                }
            }

            Ok(())
        }
        Err(BatchError::Aborted(aborted)) => {
            progress.rollback_start(&aborted.error.to_string());
            display_rollback_report(&aborted.rollback, &mut io::stdout())
                .map_err(display_failed)?;
            progress.rollback_complete(&aborted.rollback);
            Err(BatchError::Aborted(aborted).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn start_spinner(progress: &Progress, config: &RenameConfig, colors: bool) -> SpinnerGuard {
    if progress.is_silent() || !io::stderr().is_terminal() {
        return SpinnerGuard::disabled();
    }
    SpinnerGuard::start(ProgressDrawTarget::stderr(), config.spinner_interval, colors)
}

fn revert(history_file: &Path, dry_run: bool, progress: &mut Progress) -> Result<(), AppError> {
    let result = revert_from_history(history_file, &RevertOptions { dry_run }, progress)
        .map_err(|e| match e {
            RevertError::History(e) => AppError::HistoryError {
                path: Some(history_file.to_path_buf()),
                message: e.to_string(),
            },
            other => other.into(),
        })?;

    let mut stdout = io::stdout();
    display_revert_result(&result, &mut stdout).map_err(display_failed)?;
    stdout.flush().map_err(display_failed)?;

    Ok(())
}

fn display_failed(e: io::Error) -> AppError {
    AppError::Other(format!("Failed to display output: {}", e))
}
