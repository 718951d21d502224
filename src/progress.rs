//! Status lines written to stderr while a batch runs.
//!
//! In verbose mode output is suppressed since tracing handles everything.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::rollback::RollbackReport;

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    /// When true, output is colorized
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Progress {
    /// When verbose=true, output is suppressed (tracing handles it)
    pub fn new_with_ui(verbose: bool, colors_enabled: bool) -> Self {
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled,
        }
    }

    /// Create a progress reporter with a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    pub fn silent() -> Self {
        Self {
            writer: Box::new(io::sink()),
            silent: true,
            colors_enabled: false,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Report excluded directories before the walk
    pub fn exclusions(&mut self, dirs: &[&Path]) {
        if self.silent || dirs.is_empty() {
            return;
        }
        let _ = writeln!(self.writer, "Excluded directories:");
        for dir in dirs {
            let _ = writeln!(self.writer, " - {}", dir.display());
        }
    }

    /// Report how many files matched
    pub fn plan_summary(&mut self, matched: usize, pattern: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} files matched the given pattern: {}",
                matched.to_string().cyan().bold(),
                pattern.bold()
            );
        } else {
            let _ = writeln!(
                self.writer,
                "{} files matched the given pattern: {}",
                matched, pattern
            );
        }
    }

    /// Report an error during operation (non-fatal)
    pub fn warn(&mut self, message: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }

    /// Report a successful batch
    pub fn execution_complete(&mut self, count: usize) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} {}",
                "✓".green().bold(),
                format!("Done. {} files renamed", count).green()
            );
        } else {
            let _ = writeln!(self.writer, "Done. {} files renamed.", count);
        }
    }

    /// Report that rollback is starting after a failed batch
    pub fn rollback_start(&mut self, reason: &str) {
        if self.silent {
            return;
        }
        let _ = writeln!(self.writer);
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "✗".red().bold(), reason.red());
            let _ = writeln!(self.writer, "{}", "Rolling back changes...".bold());
        } else {
            let _ = writeln!(self.writer, "Error: {}", reason);
            let _ = writeln!(self.writer, "Rolling back changes...");
        }
    }

    /// Report rollback outcome
    pub fn rollback_complete(&mut self, report: &RollbackReport) {
        if self.silent {
            return;
        }
        if report.is_complete() {
            if self.colors_enabled {
                let _ = writeln!(
                    self.writer,
                    "{}",
                    format!("Rollback completed, {} files restored. Abort", report.restored.len())
                        .yellow()
                );
            } else {
                let _ = writeln!(
                    self.writer,
                    "Rollback completed, {} files restored. Abort",
                    report.restored.len()
                );
            }
        } else {
            let msg = format!(
                "Rollback incomplete: {} of {} files could not be restored",
                report.inconsistencies.len(),
                report.attempted
            );
            if self.colors_enabled {
                let _ = writeln!(self.writer, "{}", msg.red().bold());
            } else {
                let _ = writeln!(self.writer, "{}", msg);
            }
        }
    }

    /// Report history file written
    pub fn history_written(&mut self, path: &Path) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("History saved to: {}", path.display()).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "History saved to: {}", path.display());
        }
    }

    /// Report starting a revert operation
    pub fn revert_start(&mut self, total: usize, from_timestamp: &str) {
        if self.silent {
            return;
        }
        let _ = writeln!(self.writer);
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Reverting {} files from history ({})", total, from_timestamp).bold()
            );
        } else {
            let _ = writeln!(
                self.writer,
                "Reverting {} files from history ({})",
                total, from_timestamp
            );
        }
    }

    /// Report revert complete
    pub fn revert_complete(&mut self, count: usize, dry_run: bool) {
        if self.silent {
            return;
        }
        if dry_run {
            let msg = format!("Dry run complete. {} files would be restored.", count);
            if self.colors_enabled {
                let _ = writeln!(self.writer, "{}", msg.dimmed());
            } else {
                let _ = writeln!(self.writer, "{}", msg);
            }
        } else if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} {}",
                "✓".green().bold(),
                format!("{} files restored", count).green()
            );
        } else {
            let _ = writeln!(self.writer, "Revert complete. {} files restored.", count);
        }
    }
}
