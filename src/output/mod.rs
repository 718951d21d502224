use crate::plan::{ExecutionLedger, RenamePlan};
use crate::rollback::{RevertResult, RollbackReport};
use crate::validator::ValidationReport;
use std::io::{self, Write};

/// Display the plan as `old -> new` pairs without touching anything
pub fn display_dry_run(
    plan: &RenamePlan,
    report: &ValidationReport,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "DRY-RUN MODE:")?;

    for op in plan.iter() {
        writeln!(
            writer,
            "{} -> {}",
            op.source_path.display(),
            op.target_path.display()
        )?;
    }

    if report.has_warnings() {
        writeln!(writer)?;
        writeln!(writer, "Conflicts that would stop execution:")?;
        for warning in &report.warnings {
            writeln!(writer, "  ! {}", warning.message())?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Dry-run completed. Bye")?;

    Ok(())
}

/// Display execution results (non-dry-run)
pub fn display_execution_result(
    ledger: &ExecutionLedger,
    writer: &mut impl Write,
) -> io::Result<()> {
    for op in ledger.operations() {
        writeln!(writer, "  {} -> {}", op.source_name, op.target_name)?;
    }
    writeln!(writer, "Successfully renamed {} files.", ledger.len())?;
    Ok(())
}

/// Display what rollback restored and what it could not
pub fn display_rollback_report(report: &RollbackReport, writer: &mut impl Write) -> io::Result<()> {
    for op in &report.restored {
        writeln!(writer, "  restored {} -> {}", op.target_name, op.source_name)?;
    }
    for inconsistency in &report.inconsistencies {
        writeln!(writer, "  FAILED   {}", inconsistency)?;
    }
    writeln!(
        writer,
        "Rollback: {} of {} renames undone.",
        report.restored.len(),
        report.attempted
    )?;
    Ok(())
}

/// Display a history revert (or its dry run)
pub fn display_revert_result(result: &RevertResult, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "History: {}", result.original_history.display())?;

    match &result.report {
        Some(report) => display_rollback_report(report, writer),
        None => {
            writeln!(writer, "Would restore:")?;
            for op in &result.operations {
                writeln!(
                    writer,
                    "  {} -> {}",
                    op.target_path.display(),
                    op.source_path.display()
                )?;
            }
            Ok(())
        }
    }
}
