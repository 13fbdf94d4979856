//! Schedule command implementation

use serde::Serialize;

use crate::cli::logging::log;
use crate::cli::{LogLevel, OutputFormat, ScheduleArgs};
use crate::prune::{clamp_sparsity, MaskUpdater, PrunerConfig, PruningSchedule};

/// One scheduled mask update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub iteration: usize,
    /// Raw schedule output.
    pub target_sparsity: f32,
    /// Sparsity the mask updater actually applies.
    pub applied_sparsity: f32,
    /// Entries zeroed out of the mask.
    pub pruned: usize,
}

/// Every mask update a full run of `schedule` performs on `elements` weights.
pub fn schedule_table(schedule: &PruningSchedule, elements: usize) -> Vec<ScheduleRow> {
    schedule
        .update_iterations()
        .map(|iteration| {
            let target = schedule.sparsity_at_iteration(iteration);
            ScheduleRow {
                iteration,
                target_sparsity: target,
                applied_sparsity: clamp_sparsity(target),
                pruned: MaskUpdater::prune_count(elements, target),
            }
        })
        .collect()
}

/// Render the table in the requested format.
pub fn format_table(rows: &[ScheduleRow], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)
            .map_err(|e| format!("JSON serialization error: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(rows).map_err(|e| format!("YAML serialization error: {e}"))
        }
        OutputFormat::Text => {
            let mut lines = vec![format!(
                "{:>10}  {:>10}  {:>10}  {:>8}",
                "iteration", "target", "applied", "pruned"
            )];
            lines.extend(rows.iter().map(|row| {
                format!(
                    "{:>10}  {:>10.4}  {:>10.4}  {:>8}",
                    row.iteration, row.target_sparsity, row.applied_sparsity, row.pruned
                )
            }));
            Ok(lines.join("\n"))
        }
    }
}

pub fn run_schedule(args: ScheduleArgs, level: LogLevel) -> Result<(), String> {
    let config = PrunerConfig::load(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let schedule = config.schedule();

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Schedule: upper_bound={}, iter_stop={}, update_period={}, bound_weight={:.6}",
            schedule.upper_bound(),
            schedule.iter_stop(),
            schedule.update_period(),
            schedule.bound_weight()
        ),
    );

    let rows = schedule_table(schedule, args.elements);
    // Machine-readable output is printed even in quiet mode.
    match args.format {
        OutputFormat::Text => log(level, LogLevel::Normal, &format_table(&rows, args.format)?),
        _ => println!("{}", format_table(&rows, args.format)?),
    }
    Ok(())
}
