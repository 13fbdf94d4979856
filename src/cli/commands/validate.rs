//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::{LogLevel, ValidateArgs};
use crate::prune::{MaskFiller, PrunerConfig};

/// Format the schedule section as a string
pub fn format_schedule_info(config: &PrunerConfig) -> String {
    let schedule = config.schedule();
    let mut lines = vec![
        format!("  Upper bound: {}", schedule.upper_bound()),
        format!("  Iteration stop: {}", schedule.iter_stop()),
        format!("  Update period: {}", schedule.update_period()),
        format!("  Mask updates: {}", schedule.num_updates()),
        format!("  Final target sparsity: {:.4}", schedule.final_sparsity()),
    ];
    if schedule.overshoots() {
        lines.push("  Note: final update exceeds the upper bound".to_string());
    }
    lines.join("\n")
}

/// Format the mask initialization as a string
pub fn format_mask_info(config: &PrunerConfig) -> String {
    let filler = match config.filler() {
        MaskFiller::Constant { value } => format!("constant ({value})"),
        MaskFiller::UniformThreshold { threshold, seed } => match seed {
            Some(seed) => format!("uniform threshold ({threshold}, seed {seed})"),
            None => format!("uniform threshold ({threshold})"),
        },
        MaskFiller::Provided { values } => format!("provided ({} values)", values.len()),
    };
    format!("  Filler: {filler}\n  Rank key: {}", config.rank_key().display_name())
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("Validating config: {}", args.config.display()));

    let config = PrunerConfig::load(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        log(level, LogLevel::Normal, "");
        log(level, LogLevel::Normal, "Schedule:");
        log(level, LogLevel::Normal, &format_schedule_info(&config));
        log(level, LogLevel::Normal, "");
        log(level, LogLevel::Normal, "Mask:");
        log(level, LogLevel::Normal, &format_mask_info(&config));
    }

    Ok(())
}
