//! Human-readable output helpers shared by the commands.

use bandscrub_spec::ValidationResult;
use colored::Colorize;

/// Prints validation errors and warnings.
pub(crate) fn print_validation(result: &ValidationResult) {
    for error in &result.errors {
        println!("  {} {}", "x".red().bold(), error);
    }
    for warning in &result.warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
}

/// Formats a dB figure, spelling out infinite values.
pub(crate) fn format_db(value: f64) -> String {
    if value == f64::INFINITY {
        "inf dB".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf dB".to_string()
    } else {
        format!("{:.1} dB", value)
    }
}

/// Formats a seed with a note when it was drawn at random.
pub(crate) fn format_seed(seed: u32, generated: bool) -> String {
    if generated {
        format!("{} {}", seed, "(random)".dimmed())
    } else {
        seed.to_string()
    }
}
