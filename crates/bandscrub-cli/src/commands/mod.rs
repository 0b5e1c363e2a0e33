//! CLI command implementations

pub mod analyze;
pub mod config_args;
pub mod design;
pub mod json_output;
pub mod noise;
pub mod run;

mod report;
