//! `.surveymap.toml` configuration.
//!
//! The file is looked up in the current directory and up to nine of its
//! ancestors. Missing or invalid files fall back to defaults with a warning;
//! configuration problems never abort a report.

mod core;
mod loader;

pub use self::core::{
    default_age_ranges, default_birth_year_ranges, default_department_levels,
    default_service_month_ranges, default_unknown_generation, GenerationConfig, OutputConfig,
    OverviewConfig, RangeDefaults, SurveymapConfig,
};
pub use loader::{
    directory_ancestors, find_config_from, load_config, load_config_from_path, parse_config,
    try_load_config_from_path, CONFIG_FILE_NAME,
};
