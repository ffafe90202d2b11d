use serde::{Deserialize, Serialize};

use crate::engine::EngineSettings;
use crate::io::output::OutputFormat;

/// Contents of `.surveymap.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveymapConfig {
    #[serde(default)]
    pub overview: OverviewConfig,
    #[serde(default)]
    pub generations: GenerationConfig,
    #[serde(default)]
    pub ranges: RangeDefaults,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewConfig {
    /// Tree levels reported by `dept-levels`, roots being level 0
    #[serde(default = "default_department_levels")]
    pub department_levels: Vec<usize>,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            department_levels: default_department_levels(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Generation id given to birth years outside every configured range
    #[serde(default = "default_unknown_generation")]
    pub unknown_id: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            unknown_id: default_unknown_generation(),
        }
    }
}

/// Boundary lists used when a range request gives none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeDefaults {
    #[serde(default = "default_age_ranges")]
    pub age: Vec<i64>,
    #[serde(default = "default_birth_year_ranges")]
    pub birth_year: Vec<i64>,
    #[serde(default = "default_service_month_ranges")]
    pub service_months: Vec<i64>,
}

impl Default for RangeDefaults {
    fn default() -> Self {
        Self {
            age: default_age_ranges(),
            birth_year: default_birth_year_ranges(),
            service_months: default_service_month_ranges(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: OutputFormat,
}

pub fn default_department_levels() -> Vec<usize> {
    vec![0, 1, 2, 3]
}

pub fn default_unknown_generation() -> i32 {
    -1
}

pub fn default_age_ranges() -> Vec<i64> {
    vec![18, 30, 40, 50, 60, 100]
}

pub fn default_birth_year_ranges() -> Vec<i64> {
    vec![1946, 1965, 1981, 1997, 2013]
}

pub fn default_service_month_ranges() -> Vec<i64> {
    vec![0, 12, 36, 60, 120, 600]
}

impl SurveymapConfig {
    /// Engine tunables derived from this configuration.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            department_levels: self.overview.department_levels.clone(),
            unknown_generation: self.generations.unknown_id,
            age_ranges: self.ranges.age.clone(),
            birth_year_ranges: self.ranges.birth_year.clone(),
            service_month_ranges: self.ranges.service_months.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: SurveymapConfig = toml::from_str("").unwrap();
        assert_eq!(config, SurveymapConfig::default());
        assert_eq!(config.engine_settings(), EngineSettings::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: SurveymapConfig = toml::from_str(indoc! {r#"
            [overview]
            department_levels = [1, 2]

            [ranges]
            age = [0, 40, 80]

            [output]
            default_format = "terminal"
        "#})
        .unwrap();

        assert_eq!(config.overview.department_levels, vec![1, 2]);
        assert_eq!(config.ranges.age, vec![0, 40, 80]);
        assert_eq!(config.ranges.service_months, default_service_month_ranges());
        assert_eq!(config.generations.unknown_id, -1);
        assert_eq!(config.output.default_format, OutputFormat::Terminal);
    }
}
