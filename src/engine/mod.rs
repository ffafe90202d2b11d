//! Report computation over a [`DataStore`](crate::io::store::DataStore).
//!
//! Each `compute_*` call fetches one survey's data in a fixed number of
//! batched store reads, expands it, and runs the pure statistics in
//! [`crate::stats`] over the in-memory records.

pub mod filters;
pub mod service;

pub use filters::{CategoryFilter, QuestionFilter, RangeRequest, RecordFilter};
pub use service::SurveyAnalytics;

use crate::core::GenerationId;
use crate::stats::RangeField;

/// Tunables the engine reads from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Tree levels reported by the department-level overview
    pub department_levels: Vec<usize>,
    /// Generation id for birth years no generation covers
    pub unknown_generation: GenerationId,
    pub age_ranges: Vec<i64>,
    pub birth_year_ranges: Vec<i64>,
    pub service_month_ranges: Vec<i64>,
}

impl EngineSettings {
    pub fn default_boundaries(&self, field: RangeField) -> &[i64] {
        match field {
            RangeField::Age => &self.age_ranges,
            RangeField::BirthYear => &self.birth_year_ranges,
            RangeField::ServiceMonths => &self.service_month_ranges,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            department_levels: vec![0, 1, 2, 3],
            unknown_generation: -1,
            age_ranges: vec![18, 30, 40, 50, 60, 100],
            birth_year_ranges: vec![1946, 1965, 1981, 1997, 2013],
            service_month_ranges: vec![0, 12, 36, 60, 120, 600],
        }
    }
}
