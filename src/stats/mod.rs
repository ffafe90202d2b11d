//! Pure statistics over enriched responses.
//!
//! Nothing in this module performs I/O or holds state between calls.

pub mod aggregate;
pub mod grouping;
pub mod questions;
pub mod rollup;

pub use aggregate::{
    compute_statistics, score_rate, StatisticsAccumulator, StatisticsAggregate, MAX_SCORE,
    SCORE_LEVELS,
};
pub use grouping::{
    bucket_by_ranges, bucket_records, group_by_category, group_records, parse_boundaries,
    parse_categories, ranges_from_boundaries, Category, RangeField, ValueRange,
};
pub use questions::{chart_by_dimension, compute_by_question, DimensionQuestionChart, QuestionStatistics};
pub use rollup::{compute_department_statistics, DepartmentRollup};
