// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod department;
pub mod engine;
pub mod expansion;
pub mod io;
pub mod observability;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use crate::core::{
    Department, DepartmentId, Dimension, EnrichedResponse, EntityKind, Error, Generation,
    RawAnswer, ResponderAttributes, Result, Role, Survey, SurveyId,
};

pub use crate::department::{flat_view, nested_view, DepartmentForest};

pub use crate::engine::{
    CategoryFilter, EngineSettings, QuestionFilter, RangeRequest, RecordFilter, SurveyAnalytics,
};

pub use crate::expansion::{expand_responses, ExpansionContext, GenerationTable};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::io::{DataStore, MemoryStore, Snapshot};

pub use crate::stats::{
    bucket_by_ranges, compute_by_question, compute_department_statistics, compute_statistics,
    group_by_category, Category, RangeField, StatisticsAggregate, ValueRange,
};
