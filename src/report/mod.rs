//! Caller-facing result shapes.

pub mod labels;
pub mod reports;
pub mod tables;

pub use labels::{GroupLabel, MetadataCatalog};
pub use reports::{
    CategoryReport, DepartmentGenerationReport, DepartmentLevelReport, GenerationSlice,
    LevelTables, OverviewReport, QuestionChartReport, QuestionReport, RangeReport, RangeTable,
    SpecificReport, SubdepartmentReport,
};
pub use tables::{Breakdowns, LabeledTable, ScoreTable};
