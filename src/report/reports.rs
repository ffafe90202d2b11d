//! Composed results returned by the analytics engine.

use super::labels::GroupLabel;
use super::tables::{Breakdowns, LabeledTable, ScoreTable};
use crate::core::SurveyId;
use crate::stats::{Category, DimensionQuestionChart, QuestionStatistics, RangeField};
use serde::Serialize;

/// Survey-wide table plus any requested breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewReport {
    pub survey_id: SurveyId,
    #[serde(flatten)]
    pub table: ScoreTable,
    #[serde(flatten)]
    pub breakdowns: Breakdowns,
}

/// Results restricted to one category value, broken down by every other
/// category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReport {
    pub survey_id: SurveyId,
    pub group: GroupLabel,
    #[serde(flatten)]
    pub table: ScoreTable,
    #[serde(flatten)]
    pub breakdowns: Breakdowns,
}

/// A single breakdown entry within a filtered group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecificReport {
    pub survey_id: SurveyId,
    pub group: GroupLabel,
    pub category: Category,
    /// `None` when the requested entry has no responses
    pub entry: Option<LabeledTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubdepartmentReport {
    pub survey_id: SurveyId,
    pub group: GroupLabel,
    #[serde(flatten)]
    pub table: ScoreTable,
    pub score_subdepts: Vec<LabeledTable>,
}

/// One bucket of a range report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeTable {
    pub range: [i64; 2],
    #[serde(flatten)]
    pub table: ScoreTable,
    #[serde(flatten)]
    pub breakdowns: Breakdowns,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeReport {
    pub survey_id: SurveyId,
    pub field: RangeField,
    pub ranges: Vec<RangeTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionReport {
    pub survey_id: SurveyId,
    pub questions: Vec<QuestionStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionChartReport {
    pub survey_id: SurveyId,
    pub dimensions: Vec<DimensionQuestionChart>,
}

/// Departments at one tree level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelTables {
    pub level: usize,
    pub departments: Vec<LabeledTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentLevelReport {
    pub survey_id: SurveyId,
    pub response_count: u64,
    #[serde(flatten)]
    pub table: ScoreTable,
    pub levels: Vec<LevelTables>,
}

/// One generation's slice of a department subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSlice {
    pub group: GroupLabel,
    pub score: ScoreTable,
    pub score_dimensions: Vec<LabeledTable>,
    pub score_questions: Vec<QuestionStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentGenerationReport {
    pub survey_id: SurveyId,
    pub group: GroupLabel,
    pub score: ScoreTable,
    pub score_generations: Vec<GenerationSlice>,
}
