use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SurveyId = i32;
pub type DepartmentId = i32;
pub type RoleId = i32;
pub type DimensionId = i32;
pub type GenerationId = i32;
pub type QuestionIndex = i32;
pub type ResponderId = Uuid;

/// Dimension id used for answers whose question has no thematic group.
pub const UNKNOWN_DIMENSION: DimensionId = -1;

/// Department id used for records lacking an ancestor at a requested level.
pub const NO_DEPARTMENT: DepartmentId = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub project: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Organizational unit. `parent_id == None` marks a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub project: String,
    #[serde(default)]
    pub parent_id: Option<DepartmentId>,
    #[serde(default)]
    pub tree_level: i32,
    #[serde(default)]
    pub population: u32,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub project: String,
}

/// Thematic group of survey questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: DimensionId,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub project: String,
}

/// Birth-year cohort covering `[year_lower, year_upper]` inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub id: GenerationId,
    pub name: String,
    pub year_lower: i32,
    pub year_upper: i32,
}

impl Generation {
    pub fn contains(&self, birth_year: i32) -> bool {
        birth_year >= self.year_lower && birth_year <= self.year_upper
    }
}

/// Organizational attributes of one responder within one survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponderAttributes {
    pub responder_id: ResponderId,
    pub survey_id: SurveyId,
    pub role_id: RoleId,
    pub department_id: DepartmentId,
    pub birth_year: i32,
    pub service_months: i32,
    pub age: i32,
    /// 0 unspecified, 1/2 per ISO/IEC 5218
    #[serde(default)]
    pub gender: i32,
}

/// A raw question answer as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub responder_id: ResponderId,
    pub survey_id: SurveyId,
    pub question_id: QuestionIndex,
    #[serde(default)]
    pub dimension_id: Option<DimensionId>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub text: Option<String>,
}

impl RawAnswer {
    /// A rating answer: positive score and no free text.
    pub fn is_quantitative(&self) -> bool {
        self.text.is_none() && self.score.is_some_and(|s| s > 0)
    }
}

/// One quantitative answer joined with its responder's organizational context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedResponse {
    pub responder_id: ResponderId,
    pub question_id: QuestionIndex,
    pub dimension_id: DimensionId,
    pub role_id: RoleId,
    pub department_id: DepartmentId,
    /// The leaf department followed by its ancestors, ending at the root
    pub department_chain: Vec<DepartmentId>,
    pub department_top: DepartmentId,
    pub generation_id: GenerationId,
    pub service_months: i32,
    pub birth_year: i32,
    pub age: i32,
    pub gender: i32,
    pub score: i32,
}

impl EnrichedResponse {
    /// True when the record's department is `department_id` or lies below it.
    pub fn is_within_department(&self, department_id: DepartmentId) -> bool {
        self.department_chain.contains(&department_id)
    }

    /// Ancestor of the record's department at tree depth `level` (roots are 0).
    ///
    /// `None` when the department sits above that level.
    pub fn department_at_level(&self, level: usize) -> Option<DepartmentId> {
        let depth = self.department_chain.len();
        if level < depth {
            Some(self.department_chain[depth - 1 - level])
        } else {
            None
        }
    }
}
