//! Core domain types shared by every stage of the statistics pipeline.

pub mod errors;
pub mod types;

pub use errors::{EntityKind, Error, Result, ResultExt};
pub use types::{
    Department, DepartmentId, Dimension, DimensionId, EnrichedResponse, Generation, GenerationId,
    QuestionIndex, RawAnswer, ResponderAttributes, ResponderId, Role, RoleId, Survey, SurveyId,
    NO_DEPARTMENT, UNKNOWN_DIMENSION,
};
