//! Data access trait consumed by the statistics engine.
//!
//! The engine never queries storage record by record. Every method here is a
//! batch read, so one report costs a fixed number of store calls regardless
//! of how many responses it covers.
//!
//! # Example
//!
//! ```rust,ignore
//! use surveymap::io::store::DataStore;
//!
//! fn responder_count<S: DataStore>(store: &S, survey_id: i32) -> Result<usize> {
//!     let answers = store.quantitative_responses(survey_id)?;
//!     // ... pure computation over the batch ...
//! }
//! ```

use crate::core::{
    Department, DepartmentId, Dimension, Generation, RawAnswer, ResponderAttributes, ResponderId,
    Result, Role, Survey, SurveyId,
};
use std::collections::HashMap;

/// Batched read access to survey data.
///
/// Implementations should be thread-safe (`Send + Sync`) so concurrent
/// requests can share one store; the engine itself never writes.
pub trait DataStore: Send + Sync {
    /// Look up a survey; `Ok(None)` when it does not exist.
    fn survey(&self, survey_id: SurveyId) -> Result<Option<Survey>>;

    /// Rating answers of a survey (positive score, no free text).
    fn quantitative_responses(&self, survey_id: SurveyId) -> Result<Vec<RawAnswer>>;

    /// Organizational attributes for a set of responders of one survey.
    ///
    /// Unknown ids are simply absent from the returned map.
    fn responder_attributes(
        &self,
        survey_id: SurveyId,
        responder_ids: &[ResponderId],
    ) -> Result<HashMap<ResponderId, ResponderAttributes>>;

    /// Ancestor chain of every department in a project, keyed by department id.
    ///
    /// Each chain starts with the department itself and ends at its root.
    fn department_ancestor_chains(
        &self,
        project: &str,
    ) -> Result<HashMap<DepartmentId, Vec<DepartmentId>>>;

    fn generation_ranges(&self) -> Result<Vec<Generation>>;

    fn departments(&self, project: &str) -> Result<Vec<Department>>;

    fn roles(&self, project: &str) -> Result<Vec<Role>>;

    fn dimensions(&self, project: &str) -> Result<Vec<Dimension>>;
}
