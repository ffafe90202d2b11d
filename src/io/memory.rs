//! In-memory [`DataStore`] backed by a JSON snapshot.
//!
//! A snapshot is a single JSON document holding every table the engine
//! reads:
//!
//! ```json
//! {
//!   "surveys": [{ "id": 1, "project": "acme" }],
//!   "departments": [{ "id": 1, "name": "HQ", "project": "acme" }],
//!   "roles": [], "dimensions": [], "generations": [],
//!   "responders": [], "responses": []
//! }
//! ```

use super::store::DataStore;
use crate::core::{
    Department, DepartmentId, Dimension, Error, Generation, RawAnswer, ResponderAttributes,
    ResponderId, Result, ResultExt, Role, Survey, SurveyId,
};
use crate::department::DepartmentForest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub surveys: Vec<Survey>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub generations: Vec<Generation>,
    #[serde(default)]
    pub responders: Vec<ResponderAttributes>,
    #[serde(default)]
    pub responses: Vec<RawAnswer>,
}

/// Store serving reads from an owned [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Snapshot,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(contents)?;
        Ok(Self::new(snapshot))
    }

    /// Load a snapshot file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(Error::from)
            .context(format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json_str(&contents).context(format!("Failed to parse snapshot {}", path.display()))
    }
}

impl DataStore for MemoryStore {
    fn survey(&self, survey_id: SurveyId) -> Result<Option<Survey>> {
        Ok(self
            .snapshot
            .surveys
            .iter()
            .find(|s| s.id == survey_id)
            .cloned())
    }

    fn quantitative_responses(&self, survey_id: SurveyId) -> Result<Vec<RawAnswer>> {
        Ok(self
            .snapshot
            .responses
            .iter()
            .filter(|r| r.survey_id == survey_id && r.is_quantitative())
            .cloned()
            .collect())
    }

    fn responder_attributes(
        &self,
        survey_id: SurveyId,
        responder_ids: &[ResponderId],
    ) -> Result<HashMap<ResponderId, ResponderAttributes>> {
        let wanted: std::collections::HashSet<_> = responder_ids.iter().collect();
        Ok(self
            .snapshot
            .responders
            .iter()
            .filter(|r| r.survey_id == survey_id && wanted.contains(&r.responder_id))
            .map(|r| (r.responder_id, r.clone()))
            .collect())
    }

    fn department_ancestor_chains(
        &self,
        project: &str,
    ) -> Result<HashMap<DepartmentId, Vec<DepartmentId>>> {
        let departments = self.departments(project)?;
        Ok(DepartmentForest::build(&departments).ancestor_chains())
    }

    fn generation_ranges(&self) -> Result<Vec<Generation>> {
        Ok(self.snapshot.generations.clone())
    }

    fn departments(&self, project: &str) -> Result<Vec<Department>> {
        Ok(self
            .snapshot
            .departments
            .iter()
            .filter(|d| d.project == project)
            .cloned()
            .collect())
    }

    fn roles(&self, project: &str) -> Result<Vec<Role>> {
        Ok(self
            .snapshot
            .roles
            .iter()
            .filter(|r| r.project == project)
            .cloned()
            .collect())
    }

    fn dimensions(&self, project: &str) -> Result<Vec<Dimension>> {
        Ok(self
            .snapshot
            .dimensions
            .iter()
            .filter(|d| d.project == project)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SNAPSHOT: &str = indoc! {r#"
        {
          "surveys": [{ "id": 1, "project": "acme" }],
          "departments": [
            { "id": 1, "name": "HQ", "project": "acme" },
            { "id": 2, "name": "Ops", "project": "acme", "parent_id": 1, "tree_level": 1 },
            { "id": 9, "name": "Other", "project": "globex" }
          ],
          "responders": [
            { "responder_id": "00000000-0000-0000-0000-000000000001", "survey_id": 1,
              "role_id": 1, "department_id": 2, "birth_year": 1990,
              "service_months": 24, "age": 34 }
          ],
          "responses": [
            { "responder_id": "00000000-0000-0000-0000-000000000001", "survey_id": 1,
              "question_id": 1, "score": 4 },
            { "responder_id": "00000000-0000-0000-0000-000000000001", "survey_id": 1,
              "question_id": 2, "score": 0 },
            { "responder_id": "00000000-0000-0000-0000-000000000001", "survey_id": 1,
              "question_id": 3, "score": 3, "text": "free text" }
          ]
        }
    "#};

    #[test]
    fn test_quantitative_filter() {
        let store = MemoryStore::from_json_str(SNAPSHOT).unwrap();
        let answers = store.quantitative_responses(1).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].question_id, 1);
    }

    #[test]
    fn test_departments_scoped_by_project() {
        let store = MemoryStore::from_json_str(SNAPSHOT).unwrap();
        assert_eq!(store.departments("acme").unwrap().len(), 2);
        assert_eq!(store.departments("globex").unwrap().len(), 1);
    }

    #[test]
    fn test_ancestor_chains_include_self() {
        let store = MemoryStore::from_json_str(SNAPSHOT).unwrap();
        let chains = store.department_ancestor_chains("acme").unwrap();
        assert_eq!(chains[&2], vec![2, 1]);
        assert_eq!(chains[&1], vec![1]);
        assert!(!chains.contains_key(&9));
    }

    #[test]
    fn test_responder_attributes_batch() {
        let store = MemoryStore::from_json_str(SNAPSHOT).unwrap();
        let id = uuid::Uuid::from_u128(1);
        let found = store.responder_attributes(1, &[id, uuid::Uuid::from_u128(2)]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[&id].service_months, 24);
    }

    #[test]
    fn test_malformed_snapshot_is_json_error() {
        let err = MemoryStore::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
