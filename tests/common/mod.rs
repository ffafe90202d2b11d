// Shared fixtures for surveymap integration tests
#![allow(dead_code)]

use surveymap::core::{
    Department, DepartmentId, Dimension, Generation, RawAnswer, ResponderAttributes, Role, Survey,
};
use surveymap::io::{MemoryStore, Snapshot};
use uuid::Uuid;

pub const PROJECT: &str = "acme";

pub fn department(id: DepartmentId, parent: Option<DepartmentId>, level: i32) -> Department {
    Department {
        id,
        name: format!("Department {}", id),
        short_name: Some(format!("D{}", id)),
        project: PROJECT.to_string(),
        parent_id: parent,
        tree_level: level,
        population: 10,
        sort_order: 0,
    }
}

pub fn responder_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Builder for in-memory snapshots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Empty project with one survey and the standard generations.
    pub fn new(survey_id: i32) -> Self {
        let mut builder = Self::default();
        builder.snapshot.surveys.push(Survey {
            id: survey_id,
            project: PROJECT.to_string(),
            description: "Engagement".to_string(),
            created: None,
        });
        builder.snapshot.generations = vec![
            Generation {
                id: 1,
                name: "Gen X".into(),
                year_lower: 1965,
                year_upper: 1980,
            },
            Generation {
                id: 2,
                name: "Millennials".into(),
                year_lower: 1981,
                year_upper: 1996,
            },
            Generation {
                id: 3,
                name: "Gen Z".into(),
                year_lower: 1997,
                year_upper: 2012,
            },
        ];
        builder
    }

    pub fn department(mut self, id: DepartmentId, parent: Option<DepartmentId>, level: i32) -> Self {
        self.snapshot.departments.push(department(id, parent, level));
        self
    }

    pub fn role(mut self, id: i32, name: &str) -> Self {
        self.snapshot.roles.push(Role {
            id,
            name: name.to_string(),
            project: PROJECT.to_string(),
        });
        self
    }

    pub fn dimension(mut self, id: i32, name: &str) -> Self {
        self.snapshot.dimensions.push(Dimension {
            id,
            name: name.to_string(),
            short_name: None,
            project: PROJECT.to_string(),
        });
        self
    }

    /// Responder of survey 1 with the given attributes.
    pub fn responder(
        mut self,
        n: u128,
        department_id: DepartmentId,
        role_id: i32,
        birth_year: i32,
        service_months: i32,
    ) -> Self {
        let survey_id = self.survey_id();
        self.snapshot.responders.push(ResponderAttributes {
            responder_id: responder_id(n),
            survey_id,
            role_id,
            department_id,
            birth_year,
            service_months,
            age: 2024 - birth_year,
            gender: (n % 2) as i32 + 1,
        });
        self
    }

    pub fn answer(mut self, n: u128, question: i32, dimension: Option<i32>, score: i32) -> Self {
        let survey_id = self.survey_id();
        self.snapshot.responses.push(RawAnswer {
            responder_id: responder_id(n),
            survey_id,
            question_id: question,
            dimension_id: dimension,
            score: Some(score),
            text: None,
        });
        self
    }

    fn survey_id(&self) -> i32 {
        self.snapshot.surveys.first().map_or(1, |s| s.id)
    }

    pub fn snapshot(self) -> Snapshot {
        self.snapshot
    }

    pub fn store(self) -> MemoryStore {
        MemoryStore::new(self.snapshot)
    }
}

/// Tree `1 -> 2 -> 3`; two responders scoring 5 in department 3 and one
/// scoring 1 in department 2.
pub fn rollup_scenario() -> SnapshotBuilder {
    SnapshotBuilder::new(1)
        .department(1, None, 0)
        .department(2, Some(1), 1)
        .department(3, Some(2), 2)
        .role(1, "Engineer")
        .role(2, "Manager")
        .dimension(10, "Leadership")
        .responder(1, 3, 1, 1990, 24)
        .responder(2, 3, 2, 1975, 120)
        .responder(3, 2, 1, 2000, 12)
        .answer(1, 1, Some(10), 5)
        .answer(2, 1, Some(10), 5)
        .answer(3, 1, Some(10), 1)
}

/// A wider organisation: two roots, a three-level branch and varied answers.
pub fn organisation() -> SnapshotBuilder {
    let mut builder = SnapshotBuilder::new(1)
        .department(1, None, 0)
        .department(2, Some(1), 1)
        .department(3, Some(1), 1)
        .department(4, Some(2), 2)
        .department(5, None, 0)
        .role(1, "Engineer")
        .role(2, "Manager")
        .dimension(10, "Leadership")
        .dimension(20, "Communication");

    let placements = [(1, 1), (2, 2), (3, 3), (4, 4), (5, 4), (6, 5)];
    for (n, dept) in placements {
        builder = builder.responder(n, dept, (n % 2) as i32 + 1, 1960 + (n as i32) * 7, 12 * n as i32);
        for question in 1..=4 {
            let dimension = if question <= 2 { 10 } else { 20 };
            let score = ((n as i32 + question) % 5) + 1;
            builder = builder.answer(n, question, Some(dimension), score);
        }
    }
    builder
}
