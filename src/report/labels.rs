//! Human-readable labels attached to grouped aggregates.

use crate::core::{
    Department, DepartmentId, Dimension, DimensionId, Generation, GenerationId, Role, RoleId,
};
use crate::stats::Category;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Descriptive metadata for one group key.
///
/// Serialized flat, so a labelled table reads
/// `{ "role_id": 3, "role_name": "Engineer", "responder_count": 12, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GroupLabel {
    Dimension {
        dimension_id: DimensionId,
        dimension_name: String,
        dimension_name_short: String,
    },
    Department {
        department_id: DepartmentId,
        department_name: String,
        department_name_short: String,
    },
    Role {
        role_id: RoleId,
        role_name: String,
    },
    Generation {
        generation_id: GenerationId,
        generation_name: String,
    },
    Gender {
        gender: i32,
    },
}

impl GroupLabel {
    /// Label carrying only the raw id, used when metadata is missing.
    pub fn placeholder(category: Category, id: i32) -> Self {
        match category {
            Category::Dimension => GroupLabel::Dimension {
                dimension_id: id,
                dimension_name: String::new(),
                dimension_name_short: String::new(),
            },
            Category::Department => GroupLabel::Department {
                department_id: id,
                department_name: String::new(),
                department_name_short: String::new(),
            },
            Category::Role => GroupLabel::Role {
                role_id: id,
                role_name: String::new(),
            },
            Category::Generation => GroupLabel::Generation {
                generation_id: id,
                generation_name: String::new(),
            },
            Category::Gender => GroupLabel::Gender { gender: id },
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            GroupLabel::Dimension { dimension_id, .. } => *dimension_id,
            GroupLabel::Department { department_id, .. } => *department_id,
            GroupLabel::Role { role_id, .. } => *role_id,
            GroupLabel::Generation { generation_id, .. } => *generation_id,
            GroupLabel::Gender { gender } => *gender,
        }
    }

    /// Display name, empty for placeholders and genders.
    pub fn name(&self) -> &str {
        match self {
            GroupLabel::Dimension { dimension_name, .. } => dimension_name,
            GroupLabel::Department {
                department_name, ..
            } => department_name,
            GroupLabel::Role { role_name, .. } => role_name,
            GroupLabel::Generation {
                generation_name, ..
            } => generation_name,
            GroupLabel::Gender { .. } => "",
        }
    }
}

impl From<&Dimension> for GroupLabel {
    fn from(d: &Dimension) -> Self {
        GroupLabel::Dimension {
            dimension_id: d.id,
            dimension_name: d.name.clone(),
            dimension_name_short: d.short_name.clone().unwrap_or_default(),
        }
    }
}

impl From<&Department> for GroupLabel {
    fn from(d: &Department) -> Self {
        GroupLabel::Department {
            department_id: d.id,
            department_name: d.name.clone(),
            department_name_short: d.short_name.clone().unwrap_or_default(),
        }
    }
}

impl From<&Role> for GroupLabel {
    fn from(r: &Role) -> Self {
        GroupLabel::Role {
            role_id: r.id,
            role_name: r.name.clone(),
        }
    }
}

impl From<&Generation> for GroupLabel {
    fn from(g: &Generation) -> Self {
        GroupLabel::Generation {
            generation_id: g.id,
            generation_name: g.name.clone(),
        }
    }
}

/// Metadata-by-id lookups for one project.
#[derive(Debug, Clone, Default)]
pub struct MetadataCatalog {
    dimensions: HashMap<DimensionId, Dimension>,
    departments: HashMap<DepartmentId, Department>,
    roles: HashMap<RoleId, Role>,
    generations: HashMap<GenerationId, Generation>,
}

impl MetadataCatalog {
    pub fn new(
        dimensions: Vec<Dimension>,
        departments: Vec<Department>,
        roles: Vec<Role>,
        generations: Vec<Generation>,
    ) -> Self {
        Self {
            dimensions: dimensions.into_iter().map(|d| (d.id, d)).collect(),
            departments: departments.into_iter().map(|d| (d.id, d)).collect(),
            roles: roles.into_iter().map(|r| (r.id, r)).collect(),
            generations: generations.into_iter().map(|g| (g.id, g)).collect(),
        }
    }

    /// Whether an id names known metadata. Genders are always known.
    pub fn contains(&self, category: Category, id: i32) -> bool {
        match category {
            Category::Dimension => self.dimensions.contains_key(&id),
            Category::Department => self.departments.contains_key(&id),
            Category::Role => self.roles.contains_key(&id),
            Category::Generation => self.generations.contains_key(&id),
            Category::Gender => true,
        }
    }

    pub fn label(&self, category: Category, id: i32) -> GroupLabel {
        let found = match category {
            Category::Dimension => self.dimensions.get(&id).map(GroupLabel::from),
            Category::Department => self.departments.get(&id).map(GroupLabel::from),
            Category::Role => self.roles.get(&id).map(GroupLabel::from),
            Category::Generation => self.generations.get(&id).map(GroupLabel::from),
            Category::Gender => Some(GroupLabel::Gender { gender: id }),
        };
        found.unwrap_or_else(|| {
            debug!(category = %category, id, "Missing metadata, using placeholder label");
            GroupLabel::placeholder(category, id)
        })
    }

    /// Dimension names keyed by id, for question charts.
    pub fn dimension_names(&self) -> HashMap<DimensionId, String> {
        self.dimensions
            .iter()
            .map(|(id, d)| (*id, d.name.clone()))
            .collect()
    }
}
