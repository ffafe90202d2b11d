//! Serializable renderings of the department forest.

use super::tree::{DepartmentForest, TreeNode};
use crate::core::DepartmentId;
use serde::Serialize;

/// A department with its children nested beneath it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedDepartment {
    pub department_id: DepartmentId,
    pub department_name: String,
    pub department_name_short: String,
    pub parent_id: Option<DepartmentId>,
    pub children: Vec<NestedDepartment>,
    pub level: u32,
    pub population: u32,
    pub population_sum: u64,
}

/// A department with child ids instead of nested children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatDepartment {
    pub department_id: DepartmentId,
    pub department_name: String,
    pub department_name_short: String,
    pub parent_id: Option<DepartmentId>,
    pub children_ids: Vec<DepartmentId>,
    pub level: u32,
    pub population: u32,
    pub population_sum: u64,
}

impl FlatDepartment {
    fn from_node(node: &TreeNode) -> Self {
        Self {
            department_id: node.id(),
            department_name: node.department.name.clone(),
            department_name_short: node.department.short_name.clone().unwrap_or_default(),
            parent_id: node.parent,
            children_ids: node.children.clone(),
            level: node.level,
            population: node.department.population,
            population_sum: node.population_total,
        }
    }
}

/// Nested tree for every root of the forest.
pub fn nested_view(forest: &DepartmentForest) -> Vec<NestedDepartment> {
    forest
        .roots()
        .iter()
        .filter_map(|&root| nest(forest, root))
        .collect()
}

fn nest(forest: &DepartmentForest, id: DepartmentId) -> Option<NestedDepartment> {
    let node = forest.get(id)?;
    Some(NestedDepartment {
        department_id: node.id(),
        department_name: node.department.name.clone(),
        department_name_short: node.department.short_name.clone().unwrap_or_default(),
        parent_id: node.parent,
        children: node
            .children
            .iter()
            .filter_map(|&child| nest(forest, child))
            .collect(),
        level: node.level,
        population: node.department.population,
        population_sum: node.population_total,
    })
}

/// One entry per department, collected in post-order and returned ordered by id.
pub fn flat_view(forest: &DepartmentForest) -> Vec<FlatDepartment> {
    let mut out = Vec::with_capacity(forest.len());
    for &root in forest.roots() {
        collect_postorder(forest, root, &mut out);
    }
    out.sort_by_key(|d| d.department_id);
    out
}

fn collect_postorder(forest: &DepartmentForest, id: DepartmentId, out: &mut Vec<FlatDepartment>) {
    let Some(node) = forest.get(id) else { return };
    for &child in &node.children {
        collect_postorder(forest, child, out);
    }
    out.push(FlatDepartment::from_node(node));
}
