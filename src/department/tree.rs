//! Department forest built from flat department records.
//!
//! Departments are stored in an arena indexed by id. Children are resolved
//! through a parent-id index built once per forest, so no node owns another
//! and parent back-references are plain ids.
//!
//! The builder tolerates imperfect hierarchies:
//!
//! - A department whose `parent_id` names no record in the input is treated
//!   as an orphaned root.
//! - Departments caught in a parent cycle are detached at the smallest id of
//!   each cycle, which then becomes a root.
//! - Duplicate ids keep the first record.
//!
//! Each condition is logged and the build continues.

use crate::core::{Department, DepartmentId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A department placed in the forest.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub department: Department,
    /// Parent id as resolved by the builder (`None` for roots and orphans)
    pub parent: Option<DepartmentId>,
    /// Direct children ordered by `(sort_order, id)`
    pub children: Vec<DepartmentId>,
    /// Depth from the root, computed from the resolved parent links
    pub level: u32,
    /// Own population plus the population of every descendant
    pub population_total: u64,
}

impl TreeNode {
    pub fn id(&self) -> DepartmentId {
        self.department.id
    }
}

/// Forest of departments for a single project.
#[derive(Debug, Clone, Default)]
pub struct DepartmentForest {
    nodes: Vec<TreeNode>,
    index: HashMap<DepartmentId, usize>,
    roots: Vec<DepartmentId>,
}

impl DepartmentForest {
    /// Build the forest from a flat department list.
    pub fn build(departments: &[Department]) -> Self {
        let mut forest = Self::default();

        for department in departments {
            if forest.index.contains_key(&department.id) {
                warn!(
                    department_id = department.id,
                    "Duplicate department id; keeping first record"
                );
                continue;
            }
            forest.index.insert(department.id, forest.nodes.len());
            forest.nodes.push(TreeNode {
                department: department.clone(),
                parent: None,
                children: Vec::new(),
                level: 0,
                population_total: 0,
            });
        }

        forest.link_parents();
        forest.assign_levels();
        forest.sum_populations();

        debug!(
            departments = forest.nodes.len(),
            roots = forest.roots.len(),
            "Built department forest"
        );
        forest
    }

    fn sort_key(&self, id: DepartmentId) -> (i32, DepartmentId) {
        let order = self
            .get(id)
            .map(|node| node.department.sort_order)
            .unwrap_or_default();
        (order, id)
    }

    fn link_parents(&mut self) {
        let mut children_index: HashMap<DepartmentId, Vec<DepartmentId>> = HashMap::new();
        let mut roots = Vec::new();

        for node in &self.nodes {
            match node.department.parent_id {
                None => roots.push(node.id()),
                Some(parent_id) if self.index.contains_key(&parent_id) => {
                    children_index.entry(parent_id).or_default().push(node.id());
                }
                Some(parent_id) => {
                    warn!(
                        department_id = node.id(),
                        parent_id, "Dangling parent reference; treating department as a root"
                    );
                    roots.push(node.id());
                }
            }
        }

        for (parent_id, mut children) in children_index {
            children.sort_by_key(|&id| self.sort_key(id));
            if let Some(&slot) = self.index.get(&parent_id) {
                self.nodes[slot].children = children;
            }
        }

        roots.sort_by_key(|&id| self.sort_key(id));
        self.roots = roots;
    }

    /// Walk down from every root assigning parents and levels. Nodes left
    /// unvisited afterwards can only sit on a parent cycle.
    fn assign_levels(&mut self) {
        let mut visited: HashSet<DepartmentId> = HashSet::new();
        let roots = self.roots.clone();
        for root in roots {
            self.descend_from(root, &mut visited);
        }

        loop {
            let stranded = self
                .nodes
                .iter()
                .map(TreeNode::id)
                .filter(|id| !visited.contains(id))
                .min();
            let Some(cut) = stranded else { break };

            warn!(
                department_id = cut,
                "Department parent chain forms a cycle; detaching it as a root"
            );
            if let Some(parent_id) = self.get(cut).and_then(|n| n.department.parent_id) {
                if let Some(&slot) = self.index.get(&parent_id) {
                    self.nodes[slot].children.retain(|&c| c != cut);
                }
            }
            self.roots.push(cut);
            self.descend_from(cut, &mut visited);
        }
    }

    fn descend_from(&mut self, root: DepartmentId, visited: &mut HashSet<DepartmentId>) {
        let mut stack = vec![(root, None, 0u32)];
        while let Some((id, parent, level)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(&slot) = self.index.get(&id) else {
                continue;
            };
            let node = &mut self.nodes[slot];
            node.parent = parent;
            node.level = level;
            if node.department.tree_level != level as i32 {
                debug!(
                    department_id = id,
                    stored = node.department.tree_level,
                    computed = level,
                    "Stored tree level disagrees with hierarchy"
                );
            }
            for &child in node.children.iter().rev() {
                stack.push((child, Some(id), level + 1));
            }
        }
    }

    fn sum_populations(&mut self) {
        let order = self.preorder();
        for id in order.into_iter().rev() {
            let Some(&slot) = self.index.get(&id) else {
                continue;
            };
            let children_total: u64 = self.nodes[slot]
                .children
                .iter()
                .filter_map(|c| self.get(*c))
                .map(|c| c.population_total)
                .sum();
            let node = &mut self.nodes[slot];
            node.population_total = u64::from(node.department.population) + children_total;
        }
    }

    /// Every department id, parents before children, roots in order.
    pub fn preorder(&self) -> Vec<DepartmentId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            order.extend(self.subtree_ids(root));
        }
        order
    }

    pub fn get(&self, id: DepartmentId) -> Option<&TreeNode> {
        self.index.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn contains(&self, id: DepartmentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[DepartmentId] {
        &self.roots
    }

    /// Direct children of a department; empty for unknown ids.
    pub fn children(&self, id: DepartmentId) -> &[DepartmentId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// The department and every department below it, in preorder.
    ///
    /// Returns an empty list when the id is unknown.
    pub fn subtree_ids(&self, id: DepartmentId) -> Vec<DepartmentId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// The department followed by its ancestors, nearest first, ending at the root.
    pub fn ancestor_chain(&self, id: DepartmentId) -> Vec<DepartmentId> {
        let mut chain = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            chain.push(node.id());
            current = node.parent.and_then(|p| self.get(p));
        }
        chain
    }

    /// Ancestor chains for every department in the forest.
    pub fn ancestor_chains(&self) -> HashMap<DepartmentId, Vec<DepartmentId>> {
        self.nodes
            .iter()
            .map(|node| (node.id(), self.ancestor_chain(node.id())))
            .collect()
    }

    /// Departments whose stored `tree_level` disagrees with the computed level.
    pub fn level_mismatches(&self) -> Vec<DepartmentId> {
        let mut ids: Vec<_> = self
            .nodes
            .iter()
            .filter(|n| n.department.tree_level != n.level as i32)
            .map(TreeNode::id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
