//! Department rollup: statistics of a department including every department
//! below it.
//!
//! Each department's aggregate is its own direct responses merged with the
//! aggregates of its direct children. Children are resolved first through an
//! explicit post-order stack, and every resolved department is cached, so a
//! department's own records are aggregated exactly once per rollup no matter
//! how many ancestors or targets ask for it.
//!
//! The children are merged with [`StatisticsAggregate::absorb_disjoint`].
//! That is sound here because each response belongs to exactly one leaf
//! department, so sibling subtrees never share a responder.
//!
//! The cache lives inside a [`DepartmentRollup`] value and is discarded with
//! it; nothing is shared between computations.

use super::aggregate::{compute_statistics, StatisticsAggregate};
use crate::core::{DepartmentId, EnrichedResponse};
use crate::department::DepartmentForest;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

enum Frame {
    Enter(DepartmentId),
    Exit(DepartmentId),
}

/// Memoized rollup over one forest and one record set.
#[derive(Debug)]
pub struct DepartmentRollup<'a> {
    forest: &'a DepartmentForest,
    records_by_department: HashMap<DepartmentId, Vec<&'a EnrichedResponse>>,
    cache: HashMap<DepartmentId, StatisticsAggregate>,
    own_computations: usize,
}

impl<'a> DepartmentRollup<'a> {
    /// Group records by their leaf department, ready for resolution.
    pub fn new<I>(forest: &'a DepartmentForest, records: I) -> Self
    where
        I: IntoIterator<Item = &'a EnrichedResponse>,
    {
        let mut records_by_department: HashMap<DepartmentId, Vec<&'a EnrichedResponse>> =
            HashMap::new();
        for record in records {
            records_by_department
                .entry(record.department_id)
                .or_default()
                .push(record);
        }

        let outside = records_by_department
            .keys()
            .filter(|id| !forest.contains(**id))
            .count();
        if outside > 0 {
            debug!(
                departments = outside,
                "Responses reference departments outside the forest"
            );
        }

        Self {
            forest,
            records_by_department,
            cache: HashMap::new(),
            own_computations: 0,
        }
    }

    /// Rolled-up statistics for `id`, resolving descendants as needed.
    ///
    /// Unknown ids resolve to the aggregate of their own records (usually empty).
    pub fn resolve(&mut self, id: DepartmentId) -> StatisticsAggregate {
        if let Some(hit) = self.cache.get(&id) {
            return hit.clone();
        }

        let forest = self.forest;
        let mut in_progress: HashSet<DepartmentId> = HashSet::new();
        let mut stack = vec![Frame::Enter(id)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(dept) => {
                    if self.cache.contains_key(&dept) {
                        continue;
                    }
                    if !in_progress.insert(dept) {
                        warn!(department_id = dept, "Cycle detected during rollup; skipping");
                        continue;
                    }
                    stack.push(Frame::Exit(dept));
                    for &child in forest.children(dept) {
                        if !self.cache.contains_key(&child) {
                            stack.push(Frame::Enter(child));
                        }
                    }
                }
                Frame::Exit(dept) => {
                    let mut stats = self.own_statistics(dept);
                    for child in forest.children(dept) {
                        match self.cache.get(child) {
                            Some(child_stats) => stats.absorb_disjoint(child_stats),
                            None => warn!(
                                department_id = dept,
                                child_id = *child,
                                "Child department unresolved; excluded from rollup"
                            ),
                        }
                    }
                    in_progress.remove(&dept);
                    self.cache.insert(dept, stats);
                }
            }
        }

        self.cache.get(&id).cloned().unwrap_or_default()
    }

    fn own_statistics(&mut self, dept: DepartmentId) -> StatisticsAggregate {
        self.own_computations += 1;
        match self.records_by_department.get(&dept) {
            Some(records) => compute_statistics(records.iter().copied()),
            None => StatisticsAggregate::default(),
        }
    }

    /// Number of departments whose own records have been aggregated so far.
    pub fn own_computations(&self) -> usize {
        self.own_computations
    }
}

/// Rolled-up statistics for each target department, keyed and ordered by id.
pub fn compute_department_statistics<'a, I>(
    forest: &'a DepartmentForest,
    records: I,
    targets: &[DepartmentId],
) -> BTreeMap<DepartmentId, StatisticsAggregate>
where
    I: IntoIterator<Item = &'a EnrichedResponse>,
{
    let mut rollup = DepartmentRollup::new(forest, records);
    let results: BTreeMap<_, _> = targets
        .iter()
        .map(|&id| (id, rollup.resolve(id)))
        .collect();
    debug!(
        targets = targets.len(),
        resolved = rollup.own_computations(),
        "Computed department rollup"
    );
    results
}
