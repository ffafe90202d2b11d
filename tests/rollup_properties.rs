//! Property tests for the department rollup, aggregates, range bucketing and
//! tree building.

mod common;

use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use surveymap::core::{Department, DepartmentId, EnrichedResponse};
use surveymap::department::{flat_view, DepartmentForest};
use surveymap::stats::{
    bucket_records, compute_department_statistics, compute_statistics, ranges_from_boundaries,
    DepartmentRollup, RangeField,
};
use uuid::Uuid;

/// Parent of department `i` (1-based) is `None` or an earlier department.
fn forest_strategy() -> impl Strategy<Value = Vec<Department>> {
    (1usize..25).prop_flat_map(|n| {
        proptest::collection::vec(proptest::option::of(any::<prop::sample::Index>()), n).prop_map(
            |parents| {
                parents
                    .into_iter()
                    .enumerate()
                    .map(|(i, parent)| {
                        let id = i as DepartmentId + 1;
                        let parent_id = match parent {
                            Some(index) if i > 0 => Some(index.index(i) as DepartmentId + 1),
                            _ => None,
                        };
                        let mut department = common::department(id, parent_id, 0);
                        department.population = (id as u32) % 7;
                        department
                    })
                    .collect()
            },
        )
    })
}

/// Responders spread over the forest, each answering a few questions.
fn records_for(departments: &[Department], seeds: &[(usize, u8, Vec<i32>)]) -> Vec<EnrichedResponse> {
    let forest = DepartmentForest::build(departments);
    let mut records = Vec::new();
    for (n, (slot, service, scores)) in seeds.iter().enumerate() {
        let department_id = departments[slot % departments.len()].id;
        let chain = forest.ancestor_chain(department_id);
        for (question, &score) in scores.iter().enumerate() {
            records.push(EnrichedResponse {
                responder_id: Uuid::from_u128(n as u128 + 1),
                question_id: question as i32,
                dimension_id: (question % 3) as i32,
                role_id: 1,
                department_id,
                department_top: *chain.last().unwrap(),
                department_chain: chain.clone(),
                generation_id: 1,
                service_months: i32::from(*service),
                birth_year: 1950 + i32::from(*service) % 60,
                age: 18 + i32::from(*service) % 50,
                gender: (n % 3) as i32,
                score,
            });
        }
    }
    records
}

fn seeds_strategy() -> impl Strategy<Value = Vec<(usize, u8, Vec<i32>)>> {
    proptest::collection::vec(
        (
            any::<usize>(),
            any::<u8>(),
            proptest::collection::vec(1i32..=5, 1..6),
        ),
        0..40,
    )
}

proptest! {
    #[test]
    fn prop_rollup_is_additive(departments in forest_strategy(), seeds in seeds_strategy()) {
        let forest = DepartmentForest::build(&departments);
        let records = records_for(&departments, &seeds);
        let all: Vec<DepartmentId> = departments.iter().map(|d| d.id).collect();
        let rolled = compute_department_statistics(&forest, &records, &all);

        for department in &departments {
            let own = records.iter().filter(|r| r.department_id == department.id).count() as u64;
            let children: u64 = forest
                .children(department.id)
                .iter()
                .map(|c| rolled[c].count)
                .sum();
            prop_assert_eq!(rolled[&department.id].count, own + children);
        }
    }

    #[test]
    fn prop_rollup_root_matches_direct_aggregate(
        departments in forest_strategy(),
        seeds in seeds_strategy(),
    ) {
        let forest = DepartmentForest::build(&departments);
        let records = records_for(&departments, &seeds);
        let roots = forest.roots().to_vec();
        let rolled = compute_department_statistics(&forest, &records, &roots);

        for root in roots {
            let within: Vec<_> = records.iter().filter(|r| r.is_within_department(root)).collect();
            let direct = compute_statistics(within);
            prop_assert_eq!(rolled[&root].count, direct.count);
            prop_assert_eq!(rolled[&root].count_unique, direct.count_unique);
            prop_assert_eq!(rolled[&root].total_service_months, direct.total_service_months);
            prop_assert_eq!(rolled[&root].score_histogram, direct.score_histogram);
        }
    }

    #[test]
    fn prop_each_department_resolved_once(
        departments in forest_strategy(),
        seeds in seeds_strategy(),
    ) {
        let forest = DepartmentForest::build(&departments);
        let records = records_for(&departments, &seeds);
        let mut rollup = DepartmentRollup::new(&forest, &records);

        // Every department twice: once as a target, once via its ancestors
        for department in departments.iter().rev() {
            rollup.resolve(department.id);
        }
        for department in &departments {
            rollup.resolve(department.id);
        }
        prop_assert_eq!(rollup.own_computations(), departments.len());
    }

    #[test]
    fn prop_histogram_sums_to_count(
        scores in proptest::collection::vec(-3i32..12, 0..60),
    ) {
        let records: Vec<EnrichedResponse> = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| EnrichedResponse {
                responder_id: Uuid::from_u128((i % 7) as u128),
                question_id: i as i32,
                dimension_id: 0,
                role_id: 0,
                department_id: 1,
                department_chain: vec![1],
                department_top: 1,
                generation_id: 0,
                service_months: 6,
                birth_year: 1990,
                age: 34,
                gender: 0,
                score,
            })
            .collect();
        let stats = compute_statistics(&records);

        prop_assert_eq!(stats.score_histogram.iter().sum::<u64>(), stats.count);
        prop_assert!((0.0..=1.0).contains(&stats.average_score_rate));
        prop_assert_eq!(stats.count, scores.iter().filter(|&&s| s > 0).count() as u64);
    }

    #[test]
    fn prop_range_bucketing_is_first_match(
        ages in proptest::collection::vec(0i32..100, 0..50),
        boundaries in proptest::collection::vec(0i64..100, 2..6),
    ) {
        let mut boundaries = boundaries;
        boundaries.sort_unstable();
        let ranges = ranges_from_boundaries(&boundaries).unwrap();
        let records: Vec<EnrichedResponse> = ages
            .iter()
            .map(|&age| EnrichedResponse {
                responder_id: Uuid::nil(),
                question_id: 0,
                dimension_id: 0,
                role_id: 0,
                department_id: 1,
                department_chain: vec![1],
                department_top: 1,
                generation_id: 0,
                service_months: 0,
                birth_year: 2024 - age,
                age,
                gender: 0,
                score: 3,
            })
            .collect();

        let buckets = bucket_records(&records, &ranges, RangeField::Age);
        prop_assert_eq!(buckets.len(), ranges.len());

        let placed: usize = buckets.iter().map(Vec::len).sum();
        let matching = ages
            .iter()
            .filter(|&&a| ranges.iter().any(|r| r.contains(i64::from(a))))
            .count();
        prop_assert_eq!(placed, matching);

        for (slot, bucket) in buckets.iter().enumerate() {
            for record in bucket {
                let value = i64::from(record.age);
                prop_assert!(ranges[slot].contains(value));
                prop_assert!(!ranges[..slot].iter().any(|r| r.contains(value)));
            }
        }
    }

    #[test]
    fn prop_tree_build_round_trips(departments in forest_strategy()) {
        let forest = DepartmentForest::build(&departments);
        let flat = flat_view(&forest);

        let input: BTreeSet<_> = departments.iter().map(|d| d.id).collect();
        let output: BTreeSet<_> = flat.iter().map(|d| d.department_id).collect();
        prop_assert_eq!(input, output);

        let parents: HashMap<_, _> = departments.iter().map(|d| (d.id, d.parent_id)).collect();
        for entry in &flat {
            let mut depth = 0;
            let mut seen = HashSet::new();
            let mut current = entry.department_id;
            while let Some(Some(parent)) = parents.get(&current) {
                prop_assert!(seen.insert(current));
                depth += 1;
                current = *parent;
            }
            prop_assert_eq!(entry.level, depth);
        }
    }
}

#[test]
fn test_unique_responder_counted_once() {
    let departments = vec![common::department(1, None, 0)];
    let records = records_for(&departments, &[(0, 30, vec![5, 4, 3, 2, 1])]);
    let stats = compute_statistics(&records);

    assert_eq!(stats.count, 5);
    assert_eq!(stats.count_unique, 1);
    assert_eq!(stats.total_service_months, 30);
}
