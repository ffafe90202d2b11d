//! Categorical grouping and range bucketing of enriched responses.
//!
//! The dimension a request slices by is a closed set. [`Category`] covers the
//! id-valued dimensions and [`RangeField`] the numeric ones; each maps to its
//! record accessor in exactly one `match`.

use super::aggregate::{compute_statistics, StatisticsAggregate};
use crate::core::{EnrichedResponse, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Id-valued grouping dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dimension,
    Department,
    Role,
    Generation,
    Gender,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Dimension,
        Category::Department,
        Category::Role,
        Category::Generation,
        Category::Gender,
    ];

    /// Short request code (`dims`, `dept`, `role`, `gnra`, `gender`).
    pub fn code(self) -> &'static str {
        match self {
            Category::Dimension => "dims",
            Category::Department => "dept",
            Category::Role => "role",
            Category::Generation => "gnra",
            Category::Gender => "gender",
        }
    }

    /// Grouping key of a record.
    ///
    /// Departments group by the leaf department.
    pub fn key(self, record: &EnrichedResponse) -> i32 {
        match self {
            Category::Dimension => record.dimension_id,
            Category::Department => record.department_id,
            Category::Role => record.role_id,
            Category::Generation => record.generation_id,
            Category::Gender => record.gender,
        }
    }

    /// Filter predicate for `category == id`.
    ///
    /// A department filter matches the department's whole subtree.
    pub fn matches(self, record: &EnrichedResponse, id: i32) -> bool {
        match self {
            Category::Department => record.is_within_department(id),
            _ => self.key(record) == id,
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "dims" | "dimension" => Ok(Category::Dimension),
            "dept" | "department" => Ok(Category::Department),
            "role" => Ok(Category::Role),
            "gnra" | "generation" => Ok(Category::Generation),
            "gender" => Ok(Category::Gender),
            other => Err(Error::invalid_input(format!(
                "Invalid category '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parse a comma-separated category list, ignoring empty entries.
pub fn parse_categories(list: &str) -> Result<Vec<Category>> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(Category::from_str)
        .collect()
}

/// Numeric field used for range bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeField {
    Age,
    BirthYear,
    ServiceMonths,
}

impl RangeField {
    pub fn code(self) -> &'static str {
        match self {
            RangeField::Age => "age",
            RangeField::BirthYear => "birth",
            RangeField::ServiceMonths => "service",
        }
    }

    pub fn value(self, record: &EnrichedResponse) -> i64 {
        match self {
            RangeField::Age => i64::from(record.age),
            RangeField::BirthYear => i64::from(record.birth_year),
            RangeField::ServiceMonths => i64::from(record.service_months),
        }
    }
}

impl FromStr for RangeField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "age" => Ok(RangeField::Age),
            "birth" | "birth_year" => Ok(RangeField::BirthYear),
            "service" | "service_months" => Ok(RangeField::ServiceMonths),
            other => Err(Error::invalid_input(format!(
                "Invalid range category '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Half-open interval `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub lower: i64,
    pub upper: i64,
}

impl ValueRange {
    pub fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.lower && value < self.upper
    }

    pub fn as_pair(&self) -> [i64; 2] {
        [self.lower, self.upper]
    }
}

/// Consecutive boundary pairs: `[b0, b1, b2]` gives `[b0, b1)` and `[b1, b2)`.
///
/// Fewer than two boundaries is an invalid request.
pub fn ranges_from_boundaries(boundaries: &[i64]) -> Result<Vec<ValueRange>> {
    if boundaries.len() < 2 {
        return Err(Error::invalid_input(format!(
            "Range needs at least 2 boundaries, got {}",
            boundaries.len()
        )));
    }
    Ok(boundaries
        .windows(2)
        .map(|pair| ValueRange::new(pair[0], pair[1]))
        .collect())
}

/// Parse a comma-separated boundary list such as `"0,30,60"`.
pub fn parse_boundaries(list: &str) -> Result<Vec<i64>> {
    list.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| Error::invalid_input(format!("Invalid range boundary '{}'", part)))
        })
        .collect()
}

/// Group records by a category key, in key order.
pub fn group_records<'a, I>(records: I, category: Category) -> BTreeMap<i32, Vec<&'a EnrichedResponse>>
where
    I: IntoIterator<Item = &'a EnrichedResponse>,
{
    let mut groups: BTreeMap<i32, Vec<&'a EnrichedResponse>> = BTreeMap::new();
    for record in records {
        groups.entry(category.key(record)).or_default().push(record);
    }
    groups
}

/// One aggregate per distinct category key, in key order.
pub fn group_by_category<'a, I>(records: I, category: Category) -> Vec<(i32, StatisticsAggregate)>
where
    I: IntoIterator<Item = &'a EnrichedResponse>,
{
    group_records(records, category)
        .into_iter()
        .map(|(key, group)| (key, compute_statistics(group)))
        .collect()
}

/// Assign each record to the first range containing its field value.
///
/// Records matching no range are dropped. Ranges may overlap or leave gaps.
pub fn bucket_records<'a, I>(
    records: I,
    ranges: &[ValueRange],
    field: RangeField,
) -> Vec<Vec<&'a EnrichedResponse>>
where
    I: IntoIterator<Item = &'a EnrichedResponse>,
{
    let mut buckets: Vec<Vec<&'a EnrichedResponse>> = vec![Vec::new(); ranges.len()];
    for record in records {
        let value = field.value(record);
        if let Some(slot) = ranges.iter().position(|r| r.contains(value)) {
            buckets[slot].push(record);
        }
    }
    buckets
}

/// One aggregate per range, in range order.
pub fn bucket_by_ranges<'a, I>(
    records: I,
    ranges: &[ValueRange],
    field: RangeField,
) -> Vec<(ValueRange, StatisticsAggregate)>
where
    I: IntoIterator<Item = &'a EnrichedResponse>,
{
    bucket_records(records, ranges, field)
        .into_iter()
        .zip(ranges.iter().copied())
        .map(|(bucket, range)| (range, compute_statistics(bucket)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn record(responder: u128, age: i32) -> EnrichedResponse {
        EnrichedResponse {
            responder_id: Uuid::from_u128(responder),
            question_id: 1,
            dimension_id: (responder % 2) as i32,
            role_id: 7,
            department_id: 3,
            department_chain: vec![3, 2, 1],
            department_top: 1,
            generation_id: 1,
            service_months: 12,
            birth_year: 2024 - age,
            age,
            gender: 1,
            score: 4,
        }
    }

    #[test]
    fn test_category_codes_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.code().parse::<Category>().unwrap(), category);
        }
        assert!("bogus".parse::<Category>().is_err());
    }

    #[test]
    fn test_parse_categories_skips_empty() {
        let parsed = parse_categories("dims,,role,").unwrap();
        assert_eq!(parsed, vec![Category::Dimension, Category::Role]);
        assert!(parse_categories("dims,age").is_err());
    }

    #[test]
    fn test_department_filter_matches_subtree() {
        let r = record(1, 30);
        assert!(Category::Department.matches(&r, 3));
        assert!(Category::Department.matches(&r, 1));
        assert!(!Category::Department.matches(&r, 9));
        assert!(Category::Role.matches(&r, 7));
    }

    #[test]
    fn test_group_by_category_in_key_order() {
        let records = vec![record(1, 20), record(2, 30), record(3, 40)];
        let grouped = group_by_category(&records, Category::Dimension);

        let keys: Vec<_> = grouped.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![0, 1]);
        assert_eq!(grouped[0].1.count, 1);
        assert_eq!(grouped[1].1.count, 2);
    }

    #[test]
    fn test_bucket_partition() {
        let ages = [10, 29, 30, 59, 60, 70];
        let records: Vec<_> = ages
            .iter()
            .enumerate()
            .map(|(i, &a)| record(i as u128, a))
            .collect();
        let ranges = ranges_from_boundaries(&[0, 30, 60]).unwrap();
        let buckets = bucket_records(&records, &ranges, RangeField::Age);

        let ages_of = |b: &Vec<&EnrichedResponse>| b.iter().map(|r| r.age).collect::<Vec<_>>();
        assert_eq!(buckets.len(), 2);
        assert_eq!(ages_of(&buckets[0]), vec![10, 29]);
        assert_eq!(ages_of(&buckets[1]), vec![30, 59]);
    }

    #[test]
    fn test_overlapping_ranges_first_match_wins() {
        let records = vec![record(1, 25)];
        let ranges = vec![ValueRange::new(20, 40), ValueRange::new(0, 30)];
        let stats = bucket_by_ranges(&records, &ranges, RangeField::Age);

        assert_eq!(stats[0].1.count, 1);
        assert_eq!(stats[1].1.count, 0);
    }

    #[test]
    fn test_boundaries_require_two_values() {
        assert!(ranges_from_boundaries(&[]).is_err());
        assert!(ranges_from_boundaries(&[5]).is_err());
        assert_eq!(ranges_from_boundaries(&[1, 2]).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_boundaries() {
        assert_eq!(parse_boundaries("0, 30,60").unwrap(), vec![0, 30, 60]);
        assert!(parse_boundaries("0,x").is_err());
        assert!(parse_boundaries("").is_err());
    }

    #[test]
    fn test_zero_length_range_is_empty() {
        let records = vec![record(1, 30)];
        let ranges = ranges_from_boundaries(&[30, 30]).unwrap();
        let stats = bucket_by_ranges(&records, &ranges, RangeField::Age);
        assert_eq!(stats[0].1, StatisticsAggregate::default());
    }
}
