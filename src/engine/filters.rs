//! Typed request filters.

use crate::core::{DimensionId, EnrichedResponse, Error, Result};
use crate::stats::{Category, RangeField, ValueRange};
use serde::{Deserialize, Serialize};

/// `category == id`, with departments matching their whole subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub category: Category,
    pub id: i32,
}

impl CategoryFilter {
    pub fn new(category: Category, id: i32) -> Self {
        Self { category, id }
    }

    pub fn matches(&self, record: &EnrichedResponse) -> bool {
        self.category.matches(record, self.id)
    }
}

/// Restriction applied to records before per-question statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordFilter {
    Category(CategoryFilter),
    Range { field: RangeField, range: ValueRange },
}

impl RecordFilter {
    pub fn matches(&self, record: &EnrichedResponse) -> bool {
        match self {
            RecordFilter::Category(filter) => filter.matches(record),
            RecordFilter::Range { field, range } => range.contains(field.value(record)),
        }
    }

    /// Build a filter from a request code, given either an id or a range.
    ///
    /// Range codes (`age`, `birth`, `service`) need `range`; category codes
    /// need `id`.
    pub fn from_code(code: &str, id: Option<i32>, range: Option<ValueRange>) -> Result<Self> {
        if let Ok(field) = code.parse::<RangeField>() {
            let range = range.ok_or_else(|| {
                Error::invalid_input(format!("Range filter '{}' needs lower and upper bounds", code))
            })?;
            return Ok(RecordFilter::Range { field, range });
        }
        let category: Category = code.parse()?;
        let id = id.ok_or_else(|| {
            Error::invalid_input(format!("Category filter '{}' needs an id", code))
        })?;
        Ok(RecordFilter::Category(CategoryFilter::new(category, id)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilter {
    pub filter: Option<RecordFilter>,
    pub dimension_id: Option<DimensionId>,
}

impl QuestionFilter {
    pub fn matches(&self, record: &EnrichedResponse) -> bool {
        self.filter.as_ref().is_none_or(|f| f.matches(record))
            && self.dimension_id.is_none_or(|d| record.dimension_id == d)
    }
}

/// Parameters of a range report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRequest {
    pub field: RangeField,
    /// Boundary list; `None` uses the configured default for the field
    pub boundaries: Option<Vec<i64>>,
    pub filter: Option<CategoryFilter>,
    /// Attach dimension, role and gender breakdowns to every range
    pub more: bool,
}

impl RangeRequest {
    pub fn new(field: RangeField) -> Self {
        Self {
            field,
            boundaries: None,
            filter: None,
            more: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record() -> EnrichedResponse {
        EnrichedResponse {
            responder_id: Uuid::from_u128(1),
            question_id: 2,
            dimension_id: 5,
            role_id: 3,
            department_id: 9,
            department_chain: vec![9, 4],
            department_top: 4,
            generation_id: 1,
            service_months: 40,
            birth_year: 1988,
            age: 36,
            gender: 1,
            score: 4,
        }
    }

    #[test]
    fn test_range_filter_half_open() {
        let inside = RecordFilter::from_code("age", None, Some(ValueRange::new(30, 37))).unwrap();
        let outside = RecordFilter::from_code("age", None, Some(ValueRange::new(20, 36))).unwrap();
        assert!(inside.matches(&record()));
        assert!(!outside.matches(&record()));
    }

    #[test]
    fn test_category_filter_from_code() {
        let filter = RecordFilter::from_code("dept", Some(4), None).unwrap();
        assert!(filter.matches(&record()));
        assert!(RecordFilter::from_code("dept", None, None).is_err());
        assert!(RecordFilter::from_code("service", Some(1), None).is_err());
        assert!(RecordFilter::from_code("planet", Some(1), None).is_err());
    }

    #[test]
    fn test_question_filter_combines_dimension() {
        let mut filter = QuestionFilter {
            filter: Some(RecordFilter::Category(CategoryFilter::new(Category::Role, 3))),
            dimension_id: Some(5),
        };
        assert!(filter.matches(&record()));
        filter.dimension_id = Some(6);
        assert!(!filter.matches(&record()));
        assert!(QuestionFilter::default().matches(&record()));
    }
}
