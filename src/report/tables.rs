//! Presentation of aggregates as score tables.
//!
//! A [`ScoreTable`] is the caller-facing view of a [`StatisticsAggregate`]:
//! the rate is rescaled to a 1-5 mean and a percentage, and service time is
//! reported as average years per responder.

use super::labels::GroupLabel;
use crate::stats::{Category, StatisticsAggregate, SCORE_LEVELS};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTable {
    pub responder_count: u64,
    pub service_avg: f64,
    pub score_avg: f64,
    pub score_avg_percent: f64,
    pub score_modes: [u64; SCORE_LEVELS],
}

impl From<&StatisticsAggregate> for ScoreTable {
    fn from(stats: &StatisticsAggregate) -> Self {
        Self {
            responder_count: stats.count_unique,
            service_avg: stats.average_service_years(),
            score_avg: stats.average_score(),
            score_avg_percent: stats.average_score_percent(),
            score_modes: stats.score_histogram,
        }
    }
}

impl From<StatisticsAggregate> for ScoreTable {
    fn from(stats: StatisticsAggregate) -> Self {
        Self::from(&stats)
    }
}

/// Score table flattened together with the label of its group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledTable {
    #[serde(flatten)]
    pub label: GroupLabel,
    #[serde(flatten)]
    pub table: ScoreTable,
}

impl LabeledTable {
    pub fn new(label: GroupLabel, stats: &StatisticsAggregate) -> Self {
        Self {
            label,
            table: ScoreTable::from(stats),
        }
    }

    pub fn id(&self) -> i32 {
        self.label.id()
    }
}

/// Optional per-category breakdown lists. Unrequested lists are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdowns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_dimensions: Option<Vec<LabeledTable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_depts: Option<Vec<LabeledTable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_roles: Option<Vec<LabeledTable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_generations: Option<Vec<LabeledTable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_genders: Option<Vec<LabeledTable>>,
}

impl Breakdowns {
    fn slot(&mut self, category: Category) -> &mut Option<Vec<LabeledTable>> {
        match category {
            Category::Dimension => &mut self.score_dimensions,
            Category::Department => &mut self.score_depts,
            Category::Role => &mut self.score_roles,
            Category::Generation => &mut self.score_generations,
            Category::Gender => &mut self.score_genders,
        }
    }

    pub fn set(&mut self, category: Category, tables: Vec<LabeledTable>) {
        *self.slot(category) = Some(tables);
    }

    pub fn get(&self, category: Category) -> Option<&[LabeledTable]> {
        let slot = match category {
            Category::Dimension => &self.score_dimensions,
            Category::Department => &self.score_depts,
            Category::Role => &self.score_roles,
            Category::Generation => &self.score_generations,
            Category::Gender => &self.score_genders,
        };
        slot.as_deref()
    }
}
