//! Per-question score statistics.
//!
//! A responder answers many questions, so per-question results are never
//! summed into wider aggregates; recompute from records instead.

use super::aggregate::{score_bucket, SCORE_LEVELS};
use crate::core::{DimensionId, EnrichedResponse, QuestionIndex};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStatistics {
    pub question_id: QuestionIndex,
    /// Dimension of the first record seen for the question
    pub dimension_id: DimensionId,
    pub score_count: u64,
    pub score_avg: f64,
    pub score_avg_percent: f64,
    pub score_modes: [u64; SCORE_LEVELS],
}

#[derive(Debug, Default)]
struct QuestionTally {
    dimension_id: DimensionId,
    count: u64,
    total: i64,
    modes: [u64; SCORE_LEVELS],
}

/// Statistics for each question, ordered by question index.
pub fn compute_by_question<'a, I>(records: I) -> Vec<QuestionStatistics>
where
    I: IntoIterator<Item = &'a EnrichedResponse>,
{
    let mut tallies: BTreeMap<QuestionIndex, QuestionTally> = BTreeMap::new();
    for record in records {
        let Some(bucket) = score_bucket(record.score) else {
            continue;
        };
        let tally = tallies
            .entry(record.question_id)
            .or_insert_with(|| QuestionTally {
                dimension_id: record.dimension_id,
                ..QuestionTally::default()
            });
        tally.count += 1;
        tally.total += bucket as i64 + 1;
        tally.modes[bucket] += 1;
    }

    tallies
        .into_iter()
        .map(|(question_id, tally)| {
            let avg = if tally.count > 0 {
                tally.total as f64 / tally.count as f64
            } else {
                0.0
            };
            QuestionStatistics {
                question_id,
                dimension_id: tally.dimension_id,
                score_count: tally.count,
                score_avg: avg,
                score_avg_percent: avg / SCORE_LEVELS as f64 * 100.0,
                score_modes: tally.modes,
            }
        })
        .collect()
}

/// Questions grouped under their dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionQuestionChart {
    pub dimension_id: DimensionId,
    pub dimension_name: String,
    pub questions: Vec<QuestionStatistics>,
}

/// Group question statistics by dimension, keeping the order in which each
/// dimension first appears.
pub fn chart_by_dimension(
    questions: Vec<QuestionStatistics>,
    dimension_names: &HashMap<DimensionId, String>,
) -> Vec<DimensionQuestionChart> {
    let mut charts: Vec<DimensionQuestionChart> = Vec::new();
    let mut slots: HashMap<DimensionId, usize> = HashMap::new();

    for question in questions {
        let slot = *slots.entry(question.dimension_id).or_insert_with(|| {
            charts.push(DimensionQuestionChart {
                dimension_id: question.dimension_id,
                dimension_name: dimension_names
                    .get(&question.dimension_id)
                    .cloned()
                    .unwrap_or_default(),
                questions: Vec::new(),
            });
            charts.len() - 1
        });
        charts[slot].questions.push(question);
    }
    charts
}
