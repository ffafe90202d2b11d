//! Summary statistics over enriched responses.
//!
//! [`compute_statistics`] is a pure, total function: any input (including an
//! empty one) yields a well-formed [`StatisticsAggregate`].
//!
//! Two ways of combining partial results exist and they are not
//! interchangeable:
//!
//! - [`StatisticsAggregate::absorb_disjoint`] adds every field. It is only
//!   correct when the two record sets share no responder, which holds for
//!   department subtrees because each responder belongs to exactly one leaf
//!   department.
//! - [`StatisticsAccumulator::merge`] keeps the per-responder map and
//!   deduplicates at merge time. Use it for any other split, such as
//!   per-question partials, where the same responder appears on both sides.

use crate::core::{EnrichedResponse, ResponderId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// Number of rating values (1 through 5).
pub const SCORE_LEVELS: usize = 5;

/// Highest rating value.
pub const MAX_SCORE: i32 = SCORE_LEVELS as i32;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsAggregate {
    /// Total responses
    pub count: u64,
    /// Distinct responders
    pub count_unique: u64,
    /// Weighted mean score divided by the maximum score, in `[0, 1]`
    pub average_score_rate: f64,
    /// Responses per rating value; index 0 holds score 1
    pub score_histogram: [u64; SCORE_LEVELS],
    /// Service months summed once per distinct responder
    pub total_service_months: i64,
}

impl StatisticsAggregate {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Recompute `average_score_rate` from the histogram.
    pub fn recompute_average(&mut self) {
        self.average_score_rate = score_rate(&self.score_histogram);
    }

    /// Add another aggregate computed over a responder-disjoint record set.
    ///
    /// The average is recomputed from the merged histogram.
    pub fn absorb_disjoint(&mut self, other: &StatisticsAggregate) {
        self.count += other.count;
        self.count_unique += other.count_unique;
        self.total_service_months += other.total_service_months;
        for (mine, theirs) in self.score_histogram.iter_mut().zip(other.score_histogram) {
            *mine += theirs;
        }
        self.recompute_average();
    }

    /// Mean score on the 1..5 scale.
    pub fn average_score(&self) -> f64 {
        self.average_score_rate * f64::from(MAX_SCORE)
    }

    pub fn average_score_percent(&self) -> f64 {
        self.average_score_rate * 100.0
    }

    /// Mean service time per responder, in years.
    pub fn average_service_years(&self) -> f64 {
        if self.count_unique == 0 {
            return 0.0;
        }
        self.total_service_months as f64 / self.count_unique as f64 / 12.0
    }
}

/// `Σ histogram[i] * (i + 1) / (5 * Σ histogram[i])`, or 0 for an empty histogram.
pub fn score_rate(histogram: &[u64; SCORE_LEVELS]) -> f64 {
    let count: u64 = histogram.iter().sum();
    if count == 0 {
        return 0.0;
    }
    let weighted: u64 = histogram
        .iter()
        .enumerate()
        .map(|(i, n)| n * (i as u64 + 1))
        .sum();
    weighted as f64 / (count * MAX_SCORE as u64) as f64
}

/// Histogram bucket for a score, clamping out-of-range positives into 1..5.
///
/// Non-positive scores are not ratings and have no bucket.
pub fn score_bucket(score: i32) -> Option<usize> {
    if score <= 0 {
        return None;
    }
    Some((score.clamp(1, MAX_SCORE) - 1) as usize)
}

/// Incremental statistics builder that remembers which responders it has seen.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAccumulator {
    count: u64,
    histogram: [u64; SCORE_LEVELS],
    service_by_responder: HashMap<ResponderId, i32>,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &EnrichedResponse) {
        let Some(bucket) = score_bucket(record.score) else {
            trace!(
                responder = %record.responder_id,
                question = record.question_id,
                score = record.score,
                "Skipping non-rating answer"
            );
            return;
        };
        self.count += 1;
        self.histogram[bucket] += 1;
        // Last write wins; service months never vary per responder.
        self.service_by_responder
            .insert(record.responder_id, record.service_months);
    }

    /// Combine with another accumulator, deduplicating responders.
    pub fn merge(&mut self, other: StatisticsAccumulator) {
        self.count += other.count;
        for (mine, theirs) in self.histogram.iter_mut().zip(other.histogram) {
            *mine += theirs;
        }
        self.service_by_responder.extend(other.service_by_responder);
    }

    pub fn finish(&self) -> StatisticsAggregate {
        StatisticsAggregate {
            count: self.count,
            count_unique: self.service_by_responder.len() as u64,
            average_score_rate: score_rate(&self.histogram),
            score_histogram: self.histogram,
            total_service_months: self
                .service_by_responder
                .values()
                .map(|&m| i64::from(m))
                .sum(),
        }
    }
}

impl<'a> Extend<&'a EnrichedResponse> for StatisticsAccumulator {
    fn extend<I: IntoIterator<Item = &'a EnrichedResponse>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Compute the summary statistics of a record set.
///
/// Records with a non-positive score are not ratings and are ignored
/// entirely: they add nothing to `count`, `count_unique` or
/// `total_service_months`, so the histogram always sums to `count`.
/// Upstream filtering of quantitative answers means the report engine never
/// passes such records in.
pub fn compute_statistics<'a, I>(records: I) -> StatisticsAggregate
where
    I: IntoIterator<Item = &'a EnrichedResponse>,
{
    let mut acc = StatisticsAccumulator::new();
    acc.extend(records);
    acc.finish()
}
