//! Response expansion.
//!
//! Joins raw answers with their responder's organizational attributes and
//! department ancestry, producing one [`EnrichedResponse`] per quantitative
//! answer. All lookups go through maps fetched once per survey; expanding a
//! record never touches the store.

mod generations;

pub use generations::GenerationTable;

use crate::core::{
    DepartmentId, EnrichedResponse, GenerationId, RawAnswer, ResponderAttributes, ResponderId,
    Result, Survey, UNKNOWN_DIMENSION,
};
use crate::io::store::DataStore;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Lookup tables shared by every record of one expansion.
#[derive(Debug, Clone)]
pub struct ExpansionContext {
    responders: HashMap<ResponderId, ResponderAttributes>,
    chains: HashMap<DepartmentId, Vec<DepartmentId>>,
    generations: GenerationTable,
}

impl ExpansionContext {
    pub fn new(
        responders: HashMap<ResponderId, ResponderAttributes>,
        chains: HashMap<DepartmentId, Vec<DepartmentId>>,
        generations: GenerationTable,
    ) -> Self {
        Self {
            responders,
            chains,
            generations,
        }
    }

    /// Fetch the lookup tables for `answers` with one batched call per table.
    pub fn load<S: DataStore + ?Sized>(
        store: &S,
        survey: &Survey,
        answers: &[RawAnswer],
        unknown_generation: GenerationId,
    ) -> Result<Self> {
        let responder_ids: Vec<ResponderId> = answers
            .iter()
            .map(|a| a.responder_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let responders = store.responder_attributes(survey.id, &responder_ids)?;
        let chains = store.department_ancestor_chains(&survey.project)?;
        let generations = GenerationTable::new(store.generation_ranges()?, unknown_generation);

        debug!(
            responders = responders.len(),
            departments = chains.len(),
            "Loaded expansion context"
        );
        Ok(Self::new(responders, chains, generations))
    }

    pub fn generations(&self) -> &GenerationTable {
        &self.generations
    }

    /// Ancestor chain of a department, falling back to the department alone.
    fn chain_for(&self, department_id: DepartmentId) -> (Vec<DepartmentId>, bool) {
        match self.chains.get(&department_id) {
            Some(chain) if !chain.is_empty() => (chain.clone(), true),
            _ => (vec![department_id], false),
        }
    }
}

/// Expand raw answers into enriched records.
///
/// Non-quantitative answers are dropped, as are answers whose responder has
/// no attribute row. A department with no known ancestry becomes its own
/// single-element chain.
pub fn expand_responses(answers: &[RawAnswer], context: &ExpansionContext) -> Vec<EnrichedResponse> {
    let mut records = Vec::with_capacity(answers.len());
    let mut missing_responders: BTreeSet<ResponderId> = BTreeSet::new();
    let mut missing_chains: BTreeSet<DepartmentId> = BTreeSet::new();

    for answer in answers {
        let Some(score) = answer.score.filter(|_| answer.is_quantitative()) else {
            continue;
        };
        let Some(attributes) = context.responders.get(&answer.responder_id) else {
            missing_responders.insert(answer.responder_id);
            continue;
        };

        let (department_chain, known) = context.chain_for(attributes.department_id);
        if !known {
            missing_chains.insert(attributes.department_id);
        }
        let department_top = department_chain
            .last()
            .copied()
            .unwrap_or(attributes.department_id);

        records.push(EnrichedResponse {
            responder_id: answer.responder_id,
            question_id: answer.question_id,
            dimension_id: answer.dimension_id.unwrap_or(UNKNOWN_DIMENSION),
            role_id: attributes.role_id,
            department_id: attributes.department_id,
            department_chain,
            department_top,
            generation_id: context.generations.lookup(attributes.birth_year),
            service_months: attributes.service_months,
            birth_year: attributes.birth_year,
            age: attributes.age,
            gender: attributes.gender,
            score,
        });
    }

    if !missing_responders.is_empty() {
        warn!(
            count = missing_responders.len(),
            "Skipped answers from responders without attributes"
        );
    }
    if !missing_chains.is_empty() {
        warn!(
            departments = ?missing_chains,
            "Departments without ancestry treated as roots"
        );
    }
    debug!(input = answers.len(), expanded = records.len(), "Expanded responses");

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Generation;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn attributes(responder: u128, department_id: DepartmentId) -> ResponderAttributes {
        ResponderAttributes {
            responder_id: Uuid::from_u128(responder),
            survey_id: 1,
            role_id: 4,
            department_id,
            birth_year: 1990,
            service_months: 36,
            age: 34,
            gender: 2,
        }
    }

    fn answer(responder: u128, question: i32, score: Option<i32>) -> RawAnswer {
        RawAnswer {
            responder_id: Uuid::from_u128(responder),
            survey_id: 1,
            question_id: question,
            dimension_id: Some(10),
            score,
            text: None,
        }
    }

    fn context() -> ExpansionContext {
        let responders = [attributes(1, 3), attributes(2, 8)]
            .into_iter()
            .map(|a| (a.responder_id, a))
            .collect();
        let chains = HashMap::from([(3, vec![3, 2, 1]), (2, vec![2, 1]), (1, vec![1])]);
        let generations = GenerationTable::new(
            vec![Generation {
                id: 5,
                name: "Millennials".into(),
                year_lower: 1981,
                year_upper: 1996,
            }],
            -1,
        );
        ExpansionContext::new(responders, chains, generations)
    }

    #[test]
    fn test_enriched_record_fields() {
        let records = expand_responses(&[answer(1, 0, Some(4))], &context());

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.department_chain, vec![3, 2, 1]);
        assert_eq!(record.department_top, 1);
        assert_eq!(record.generation_id, 5);
        assert_eq!(record.dimension_id, 10);
        assert_eq!(record.role_id, 4);
        assert_eq!(record.score, 4);
    }

    #[test]
    fn test_non_quantitative_answers_dropped() {
        let mut text = answer(1, 1, Some(3));
        text.text = Some("free".into());
        let answers = vec![answer(1, 0, None), answer(1, 2, Some(0)), text];
        assert!(expand_responses(&answers, &context()).is_empty());
    }

    #[test]
    fn test_unknown_responder_skipped() {
        let records = expand_responses(&[answer(99, 0, Some(2)), answer(1, 0, Some(2))], &context());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].responder_id, Uuid::from_u128(1));
    }

    #[test]
    fn test_missing_chain_falls_back_to_department() {
        let records = expand_responses(&[answer(2, 0, Some(5))], &context());
        assert_eq!(records[0].department_chain, vec![8]);
        assert_eq!(records[0].department_top, 8);
    }

    #[test]
    fn test_missing_dimension_uses_sentinel() {
        let mut raw = answer(1, 0, Some(1));
        raw.dimension_id = None;
        let records = expand_responses(&[raw], &context());
        assert_eq!(records[0].dimension_id, UNKNOWN_DIMENSION);
    }
}
