use crate::core::{Generation, GenerationId};
use tracing::debug;

/// Birth-year to generation lookup.
#[derive(Debug, Clone)]
pub struct GenerationTable {
    generations: Vec<Generation>,
    unknown_id: GenerationId,
}

impl GenerationTable {
    /// Generations are searched in ascending `year_lower` order.
    pub fn new(mut generations: Vec<Generation>, unknown_id: GenerationId) -> Self {
        generations.sort_by_key(|g| (g.year_lower, g.id));
        Self {
            generations,
            unknown_id,
        }
    }

    /// Generation whose inclusive year range contains `birth_year`, or the
    /// unknown sentinel.
    pub fn lookup(&self, birth_year: i32) -> GenerationId {
        match self.generations.iter().find(|g| g.contains(birth_year)) {
            Some(generation) => generation.id,
            None => {
                debug!(birth_year, "No generation covers birth year");
                self.unknown_id
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Generation> {
        self.generations.iter()
    }
}
