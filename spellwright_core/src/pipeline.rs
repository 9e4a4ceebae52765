// Spell pipeline orchestration.
//
// One whisper flows through: classify → derive seeds → glyph / ritual /
// verse generators → assemble. The generators share nothing but a
// read-only `&Corpus` and each owns its PRNG, so they can run concurrently
// (`Execution::Parallel`, via `rayon::join`) or in order
// (`Execution::Sequential`) with identical output.
//
// `generate_batch` runs many whispers across the rayon pool. Repeated
// whispers in a batch are generated once (FxHashMap keyed by whisper) and
// share the same outcome; results come back in input order with a single
// shared timestamp.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use spellwright_lexicon::{Corpus, IntentCategory};

use crate::classifier::{self, IntentScores};
use crate::config::Execution;
use crate::error::SpellError;
use crate::glyph::{self, Glyph};
use crate::ritual::{self, Ritual};
use crate::seed::{self, SeedSet};
use crate::spell::{self, Spell};
use crate::verse::{self, Verse};
use crate::whisper::Whisper;

#[derive(Debug, Clone)]
pub struct SpellPipeline {
    corpus: Arc<Corpus>,
    execution: Execution,
}

impl SpellPipeline {
    pub fn new(corpus: Arc<Corpus>, execution: Execution) -> Self {
        SpellPipeline { corpus, execution }
    }

    pub fn classify(&self, whisper: &Whisper) -> IntentCategory {
        classifier::classify(&self.corpus, whisper.as_str())
    }

    /// Per-intent keyword scores behind `classify`.
    pub fn explain(&self, whisper: &Whisper) -> IntentScores {
        classifier::score_intents(&self.corpus, whisper.as_str())
    }

    /// Generate a spell stamped with the current time.
    pub fn generate_spell(&self, whisper: &Whisper) -> Result<Spell, SpellError> {
        self.generate_spell_at(whisper, Utc::now())
    }

    /// Generate a spell stamped with `generated_at`. Fully reproducible.
    pub fn generate_spell_at(
        &self,
        whisper: &Whisper,
        generated_at: DateTime<Utc>,
    ) -> Result<Spell, SpellError> {
        let intent = self.classify(whisper);
        let seeds = SeedSet::derive(whisper.as_str(), intent);
        let (glyph, ritual, verse) = self.run_generators(&seeds, intent);
        spell::assemble(
            glyph,
            ritual,
            verse,
            intent,
            seed::fingerprint(whisper.as_str()),
            generated_at,
        )
    }

    fn run_generators(&self, seeds: &SeedSet, intent: IntentCategory) -> (Glyph, Ritual, Verse) {
        let corpus: &Corpus = &self.corpus;
        match self.execution {
            Execution::Sequential => (
                glyph::generate(seeds.glyph, intent, corpus),
                ritual::generate(seeds.ritual, intent, corpus),
                verse::generate(seeds.verse, intent, corpus),
            ),
            Execution::Parallel => {
                let (glyph, (ritual, verse)) = rayon::join(
                    || glyph::generate(seeds.glyph, intent, corpus),
                    || {
                        rayon::join(
                            || ritual::generate(seeds.ritual, intent, corpus),
                            || verse::generate(seeds.verse, intent, corpus),
                        )
                    },
                );
                (glyph, ritual, verse)
            }
        }
    }

    /// Generate spells for many whispers, stamped with the current time.
    pub fn generate_batch(&self, whispers: &[Whisper]) -> Vec<Result<Spell, SpellError>> {
        self.generate_batch_at(whispers, Utc::now())
    }

    /// Generate spells for many whispers with one shared timestamp. Output
    /// order matches input order.
    pub fn generate_batch_at(
        &self,
        whispers: &[Whisper],
        generated_at: DateTime<Utc>,
    ) -> Vec<Result<Spell, SpellError>> {
        let mut slot_of: FxHashMap<&Whisper, usize> = FxHashMap::default();
        let mut unique: Vec<&Whisper> = Vec::new();
        let slots: Vec<usize> = whispers
            .iter()
            .map(|w| {
                *slot_of.entry(w).or_insert_with(|| {
                    unique.push(w);
                    unique.len() - 1
                })
            })
            .collect();

        tracing::debug!(
            whispers = whispers.len(),
            unique = unique.len(),
            "generating batch"
        );

        let results: Vec<Result<Spell, SpellError>> = unique
            .par_iter()
            .map(|w| self.generate_spell_at(w, generated_at))
            .collect();

        slots.into_iter().map(|i| results[i].clone()).collect()
    }
}
