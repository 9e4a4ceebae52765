// Ritual generator.
//
// Picks 3–5 distinct ceremonial steps from the intent's ritual corpus and a
// closing duration phrase. Steps are sampled without replacement (partial
// Fisher–Yates via `SpellRng::sample_indices`), and the sampling order is the
// presentation order. Material and timing tags are recovered from the step
// text by the corpus tagger.
//
// Draw order: step count, one draw per step position, duration index.

use serde::Serialize;

use spellwright_lexicon::{Corpus, IntentCategory};
use spellwright_prng::SpellRng;

pub const RITUAL_STEPS_MIN: usize = 3;
pub const RITUAL_STEPS_MAX: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RitualStep {
    pub action: String,
    pub material: Option<String>,
    pub timing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ritual {
    pub steps: Vec<RitualStep>,
    pub duration: String,
}

pub fn generate(seed: u64, intent: IntentCategory, corpus: &Corpus) -> Ritual {
    let pool = &corpus.entry(intent).ritual_steps;
    let mut rng = SpellRng::new(seed);

    let count = rng.range_usize_inclusive(RITUAL_STEPS_MIN, RITUAL_STEPS_MAX);
    let steps = rng
        .sample_indices(pool.len(), count)
        .into_iter()
        .map(|i| {
            let action = pool[i].clone();
            let tags = corpus.tag_step(&action);
            RitualStep {
                action,
                material: tags.material,
                timing: tags.timing,
            }
        })
        .collect();

    let durations = corpus.durations();
    let duration = durations[rng.index(durations.len())].clone();

    Ritual { steps, duration }
}
