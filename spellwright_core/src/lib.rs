// Spellwright generative pipeline.
//
// Turns a short free-text "whisper" into a deterministic "spell": a centered
// glyph block, a short ordered ritual, and a few lines of syllable-bounded
// verse. The same normalized whisper always produces the same spell content;
// only the generation timestamp varies.
//
// Architecture:
// - whisper.rs: input boundary (normalization, length limit)
// - classifier.rs: weighted keyword scoring → `IntentCategory`
// - seed.rs: FNV-1a 64 base seed per (whisper, intent) and per-component
//   sub-seeds
// - glyph.rs: shape masks + symbol draws, centered to a common width
// - ritual.rs: sampling without replacement from the intent's step corpus
// - verse.rs: template filling with a deterministic syllable repair pass
//   and pre-authored fallback lines
// - spell.rs: the immutable `Spell` aggregate, its final invariant checks
//   (`assemble`), and text rendering
// - pipeline.rs: `SpellPipeline` (single and batch generation)
// - config.rs: `SpellwrightConfig` loaded from JSON
// - error.rs: `WhisperError`, `SpellError`
//
// Static data (keywords, symbols, ritual steps, verse vocabulary) lives in
// `spellwright_lexicon`; all pseudo-randomness comes from `spellwright_prng`.

pub mod classifier;
pub mod config;
pub mod error;
pub mod glyph;
pub mod pipeline;
pub mod ritual;
pub mod seed;
pub mod spell;
pub mod verse;
pub mod whisper;

pub use classifier::IntentScores;
pub use config::{Execution, RenderFormat, SpellwrightConfig};
pub use error::{SpellComponent, SpellError, WhisperError};
pub use pipeline::SpellPipeline;
pub use spell::{Spell, SpellMetadata};
pub use whisper::Whisper;
