// Spellwright lexicon / corpus store.
//
// Holds every static table the generative pipeline reads: per-intent keyword
// weights, glyph symbol sets, ritual step corpora, verse metaphors and
// templates, and the global verse vocabulary. No generation logic lives here.
//
// Architecture:
// - `types.rs`: `IntentCategory`, `IntentTable`, `SlotKind`, verse template
//   parsing, `IntentCorpusEntry`, `WordLists`
// - `syllables.rs`: pinned syllable-count heuristic and verse line bounds
// - `tags.rs`: tokenization and ritual-step material/timing tagging
// - `validate.rs`: startup integrity checks (config-integrity failures)
// - `error.rs`: `CorpusError`
// - `lib.rs` (this file): `Corpus`, which loads, compiles, validates and queries
//   the JSON corpus
//
// The corpus is loaded from `data/spell_corpus.json` via `Corpus::from_json()`
// (JSON string in, validated typed struct out). `default_corpus()` embeds the
// file at compile time with `include_str!`. A `Corpus` is immutable once
// built; callers share it read-only (typically behind an `Arc`).

pub mod error;
pub mod syllables;
pub mod tags;
pub mod types;
pub mod validate;

use std::collections::BTreeMap;
use std::path::Path;

pub use error::CorpusError;
pub use tags::{StepTagger, StepTags, tokenize};
pub use types::{
    IntentCategory, IntentCorpusEntry, IntentTable, SilenceMarker, SlotKind, TemplatePart,
    VerseTemplate, WordLists,
};

/// The embedded default corpus, as JSON text.
pub const DEFAULT_CORPUS_JSON: &str = include_str!("../../data/spell_corpus.json");

/// The top-level JSON structure for the corpus file.
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CorpusFile {
    intents: IntentTable<IntentEntryFile>,
    words: WordLists,
    materials: Vec<String>,
    markers: Vec<String>,
    durations: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct IntentEntryFile {
    keywords: BTreeMap<String, u32>,
    symbols: Vec<char>,
    ritual_steps: Vec<String>,
    metaphors: Vec<String>,
    verse_templates: Vec<VerseTemplateFile>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct VerseTemplateFile {
    pattern: String,
    fallback: String,
}

/// A loaded, validated Spellwright corpus.
///
/// Only constructible through `from_json` / `load` / `default_corpus`, all of
/// which validate, so holding a `Corpus` means holding a corpus that satisfies
/// every integrity invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    intents: IntentTable<IntentCorpusEntry>,
    words: WordLists,
    tagger: StepTagger,
    durations: Vec<String>,
}

impl Corpus {
    /// Parse, compile and validate a corpus from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let file: CorpusFile = serde_json::from_str(json)?;
        let intents = file.intents.try_map(compile_entry)?;
        let corpus = Corpus {
            intents,
            words: file.words,
            tagger: StepTagger::new(file.materials, file.markers),
            durations: file.durations,
        };
        validate::validate(&corpus)?;

        let ritual_steps: usize = corpus.intents.iter().map(|(_, e)| e.ritual_steps.len()).sum();
        let verse_templates: usize = corpus
            .intents
            .iter()
            .map(|(_, e)| e.verse_templates.len())
            .sum();
        tracing::info!(
            intents = IntentCategory::ALL.len(),
            ritual_steps,
            verse_templates,
            "corpus validated"
        );
        Ok(corpus)
    }

    /// Read and validate a corpus file from disk.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let json = std::fs::read_to_string(path).map_err(|error| CorpusError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_json(&json)
    }

    /// Corpus entry for an intent. Total: every intent has an entry.
    pub fn entry(&self, intent: IntentCategory) -> &IntentCorpusEntry {
        self.intents.get(intent)
    }

    /// Verse vocabulary for a slot kind.
    pub fn words(&self, kind: SlotKind) -> &[String] {
        self.words.get(kind)
    }

    /// Ritual duration phrases.
    pub fn durations(&self) -> &[String] {
        &self.durations
    }

    pub fn tagger(&self) -> &StepTagger {
        &self.tagger
    }

    /// Extract the material/timing tags embedded in a ritual step.
    pub fn tag_step(&self, text: &str) -> StepTags {
        self.tagger.tag(text)
    }
}

fn compile_entry(
    intent: IntentCategory,
    file: IntentEntryFile,
) -> Result<IntentCorpusEntry, CorpusError> {
    let verse_templates = file
        .verse_templates
        .iter()
        .map(|t| VerseTemplate::parse(intent, &t.pattern, &t.fallback))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(IntentCorpusEntry {
        keywords: file.keywords,
        symbols: file.symbols,
        ritual_steps: file.ritual_steps,
        metaphors: file.metaphors,
        verse_templates,
    })
}

/// Load the default corpus embedded at compile time. A malformed data file
/// surfaces here as a `CorpusError`.
pub fn default_corpus() -> Result<Corpus, CorpusError> {
    Corpus::from_json(DEFAULT_CORPUS_JSON)
}
