// Error types for the spell pipeline.
//
// `WhisperError` is the input-boundary rejection (the caller's text was not
// usable). `SpellError` covers everything after that: an assembled spell
// that failed an invariant check (a generator defect), a corpus that failed
// to load, or a bad configuration file. Classification never fails and has
// no error type.

use std::sync::Arc;

use thiserror::Error;

use spellwright_lexicon::CorpusError;

/// Rejection of raw input at the whisper boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WhisperError {
    #[error("whisper is empty after normalization")]
    Empty,
    #[error("whisper is {len} characters long; the limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Which part of a spell an invariant check failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellComponent {
    Glyph,
    Ritual,
    Verse,
}

impl std::fmt::Display for SpellComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SpellComponent::Glyph => "glyph",
            SpellComponent::Ritual => "ritual",
            SpellComponent::Verse => "verse",
        })
    }
}

/// Cloneable so batch generation can hand the same outcome to every
/// duplicate whisper.
#[derive(Debug, Clone, Error)]
pub enum SpellError {
    /// A generated component broke a structural invariant. The detail is
    /// logged at the point of detection; the user-facing message stays
    /// generic.
    #[error("the spell could not be completed")]
    InvariantViolation {
        component: SpellComponent,
        detail: String,
    },

    #[error("corpus error: {0}")]
    Corpus(Arc<CorpusError>),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<CorpusError> for SpellError {
    fn from(err: CorpusError) -> Self {
        SpellError::Corpus(Arc::new(err))
    }
}
