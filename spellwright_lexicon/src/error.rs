// Configuration-integrity errors for the corpus store.
//
// Every variant describes a deployment defect (a malformed or incomplete
// corpus), never a problem with user input. They are raised while loading
// and validating the corpus at startup so that a process with a broken
// corpus refuses to serve any whisper.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{IntentCategory, SlotKind};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error reading corpus {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("{intent}: `{field}` is empty")]
    EmptyField {
        intent: IntentCategory,
        field: &'static str,
    },

    #[error("{intent}: ritual corpus has {len} entries, expected {min}..={max}")]
    RitualCorpusSize {
        intent: IntentCategory,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("{intent}: duplicate ritual step {step:?}")]
    DuplicateStep { intent: IntentCategory, step: String },

    #[error("{intent}: glyph symbol {symbol:?} is not a single-width character")]
    SymbolWidth { intent: IntentCategory, symbol: char },

    #[error("{intent}: duplicate glyph symbol {symbol:?}")]
    DuplicateSymbol { intent: IntentCategory, symbol: char },

    #[error("{intent}: keyword {keyword:?} {reason}")]
    InvalidKeyword {
        intent: IntentCategory,
        keyword: String,
        reason: &'static str,
    },

    #[error("{location}: forbidden character {ch:?} in {text:?}")]
    ForbiddenCharacter {
        location: String,
        ch: char,
        text: String,
    },

    #[error("{intent}: unknown slot `{{{name}}}` in verse template {pattern:?}")]
    UnknownSlot {
        intent: IntentCategory,
        name: String,
        pattern: String,
    },

    #[error("{intent}: verse template {pattern:?} has no tokens")]
    EmptyTemplate {
        intent: IntentCategory,
        pattern: String,
    },

    #[error("{intent}: adjective slot not directly followed by a noun slot in {pattern:?}")]
    DanglingAdjective {
        intent: IntentCategory,
        pattern: String,
    },

    #[error("{intent}: fallback line {line:?} has {syllables} syllables, expected {min}..={max}")]
    FallbackOutOfBounds {
        intent: IntentCategory,
        line: String,
        syllables: u32,
        min: u32,
        max: u32,
    },

    #[error("word list `{kind}` is empty")]
    EmptyWordList { kind: SlotKind },

    #[error("word list `{kind}` contains an entry with no letters")]
    BlankWord { kind: SlotKind },

    #[error("`{list}` list is empty")]
    EmptyList { list: &'static str },
}
