// Startup integrity validation for a compiled corpus.
//
// Runs once, inside `Corpus::from_json`, before any corpus is handed to the
// generators. Everything checked here would otherwise surface as a
// per-request failure (or worse, as a silently malformed spell), so a
// corpus that fails any check is rejected as a whole.

use std::collections::BTreeSet;

use unicode_width::UnicodeWidthChar;

use crate::error::CorpusError;
use crate::syllables::{self, VERSE_SYLLABLE_MAX, VERSE_SYLLABLE_MIN};
use crate::types::{IntentCategory, IntentCorpusEntry, SlotKind, TemplatePart, VerseTemplate};
use crate::Corpus;

/// Minimum ritual corpus entries per intent.
pub const RITUAL_CORPUS_MIN: usize = 30;
/// Maximum ritual corpus entries per intent.
pub const RITUAL_CORPUS_MAX: usize = 50;

/// Characters that may never appear anywhere in verse output.
pub const FORBIDDEN_VERSE_CHARS: &[char] = &['!', '?', '\'', '’'];

pub(crate) fn validate(corpus: &Corpus) -> Result<(), CorpusError> {
    for kind in SlotKind::ALL {
        let words = corpus.words(kind);
        if words.is_empty() {
            return Err(CorpusError::EmptyWordList { kind });
        }
        for word in words {
            if syllables::count_line(word) == 0 {
                return Err(CorpusError::BlankWord { kind });
            }
            check_verse_text(&format!("word list `{kind}`"), word)?;
        }
    }

    if corpus.durations().is_empty() {
        return Err(CorpusError::EmptyList { list: "durations" });
    }
    if corpus.tagger().materials().is_empty() {
        return Err(CorpusError::EmptyList { list: "materials" });
    }

    for intent in IntentCategory::ALL {
        validate_entry(intent, corpus.entry(intent))?;
    }
    Ok(())
}

fn validate_entry(intent: IntentCategory, entry: &IntentCorpusEntry) -> Result<(), CorpusError> {
    if entry.keywords.is_empty() {
        return Err(CorpusError::EmptyField { intent, field: "keywords" });
    }
    for (keyword, &weight) in &entry.keywords {
        let reason = if weight == 0 {
            Some("has zero weight")
        } else if keyword.chars().count() < 3 {
            Some("is shorter than three letters")
        } else if !keyword.chars().all(|c| c.is_ascii_lowercase()) {
            Some("must be lowercase ASCII letters")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(CorpusError::InvalidKeyword {
                intent,
                keyword: keyword.clone(),
                reason,
            });
        }
    }

    if entry.symbols.is_empty() {
        return Err(CorpusError::EmptyField { intent, field: "symbols" });
    }
    let mut seen_symbols = BTreeSet::new();
    for &symbol in &entry.symbols {
        if symbol.width() != Some(1) || symbol.is_whitespace() {
            return Err(CorpusError::SymbolWidth { intent, symbol });
        }
        if !seen_symbols.insert(symbol) {
            return Err(CorpusError::DuplicateSymbol { intent, symbol });
        }
    }

    let len = entry.ritual_steps.len();
    if !(RITUAL_CORPUS_MIN..=RITUAL_CORPUS_MAX).contains(&len) {
        return Err(CorpusError::RitualCorpusSize {
            intent,
            len,
            min: RITUAL_CORPUS_MIN,
            max: RITUAL_CORPUS_MAX,
        });
    }
    let mut seen_steps = BTreeSet::new();
    for step in &entry.ritual_steps {
        if step.trim().is_empty() {
            return Err(CorpusError::EmptyField { intent, field: "ritual_steps" });
        }
        if !seen_steps.insert(step.trim().to_lowercase()) {
            return Err(CorpusError::DuplicateStep {
                intent,
                step: step.clone(),
            });
        }
    }

    if entry.metaphors.is_empty() {
        return Err(CorpusError::EmptyField { intent, field: "metaphors" });
    }
    for metaphor in &entry.metaphors {
        check_verse_text(&format!("{intent} metaphor"), metaphor)?;
    }

    if entry.verse_templates.is_empty() {
        return Err(CorpusError::EmptyField {
            intent,
            field: "verse_templates",
        });
    }
    for template in &entry.verse_templates {
        validate_template(intent, template)?;
    }
    Ok(())
}

fn validate_template(intent: IntentCategory, template: &VerseTemplate) -> Result<(), CorpusError> {
    if template.parts.is_empty() {
        return Err(CorpusError::EmptyTemplate {
            intent,
            pattern: template.pattern.clone(),
        });
    }

    check_verse_text(&format!("{intent} verse template"), &template.pattern)?;
    check_verse_text(&format!("{intent} fallback line"), &template.fallback)?;

    // An adjective modifies exactly the noun slot that follows it, so two
    // adjectives can never stack onto one noun phrase.
    for (i, part) in template.parts.iter().enumerate() {
        if *part == TemplatePart::Slot(SlotKind::Adjective) {
            let next_is_noun = matches!(
                template.parts.get(i + 1),
                Some(TemplatePart::Slot(kind)) if kind.is_noun()
            );
            if !next_is_noun {
                return Err(CorpusError::DanglingAdjective {
                    intent,
                    pattern: template.pattern.clone(),
                });
            }
        }
    }

    let syllables = syllables::count_line(&template.fallback);
    if !syllables::in_verse_bounds(syllables) {
        return Err(CorpusError::FallbackOutOfBounds {
            intent,
            line: template.fallback.clone(),
            syllables,
            min: VERSE_SYLLABLE_MIN,
            max: VERSE_SYLLABLE_MAX,
        });
    }
    Ok(())
}

fn check_verse_text(location: &str, text: &str) -> Result<(), CorpusError> {
    match text.chars().find(|c| FORBIDDEN_VERSE_CHARS.contains(c)) {
        Some(ch) => Err(CorpusError::ForbiddenCharacter {
            location: location.to_string(),
            ch,
            text: text.to_string(),
        }),
        None => Ok(()),
    }
}
