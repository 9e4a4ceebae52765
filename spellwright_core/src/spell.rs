// Spell aggregate and assembler.
//
// `assemble` is the last gate before a spell leaves the pipeline. It
// re-checks every structural invariant of the three components (the
// generators are expected to uphold them already, so a failure here is a
// generator defect, not bad input). On a violation the full detail goes to
// the log and the caller receives a `SpellError::InvariantViolation` whose
// message is generic. No retries.
//
// `Spell` fields are private: once assembled a spell is read-only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use spellwright_lexicon::IntentCategory;
use spellwright_lexicon::syllables;

use crate::error::{SpellComponent, SpellError};
use crate::glyph::{GLYPH_LINES_MAX, GLYPH_LINES_MIN, Glyph};
use crate::ritual::{RITUAL_STEPS_MAX, RITUAL_STEPS_MIN, Ritual};
use crate::seed::fingerprint_hex;
use crate::verse::{VERSE_LINES_MAX, VERSE_LINES_MIN, Verse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpellMetadata {
    pub intent: IntentCategory,
    pub generated_at: DateTime<Utc>,
    /// FNV-1a 64 of the normalized whisper, 16 lowercase hex digits.
    pub fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spell {
    glyph: Glyph,
    ritual: Ritual,
    verse: Verse,
    metadata: SpellMetadata,
}

impl Spell {
    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    pub fn ritual(&self) -> &Ritual {
        &self.ritual
    }

    pub fn verse(&self) -> &Verse {
        &self.verse
    }

    pub fn metadata(&self) -> &SpellMetadata {
        &self.metadata
    }

    pub fn intent(&self) -> IntentCategory {
        self.metadata.intent
    }

    /// Whether two spells have identical content, ignoring the timestamp.
    pub fn same_content(&self, other: &Spell) -> bool {
        self.glyph == other.glyph
            && self.ritual == other.ritual
            && self.verse == other.verse
            && self.metadata.intent == other.metadata.intent
            && self.metadata.fingerprint == other.metadata.fingerprint
    }
}

/// Validate the three components and combine them into a `Spell`.
pub fn assemble(
    glyph: Glyph,
    ritual: Ritual,
    verse: Verse,
    intent: IntentCategory,
    fingerprint: u64,
    generated_at: DateTime<Utc>,
) -> Result<Spell, SpellError> {
    check_glyph(&glyph)?;
    check_ritual(&ritual)?;
    check_verse(&verse)?;
    Ok(Spell {
        glyph,
        ritual,
        verse,
        metadata: SpellMetadata {
            intent,
            generated_at,
            fingerprint: fingerprint_hex(fingerprint),
        },
    })
}

fn violation(component: SpellComponent, detail: String) -> SpellError {
    tracing::error!(%component, %detail, "spell invariant violated");
    SpellError::InvariantViolation { component, detail }
}

fn check_glyph(glyph: &Glyph) -> Result<(), SpellError> {
    let n = glyph.lines.len();
    if !(GLYPH_LINES_MIN..=GLYPH_LINES_MAX).contains(&n) {
        return Err(violation(
            SpellComponent::Glyph,
            format!("{n} lines, expected {GLYPH_LINES_MIN}..={GLYPH_LINES_MAX}"),
        ));
    }
    let widths: Vec<usize> = glyph.line_widths().collect();
    if widths.windows(2).any(|w| w[0] != w[1]) {
        return Err(violation(
            SpellComponent::Glyph,
            format!("unequal line widths {widths:?}"),
        ));
    }
    Ok(())
}

fn check_ritual(ritual: &Ritual) -> Result<(), SpellError> {
    let n = ritual.steps.len();
    if !(RITUAL_STEPS_MIN..=RITUAL_STEPS_MAX).contains(&n) {
        return Err(violation(
            SpellComponent::Ritual,
            format!("{n} steps, expected {RITUAL_STEPS_MIN}..={RITUAL_STEPS_MAX}"),
        ));
    }
    for (i, step) in ritual.steps.iter().enumerate() {
        if ritual.steps[..i].iter().any(|s| s.action == step.action) {
            return Err(violation(
                SpellComponent::Ritual,
                format!("duplicate step {:?}", step.action),
            ));
        }
    }
    Ok(())
}

fn check_verse(verse: &Verse) -> Result<(), SpellError> {
    let n = verse.lines.len();
    if !(VERSE_LINES_MIN..=VERSE_LINES_MAX).contains(&n) {
        return Err(violation(
            SpellComponent::Verse,
            format!("{n} lines, expected {VERSE_LINES_MIN}..={VERSE_LINES_MAX}"),
        ));
    }
    for (i, line) in verse.lines.iter().enumerate() {
        let counted = syllables::count_line(&line.text);
        if counted != line.syllables {
            return Err(violation(
                SpellComponent::Verse,
                format!(
                    "line {i} records {} syllables but counts {counted}: {:?}",
                    line.syllables, line.text
                ),
            ));
        }
        if !syllables::in_verse_bounds(counted) {
            return Err(violation(
                SpellComponent::Verse,
                format!("line {i} has {counted} syllables: {:?}", line.text),
            ));
        }
    }
    Ok(())
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.metadata.intent, self.metadata.fingerprint)?;
        writeln!(f)?;
        for line in &self.glyph.lines {
            writeln!(f, "    {line}")?;
        }
        writeln!(f)?;
        writeln!(f, "Ritual ({}):", self.ritual.duration)?;
        for (i, step) in self.ritual.steps.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, step.action)?;
        }
        writeln!(f)?;
        writeln!(f, "Verse ({}):", self.verse.metaphor)?;
        for line in &self.verse.lines {
            writeln!(f, "  {}", line.text)?;
        }
        Ok(())
    }
}
