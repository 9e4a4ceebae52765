// Core corpus types: intent categories, verse slot kinds, template parts,
// and the per-intent corpus entry.
//
// The type hierarchy is:
// - `IntentCategory`: the closed set of thematic classifications
// - `IntentTable<T>`: one `T` per intent, with exhaustive lookup
// - `SlotKind`: which lexicon word list fills a verse slot
// - `SilenceMarker`: fixed pauses placed by templates (ellipsis, dash)
// - `TemplatePart` / `VerseTemplate`: a parsed verse template plus its
//   pre-authored fallback line
// - `IntentCorpusEntry`: keywords, glyph symbols, ritual steps, metaphors
//   and verse templates for one intent
// - `WordLists`: the global verse vocabulary, one list per `SlotKind`
//
// `IntentTable` has one named field per intent and its `get` is an
// exhaustive match, so adding an `IntentCategory` variant without a corpus
// entry is a compile error rather than a runtime lookup failure.
//
// Determinism constraint: iteration order over every collection here is
// fixed (Vec, BTreeMap, or declaration order). No HashMap.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

/// Thematic classification of a whisper. The declaration order is the
/// tie-break order used by the classifier (lowest index wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentCategory {
    Protection,
    Revelation,
    Binding,
    Transformation,
    Summoning,
    Banishment,
    Preservation,
    Passage,
}

impl IntentCategory {
    /// Every category, in enumeration-index order.
    pub const ALL: [IntentCategory; 8] = [
        IntentCategory::Protection,
        IntentCategory::Revelation,
        IntentCategory::Binding,
        IntentCategory::Transformation,
        IntentCategory::Summoning,
        IntentCategory::Banishment,
        IntentCategory::Preservation,
        IntentCategory::Passage,
    ];

    /// Category chosen when no keyword matches at all.
    pub const DEFAULT: IntentCategory = IntentCategory::Revelation;

    /// Fixed enumeration index (0-based, declaration order).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Fixed textual label. Part of the seed derivation, so these strings
    /// must never change.
    pub fn label(self) -> &'static str {
        match self {
            IntentCategory::Protection => "protection",
            IntentCategory::Revelation => "revelation",
            IntentCategory::Binding => "binding",
            IntentCategory::Transformation => "transformation",
            IntentCategory::Summoning => "summoning",
            IntentCategory::Banishment => "banishment",
            IntentCategory::Preservation => "preservation",
            IntentCategory::Passage => "passage",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per intent category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntentTable<T> {
    pub protection: T,
    pub revelation: T,
    pub binding: T,
    pub transformation: T,
    pub summoning: T,
    pub banishment: T,
    pub preservation: T,
    pub passage: T,
}

impl<T> IntentTable<T> {
    /// Borrow the value for `intent`. Total over the enum.
    pub fn get(&self, intent: IntentCategory) -> &T {
        match intent {
            IntentCategory::Protection => &self.protection,
            IntentCategory::Revelation => &self.revelation,
            IntentCategory::Binding => &self.binding,
            IntentCategory::Transformation => &self.transformation,
            IntentCategory::Summoning => &self.summoning,
            IntentCategory::Banishment => &self.banishment,
            IntentCategory::Preservation => &self.preservation,
            IntentCategory::Passage => &self.passage,
        }
    }

    /// Iterate `(intent, value)` pairs in enumeration-index order.
    pub fn iter(&self) -> impl Iterator<Item = (IntentCategory, &T)> {
        IntentCategory::ALL.into_iter().map(move |i| (i, self.get(i)))
    }

    /// Convert every entry, stopping at the first error.
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(IntentCategory, T) -> Result<U, E>,
    ) -> Result<IntentTable<U>, E> {
        Ok(IntentTable {
            protection: f(IntentCategory::Protection, self.protection)?,
            revelation: f(IntentCategory::Revelation, self.revelation)?,
            binding: f(IntentCategory::Binding, self.binding)?,
            transformation: f(IntentCategory::Transformation, self.transformation)?,
            summoning: f(IntentCategory::Summoning, self.summoning)?,
            banishment: f(IntentCategory::Banishment, self.banishment)?,
            preservation: f(IntentCategory::Preservation, self.preservation)?,
            passage: f(IntentCategory::Passage, self.passage)?,
        })
    }
}

/// Which word list fills a verse template slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Temporal,
    PassiveVerb,
    MysticalNoun,
    NaturalNoun,
    AbstractNoun,
    ElementalNoun,
    Preposition,
    Adjective,
}

impl SlotKind {
    pub const ALL: [SlotKind; 8] = [
        SlotKind::Temporal,
        SlotKind::PassiveVerb,
        SlotKind::MysticalNoun,
        SlotKind::NaturalNoun,
        SlotKind::AbstractNoun,
        SlotKind::ElementalNoun,
        SlotKind::Preposition,
        SlotKind::Adjective,
    ];

    /// Parse the name used inside `{...}` in a template pattern.
    pub fn from_placeholder(name: &str) -> Option<SlotKind> {
        match name {
            "temporal" => Some(SlotKind::Temporal),
            "passive" => Some(SlotKind::PassiveVerb),
            "mystical" => Some(SlotKind::MysticalNoun),
            "natural" => Some(SlotKind::NaturalNoun),
            "abstract" => Some(SlotKind::AbstractNoun),
            "elemental" => Some(SlotKind::ElementalNoun),
            "preposition" => Some(SlotKind::Preposition),
            "adjective" => Some(SlotKind::Adjective),
            _ => None,
        }
    }

    pub fn is_noun(self) -> bool {
        matches!(
            self,
            SlotKind::MysticalNoun
                | SlotKind::NaturalNoun
                | SlotKind::AbstractNoun
                | SlotKind::ElementalNoun
        )
    }

    /// Field name in the corpus `words` table.
    pub fn list_name(self) -> &'static str {
        match self {
            SlotKind::Temporal => "temporal",
            SlotKind::PassiveVerb => "passive_verb",
            SlotKind::MysticalNoun => "mystical_noun",
            SlotKind::NaturalNoun => "natural_noun",
            SlotKind::AbstractNoun => "abstract_noun",
            SlotKind::ElementalNoun => "elemental_noun",
            SlotKind::Preposition => "preposition",
            SlotKind::Adjective => "adjective",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.list_name())
    }
}

/// A fixed pause placed by a template. Never generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SilenceMarker {
    /// `...`, attached to the preceding word.
    Ellipsis,
    /// `—`, surrounded by spaces.
    Dash,
}

impl SilenceMarker {
    pub fn from_token(token: &str) -> Option<SilenceMarker> {
        match token {
            "..." | "…" => Some(SilenceMarker::Ellipsis),
            "—" | "--" => Some(SilenceMarker::Dash),
            _ => None,
        }
    }

    /// Rendered text of the marker.
    pub fn text(self) -> &'static str {
        match self {
            SilenceMarker::Ellipsis => "...",
            SilenceMarker::Dash => "—",
        }
    }
}

/// One token of a parsed verse template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Slot(SlotKind),
    Word(String),
    Silence(SilenceMarker),
}

/// A parsed verse template with its pre-authored fallback line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseTemplate {
    /// The pattern as written in the corpus (for diagnostics).
    pub pattern: String,
    /// Parsed tokens in order.
    pub parts: Vec<TemplatePart>,
    /// Line used when no slot combination satisfies the syllable bound.
    pub fallback: String,
}

impl VerseTemplate {
    /// Parse a whitespace-separated pattern such as
    /// `"{temporal} the {mystical} is {passive}"`.
    pub fn parse(
        intent: IntentCategory,
        pattern: &str,
        fallback: &str,
    ) -> Result<VerseTemplate, CorpusError> {
        let mut parts = Vec::new();
        for token in pattern.split_whitespace() {
            let placeholder = token.strip_prefix('{').and_then(|t| t.strip_suffix('}'));
            let part = if let Some(name) = placeholder {
                let kind =
                    SlotKind::from_placeholder(name).ok_or_else(|| CorpusError::UnknownSlot {
                        intent,
                        name: name.to_string(),
                        pattern: pattern.to_string(),
                    })?;
                TemplatePart::Slot(kind)
            } else if let Some(marker) = SilenceMarker::from_token(token) {
                TemplatePart::Silence(marker)
            } else {
                TemplatePart::Word(token.to_string())
            };
            parts.push(part);
        }
        Ok(VerseTemplate {
            pattern: pattern.to_string(),
            parts,
            fallback: fallback.to_string(),
        })
    }

    /// Slot kinds in template order.
    pub fn slots(&self) -> impl Iterator<Item = SlotKind> + '_ {
        self.parts.iter().filter_map(|p| match p {
            TemplatePart::Slot(kind) => Some(*kind),
            _ => None,
        })
    }
}

/// All corpus material for one intent category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentCorpusEntry {
    /// Keyword → weight. BTreeMap for a fixed iteration order.
    pub keywords: BTreeMap<String, u32>,
    /// Glyph symbols, each a single-width character.
    pub symbols: Vec<char>,
    /// Ritual step templates (30–50 distinct entries).
    pub ritual_steps: Vec<String>,
    /// Metaphor tags recorded on generated verses.
    pub metaphors: Vec<String>,
    pub verse_templates: Vec<VerseTemplate>,
}

/// Global verse vocabulary, one list per `SlotKind`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WordLists {
    pub temporal: Vec<String>,
    pub passive_verb: Vec<String>,
    pub mystical_noun: Vec<String>,
    pub natural_noun: Vec<String>,
    pub abstract_noun: Vec<String>,
    pub elemental_noun: Vec<String>,
    pub preposition: Vec<String>,
    pub adjective: Vec<String>,
}

impl WordLists {
    pub fn get(&self, kind: SlotKind) -> &[String] {
        match kind {
            SlotKind::Temporal => &self.temporal,
            SlotKind::PassiveVerb => &self.passive_verb,
            SlotKind::MysticalNoun => &self.mystical_noun,
            SlotKind::NaturalNoun => &self.natural_noun,
            SlotKind::AbstractNoun => &self.abstract_noun,
            SlotKind::ElementalNoun => &self.elemental_noun,
            SlotKind::Preposition => &self.preposition,
            SlotKind::Adjective => &self.adjective,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_index_matches_all_order() {
        for (i, intent) in IntentCategory::ALL.iter().enumerate() {
            assert_eq!(intent.index(), i);
        }
    }

    #[test]
    fn test_intent_serde_uses_label() {
        for intent in IntentCategory::ALL {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json, format!("\"{}\"", intent.label()));
            let parsed: IntentCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, intent);
        }
    }

    #[test]
    fn test_default_intent_is_revelation() {
        assert_eq!(IntentCategory::DEFAULT, IntentCategory::Revelation);
    }

    #[test]
    fn test_intent_table_get_and_iter() {
        let table: IntentTable<usize> = IntentTable {
            protection: 0,
            revelation: 1,
            binding: 2,
            transformation: 3,
            summoning: 4,
            banishment: 5,
            preservation: 6,
            passage: 7,
        };
        for (intent, value) in table.iter() {
            assert_eq!(*value, intent.index());
        }
        let doubled = table
            .try_map(|_, v| Ok::<_, ()>(v * 2))
            .unwrap();
        assert_eq!(*doubled.get(IntentCategory::Passage), 14);
    }

    #[test]
    fn test_intent_table_rejects_missing_intent() {
        let json = r#"{"protection": 1, "revelation": 1, "binding": 1}"#;
        let result: Result<IntentTable<u32>, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_slot_placeholders_cover_every_kind() {
        let names = [
            "temporal",
            "passive",
            "mystical",
            "natural",
            "abstract",
            "elemental",
            "preposition",
            "adjective",
        ];
        let parsed: Vec<SlotKind> = names
            .iter()
            .map(|n| SlotKind::from_placeholder(n).unwrap())
            .collect();
        assert_eq!(parsed, SlotKind::ALL.to_vec());
        assert_eq!(SlotKind::from_placeholder("verb"), None);
    }

    #[test]
    fn test_template_parse() {
        let t = VerseTemplate::parse(
            IntentCategory::Protection,
            "{temporal} the {mystical} is {passive} ... —",
            "fallback line",
        )
        .unwrap();
        assert_eq!(
            t.parts,
            vec![
                TemplatePart::Slot(SlotKind::Temporal),
                TemplatePart::Word("the".into()),
                TemplatePart::Slot(SlotKind::MysticalNoun),
                TemplatePart::Word("is".into()),
                TemplatePart::Slot(SlotKind::PassiveVerb),
                TemplatePart::Silence(SilenceMarker::Ellipsis),
                TemplatePart::Silence(SilenceMarker::Dash),
            ]
        );
        assert_eq!(t.slots().count(), 3);
    }

    #[test]
    fn test_template_parse_unknown_slot() {
        let err = VerseTemplate::parse(IntentCategory::Binding, "the {verb}", "x").unwrap_err();
        assert!(matches!(err, CorpusError::UnknownSlot { ref name, .. } if name == "verb"));
    }
}
