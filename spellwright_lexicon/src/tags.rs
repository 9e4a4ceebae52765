// Tokenization and ritual-step tagging.
//
// Ritual corpus entries are plain text; their material and timing tags are
// already embedded in the wording ("Scatter salt across the threshold at
// dusk"). `StepTagger` recovers them by matching the step's tokens against
// the corpus material list (singular or `s`/`es` plural) and marker phrases
// (contiguous token sequences, so `east` never matches inside `feast`).
//
// `tokenize` is shared with the intent classifier in `spellwright_core`.

use serde::Serialize;

/// Split lowercase text into tokens on any character that is neither
/// alphanumeric nor an apostrophe.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Material and timing/spatial tags recovered from one ritual step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepTags {
    /// Canonical (singular) material name, first in text order.
    pub material: Option<String>,
    /// First marker phrase, in corpus list order, found in the step.
    pub timing: Option<String>,
}

/// A marker phrase with its pre-split tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker {
    phrase: String,
    tokens: Vec<String>,
}

/// Tags ritual steps against a fixed material and marker vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTagger {
    materials: Vec<String>,
    markers: Vec<Marker>,
}

impl StepTagger {
    pub fn new(materials: Vec<String>, markers: Vec<String>) -> Self {
        let markers = markers
            .into_iter()
            .map(|phrase| Marker {
                tokens: tokenize(&phrase),
                phrase,
            })
            .collect();
        StepTagger { materials, markers }
    }

    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    /// Extract the tags embedded in `text`.
    pub fn tag(&self, text: &str) -> StepTags {
        let tokens = tokenize(text);

        let material = tokens
            .iter()
            .find_map(|token| self.material_for(token))
            .map(str::to_string);

        let timing = self
            .markers
            .iter()
            .find(|m| {
                !m.tokens.is_empty()
                    && tokens
                        .windows(m.tokens.len())
                        .any(|w| w == m.tokens.as_slice())
            })
            .map(|m| m.phrase.clone());

        StepTags { material, timing }
    }

    fn material_for(&self, token: &str) -> Option<&str> {
        self.materials
            .iter()
            .map(String::as_str)
            .find(|&m| token == m || plural_of(token, m))
    }
}

fn plural_of(token: &str, material: &str) -> bool {
    token.strip_suffix('s').is_some_and(|stem| {
        stem == material || stem.strip_suffix('e').is_some_and(|s| s == material)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagger() -> StepTagger {
        StepTagger::new(
            vec!["ash".into(), "salt".into(), "stone".into(), "leaf".into()],
            vec!["at dusk".into(), "threshold".into(), "east".into()],
        )
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Protect my home, from harm!"),
            vec!["protect", "my", "home", "from", "harm"]
        );
        assert_eq!(tokenize("don't... go—now"), vec!["don't", "go", "now"]);
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_tag_material_and_marker() {
        let tags = tagger().tag("Scatter a line of salt across the threshold");
        assert_eq!(tags.material.as_deref(), Some("salt"));
        assert_eq!(tags.timing.as_deref(), Some("threshold"));
    }

    #[test]
    fn test_tag_plural_material() {
        let tags = tagger().tag("Stack three flat stones");
        assert_eq!(tags.material.as_deref(), Some("stone"));
        let tags = tagger().tag("Rub ashes into the palms");
        assert_eq!(tags.material.as_deref(), Some("ash"));
    }

    #[test]
    fn test_tag_first_material_in_text_order() {
        let tags = tagger().tag("Press a leaf into salt");
        assert_eq!(tags.material.as_deref(), Some("leaf"));
    }

    #[test]
    fn test_marker_list_order_wins() {
        let tags = tagger().tag("Face east at the threshold at dusk");
        assert_eq!(tags.timing.as_deref(), Some("at dusk"));
    }

    #[test]
    fn test_marker_matches_whole_tokens_only() {
        let tags = tagger().tag("Prepare a feast of bread");
        assert_eq!(tags.timing, None);
        assert_eq!(tags.material, None);
    }
}
