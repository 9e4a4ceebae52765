// Intent classifier.
//
// Maps a normalized whisper to one `IntentCategory` by weighted keyword
// matching against the corpus:
//
// 1. Tokenize on anything that is not alphanumeric or an apostrophe.
// 2. For each category, sum the weights of its keywords that occur inside
//    any token (substring match, so `protect` matches `protected`). A
//    keyword counts at most once however many tokens contain it.
// 3. The highest total wins. Ties on the maximum go to the lowest
//    enumeration index. All-zero scores fall back to `IntentCategory::DEFAULT`.
//
// Pure and total: every input, including one with no recognizable words,
// yields a category.

use serde::Serialize;

use spellwright_lexicon::{Corpus, IntentCategory, tokenize};

/// Per-category keyword totals for one whisper.
/// Serializes as a `{label: score}` map in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentScores {
    scores: [u32; IntentCategory::ALL.len()],
}

impl IntentScores {
    pub fn get(&self, intent: IntentCategory) -> u32 {
        self.scores[intent.index()]
    }

    /// `(intent, score)` pairs in enumeration-index order.
    pub fn iter(&self) -> impl Iterator<Item = (IntentCategory, u32)> + '_ {
        IntentCategory::ALL.into_iter().map(|i| (i, self.get(i)))
    }

    /// The winning category: highest score, lowest index on ties, default
    /// when nothing matched.
    pub fn winner(&self) -> IntentCategory {
        let mut best = IntentCategory::DEFAULT;
        let mut best_score = 0;
        for (intent, score) in self.iter() {
            // Strict `>` keeps the earliest category on ties.
            if score > best_score {
                best = intent;
                best_score = score;
            }
        }
        best
    }
}

/// Score every category against a normalized whisper.
pub fn score_intents(corpus: &Corpus, normalized: &str) -> IntentScores {
    let tokens = tokenize(normalized);
    let mut scores = [0u32; IntentCategory::ALL.len()];
    for intent in IntentCategory::ALL {
        scores[intent.index()] = corpus
            .entry(intent)
            .keywords
            .iter()
            .filter(|(keyword, _)| tokens.iter().any(|t| t.contains(keyword.as_str())))
            .map(|(_, &weight)| weight)
            .fold(0u32, u32::saturating_add);
    }
    IntentScores { scores }
}

/// Classify a normalized whisper.
pub fn classify(corpus: &Corpus, normalized: &str) -> IntentCategory {
    let scores = score_intents(corpus, normalized);
    let intent = scores.winner();
    tracing::debug!(%intent, score = scores.get(intent), "classified whisper");
    intent
}

impl Serialize for IntentScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.scores.len()))?;
        for (intent, score) in self.iter() {
            map.serialize_entry(intent.label(), &score)?;
        }
        map.end()
    }
}
