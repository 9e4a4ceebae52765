// Verse generator.
//
// Builds 2–4 lines by filling the intent's verse templates with words from
// the lexicon. Every line must land in the syllable bound (8–12 by the
// pinned heuristic in `spellwright_lexicon::syllables`). When a drawn
// combination misses, a deterministic repair pass walks the slots in order
// and tries alternates cyclically from the drawn index, keeping a
// replacement only if it brings the count strictly closer to the bound and
// stopping as soon as the line fits. If the greedy pass leaves the line out
// of bounds, an exhaustive search over the template's slots looks for any
// fitting combination (line counts are a sum of per-word counts, so the
// search works on counts alone). Only when no combination fits is the
// template's pre-authored fallback line used (validated in bounds when the
// corpus loads). Neither pass makes PRNG draws.
//
// Draw order: line count, metaphor index, then for each line a template
// index followed by one word index per slot.

use serde::Serialize;

use spellwright_lexicon::syllables::{self, VERSE_SYLLABLE_MAX, VERSE_SYLLABLE_MIN};
use spellwright_lexicon::{Corpus, IntentCategory, SilenceMarker, TemplatePart, VerseTemplate};
use spellwright_prng::SpellRng;

pub const VERSE_LINES_MIN: usize = 2;
pub const VERSE_LINES_MAX: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseLine {
    pub text: String,
    pub syllables: u32,
    /// Whether this line is the template's fallback.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verse {
    pub lines: Vec<VerseLine>,
    pub metaphor: String,
}

impl Verse {
    pub fn used_fallback(&self) -> bool {
        self.lines.iter().any(|l| l.fallback)
    }
}

pub fn generate(seed: u64, intent: IntentCategory, corpus: &Corpus) -> Verse {
    let entry = corpus.entry(intent);
    let mut rng = SpellRng::new(seed);

    let line_count = rng.range_usize_inclusive(VERSE_LINES_MIN, VERSE_LINES_MAX);
    let metaphor = entry.metaphors[rng.index(entry.metaphors.len())].clone();

    let lines = (0..line_count)
        .map(|_| {
            let template = &entry.verse_templates[rng.index(entry.verse_templates.len())];
            let mut choices: Vec<usize> = template
                .slots()
                .map(|kind| rng.index(corpus.words(kind).len()))
                .collect();
            build_line(template, corpus, &mut choices)
        })
        .collect();

    Verse { lines, metaphor }
}

/// Fill `template` with `choices`, repairing or falling back as needed.
fn build_line(template: &VerseTemplate, corpus: &Corpus, choices: &mut [usize]) -> VerseLine {
    let repaired = repair(template, corpus, choices);
    let fitted = if syllables::in_verse_bounds(repaired) {
        Some(repaired)
    } else {
        search(template, corpus, choices)
    };
    if let Some(syllables) = fitted {
        return VerseLine {
            text: capitalize(&render(template, corpus, choices)),
            syllables,
            fallback: false,
        };
    }

    tracing::debug!(
        pattern = %template.pattern,
        syllables = repaired,
        "no word combination fits the template, using fallback"
    );
    VerseLine {
        text: capitalize(&template.fallback),
        syllables: syllables::count_line(&template.fallback),
        fallback: true,
    }
}

/// Greedy slot-by-slot repair toward the syllable bound. Returns the final
/// syllable count of the (possibly modified) choices.
fn repair(template: &VerseTemplate, corpus: &Corpus, choices: &mut [usize]) -> u32 {
    let mut count = syllables::count_line(&render(template, corpus, choices));
    let kinds: Vec<_> = template.slots().collect();

    for (slot, kind) in kinds.into_iter().enumerate() {
        if syllables::in_verse_bounds(count) {
            break;
        }
        let len = corpus.words(kind).len();
        let drawn = choices[slot];
        for offset in 1..len {
            let kept = choices[slot];
            choices[slot] = (drawn + offset) % len;
            let candidate = syllables::count_line(&render(template, corpus, choices));
            if distance(candidate) < distance(count) {
                count = candidate;
                if syllables::in_verse_bounds(count) {
                    break;
                }
            } else {
                choices[slot] = kept;
            }
        }
    }
    count
}

/// Find a combination of words that puts the line in bounds, if the template
/// has one. Slots are fixed in order; each keeps the first word, cyclically
/// from its current choice, that leaves the bound reachable by the slots
/// after it. On success `choices` holds the combination and its syllable
/// count is returned. On failure `choices` is left untouched.
fn search(template: &VerseTemplate, corpus: &Corpus, choices: &mut [usize]) -> Option<u32> {
    let counts: Vec<Vec<u32>> = template
        .slots()
        .map(|kind| {
            corpus
                .words(kind)
                .iter()
                .map(|w| syllables::count_line(w))
                .collect()
        })
        .collect();
    let fixed: u32 = template
        .parts
        .iter()
        .map(|part| match part {
            TemplatePart::Word(w) => syllables::count_line(w),
            TemplatePart::Slot(_) | TemplatePart::Silence(_) => 0,
        })
        .sum();

    // reachable[i]: bit s set when slots i.. can add exactly s syllables.
    let mut reachable = vec![0u32; counts.len() + 1];
    reachable[counts.len()] = 1;
    for i in (0..counts.len()).rev() {
        reachable[i] = counts[i]
            .iter()
            .fold(0, |acc, &c| acc | shift_sums(reachable[i + 1], c));
    }

    let bound = (VERSE_SYLLABLE_MIN..=VERSE_SYLLABLE_MAX).fold(0u32, |acc, s| acc | (1 << s));
    if shift_sums(reachable[0], fixed) & bound == 0 {
        return None;
    }

    let mut total = fixed;
    for (slot, slot_counts) in counts.iter().enumerate() {
        let len = slot_counts.len();
        let start = choices[slot];
        let pick = (0..len).map(|offset| (start + offset) % len).find(|&idx| {
            shift_sums(reachable[slot + 1], total + slot_counts[idx]) & bound != 0
        })?;
        choices[slot] = pick;
        total += slot_counts[pick];
    }
    Some(total)
}

/// Shift a set of reachable sums by `by`, dropping sums above the bound.
fn shift_sums(sums: u32, by: u32) -> u32 {
    if by > VERSE_SYLLABLE_MAX {
        return 0;
    }
    (sums << by) & ((1 << (VERSE_SYLLABLE_MAX + 1)) - 1)
}

/// How far `count` lies outside the syllable bound (0 when inside).
fn distance(count: u32) -> u32 {
    if count < VERSE_SYLLABLE_MIN {
        VERSE_SYLLABLE_MIN - count
    } else {
        count.saturating_sub(VERSE_SYLLABLE_MAX)
    }
}

/// Render a template with the given word choices (one per slot, in order).
/// Ellipses attach to the preceding word; dashes stand alone.
fn render(template: &VerseTemplate, corpus: &Corpus, choices: &[usize]) -> String {
    let mut words: Vec<String> = Vec::with_capacity(template.parts.len());
    let mut slot = 0;
    for part in &template.parts {
        match part {
            TemplatePart::Slot(kind) => {
                words.push(corpus.words(*kind)[choices[slot]].clone());
                slot += 1;
            }
            TemplatePart::Word(w) => words.push(w.clone()),
            TemplatePart::Silence(SilenceMarker::Ellipsis) => match words.last_mut() {
                Some(prev) => prev.push_str(SilenceMarker::Ellipsis.text()),
                None => words.push(SilenceMarker::Ellipsis.text().to_string()),
            },
            TemplatePart::Silence(marker) => words.push(marker.text().to_string()),
        }
    }
    words.join(" ")
}

/// Capitalize the first character of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{}{}", upper, chars.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spellwright_lexicon::{DEFAULT_CORPUS_JSON, default_corpus};

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("at dusk"), "At dusk");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ûnder"), "Ûnder");
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(5), 3);
        assert_eq!(distance(8), 0);
        assert_eq!(distance(12), 0);
        assert_eq!(distance(15), 3);
    }

    #[test]
    fn test_render_silence_markers() {
        let corpus = default_corpus().unwrap();
        let template = VerseTemplate::parse(
            IntentCategory::Protection,
            "the {natural} ... is {passive} — now",
            "unused",
        )
        .unwrap();
        // natural_noun[0] = "stone", passive_verb[0] = "sealed"
        assert_eq!(render(&template, &corpus, &[0, 0]), "the stone... is sealed — now");
    }

    #[test]
    fn test_repair_walks_slots_in_order() {
        let corpus = default_corpus().unwrap();
        let template = VerseTemplate::parse(
            IntentCategory::Binding,
            "{passive} {passive} {passive} {passive}",
            "unused",
        )
        .unwrap();
        // Starts at four one-syllable words ("sealed").
        let mut choices = vec![0, 0, 0, 0];
        let count = repair(&template, &corpus, &mut choices);
        assert!(syllables::in_verse_bounds(count));
        assert_eq!(count, 8);
        // Only the first two slots needed changing.
        assert_eq!(&choices[2..], &[0, 0]);
        assert_eq!(
            render(&template, &corpus, &choices),
            "remembered remembered sealed sealed"
        );
    }

    fn corpus_with_words(temporal: &[&str], passive: &[&str]) -> Corpus {
        let mut value: serde_json::Value = serde_json::from_str(DEFAULT_CORPUS_JSON).unwrap();
        value["words"]["temporal"] = serde_json::json!(temporal);
        value["words"]["passive_verb"] = serde_json::json!(passive);
        Corpus::from_json(&value.to_string()).unwrap()
    }

    #[test]
    fn test_search_finds_combination_greedy_misses() {
        let corpus = corpus_with_words(
            &["at dusk", "one two three four five six seven eight nine ten"],
            &["one two three four five", "kept"],
        );
        let template =
            VerseTemplate::parse(IntentCategory::Binding, "{temporal} {passive}", "unused")
                .unwrap();
        // Drawn: 2 + 5 = 7. No single-slot change gets closer, so the greedy
        // pass gives up; only [1, 1] (11 + 1) fits.
        let mut choices = vec![0, 0];
        assert_eq!(repair(&template, &corpus, &mut choices), 7);
        assert_eq!(choices, vec![0, 0]);

        let line = build_line(&template, &corpus, &mut choices);
        assert!(!line.fallback, "{line:?}");
        assert_eq!(choices, vec![1, 1]);
        assert_eq!(line.syllables, 12);
        assert_eq!(
            line.text,
            "One two three four five six seven eight nine ten kept"
        );
    }

    #[test]
    fn test_search_reports_unfittable_template() {
        let corpus = corpus_with_words(&["at dusk"], &["sealed", "kept"]);
        let template =
            VerseTemplate::parse(IntentCategory::Binding, "{temporal} {passive}", "unused")
                .unwrap();
        let mut choices = vec![0, 1];
        assert_eq!(search(&template, &corpus, &mut choices), None);
        assert_eq!(choices, vec![0, 1]);
    }

    #[test]
    fn test_search_prefers_drawn_words() {
        let corpus = default_corpus().unwrap();
        let template = &corpus.entry(IntentCategory::Protection).verse_templates[0];
        let mut choices = vec![0, 0, 0, 0, 0];
        assert_eq!(search(template, &corpus, &mut choices), Some(10));
        assert_eq!(choices, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_in_bounds_line_is_untouched() {
        let corpus = default_corpus().unwrap();
        let template = &corpus.entry(IntentCategory::Protection).verse_templates[0];
        // "at dusk the rune is sealed beneath the stone" = 10
        let mut choices = vec![0, 0, 0, 0, 0];
        let count = repair(template, &corpus, &mut choices);
        assert_eq!(count, 10);
        assert_eq!(choices, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_unfittable_template_uses_fallback() {
        let mut value: serde_json::Value = serde_json::from_str(DEFAULT_CORPUS_JSON).unwrap();
        for template in value["intents"]["passage"]["verse_templates"]
            .as_array_mut()
            .unwrap()
        {
            template["pattern"] = serde_json::json!("{natural}");
        }
        let corpus = Corpus::from_json(&value.to_string()).unwrap();
        let verse = generate(3, IntentCategory::Passage, &corpus);
        assert!(verse.used_fallback());
        let fallbacks: Vec<String> = corpus
            .entry(IntentCategory::Passage)
            .verse_templates
            .iter()
            .map(|t| capitalize(&t.fallback))
            .collect();
        for line in &verse.lines {
            assert!(line.fallback);
            assert!(fallbacks.contains(&line.text));
            assert!(syllables::in_verse_bounds(line.syllables));
        }
    }

    #[test]
    fn test_generate_bounds() {
        let corpus = default_corpus().unwrap();
        for seed in 0..300u64 {
            for intent in IntentCategory::ALL {
                let verse = generate(seed, intent, &corpus);
                assert!((VERSE_LINES_MIN..=VERSE_LINES_MAX).contains(&verse.lines.len()));
                assert!(corpus.entry(intent).metaphors.contains(&verse.metaphor));
                for line in &verse.lines {
                    assert!(syllables::in_verse_bounds(line.syllables), "{line:?}");
                    assert_eq!(syllables::count_line(&line.text), line.syllables);
                    assert!(!line.text.contains(['!', '?', '\'']), "{line:?}");
                    assert!(line.text.chars().next().is_some_and(|c| !c.is_lowercase()));
                }
            }
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let corpus = default_corpus().unwrap();
        assert_eq!(
            generate(1234, IntentCategory::Revelation, &corpus),
            generate(1234, IntentCategory::Revelation, &corpus)
        );
    }
}
