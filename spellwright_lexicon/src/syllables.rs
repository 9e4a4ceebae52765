// Deterministic English syllable heuristic for verse lines.
//
// Pinned algorithm (changing it changes which verse lines are accepted, so
// it is part of the determinism contract):
//
// 1. Keep only ASCII letters, lowercased. Tokens with no letters (`...`,
//    `—`) count 0.
// 2. Words in `EXCEPTIONS` return their listed count.
// 3. Count maximal runs of vowels. `a e i o u` are always vowels; `y` is a
//    vowel unless it is the first letter or is followed by a vowel.
// 4. If there is more than one run, apply at most one silent-ending rule:
//    - final `e` after a consonant;
//    - final `ed` after a consonant other than `t`/`d`;
//    - final `es` after a consonant other than `s x z c g h`.
//    None of these fire when the consonant is an `l` that itself follows a
//    consonant other than `l` (`candle`, `kindled`, `candles`).
// 5. Every word with letters counts at least 1.
//
// Used by the verse generator to enforce the per-line bound, by the spell
// assembler to re-check it, and by corpus validation to check every
// template's fallback line.

/// Inclusive lower bound on syllables per verse line.
pub const VERSE_SYLLABLE_MIN: u32 = 8;
/// Inclusive upper bound on syllables per verse line.
pub const VERSE_SYLLABLE_MAX: u32 = 12;

/// Words the vowel-run heuristic miscounts.
const EXCEPTIONS: &[(&str, u32)] = &[
    ("being", 2),
    ("quiet", 2),
    ("poem", 2),
    ("lion", 2),
    ("sacred", 2),
    ("create", 2),
];

/// Whether `count` lies within the verse line bound.
pub fn in_verse_bounds(count: u32) -> bool {
    (VERSE_SYLLABLE_MIN..=VERSE_SYLLABLE_MAX).contains(&count)
}

/// Count syllables in a whole line (sum over whitespace-separated words).
pub fn count_line(line: &str) -> u32 {
    line.split_whitespace().map(count_word).sum()
}

/// Count syllables in a single word.
pub fn count_word(word: &str) -> u32 {
    let letters: Vec<u8> = word
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 0;
    }
    if let Some(&(_, n)) = EXCEPTIONS
        .iter()
        .find(|(w, _)| w.as_bytes() == letters.as_slice())
    {
        return n;
    }

    let mut runs = 0u32;
    let mut in_run = false;
    for i in 0..letters.len() {
        let vowel = is_vowel_at(&letters, i);
        if vowel && !in_run {
            runs += 1;
        }
        in_run = vowel;
    }

    if runs > 1 && has_silent_ending(&letters) {
        runs -= 1;
    }
    runs.max(1)
}

fn is_plain_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn is_vowel_at(letters: &[u8], i: usize) -> bool {
    match letters[i] {
        b'y' => i != 0 && !letters.get(i + 1).copied().is_some_and(is_plain_vowel),
        b => is_plain_vowel(b),
    }
}

fn has_silent_ending(letters: &[u8]) -> bool {
    let n = letters.len();
    let consonant = |i: usize| !is_vowel_at(letters, i);
    // `l` after a consonant carries its own syllable: can-dle, kin-dled.
    let syllabic_l =
        |i: usize| letters[i] == b'l' && i >= 1 && letters[i - 1] != b'l' && consonant(i - 1);

    if n >= 2 && letters[n - 1] == b'e' {
        let i = n - 2;
        return consonant(i) && !syllabic_l(i);
    }
    if n >= 3 && letters[n - 2] == b'e' {
        let i = n - 3;
        return match letters[n - 1] {
            b'd' => consonant(i) && !matches!(letters[i], b't' | b'd') && !syllabic_l(i),
            b's' => {
                consonant(i)
                    && !matches!(letters[i], b's' | b'x' | b'z' | b'c' | b'g' | b'h')
                    && !syllabic_l(i)
            }
            _ => false,
        };
    }
    false
}
