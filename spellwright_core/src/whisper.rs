// Whisper input boundary.
//
// A `Whisper` is the only value the pipeline accepts, so every downstream
// stage can assume normalized text: lowercase, no control or markup
// characters, single spaces, no leading/trailing whitespace, at most
// `MAX_WHISPER_CHARS` characters. Apostrophes, hyphens and ellipses pass
// through untouched.

use std::fmt;

use serde::Serialize;

use crate::error::WhisperError;

/// Upper bound on normalized whisper length, in characters.
pub const MAX_WHISPER_CHARS: usize = 500;

/// Characters removed outright (markup, template and shell metacharacters).
const STRIPPED: &[char] = &['<', '>', '{', '}', '[', ']', '\\', '|', '`', '$'];

/// Normalized, validated whisper text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Whisper(String);

impl Whisper {
    pub fn new(raw: &str) -> Result<Whisper, WhisperError> {
        let cleaned: String = raw
            .chars()
            .filter(|c| !STRIPPED.contains(c))
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect::<String>()
            .to_lowercase();
        let normalized = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.is_empty() {
            return Err(WhisperError::Empty);
        }
        let len = normalized.chars().count();
        if len > MAX_WHISPER_CHARS {
            return Err(WhisperError::TooLong {
                len,
                max: MAX_WHISPER_CHARS,
            });
        }
        Ok(Whisper(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Whisper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
