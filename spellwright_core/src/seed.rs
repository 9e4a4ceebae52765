// Seed derivation.
//
// All pseudo-randomness in a spell flows from one base seed per
// (whisper, intent) pair, split into independent sub-seeds for the glyph,
// ritual and verse generators. The hash is pinned to FNV-1a 64 so seeds are
// identical across platforms and releases:
//
//   base      = fnv1a(whisper bytes ++ 0x1f ++ intent label)
//   sub_seed  = fnv1a(base.to_le_bytes() ++ component label)
//   fingerprint = fnv1a(whisper bytes)
//
// The 0x1f unit separator keeps `("ab", "c…")` and `("a", "bc…")` apart.

use serde::Serialize;

use spellwright_lexicon::IntentCategory;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;
const UNIT_SEPARATOR: u8 = 0x1f;

/// Which generator a sub-seed belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedComponent {
    Glyph,
    Ritual,
    Verse,
}

impl SeedComponent {
    pub fn label(self) -> &'static str {
        match self {
            SeedComponent::Glyph => "glyph",
            SeedComponent::Ritual => "ritual",
            SeedComponent::Verse => "verse",
        }
    }
}

/// Incremental FNV-1a 64-bit hasher.
#[derive(Debug, Clone, Copy)]
struct Fnv1a(u64);

impl Fnv1a {
    fn new() -> Self {
        Fnv1a(FNV_OFFSET_BASIS)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(self) -> u64 {
        self.0
    }
}

/// FNV-1a 64 over a byte string.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut h = Fnv1a::new();
    h.write(bytes);
    h.finish()
}

pub fn base_seed(whisper: &str, intent: IntentCategory) -> u64 {
    let mut h = Fnv1a::new();
    h.write(whisper.as_bytes());
    h.write(&[UNIT_SEPARATOR]);
    h.write(intent.label().as_bytes());
    h.finish()
}

pub fn sub_seed(base: u64, component: SeedComponent) -> u64 {
    let mut h = Fnv1a::new();
    h.write(&base.to_le_bytes());
    h.write(component.label().as_bytes());
    h.finish()
}

/// Stable identifier of a normalized whisper, recorded in spell metadata.
pub fn fingerprint(whisper: &str) -> u64 {
    fnv1a(whisper.as_bytes())
}

/// Render a fingerprint as 16 lowercase hex digits.
pub fn fingerprint_hex(fingerprint: u64) -> String {
    format!("{fingerprint:016x}")
}

/// The base seed and its three sub-seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSet {
    pub base: u64,
    pub glyph: u64,
    pub ritual: u64,
    pub verse: u64,
}

impl SeedSet {
    pub fn derive(whisper: &str, intent: IntentCategory) -> SeedSet {
        let base = base_seed(whisper, intent);
        let seeds = SeedSet {
            base,
            glyph: sub_seed(base, SeedComponent::Glyph),
            ritual: sub_seed(base, SeedComponent::Ritual),
            verse: sub_seed(base, SeedComponent::Verse),
        };
        tracing::debug!(
            base = seeds.base,
            glyph = seeds.glyph,
            ritual = seeds.ritual,
            verse = seeds.verse,
            "derived seeds"
        );
        seeds
    }
}
