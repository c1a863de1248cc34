//! Static character tables for the Beta Code transcoder.

use phf::phf_map;

/// ASCII Beta Code base letter -> lowercase Greek base codepoint.
pub static GREEK_BASE: phf::Map<char, char> = phf_map! {
    'a' => 'α', 'b' => 'β', 'g' => 'γ', 'd' => 'δ', 'e' => 'ε', 'z' => 'ζ',
    'h' => 'η', 'q' => 'θ', 'i' => 'ι', 'k' => 'κ', 'l' => 'λ', 'm' => 'μ',
    'n' => 'ν', 'c' => 'ξ', 'o' => 'ο', 'p' => 'π', 'r' => 'ρ', 's' => 'σ',
    'j' => 'ς', 't' => 'τ', 'u' => 'υ', 'f' => 'φ', 'x' => 'χ', 'y' => 'ψ',
    'w' => 'ω',
};

/// ASCII diacritic marker -> combining Unicode codepoint.
pub static DIACRITICS: phf::Map<char, char> = phf_map! {
    ')' => '\u{0313}', // smooth breathing (psili)
    '(' => '\u{0314}', // rough breathing (dasia)
    '/' => '\u{0301}', // acute (oxia)
    '\\' => '\u{0300}', // grave (varia)
    '=' => '\u{0342}', // circumflex (perispomeni)
    '+' => '\u{0308}', // diaeresis
    '|' => '\u{0345}', // iota subscript
};

/// Inverse of [`GREEK_BASE`] (plus explicit final sigma) for `to_beta_code`.
pub static ALPHA_BASE: phf::Map<char, char> = phf_map! {
    'α' => 'a', 'β' => 'b', 'γ' => 'g', 'δ' => 'd', 'ε' => 'e', 'ζ' => 'z',
    'η' => 'h', 'θ' => 'q', 'ι' => 'i', 'κ' => 'k', 'λ' => 'l', 'μ' => 'm',
    'ν' => 'n', 'ξ' => 'c', 'ο' => 'o', 'π' => 'p', 'ρ' => 'r', 'σ' => 's',
    'ς' => 's', 'τ' => 't', 'υ' => 'u', 'φ' => 'f', 'χ' => 'x', 'ψ' => 'y',
    'ω' => 'w',
};

/// Inverse of [`DIACRITICS`].
pub static ALPHA_DIACRITICS: phf::Map<char, char> = phf_map! {
    '\u{0313}' => ')',
    '\u{0314}' => '(',
    '\u{0301}' => '/',
    '\u{0300}' => '\\',
    '\u{0342}' => '=',
    '\u{0308}' => '+',
    '\u{0345}' => '|',
};

/// Beta Code command heads.
pub const COMMAND_HEADS: [char; 11] =
    ['$', '&', '@', '{', '}', '<', '"', '[', ']', '%', '#'];

/// Composition priority for a combining diacritic:
/// breathing(1) < diaeresis(2) < accent(3) < iota subscript(4).
pub fn diacritic_priority(mark: char) -> u8 {
    match mark {
        '\u{0313}' | '\u{0314}' => 1,
        '\u{0308}' => 2,
        '\u{0301}' | '\u{0300}' | '\u{0342}' => 3,
        '\u{0345}' => 4,
        _ => 5,
    }
}
