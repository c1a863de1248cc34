//! Beta Code <-> Unicode transcoder.
//!
//! `to_greek`/`to_latin` share a single scanning engine; the only
//! difference is which mode is active on entry. Command heads can flip
//! the mode mid-stream in either direction (`&`/`{70` -> Latin, `$` ->
//! Greek), matching the corpus parser's ability to switch languages
//! inside a single work.

mod tables;

use unicode_normalization::UnicodeNormalization;

/// Convert Beta Code to Unicode Greek (NFC), starting in Greek mode.
///
/// ```
/// use tlgcorpus::betacode::to_greek;
///
/// assert_eq!(to_greek("lo/gos"), "λόγος");
/// assert_eq!(to_greek("*lo/gos"), "Λόγος");
/// ```
pub fn to_greek(s: &str) -> String {
    let raw = transcode(s, false);
    let sigma_fixed = apply_final_sigma(&raw);
    sigma_fixed.nfc().collect()
}

/// Convert Beta Code to Unicode Latin, starting in Latin mode. Bytes
/// outside the printable ASCII range `[0x20, 0x7E]` are dropped.
///
/// ```
/// use tlgcorpus::betacode::to_latin;
///
/// assert_eq!(to_latin("Plato"), "Plato");
/// ```
pub fn to_latin(s: &str) -> String {
    transcode(s, true)
}

/// Convert Unicode Greek back to Beta Code.
///
/// ```
/// use tlgcorpus::betacode::to_beta_code;
///
/// assert_eq!(to_beta_code("ἄνθρωπος"), "a)/nqrwpos");
/// ```
pub fn to_beta_code(s: &str) -> String {
    let decomposed: Vec<char> = s.nfd().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < decomposed.len() {
        let ch = decomposed[i];
        let lower = lowercase_one(ch);
        if let Some(&base) = tables::ALPHA_BASE.get(&lower) {
            if ch.is_uppercase() {
                out.push('*');
            }
            out.push(base);
            i += 1;
            while i < decomposed.len() {
                if let Some(&marker) = tables::ALPHA_DIACRITICS.get(&decomposed[i]) {
                    out.push(marker);
                    i += 1;
                } else {
                    break;
                }
            }
        } else {
            out.push(ch);
            i += 1;
        }
    }
    out
}

fn lowercase_one(ch: char) -> char {
    ch.to_lowercase().next().unwrap_or(ch)
}

#[derive(Debug, Clone, Copy)]
struct ScanState {
    is_latin: bool,
    quot6_open: bool,
    quot7_open: bool,
}

/// Shared scanning engine for `to_greek`/`to_latin`.
fn transcode(s: &str, initial_latin: bool) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut state = ScanState {
        is_latin: initial_latin,
        quot6_open: true,
        quot7_open: true,
    };
    let mut out = String::new();
    let mut open_base: Option<char> = None;
    let mut pending_marks: Vec<char> = Vec::new();
    let mut upper = false;

    let mut pos = 0;
    while pos < chars.len() {
        let ch = chars[pos];

        if ch == '`' {
            pos += 1;
            continue;
        }

        if tables::COMMAND_HEADS.contains(&ch) {
            flush_open(&mut out, &mut open_base, &mut pending_marks);
            pos = dispatch_command(&chars, pos, &mut state, &mut out) + 1;
            continue;
        }

        if state.is_latin {
            let code = ch as u32;
            if (0x20..=0x7E).contains(&code) {
                out.push(ch);
            }
            pos += 1;
            continue;
        }

        if ch == '*' {
            upper = true;
            pos += 1;
            continue;
        }

        let lower = ch.to_ascii_lowercase();
        if let Some(&base) = tables::GREEK_BASE.get(&lower) {
            flush_open(&mut out, &mut open_base, &mut pending_marks);
            open_base = Some(if upper {
                base.to_uppercase().next().unwrap_or(base)
            } else {
                base
            });
            upper = false;
        } else if let Some(&mark) = tables::DIACRITICS.get(&ch) {
            pending_marks.push(mark);
        } else {
            flush_open(&mut out, &mut open_base, &mut pending_marks);
            out.push(ch);
        }
        pos += 1;
    }

    flush_open(&mut out, &mut open_base, &mut pending_marks);
    out
}

/// Close out the currently accumulating base letter (if any), emitting
/// it followed by its pending combining marks in composition-priority
/// order. Marks collected with no open base (e.g. at string start) are
/// flushed raw.
fn flush_open(out: &mut String, open_base: &mut Option<char>, pending_marks: &mut Vec<char>) {
    if let Some(base) = open_base.take() {
        out.push(base);
        pending_marks.sort_by_key(|&m| tables::diacritic_priority(m));
        out.extend(pending_marks.drain(..));
    } else if !pending_marks.is_empty() {
        out.extend(pending_marks.drain(..));
    }
}

/// Every σ immediately followed by whitespace, punctuation, or
/// end-of-string becomes ς.
fn apply_final_sigma(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == 'σ' {
            let boundary = chars
                .get(i + 1)
                .map_or(true, |&next| next.is_whitespace() || !next.is_alphabetic());
            out.push(if boundary { 'ς' } else { 'σ' });
        } else {
            out.push(ch);
        }
    }
    out
}

/// Read the head's numeric variant (if any) and dispatch to its
/// handler. Returns the index of the last consumed character.
fn dispatch_command(chars: &[char], pos: usize, state: &mut ScanState, out: &mut String) -> usize {
    let head = chars[pos];
    let digit_start = pos + 1;
    let mut i = digit_start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    let variant: Option<u32> = if i > digit_start {
        chars[digit_start..i].iter().collect::<String>().parse().ok()
    } else {
        None
    };

    match head {
        '$' => state.is_latin = false,
        '&' => state.is_latin = true,
        '@' => match variant {
            None => out.push_str("  "),
            Some(70) => out.push_str(" « "),
            Some(71) => out.push_str(" » "),
            _ => {}
        },
        '{' => match variant {
            None => out.push(' '),
            Some(70) => state.is_latin = true,
            _ => {}
        },
        '}' | '<' => {}
        '"' => match variant {
            Some(1 | 2 | 8) => out.push('"'),
            Some(3 | 4 | 5) => out.push('\''),
            Some(6) => {
                out.push(if state.quot6_open { '«' } else { '»' });
                state.quot6_open = !state.quot6_open;
            }
            Some(7) => {
                out.push(if state.quot7_open { '‹' } else { '›' });
                state.quot7_open = !state.quot7_open;
            }
            _ => {}
        },
        '[' => match variant {
            None => out.push('['),
            Some(1) => out.push('('),
            Some(2) => out.push('<'),
            Some(3) => out.push('{'),
            Some(4) => out.push('⟦'),
            Some(5) => out.push('⌊'),
            Some(7) => out.push('⌈'),
            Some(9) => out.push('˙'),
            _ => {}
        },
        ']' => match variant {
            None => out.push(']'),
            Some(1) => out.push(')'),
            Some(2) => out.push('>'),
            Some(3) => out.push('}'),
            Some(4) => out.push('⟧'),
            Some(6) => out.push('⌋'),
            Some(8) => out.push('⌉'),
            Some(9) => out.push('˙'),
            _ => {}
        },
        '%' => match variant {
            None => out.push('†'),
            Some(1) => out.push('?'),
            Some(2) => out.push('*'),
            Some(107) => out.push('~'),
            _ => {}
        },
        '#' => match variant {
            Some(12) => out.push('—'),
            Some(13) => out.push('※'),
            Some(15) => out.push('>'),
            Some(17) => out.push('/'),
            Some(18) => out.push('<'),
            _ => {}
        },
        _ => {}
    }

    i - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_plain_letters() {
        let letters = [
            ('a', 'α'),
            ('b', 'β'),
            ('g', 'γ'),
            ('d', 'δ'),
            ('e', 'ε'),
            ('z', 'ζ'),
            ('h', 'η'),
            ('q', 'θ'),
            ('i', 'ι'),
            ('k', 'κ'),
            ('l', 'λ'),
            ('m', 'μ'),
            ('n', 'ν'),
            ('c', 'ξ'),
            ('o', 'ο'),
            ('p', 'π'),
            ('r', 'ρ'),
            ('t', 'τ'),
            ('u', 'υ'),
            ('f', 'φ'),
            ('x', 'χ'),
            ('y', 'ψ'),
            ('w', 'ω'),
        ];
        for (beta, greek) in letters {
            let beta_s = beta.to_string();
            // Greek is followed by a space so final-sigma rules never apply here.
            assert_eq!(to_greek(&format!("{beta} ")), format!("{greek} "));
            assert_eq!(to_beta_code(&greek.to_string()), beta_s);
        }
        assert_eq!(to_beta_code("ς"), "s");
    }

    #[test]
    fn final_sigma_rule() {
        assert!(to_greek("logos").ends_with('ς'));
        assert!(to_greek("logos kai").contains("ς "));
        assert_eq!(to_greek("lo/gos"), "λόγος");
    }

    #[test]
    fn pre_buffered_uppercase_composes_onto_capital() {
        assert_eq!(to_greek("*a)/nqrwpos"), "Ἄνθρωπος");
    }

    #[test]
    fn diacritic_order_is_irrelevant_to_composed_result() {
        // smooth+acute vs acute+smooth must compose identically.
        let a = to_greek("a)/ ");
        let b = to_greek("a/) ");
        assert_eq!(a, b);
        assert_eq!(a.trim(), "ἄ");
    }

    #[test]
    fn idempotent_transcode() {
        for s in ["lo/gos", "*a)/nqrwpos", "a(/llos", "qea/, a)ndro/s te"] {
            let once = to_greek(s);
            let twice = to_greek(&once);
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn to_beta_code_final_sigma_maps_to_s_not_j() {
        assert_eq!(to_beta_code("ἄνθρωπος"), "a)/nqrwpos");
    }

    #[test]
    fn to_latin_drops_controls_and_non_ascii() {
        assert_eq!(to_latin("Plato\u{0301}\u{0007}"), "Plato");
    }

    #[test]
    fn command_dollar_and_amp_toggle_mode() {
        // starts greek, '&' switches to latin, emits "Loukas" verbatim, '$' back to greek
        let out = to_greek("a&Loukas$a");
        assert!(out.starts_with('α'));
        assert!(out.contains("Loukas"));
        assert!(out.ends_with('α'));
    }

    #[test]
    fn quote_command_variants() {
        assert_eq!(to_greek("\"1"), "\"");
        assert_eq!(to_greek("\"3"), "'");
    }
}
