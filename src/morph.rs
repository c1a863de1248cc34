//! Lemma and morphological-analysis lookup over the flat-file
//! companions `greek-lemmata.txt` / `greek-analyses.txt`.
//!
//! A line-oriented scan with no binary decoding of its own, unlike the
//! corpus parser: these files are plain tab- and brace-delimited text.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::{open_file, Error, Result};

/// A lemma's known inflected forms, as recorded in `greek-lemmata.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LemmaInfo {
    pub lemma: String,
    pub id: String,
    pub forms: Vec<String>,
}

/// Scan `path` (tab-separated: `lemma<TAB>id<TAB>form1<TAB>form2...`)
/// for `target_lemma`.
pub fn lookup_lemma(path: impl AsRef<std::path::Path>, target_lemma: &str) -> Result<LemmaInfo> {
    let path = path.as_ref();
    let file = open_file(path)?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line.map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut parts = line.splitn(3, '\t');
        let Some(lemma) = parts.next() else { continue };
        if lemma.trim() != target_lemma {
            continue;
        }
        let id = parts.next().unwrap_or_default().trim().to_string();
        let forms = parts
            .next()
            .unwrap_or_default()
            .split('\t')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        return Ok(LemmaInfo {
            lemma: lemma.trim().to_string(),
            id,
            forms,
        });
    }

    Err(Error::LemmaNotFound {
        lemma: target_lemma.to_string(),
    })
}

/// One morphological analysis attached to a word form in
/// `greek-analyses.txt`: a Perseus-style brace group `{lemma id tag
/// def  morph}` attached to the headword at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analysis {
    pub form: String,
    pub lemma: String,
    pub short_def: String,
    pub morphology: String,
}

/// Scan `path` for the analysis line of `target_form` (case-insensitive,
/// leading `!` prefix ignored — `greek-analyses.txt`'s convention for a
/// word-initial-capital-in-source marker).
pub fn lookup_form(path: impl AsRef<std::path::Path>, target_form: &str) -> Result<Vec<Analysis>> {
    let path = path.as_ref();
    let file: File = open_file(path)?;
    let reader = BufReader::new(file);

    for line in reader.lines() {
        let line = line.map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let Some(word) = line.split_whitespace().next() else {
            continue;
        };
        let word = word.strip_prefix('!').unwrap_or(word);
        if !word.eq_ignore_ascii_case(target_form) {
            continue;
        }
        return Ok(parse_analysis_line(target_form, &line));
    }

    Err(Error::LemmaNotFound {
        lemma: target_form.to_string(),
    })
}

/// Split a line's `{...}` brace groups into [`Analysis`] records.
fn parse_analysis_line(form: &str, line: &str) -> Vec<Analysis> {
    let mut out = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let body = &rest[open + 1..open + close];
        out.push(parse_brace_body(form, body));
        rest = &rest[open + close + 1..];
    }
    out
}

/// Parse one brace body: `form id [pos,]lemma content`, where `content`
/// splits on a run of two-or-more spaces into `def` and `morphology`.
/// An optional comma-terminated POS tag precedes the lemma token,
/// which is followed by the free-text content.
fn parse_brace_body(form: &str, body: &str) -> Analysis {
    let mut fields = body.splitn(3, ' ');
    let _tag = fields.next().unwrap_or_default();
    let _id = fields.next().unwrap_or_default();
    let remainder = fields.next().unwrap_or_default();

    let first_space = remainder.find(' ').unwrap_or(remainder.len());
    let after_pos = match remainder.find(',') {
        Some(c) if c < first_space => &remainder[c + 1..],
        _ => remainder,
    };
    let lemma_len = after_pos.find(' ').unwrap_or(after_pos.len());
    let lemma = &after_pos[..lemma_len];
    let content = after_pos[lemma_len..].trim_start();

    let (short_def, morphology) = split_double_space(content);
    Analysis {
        form: form.to_string(),
        lemma: lemma.to_string(),
        short_def,
        morphology,
    }
}

/// Split on the first run of two-or-more consecutive spaces.
fn split_double_space(s: &str) -> (String, String) {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b' ' && bytes[i + 1] == b' ' {
            let mut j = i;
            while j < bytes.len() && bytes[j] == b' ' {
                j += 1;
            }
            return (s[..i].trim().to_string(), s[j..].trim().to_string());
        }
        i += 1;
    }
    (String::new(), s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tlgcorpus-morph-{}-{}.txt",
            std::process::id(),
            COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
        ));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    static COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

    #[test]
    fn lookup_lemma_reads_tab_separated_forms() {
        let path = write_fixture("a)/dhn\tn12345\tform1\tform2\tform3\n");
        let info = lookup_lemma(&path, "a)/dhn").unwrap();
        assert_eq!(info.id, "n12345");
        assert_eq!(info.forms, vec!["form1", "form2", "form3"]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn lookup_lemma_missing_is_an_error() {
        let path = write_fixture("a)/dhn\tn1\tform1\n");
        let err = lookup_lemma(&path, "ou)k").unwrap_err();
        assert!(matches!(err, Error::LemmaNotFound { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn lookup_form_splits_brace_groups() {
        let path = write_fixture(
            "lo/gos {lo/gos 12 masc,lo/gos word, speech  n-s---mn-}\n",
        );
        let analyses = lookup_form(&path, "lo/gos").unwrap();
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].lemma, "lo/gos");
        assert_eq!(analyses[0].morphology, "n-s---mn-");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn split_double_space_handles_no_match() {
        assert_eq!(split_double_space("solo"), (String::new(), "solo".to_string()));
    }
}
