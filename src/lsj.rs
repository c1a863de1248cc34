//! LSJ dictionary lookup: an offset index over `grc.lsj.xml` built once
//! and consulted by normalized key.
//!
//! No regex dependency is in this crate's stack, so the tag/attribute
//! scanning below is hand-rolled string scanning instead (`find`/
//! `split_once`), which is all these fixed, well-formed tags need.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};

use crate::betacode;
use crate::error::{open_file, Error, Result};
use crate::normalize::{normalize_fuzzy, normalize_latin, normalize_strict};

/// One looked-up LSJ entry: its dictionary key and the cleaned prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsjEntry {
    pub key: String,
    pub text: String,
}

/// Scan `xml_path` line by line for `<div2 ... key="...">` (Greek
/// headwords) and `<div1 ... key="...">` (front-matter / Latin
/// sections), recording each key's byte offset into `index_path` as
/// `'key' => offset` lines — one per normalized form, so a lookup never
/// needs to re-scan the XML.
pub fn build_index(
    xml_path: impl AsRef<std::path::Path>,
    index_path: impl AsRef<std::path::Path>,
) -> Result<()> {
    let xml_path = xml_path.as_ref();
    let index_path = index_path.as_ref();
    let file = open_file(xml_path)?;
    let mut reader = BufReader::new(file);
    let mut out = File::create(index_path).map_err(|source| Error::Read {
        path: index_path.to_path_buf(),
        source,
    })?;

    let mut offset: u64 = 0;
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).map_err(|source| Error::Read {
            path: xml_path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }

        if line.trim_start().starts_with("<div2") {
            if let Some(raw_key) = extract_attr(&line, "key") {
                let strict = normalize_strict(&raw_key);
                let fuzzy = normalize_fuzzy(&raw_key);
                write_index_line(&mut out, index_path, &strict, offset)?;
                if fuzzy != strict {
                    write_index_line(&mut out, index_path, &fuzzy, offset)?;
                }
            }
        } else if line.trim_start().starts_with("<div1") {
            if let Some(raw_key) = extract_attr(&line, "key") {
                let key = normalize_latin(&raw_key);
                write_index_line(&mut out, index_path, &key, offset)?;
            }
        }

        offset += n as u64;
    }

    Ok(())
}

fn write_index_line(
    out: &mut File,
    index_path: &std::path::Path,
    key: &str,
    offset: u64,
) -> Result<()> {
    writeln!(out, "'{key}' => {offset}").map_err(|source| Error::Read {
        path: index_path.to_path_buf(),
        source,
    })
}

/// Extract `attr="value"` from one XML tag line.
fn extract_attr(line: &str, attr: &str) -> Option<String> {
    let needle = format!("{attr}=\"");
    let start = line.find(&needle)? + needle.len();
    let end = line[start..].find('"')? + start;
    Some(line[start..end].to_string())
}

/// Load a previously built index file into an in-memory key -> offset
/// map.
fn load_index(index_path: &std::path::Path) -> Result<Vec<(String, u64)>> {
    let file = open_file(index_path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| Error::Read {
            path: index_path.to_path_buf(),
            source,
        })?;
        let Some((key_part, offset_part)) = line.split_once(" => ") else {
            continue;
        };
        let key = key_part.trim().trim_matches('\'').to_string();
        if let Ok(offset) = offset_part.trim().parse::<u64>() {
            entries.push((key, offset));
        }
    }
    Ok(entries)
}

/// Look up `word` (Beta Code or Unicode Greek) in the LSJ, via the
/// offset index at `index_path`: strict key first, then fuzzy, then a
/// fuzzy-key prefix match.
pub fn lookup(
    xml_path: impl AsRef<std::path::Path>,
    index_path: impl AsRef<std::path::Path>,
    word: &str,
) -> Result<LsjEntry> {
    let xml_path = xml_path.as_ref();
    let index_path = index_path.as_ref();
    let lemma = word.split_whitespace().next().unwrap_or(word);
    let strict = normalize_strict(lemma);
    let fuzzy = normalize_fuzzy(lemma);

    let entries = load_index(index_path)?;
    let offset = entries
        .iter()
        .find(|(k, _)| *k == strict)
        .or_else(|| entries.iter().find(|(k, _)| *k == fuzzy))
        .or_else(|| entries.iter().find(|(k, _)| k.starts_with(&fuzzy)))
        .map(|(_, off)| *off)
        .ok_or_else(|| Error::LsjEntryNotFound {
            key: format!("{strict}/{fuzzy}"),
        })?;

    let mut file = open_file(xml_path)?;
    file.seek(SeekFrom::Start(offset))
        .map_err(|source| Error::Read {
            path: xml_path.to_path_buf(),
            source,
        })?;
    let mut tail = String::new();
    file.read_to_string(&mut tail).map_err(|source| Error::Read {
        path: xml_path.to_path_buf(),
        source,
    })?;

    let key = extract_attr(&tail, "key").unwrap_or_else(|| strict.clone());
    let entry_xml = extract_div2(&tail).unwrap_or(&tail);
    Ok(LsjEntry {
        key,
        text: process_sense(entry_xml),
    })
}

/// Extract the `<div2...>...</div2>` span starting at the beginning of
/// `tail` (the LSJ entry the index offset points at).
fn extract_div2(tail: &str) -> Option<&str> {
    let start = tail.find("<div2")?;
    let end = tail[start..].find("</div2>")? + start + "</div2>".len();
    Some(&tail[start..end])
}

/// Clean one LSJ entry's XML into readable prose: Greek `<foreign>`
/// spans are transcoded, `<sense>` starts a new bulleted paragraph,
/// remaining tags are stripped, and XML entities are decoded.
fn process_sense(xml: &str) -> String {
    let with_greek = replace_foreign_greek(xml);
    let with_breaks = with_greek
        .replace("<sense", "\n\n  \u{2022} <sense")
        .replace("</bibl>", " ")
        .replace("</cit>", " ");
    let stripped = strip_tags(&with_breaks);
    let decoded = stripped
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(collapse_spaces)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn replace_foreign_greek(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    let open_tag = "<foreign lang=\"greek\">";
    while let Some(start) = rest.find(open_tag) {
        out.push_str(&rest[..start]);
        let after = &rest[start + open_tag.len()..];
        let Some(close) = after.find("</foreign>") else {
            out.push_str(&rest[start..]);
            return out;
        };
        out.push_str(&betacode::to_greek(&after[..close]));
        rest = &after[close + "</foreign>".len()..];
    }
    out.push_str(rest);
    out
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_fixture(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tlgcorpus-lsj-{}-{}-{}",
            name,
            std::process::id(),
            COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
        ));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    static COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

    #[test]
    fn build_and_lookup_round_trip() {
        let xml = "<TEI>\n<div2 type=\"entry\" key=\"a)nh/r\">\n<orth>a)nh/r</orth>\n<sense>a man</sense>\n</div2>\n";
        let xml_path = write_fixture("xml", xml);
        let index_path = write_fixture("idt", "");

        build_index(&xml_path, &index_path).unwrap();
        let entry = lookup(&xml_path, &index_path, "a)nh/r").unwrap();
        assert_eq!(entry.key, "a)nh/r");
        assert!(entry.text.contains("a man"));

        let _ = std::fs::remove_file(&xml_path);
        let _ = std::fs::remove_file(&index_path);
    }

    #[test]
    fn extract_attr_reads_quoted_value() {
        assert_eq!(
            extract_attr(r#"<div2 type="entry" key="lo/gos">"#, "key"),
            Some("lo/gos".to_string())
        );
    }

    #[test]
    fn process_sense_strips_tags_and_transcodes_greek() {
        let xml = "<sense>A <foreign lang=\"greek\">lo/gos</foreign> is a word.</sense>";
        let text = process_sense(xml);
        assert!(text.contains("λόγος"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn missing_key_is_an_error() {
        let index_path = write_fixture("idt-empty", "'xyz' => 0\n");
        let xml_path = write_fixture("xml-empty", "<TEI></TEI>");
        let err = lookup(&xml_path, &index_path, "nonexistent").unwrap_err();
        assert!(matches!(err, Error::LsjEntryNotFound { .. }));
        let _ = std::fs::remove_file(&xml_path);
        let _ = std::fs::remove_file(&index_path);
    }
}
