//! Integration tests over synthesized fixture bytes.
//!
//! Unit tests colocated with each module cover the fine-grained cases;
//! this file exercises the public crate API end to end, the way a
//! caller of the library would.

use quickcheck::quickcheck;
use tlgcorpus::betacode::{to_beta_code, to_greek, to_latin};
use tlgcorpus::idt::Idt;
use tlgcorpus::normalize::{normalize_fuzzy, normalize_id, normalize_strict};
use tlgcorpus::Parser;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn fixture(bytes: &[u8]) -> PathBuf {
    static COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "tlgcorpus-it-{}-{}.txt",
        std::process::id(),
        COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    ));
    File::create(&path).unwrap().write_all(bytes).unwrap();
    path
}

#[test]
fn normalize_scenarios() {
    assert_eq!(normalize_strict("a)/nqrwpos"), "anqrwpos");
    assert_eq!(normalize_fuzzy("a)/nqrwpos"), "anqrapas");
}

#[test]
fn transcode_scenarios() {
    assert_eq!(to_greek("lo/gos"), "λόγος");
    assert_eq!(to_greek("*lo/gos"), "Λόγος");
    assert_eq!(to_beta_code("ἄνθρωπος"), "a)/nqrwpos");
    assert!(to_latin("Plato").eq("Plato"));
}

#[test]
fn idt_records_title_and_citation_label() {
    // type 2 (new work): 02 [len:2] [block:2] EF 81 b0 b0 b1 FF ("001")
    let mut data = vec![2u8, 0, 0, 0, 0, 0xEF, 0x81, 0xB0, 0xB0, 0xB1, 0xFF];
    data.push(16);
    data.push(1);
    data.push(5);
    data.extend_from_slice(b"Iliad");
    data.push(17);
    data.push(3);
    data.push(4);
    data.extend_from_slice(b"Book");

    let idt = Idt::parse(&data);
    let work = idt.works.get("1").expect("work 1 present");
    assert_eq!(work.title, "Iliad");
    assert_eq!(work.citations[0].level, 'w');
    assert_eq!(work.citations[0].label, "Book");
    assert_eq!(normalize_id("001"), "1");
}

#[test]
fn list_works_then_extract_one() {
    // Work 1: "LOGOS" filler, then a `w`-level citation and a word.
    let mut bytes = vec![0xE1, 0x01];
    bytes.extend_from_slice(b"LOGOS");
    bytes.push(0xB1);
    bytes.extend_from_slice(b"*a)/nqrwpos ");
    bytes.push(0xFE);
    let path = fixture(&bytes);

    let mut parser = Parser::open(&path).unwrap();
    let works = parser.list_works().unwrap();
    assert_eq!(works, vec![("1".to_string(), "(Unknown Title)".to_string())]);

    let mut parser = Parser::open(&path).unwrap();
    let lines: Vec<_> = parser.extract_work("1").unwrap().collect();
    assert!(lines.iter().any(|(c, t)| c.0.starts_with('1') && t.contains("Ἄνθρωπος")));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn extract_work_with_idt_titles_unknown_ids_are_skipped() {
    let mut bytes = vec![0xE1, 0x02]; // work 2, not 1
    bytes.extend_from_slice(b"other ");
    bytes.push(0xFE);
    let path = fixture(&bytes);

    let mut parser = Parser::open(&path).unwrap();
    let lines: Vec<_> = parser.extract_work("1").unwrap().collect();
    assert!(lines.is_empty());

    let _ = std::fs::remove_file(&path);
}

quickcheck! {
    fn idempotent_to_greek(s: String) -> bool {
        // Restrict to the Beta Code alphabet, excluding the command heads
        // ($ & @ { } < " [ ] % #): several of their escapes emit a bare
        // command-head glyph (e.g. `#18` -> "<", `[3` -> "{", `"1` -> `"`)
        // that a second pass would re-interpret as a fresh escape, which
        // is not idempotent. Plain letters, diacritics, and digits are.
        let beta: String = s
            .chars()
            .filter(|c| c.is_ascii() && !"$&@{}<\"[]%#".contains(*c))
            .collect();
        let once = to_greek(&beta);
        let twice = to_greek(&once);
        once == twice
    }

    fn normalize_id_roundtrips_decimal(n: u32) -> bool {
        let padded = format!("{n:010}");
        normalize_id(&padded) == n.to_string()
    }
}
