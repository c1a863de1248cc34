//! The block-oriented corpus stream parser.
//!
//! Drives the shared ID-byte state engine ([`crate::idstate`]) over 8 KiB
//! blocks of a TLG/PHI corpus file. High-bit bytes update the citation
//! state; low-bit bytes accumulate into text runs that are transcoded
//! and paired with the citation active at the moment they were read.

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::betacode;
use crate::error::{open_file, Error, Result};
use crate::idstate::{decode_id_byte, ByteCursor, ByteOutcome, Level, Levels};
use crate::idt::{Idt, WorkMetadata};
use crate::normalize::normalize_id;

const BLOCK_SIZE: usize = 8192;

/// Default citation-level order when a work declares no IDT citation
/// labels.
const DEFAULT_CITATION_ORDER: [char; 4] = ['w', 'x', 'y', 'z'];

/// A formatted citation label for one emitted text run, e.g. `"1.42"`
/// for Book 1, Line 42.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation(pub String);

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cursor over the currently loaded block, tracking whether a read
/// ran past the bytes actually filled by the last `read` call (the
/// "short block" condition).
struct BlockCursor<'p> {
    buf: &'p [u8],
    pos: &'p mut usize,
    short: bool,
}

impl ByteCursor for BlockCursor<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let Some(&b) = self.buf.get(*self.pos) else {
            self.short = true;
            return None;
        };
        *self.pos += 1;
        Some(b)
    }
}

/// A streaming reader over one TLG/PHI corpus file.
///
/// Owns the open file handle, the 8 KiB read buffer, the intra-buffer
/// position, and the full ID-level state. One `Parser` is created per
/// extraction; call [`Parser::reset`] to reuse it for another pass.
pub struct Parser {
    path: PathBuf,
    file: File,
    buf: [u8; BLOCK_SIZE],
    len: usize,
    pos: usize,
    levels: Levels,
    is_latin_file: bool,
    idt: Option<Idt>,
}

impl Parser {
    /// Open `path` for extraction. Latin-ness is detected from the file
    /// basename (`LAT`/`CIV`/`PHI` prefix,
    /// case-insensitive).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = open_file(path)?;
        Ok(Parser {
            path: path.to_path_buf(),
            file,
            buf: [0u8; BLOCK_SIZE],
            len: 0,
            pos: 0,
            levels: Levels::new(),
            is_latin_file: is_latin_basename(path),
            idt: None,
        })
    }

    /// Attach IDT metadata (titles, citation-level labels) for this
    /// corpus file, used by [`Parser::list_works`] titles and
    /// [`Parser::extract_work`] citation ordering.
    pub fn with_idt(mut self, idt: Idt) -> Self {
        self.idt = Some(idt);
        self
    }

    /// Rewind the file and clear all ID-level state (the parser
    /// context" lifecycle).
    pub fn reset(&mut self) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(0))
            .map_err(|source| Error::Read {
                path: self.path.clone(),
                source,
            })?;
        self.levels.reset_all();
        self.len = 0;
        self.pos = 0;
        Ok(())
    }

    fn read_block(&mut self) -> Result<usize> {
        let n = self.file.read(&mut self.buf).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })?;
        self.len = n;
        self.pos = 0;
        Ok(n)
    }

    /// List every distinct work `id` seen while the `b` level is active
    /// (ordering = order of first appearance), paired with its title
    /// from the attached IDT metadata, or `(Unknown Title)` if absent.
    pub fn list_works(&mut self) -> Result<Vec<(String, String)>> {
        self.reset()?;
        let mut ids = Vec::new();
        let mut seen = std::collections::HashSet::new();

        loop {
            let n = self.read_block()?;
            if n == 0 {
                break;
            }
            while self.pos < self.len {
                let b = self.buf[self.pos];
                self.pos += 1;
                if b & 0x80 != 0 {
                    if decode_high_bit(b, &self.buf, self.len, &mut self.pos, &mut self.levels)
                        == ByteOutcome::StopBlock
                    {
                        self.pos = self.len;
                    }
                    continue;
                }
                // Skip the text run itself; list_works only cares about
                // the work id, which only ID bytes can change.
                while self.pos < self.len && self.buf[self.pos] & 0x80 == 0 {
                    self.pos += 1;
                }
                let work = self.levels.get(Level::B);
                if !work.active {
                    continue;
                }
                let id = self.levels.current_work_id();
                if id != "0" && seen.insert(id.clone()) {
                    ids.push(id);
                }
            }
        }

        let idt = self.idt.as_ref();
        Ok(ids
            .into_iter()
            .map(|id| {
                let title = idt
                    .and_then(|idt| idt.works.get(&id))
                    .map(|w| w.title.clone())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "(Unknown Title)".to_string());
                (id, title)
            })
            .collect())
    }

    /// Stream the text of a single work, identified by `target_id`
    /// (string-equal or parsed-integer-equal).
    /// Stops at the first point the `b` id leaves the target after
    /// having entered it (single contiguous work assumption).
    pub fn extract_work(&mut self, target_id: &str) -> Result<ExtractWork<'_>> {
        self.reset()?;
        Ok(ExtractWork {
            parser: self,
            target: normalize_id(target_id),
            entered: false,
            done: false,
        })
    }
}

fn is_latin_basename(path: &Path) -> bool {
    let Some(stem) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let upper = stem.to_ascii_uppercase();
    ["LAT", "CIV", "PHI"]
        .iter()
        .any(|prefix| upper.starts_with(prefix))
}

/// Decode one high-bit byte against `buf[..len]`, advancing `*pos`,
/// logging (and tolerating) a short block.
fn decode_high_bit(b: u8, buf: &[u8], len: usize, pos: &mut usize, levels: &mut Levels) -> ByteOutcome {
    let mut cursor = BlockCursor {
        buf: &buf[..len],
        pos,
        short: false,
    };
    let outcome = decode_id_byte(b, &mut cursor, levels);
    if cursor.short {
        log::warn!("short block: opcode {b:#04x} operand ran past the buffer, resynchronizing");
    }
    outcome
}

/// Streaming iterator over `(Citation, String)` pairs for one work,
/// returned by [`Parser::extract_work`] (streaming text runs
/// design note: callers can print as they go, no unbounded buffer).
pub struct ExtractWork<'p> {
    parser: &'p mut Parser,
    target: String,
    entered: bool,
    done: bool,
}

impl Iterator for ExtractWork<'_> {
    type Item = (Citation, String);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if self.parser.pos >= self.parser.len {
                let n = match self.parser.read_block() {
                    Ok(n) => n,
                    Err(_) => {
                        self.done = true;
                        return None;
                    }
                };
                if n == 0 {
                    self.done = true;
                    return None;
                }
            }

            while self.parser.pos < self.parser.len {
                let b = self.parser.buf[self.parser.pos];
                self.parser.pos += 1;

                if b & 0x80 != 0 {
                    let outcome = decode_high_bit(
                        b,
                        &self.parser.buf,
                        self.parser.len,
                        &mut self.parser.pos,
                        &mut self.parser.levels,
                    );
                    if outcome == ByteOutcome::StopBlock {
                        self.parser.pos = self.parser.len;
                        break;
                    }
                    let current = self.parser.levels.current_work_id();
                    if current == self.target {
                        self.entered = true;
                    } else if self.entered {
                        self.done = true;
                        return None;
                    }
                    continue;
                }

                let start = self.parser.pos;
                while self.parser.pos < self.parser.len && self.parser.buf[self.parser.pos] & 0x80 == 0 {
                    self.parser.pos += 1;
                }
                if self.parser.levels.current_work_id() != self.target {
                    continue;
                }
                let text = strip_nul(&self.parser.buf[start..self.parser.pos]);
                if text.is_empty() {
                    continue;
                }
                let out = if self.parser.is_latin_file {
                    betacode::to_latin(&text)
                } else {
                    betacode::to_greek(&text)
                };
                if out.trim().is_empty() {
                    continue;
                }
                let work = self.parser.idt.as_ref().and_then(|idt| idt.works.get(&self.target));
                let citation = Citation(format_citation(&self.parser.levels, work));
                return Some((citation, out));
            }
        }
    }
}

fn strip_nul(bytes: &[u8]) -> String {
    let cleaned: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
    String::from_utf8_lossy(&cleaned).into_owned()
}

/// Format the current citation tuple from the active levels (spec
/// §4.4 "Citation formatting"), preferring the work's declared IDT
/// citation-level order when present.
fn format_citation(levels: &Levels, work: Option<&WorkMetadata>) -> String {
    let order: Vec<char> = match work {
        Some(w) if !w.citations.is_empty() => w.citations.iter().map(|c| c.level).collect(),
        _ => DEFAULT_CITATION_ORDER.to_vec(),
    };

    let mut parts = Vec::new();
    for ch in order {
        let Some(level) = level_from_char(ch) else {
            continue;
        };
        let st = levels.get(level);
        if !st.active {
            continue;
        }
        let part = if st.binary > 0 {
            let bytes = st.ascii.as_bytes();
            if bytes.len() == 1 && (b'a'..=b'e').contains(&bytes[0]) && st.binary < 10 {
                char::from(bytes[0] + st.binary as u8).to_string()
            } else {
                format!("{}{}", st.binary, st.ascii)
            }
        } else {
            st.ascii.clone()
        };
        if !part.is_empty() {
            parts.push(part);
        }
    }

    if parts.is_empty() {
        return levels.get(Level::Z).ascii.clone();
    }
    parts.join(".")
}

fn level_from_char(ch: char) -> Option<Level> {
    Level::ALL.into_iter().find(|l| l.letter() == ch)
}
