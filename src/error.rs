//! Crate-level error type.
//!
//! I/O errors keep the failing path; parse-level anomalies (unknown
//! opcode, malformed length) are *not* represented here, because they
//! are recovered locally by the parser (resync by one byte) rather than
//! surfaced to the caller. See `corpus::Parser` and `idt::Idt::read`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("short block: buffer exhausted mid-opcode at offset {at}")]
    ShortBlock { at: usize },

    #[error("no work with id {id} in corpus")]
    WorkNotFound { id: String },

    #[error("lemma not found: {lemma}")]
    LemmaNotFound { lemma: String },

    #[error("LSJ entry not found for key: {key}")]
    LsjEntryNotFound { key: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Open a file, mapping the "not found" case to [`Error::FileNotFound`]
/// and any other I/O error to [`Error::Read`].
pub(crate) fn open_file(path: &std::path::Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Error::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Read an entire file into memory, same error mapping as [`open_file`].
pub(crate) fn read_file(path: &std::path::Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Error::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
