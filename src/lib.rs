//! Reader for TLG/PHI Beta Code corpus archives.
//!
//! Three tightly coupled subsystems do the real work: the
//! [`betacode`] transcoder (Beta Code ASCII <-> Unicode Greek/Latin),
//! the [`idstate`] ID-byte state engine shared by the corpus parser and
//! the IDT decoder, and the [`corpus`] block-oriented stream parser
//! built on top of it. [`idt`] reads a corpus file's companion
//! metadata; [`normalize`] holds the key functions used by the
//! lemma/LSJ lookup adapters in [`morph`] and [`lsj`]; [`authtab`]
//! reads the global author table.

pub mod authtab;
pub mod betacode;
pub mod corpus;
pub mod error;
pub mod idstate;
pub mod idt;
pub mod lsj;
pub mod morph;
pub mod normalize;

pub use corpus::{Citation, ExtractWork, Parser};
pub use error::{Error, Result};
pub use idt::{CitationDef, Idt, WorkMetadata};
