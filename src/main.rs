//! CLI entry point: `list`, `extract`, `lsj-index`, `lemma`, `search`.
//!
//! Thin dispatch over the `tlgcorpus` library: a typed [`tlgcorpus::Error`]
//! at the library seam, `anyhow` for CLI-level context and friendly
//! `Display`. Exit codes: 0 on success, non-zero on missing file or
//! missing target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};

use tlgcorpus::{Idt, Parser as CorpusParser};

#[derive(ClapParser)]
#[command(name = "tlgcorpus", about = "Read TLG/PHI Beta Code corpus archives")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the works contained in a corpus file.
    List {
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        #[arg(short = 't', long = "idt")]
        idt: Option<PathBuf>,
    },
    /// Extract a single work's text by id.
    Extract {
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        #[arg(short = 'w', long = "work")]
        work: String,
        #[arg(short = 't', long = "idt")]
        idt: Option<PathBuf>,
    },
    /// Build an LSJ offset index from the dictionary XML.
    LsjIndex {
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        #[arg(short = 'o', long = "out")]
        out: PathBuf,
    },
    /// Look up a lemma's known forms in `greek-lemmata.txt`.
    Lemma {
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        #[arg(short = 'w', long = "word")]
        word: String,
    },
    /// Look up a word form in the LSJ via a prebuilt offset index.
    Search {
        #[arg(short = 'f', long = "file")]
        file: PathBuf,
        #[arg(short = 'i', long = "index")]
        index: PathBuf,
        #[arg(short = 'w', long = "word")]
        word: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::List { file, idt } => cmd_list(&file, idt.as_deref()),
        Command::Extract { file, work, idt } => cmd_extract(&file, &work, idt.as_deref()),
        Command::LsjIndex { file, out } => cmd_lsj_index(&file, &out),
        Command::Lemma { file, word } => cmd_lemma(&file, &word),
        Command::Search { file, index, word } => cmd_search(&file, &index, &word),
    }
}

fn load_idt(path: Option<&std::path::Path>) -> Result<Option<Idt>> {
    match path {
        Some(p) => {
            Ok(Some(Idt::read(p).with_context(|| format!("reading IDT file {}", p.display()))?))
        }
        None => Ok(None),
    }
}

fn cmd_list(file: &std::path::Path, idt: Option<&std::path::Path>) -> Result<()> {
    let mut parser =
        CorpusParser::open(file).with_context(|| format!("opening {}", file.display()))?;
    if let Some(idt) = load_idt(idt)? {
        parser = parser.with_idt(idt);
    }
    let works = parser.list_works().context("listing works")?;
    for (id, title) in works {
        println!("ID:{id:<4} | {title}");
    }
    Ok(())
}

fn cmd_extract(file: &std::path::Path, work: &str, idt: Option<&std::path::Path>) -> Result<()> {
    let mut parser =
        CorpusParser::open(file).with_context(|| format!("opening {}", file.display()))?;
    if let Some(idt) = load_idt(idt)? {
        parser = parser.with_idt(idt);
    }
    let mut any = false;
    for (citation, text) in parser.extract_work(work).context("extracting work")? {
        any = true;
        println!("{citation:<10} {text}");
    }
    if !any {
        return Err(tlgcorpus::Error::WorkNotFound {
            id: work.to_string(),
        }
        .into());
    }
    Ok(())
}

fn cmd_lsj_index(file: &std::path::Path, out: &std::path::Path) -> Result<()> {
    tlgcorpus::lsj::build_index(file, out)
        .with_context(|| format!("building LSJ index from {}", file.display()))?;
    println!("Indexed {} -> {}", file.display(), out.display());
    Ok(())
}

fn cmd_lemma(file: &std::path::Path, word: &str) -> Result<()> {
    let info = tlgcorpus::morph::lookup_lemma(file, word).context("looking up lemma")?;
    println!("Lemma: {} (ID: {})", info.lemma, info.id);
    println!("Known inflections and variants:");
    for form in info.forms {
        println!(" - {form}");
    }
    Ok(())
}

fn cmd_search(file: &std::path::Path, index: &std::path::Path, word: &str) -> Result<()> {
    let entry = tlgcorpus::lsj::lookup(file, index, word).context("searching LSJ")?;
    println!("[MATCH: {}]", tlgcorpus::betacode::to_greek(&entry.key));
    println!("{}", entry.text);
    Ok(())
}
