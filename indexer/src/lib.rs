//! Corpus feed: reads movie records from JSON / JSONL files and turns them into
//! a [`Corpus`] plus the title catalog used to present search results.

use anyhow::{bail, Context, Result};
use clap::Args;
use moviefind_core::{Corpus, TokenizerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Deserialize)]
pub struct InputDoc {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "body", alias = "description")]
    pub text: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
    pub link: Option<String>,
}

/// Title lookup keyed by document id.
#[derive(Debug, Clone, Default)]
pub struct MovieCatalog {
    records: HashMap<String, MovieRecord>,
}

impl MovieCatalog {
    pub fn get(&self, id: &str) -> Option<&MovieRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

/// Tokenizer switches shared by every command that builds an index.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct TokenizerArgs {
    /// Apply NFKC unicode normalization before lower-casing
    #[arg(long, default_value_t = false)]
    pub nfkc: bool,
    /// Drop common English stop words
    #[arg(long, default_value_t = false)]
    pub stopwords: bool,
    /// Apply English stemming
    #[arg(long, default_value_t = false)]
    pub stem: bool,
}

impl From<TokenizerArgs> for TokenizerConfig {
    fn from(args: TokenizerArgs) -> Self {
        TokenizerConfig { normalize_unicode: args.nfkc, remove_stopwords: args.stopwords, stem: args.stem }
    }
}

/// Read every record under `input` (a file or a directory walked in file-name order).
pub fn load_documents(input: impl AsRef<Path>) -> Result<Vec<InputDoc>> {
    let input = input.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter() {
            let entry = entry.with_context(|| format!("walking {}", input.display()))?;
            let p = entry.path();
            if !p.is_file() { continue; }
            match p.extension().and_then(|s| s.to_str()) {
                Some("json" | "jsonl") => files.push(p.to_path_buf()),
                _ => tracing::warn!(path = %p.display(), "skipping non-json file"),
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        bail!("input path {} does not exist", input.display());
    }

    let mut docs = Vec::new();
    for file in &files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(file, &mut docs)?;
        } else {
            read_json(file, &mut docs)?;
        }
    }
    tracing::info!(files = files.len(), docs = docs.len(), "loaded corpus feed");
    Ok(docs)
}

fn read_jsonl(file: &Path, out: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    for (lineno, line) in BufReader::new(f).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid record", file.display(), lineno + 1))?;
        out.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, out: &mut Vec<InputDoc>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("{}: invalid json", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                out.push(serde_json::from_value::<InputDoc>(v).with_context(|| format!("{}: invalid record", file.display()))?);
            }
        }
        serde_json::Value::Object(_) => {
            out.push(serde_json::from_value::<InputDoc>(json).with_context(|| format!("{}: invalid record", file.display()))?);
        }
        _ => bail!("{}: expected an object or an array of objects", file.display()),
    }
    Ok(())
}

/// Feed records into a corpus in order. A repeated id aborts the whole load.
pub fn build_corpus(docs: Vec<InputDoc>) -> Result<(Corpus, MovieCatalog)> {
    let mut corpus = Corpus::new();
    let mut catalog = MovieCatalog::default();
    for doc in docs {
        corpus
            .add_document(doc.id.clone(), doc.text)
            .with_context(|| format!("ingesting movie {:?}", doc.title))?;
        catalog.records.insert(
            doc.id.clone(),
            MovieRecord { id: doc.id, title: doc.title, link: doc.link },
        );
    }
    Ok((corpus, catalog))
}

pub fn load_corpus(input: impl AsRef<Path>) -> Result<(Corpus, MovieCatalog)> {
    build_corpus(load_documents(input)?)
}
