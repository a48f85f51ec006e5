use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::tokenizer::{Tokenizer, TokenizerConfig};
use crate::{DocPos, TermId};
use serde::Serialize;
use std::collections::HashMap;

/// Non-zero weights keyed by term id, sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f64)>,
}

impl SparseVector {
    /// Zero weights are dropped; the rest are sorted by term id.
    pub fn from_entries(entries: impl IntoIterator<Item = (TermId, f64)>) -> Self {
        let mut entries: Vec<(TermId, f64)> = entries.into_iter().filter(|(_, w)| *w != 0.0).collect();
        entries.sort_unstable_by_key(|(t, _)| *t);
        Self { entries }
    }

    pub fn entries(&self) -> &[(TermId, f64)] { &self.entries }

    pub fn get(&self, term: TermId) -> Option<f64> {
        self.entries
            .binary_search_by_key(&term, |(t, _)| *t)
            .ok()
            .map(|i| self.entries[i].1)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, (_, w)| acc + w * w).sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            if ta == tb {
                sum += wa * wb;
                i += 1;
                j += 1;
            } else if ta < tb {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub doc: DocPos,
    pub weight: f64, // raw tf * idf, not normalized
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub num_docs: usize,
    pub num_terms: usize,
    pub num_postings: usize,
}

/// Immutable TF-IDF index. Build a new one to pick up corpus changes.
#[derive(Debug, Clone)]
pub struct Index {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, TermId>,
    df: Vec<u32>,
    idf: Vec<f64>,
    doc_ids: Vec<String>,
    vectors: Vec<SparseVector>,
    norms: Vec<f64>,
    postings: Vec<Vec<Posting>>, // indexed by term id, sorted by doc position
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexBuilder {
    tokenizer: TokenizerConfig,
}

impl IndexBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn tokenizer(mut self, config: TokenizerConfig) -> Self {
        self.tokenizer = config;
        self
    }

    pub fn build(&self, corpus: &Corpus) -> Result<Index> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let _: DocPos = checked_id(corpus.len())?;
        let tokenizer = Tokenizer::new(self.tokenizer);

        // Pass 1: vocabulary in first-seen order, raw term counts, document frequency.
        let mut vocabulary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        let mut doc_ids: Vec<String> = Vec::with_capacity(corpus.len());
        let mut term_counts: Vec<Vec<(TermId, u32)>> = Vec::with_capacity(corpus.len());
        for (id, text) in corpus.documents() {
            let mut tf: HashMap<TermId, u32> = HashMap::new();
            for token in tokenizer.tokenize(text) {
                let next_id: TermId = checked_id(vocabulary.len())?;
                let tid = *vocabulary.entry(token).or_insert_with(|| {
                    df.push(0);
                    next_id
                });
                *tf.entry(tid).or_insert(0) += 1;
            }
            for tid in tf.keys() {
                df[*tid as usize] += 1;
            }
            let mut counts: Vec<(TermId, u32)> = tf.into_iter().collect();
            counts.sort_unstable_by_key(|(t, _)| *t);
            doc_ids.push(id.to_string());
            term_counts.push(counts);
        }

        // Every term was assigned from an observed occurrence, so df >= 1.
        let n = doc_ids.len() as f64;
        let idf: Vec<f64> = df.iter().map(|&d| (n / f64::from(d.max(1))).ln()).collect();

        // Pass 2: weighted vectors, norms and postings.
        let mut vectors = Vec::with_capacity(term_counts.len());
        let mut norms = Vec::with_capacity(term_counts.len());
        let mut postings: Vec<Vec<Posting>> = vec![Vec::new(); df.len()];
        for (pos, counts) in (0..).zip(term_counts) {
            let vector = SparseVector::from_entries(
                counts.into_iter().map(|(t, c)| (t, f64::from(c) * idf[t as usize])),
            );
            for &(t, weight) in vector.entries() {
                postings[t as usize].push(Posting { doc: pos, weight });
            }
            norms.push(vector.norm());
            vectors.push(vector);
        }

        let index = Index { tokenizer, vocabulary, df, idf, doc_ids, vectors, norms, postings };
        tracing::debug!(num_docs = index.num_docs(), num_terms = index.num_terms(), "built tf-idf index");
        Ok(index)
    }
}

/// Document positions and term ids are `u32`; larger corpora are rejected, not wrapped.
fn checked_id(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| Error::IndexTooLarge)
}

/// Build with the default tokenizer.
pub fn build_index(corpus: &Corpus) -> Result<Index> {
    IndexBuilder::new().build(corpus)
}

impl Index {
    /// Ingest a stream of `(id, text)` pairs and build with the default tokenizer.
    pub fn from_documents<I, K, V>(docs: I) -> Result<Index>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut corpus = Corpus::new();
        for (id, text) in docs {
            corpus.add_document(id, text)?;
        }
        build_index(&corpus)
    }

    /// The tokenizer documents were indexed with. Queries must go through it too.
    pub fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    pub fn num_docs(&self) -> usize { self.doc_ids.len() }

    pub fn num_terms(&self) -> usize { self.df.len() }

    pub fn term_index(&self, token: &str) -> Option<TermId> {
        self.vocabulary.get(token).copied()
    }

    pub fn document_frequency(&self, term: TermId) -> Option<u32> {
        self.df.get(term as usize).copied()
    }

    pub fn idf(&self, term: TermId) -> Option<f64> {
        self.idf.get(term as usize).copied()
    }

    pub fn document_id(&self, pos: DocPos) -> Option<&str> {
        self.doc_ids.get(pos as usize).map(String::as_str)
    }

    pub fn document_ids(&self) -> &[String] { &self.doc_ids }

    pub fn document_vector(&self, pos: DocPos) -> Option<&SparseVector> {
        self.vectors.get(pos as usize)
    }

    pub fn document_norm(&self, pos: DocPos) -> Option<f64> {
        self.norms.get(pos as usize).copied()
    }

    pub fn postings(&self, term: TermId) -> &[Posting] {
        self.postings.get(term as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_docs: self.num_docs(),
            num_terms: self.num_terms(),
            num_postings: self.postings.iter().map(Vec::len).sum(),
        }
    }
}
