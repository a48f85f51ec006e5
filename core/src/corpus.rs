use crate::error::{Error, Result};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub text: String,
}

/// Ordered collection of documents, unique by id.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    docs: Vec<Document>,
    ids: HashSet<String>,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    /// Append a document. A repeated id is rejected and the corpus is left untouched.
    pub fn add_document(&mut self, id: impl Into<String>, text: impl Into<String>) -> Result<()> {
        let id = id.into();
        if self.ids.contains(&id) {
            return Err(Error::DuplicateDocumentId(id));
        }
        self.ids.insert(id.clone());
        self.docs.push(Document { id, text: text.into() });
        Ok(())
    }

    /// `(id, text)` pairs in insertion order. Each call starts a fresh pass.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.docs.iter().map(|d| (d.id.as_str(), d.text.as_str()))
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

impl TryFrom<Vec<Document>> for Corpus {
    type Error = Error;

    fn try_from(docs: Vec<Document>) -> Result<Self> {
        let mut corpus = Corpus::new();
        for doc in docs {
            corpus.add_document(doc.id, doc.text)?;
        }
        Ok(corpus)
    }
}
