use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Build attempted on a corpus with zero documents; idf is undefined for N = 0.
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,
    #[error("duplicate document id: {0}")]
    DuplicateDocumentId(String),
    #[error("k must be greater than zero")]
    InvalidK,
    /// More than `u32::MAX` documents or distinct terms.
    #[error("corpus exceeds the u32 document or term limit")]
    IndexTooLarge,
}

pub type Result<T> = std::result::Result<T, Error>;
