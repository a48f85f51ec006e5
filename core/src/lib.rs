//! TF-IDF index builder and cosine-similarity search over a movie corpus.

pub mod corpus;
pub mod error;
pub mod index;
pub mod search;
pub mod tokenizer;

pub use corpus::{Corpus, Document};
pub use error::{Error, Result};
pub use index::{build_index, Index, IndexBuilder, IndexStats, Posting, SparseVector};
pub use search::{query_vector, search, search_hits, Hit};
pub use tokenizer::{tokenize, Tokenizer, TokenizerConfig};

/// Dense vocabulary index assigned to a distinct token.
pub type TermId = u32;
/// Position of a document in corpus insertion order.
pub type DocPos = u32;
