use crate::error::{Error, Result};
use crate::index::{Index, SparseVector};
use crate::{DocPos, TermId};
use std::collections::HashMap;

/// A ranked document with its cosine similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    pub id: &'a str,
    pub pos: DocPos,
    pub score: f64,
}

/// Vectorize `query` with the index's tokenizer, vocabulary and idf.
/// Tokens outside the vocabulary are dropped.
pub fn query_vector(index: &Index, query: &str) -> SparseVector {
    let mut tf: HashMap<TermId, u32> = HashMap::new();
    for token in index.tokenizer().tokenize(query) {
        if let Some(tid) = index.term_index(&token) {
            *tf.entry(tid).or_insert(0) += 1;
        }
    }
    SparseVector::from_entries(
        tf.into_iter()
            .map(|(tid, count)| (tid, f64::from(count) * index.idf(tid).unwrap_or(0.0))),
    )
}

/// Top `k` documents with strictly positive similarity, best first.
/// Equal scores keep corpus insertion order.
pub fn search_hits<'a>(index: &'a Index, query: &str, k: usize) -> Result<Vec<Hit<'a>>> {
    if k == 0 {
        return Err(Error::InvalidK);
    }
    let q = query_vector(index, query);
    let q_norm = q.norm();
    if q_norm == 0.0 {
        return Ok(Vec::new());
    }

    // Only documents sharing a term with the query can have a non-zero dot product.
    let mut dots: HashMap<DocPos, f64> = HashMap::new();
    for &(tid, q_w) in q.entries() {
        for p in index.postings(tid) {
            *dots.entry(p.doc).or_insert(0.0) += q_w * p.weight;
        }
    }

    let mut hits: Vec<Hit<'a>> = dots
        .into_iter()
        .filter_map(|(pos, dot)| {
            let d_norm = index.document_norm(pos).unwrap_or(0.0);
            // Rounding can push an exact match one ulp past 1.0.
            let score = if d_norm == 0.0 { 0.0 } else { (dot / (q_norm * d_norm)).min(1.0) };
            if score > 0.0 {
                index.document_id(pos).map(|id| Hit { id, pos, score })
            } else {
                None
            }
        })
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.pos.cmp(&b.pos)));
    hits.truncate(k);
    Ok(hits)
}

/// Ids of the `k` most similar documents, best first.
pub fn search(index: &Index, query: &str, k: usize) -> Result<Vec<String>> {
    Ok(search_hits(index, query, k)?
        .into_iter()
        .map(|hit| hit.id.to_string())
        .collect())
}
