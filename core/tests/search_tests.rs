use moviefind_core::{build_index, search, search_hits, Corpus, Error, Index};
use std::collections::HashSet;
use std::sync::Arc;

fn corpus_from(docs: &[(&str, &str)]) -> Corpus {
    let mut corpus = Corpus::new();
    for (id, text) in docs {
        corpus.add_document(*id, *text).unwrap();
    }
    corpus
}

const MOVIES: &[(&str, &str)] = &[
    ("m1", "a thrilling space adventure"),
    ("m2", "a romantic city drama"),
    ("m3", "space pirates and romance"),
];

#[test]
fn space_adventure_ranks_m1_then_m3() {
    let idx = build_index(&corpus_from(MOVIES)).unwrap();
    assert_eq!(search(&idx, "space adventure", 2).unwrap(), vec!["m1", "m3"]);
    // m2 shares no term, so a larger k does not pull it in
    assert_eq!(search(&idx, "space adventure", 10).unwrap(), vec!["m1", "m3"]);
}

#[test]
fn repeated_runs_are_identical() {
    let first: Vec<_> = (0..5)
        .map(|_| {
            let idx = build_index(&corpus_from(MOVIES)).unwrap();
            search_hits(&idx, "romance in space", 3)
                .unwrap()
                .into_iter()
                .map(|h| (h.id.to_string(), h.score.to_bits()))
                .collect::<Vec<_>>()
        })
        .collect();
    assert!(first.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn permuting_insertion_keeps_the_result_set() {
    let docs = [
        ("m1", "a thrilling space adventure"),
        ("m2", "a romantic city drama"),
        ("m3", "space pirates and romance"),
        ("m4", "city heist thriller"),
    ];
    let mut reversed = docs;
    reversed.reverse();

    let a = build_index(&corpus_from(&docs)).unwrap();
    let b = build_index(&corpus_from(&reversed)).unwrap();
    let q = "space city adventure";
    let set_a: HashSet<_> = search(&a, q, 2).unwrap().into_iter().collect();
    let set_b: HashSet<_> = search(&b, q, 2).unwrap().into_iter().collect();
    assert_eq!(set_a, set_b);
}

#[test]
fn ties_follow_insertion_order() {
    let idx = build_index(&corpus_from(&[("b", "space opera"), ("a", "space opera"), ("c", "drama")])).unwrap();
    assert_eq!(search(&idx, "space", 3).unwrap(), vec!["b", "a"]);

    let idx = build_index(&corpus_from(&[("a", "space opera"), ("b", "space opera"), ("c", "drama")])).unwrap();
    assert_eq!(search(&idx, "space", 3).unwrap(), vec!["a", "b"]);
}

#[test]
fn never_returns_more_than_k() {
    let docs: Vec<(String, String)> = (0..20)
        .map(|i| (format!("m{i}"), format!("heist number {i} in the vault")))
        .chain(std::iter::once(("other".to_string(), "quiet pastoral film".to_string())))
        .collect();
    let idx = Index::from_documents(docs).unwrap();
    for k in 1..25 {
        let hits = search(&idx, "heist vault", k).unwrap();
        assert_eq!(hits.len(), k.min(20));
    }
}

#[test]
fn unknown_tokens_give_empty_result() {
    let idx = build_index(&corpus_from(MOVIES)).unwrap();
    assert!(search(&idx, "zombie western 42", 3).unwrap().is_empty());
    assert_eq!(search(&idx, "zombie", 0).unwrap_err(), Error::InvalidK);
}

#[test]
fn document_is_most_similar_to_itself() {
    let idx = build_index(&corpus_from(&[
        ("noir", "rain soaked detective chases a femme fatale"),
        ("kids", "cartoon puppy learns to sing"),
        ("mixed", "detective puppy"),
    ]))
    .unwrap();
    let hits = search_hits(&idx, "rain soaked detective chases a femme fatale", 3).unwrap();
    assert_eq!(hits[0].id, "noir");
    assert!((hits[0].score - 1.0).abs() < 1e-9);
    // "kids" shares no token with the query
    assert!(hits.iter().all(|h| h.id != "kids"));
}

#[test]
fn empty_corpus_fails_to_build() {
    assert_eq!(build_index(&Corpus::new()).unwrap_err(), Error::EmptyCorpus);
    let none: Vec<(String, String)> = Vec::new();
    assert_eq!(Index::from_documents(none).unwrap_err(), Error::EmptyCorpus);
}

#[test]
fn concurrent_searches_share_one_index() {
    let idx = Arc::new(build_index(&corpus_from(MOVIES)).unwrap());
    std::thread::scope(|s| {
        for _ in 0..8 {
            let idx = Arc::clone(&idx);
            s.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(search(&idx, "space adventure", 2).unwrap(), vec!["m1", "m3"]);
                }
            });
        }
    });
}

#[test]
fn documents_without_weight_never_score() {
    let idx = build_index(&corpus_from(&[
        ("blank", ""),
        ("punct", "!!! ... ?"),
        ("common", "film"),
        ("noir", "film noir"),
        ("comedy", "film comedy"),
    ]))
    .unwrap();
    assert_eq!(idx.document_norm(0), Some(0.0));
    assert_eq!(idx.document_norm(1), Some(0.0));

    for q in ["film noir", "comedy", "noir comedy film"] {
        let hits = search_hits(&idx, q, 10).unwrap();
        assert!(!hits.is_empty());
        for hit in &hits {
            assert!(hit.score.is_finite() && hit.score > 0.0 && hit.score <= 1.0);
            assert!(!matches!(hit.id, "blank" | "punct"));
        }
    }
}

#[test]
fn term_shared_by_every_document_matches_nothing() {
    let idx = build_index(&corpus_from(&[("a", "film noir"), ("b", "film comedy")])).unwrap();
    assert!(search(&idx, "film", 5).unwrap().is_empty());
}

#[test]
fn single_document_corpus_yields_empty_results() {
    let idx = build_index(&corpus_from(&[("only", "a lonely space station")])).unwrap();
    assert_eq!(search(&idx, "space station", 3).unwrap(), Vec::<String>::new());
    assert_eq!(search(&idx, "lonely", 1), Ok(Vec::new()));
}

#[test]
fn exact_match_score_is_capped_at_one() {
    let idx = build_index(&corpus_from(&[
        ("film1", "film noir"),
        ("film2", "film comedy"),
        ("blank", ""),
    ]))
    .unwrap();
    let hits = search_hits(&idx, "film noir", 10).unwrap();
    assert_eq!(hits[0].id, "film1");
    assert!(hits[0].score <= 1.0);
    assert!((hits[0].score - 1.0).abs() < 1e-12);
}
