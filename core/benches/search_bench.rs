use criterion::{criterion_group, criterion_main, Criterion};
use moviefind_core::{build_index, search, tokenize, Corpus};

const PLOTS: &[&str] = &[
    "A retired hitman is pulled back into the criminal underworld after a personal loss.",
    "Two estranged sisters reunite on a road trip across the desert to scatter their father's ashes.",
    "A crew of astronauts travels through a wormhole in search of a new home for humanity.",
    "An aging magician and his rival compete to perform the ultimate illusion in Victorian London.",
    "A small-town detective investigates a string of murders tied to an old folk legend.",
];

fn corpus(n: usize) -> Corpus {
    let mut c = Corpus::new();
    for i in 0..n {
        c.add_document(format!("m{i}"), format!("{} Sequel {i}.", PLOTS[i % PLOTS.len()])).unwrap();
    }
    c
}

fn bench_tokenize(c: &mut Criterion) {
    let text = PLOTS.join(" ");
    c.bench_function("tokenize_plots", |b| b.iter(|| tokenize(&text)));
}

fn bench_build_and_search(c: &mut Criterion) {
    let corpus = corpus(5_000);
    c.bench_function("build_5k", |b| b.iter(|| build_index(&corpus).unwrap()));
    let idx = build_index(&corpus).unwrap();
    c.bench_function("search_5k", |b| b.iter(|| search(&idx, "detective murders in london", 10).unwrap()));
}

criterion_group!(benches, bench_tokenize, bench_build_and_search);
criterion_main!(benches);
