use criterion::{criterion_group, criterion_main, Criterion};
use simusearch_core::tokenizer::{tokenize, tokenize_raw};

const TEXT: &str = "Sistem temu kembali informasi mengolah kumpulan dokumen dan memberikan \
    peringkat berdasarkan kemiripan. Information retrieval systems rank documents by \
    relevance to a query, using term weighting such as TF-IDF and BM25.";

fn bench_tokenize(c: &mut Criterion) {
    let text = TEXT.repeat(50);
    c.bench_function("tokenize_stemmed", |b| b.iter(|| tokenize(&text)));
    c.bench_function("tokenize_raw", |b| b.iter(|| tokenize_raw(&text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
