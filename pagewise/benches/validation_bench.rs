//! Benchmarks for page validation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagewise::paging::Page;
use pagewise::testing::{sample_search_catalogue, video_service};
use pagewise::validation::ValidationEngine;

fn validation_benchmark(c: &mut Criterion) {
    let Ok(service) = video_service() else {
        return;
    };
    let page = Page::from_items(sample_search_catalogue("pewdiepie"), None);
    let engine = ValidationEngine::default();

    c.bench_function("validate_search_page", |b| {
        b.iter(|| black_box(engine.validate_page(&service, black_box(&page)).is_ok()))
    });
}

criterion_group!(benches, validation_benchmark);
criterion_main!(benches);
