use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html::decode_entities;

fn bench_decode(c: &mut Criterion) {
    let literal = "P ∧ Q → ¬R ".repeat(256);
    let encoded = "P &and; Q &rarr; &not;R &#x2228; S &amp; ".repeat(256);
    let noisy = "&& &#; &unknown; &#xZZ; ".repeat(256);

    c.bench_function("decode_entities/literal", |b| {
        b.iter(|| decode_entities(black_box(&literal)))
    });
    c.bench_function("decode_entities/encoded", |b| {
        b.iter(|| decode_entities(black_box(&encoded)))
    });
    c.bench_function("decode_entities/noisy", |b| {
        b.iter(|| decode_entities(black_box(&noisy)))
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
