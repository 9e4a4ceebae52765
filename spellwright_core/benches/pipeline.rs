use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use spellwright_core::{Execution, SpellPipeline, Whisper};
use spellwright_lexicon::default_corpus;

fn bench_single_spell(c: &mut Criterion) {
    let corpus = Arc::new(default_corpus().unwrap());
    let whisper = Whisper::new("protect my home from harm").unwrap();
    let mut group = c.benchmark_group("generate_spell");
    for execution in [Execution::Sequential, Execution::Parallel] {
        let pipeline = SpellPipeline::new(Arc::clone(&corpus), execution);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{execution:?}")),
            &whisper,
            |b, w| b.iter(|| pipeline.generate_spell(black_box(w)).unwrap()),
        );
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let pipeline = SpellPipeline::new(Arc::new(default_corpus().unwrap()), Execution::Sequential);
    let mut group = c.benchmark_group("generate_batch");
    for n in [16usize, 256] {
        let whispers: Vec<Whisper> = (0..n)
            .map(|i| Whisper::new(&format!("guide me along the road {i}")).unwrap())
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &whispers, |b, ws| {
            b.iter(|| pipeline.generate_batch(black_box(ws)))
        });
    }
    group.finish();
}

fn bench_corpus_load(c: &mut Criterion) {
    c.bench_function("default_corpus", |b| b.iter(|| default_corpus().unwrap()));
}

criterion_group!(benches, bench_single_spell, bench_batch, bench_corpus_load);
criterion_main!(benches);
