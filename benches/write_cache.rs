use commandwire::command::{ActionTable, CommandProcessor, Controller};
use commandwire::query_string::{QueryStringSerializer, WriteFnCache};
use commandwire::runtime_config::RuntimeConfig;
use commandwire::value::QueryValue;
use criterion::{criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use std::hint::black_box;

fn sample_map() -> IndexMap<String, Option<i64>> {
    (0..16)
        .map(|i| (format!("key{i}"), (i % 5 != 0).then_some(i * 1000)))
        .collect()
}

fn bench_cache_lookup(c: &mut Criterion) {
    let map = sample_map();
    let descriptor = map.descriptor();

    let warm = WriteFnCache::new();
    warm.get_write_fn(&descriptor);
    c.bench_function("write_fn_cache_hit", |b| {
        b.iter(|| black_box(warm.get_write_fn(black_box(&descriptor))))
    });

    c.bench_function("write_fn_cache_miss", |b| {
        b.iter(|| {
            let cold = WriteFnCache::new();
            black_box(cold.get_write_fn(black_box(&descriptor)))
        })
    });
}

fn bench_serialize(c: &mut Criterion) {
    let serializer = QueryStringSerializer::new();
    let map = sample_map();
    c.bench_function("serialize_16_pairs", |b| {
        b.iter(|| black_box(serializer.serialize_to_string(black_box(&map))))
    });

    let json = serde_json::json!({"a": 1, "b": [1, 2, 3], "c": {"x": "y z"}, "d": null});
    c.bench_function("serialize_json_object", |b| {
        b.iter(|| black_box(serializer.serialize_to_string(black_box(&json))))
    });
}

struct Sink;

impl Sink {
    fn take(&self, a: i64, b: String) {
        black_box((a, b));
    }
}

impl Controller for Sink {
    fn register_actions(actions: &mut ActionTable<Self>) {
        actions.action("Take", Sink::take);
    }
}

fn bench_invoke(c: &mut Criterion) {
    let processor = CommandProcessor::builder()
        .controller(Sink)
        .config(RuntimeConfig::default())
        .build();
    c.bench_function("invoke_two_args", |b| {
        b.iter(|| black_box(processor.invoke(black_box("Sink://Take/42/hello%20world"))))
    });
}

criterion_group!(benches, bench_cache_lookup, bench_serialize, bench_invoke);
criterion_main!(benches);
