//! Benchmarks for document scanning throughput.

use std::io::Cursor;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use stencil_engine::Parser;

/// Generate a manifest with the given number of service entries.
fn generate_manifest(entries: usize, with_directives: bool) -> String {
    let mut doc = String::with_capacity(entries * 96);
    doc.push_str("services:\n");
    for i in 0..entries {
        doc.push_str(&format!("  - name: service-{i}\n"));
        if with_directives {
            doc.push_str("    password: <@generateRandomString(<24>)>\n");
            doc.push_str(&format!("    label: <entry {i}| upper>\n"));
        } else {
            doc.push_str("    password: static-password\n");
            doc.push_str(&format!("    label: entry {i}\n"));
        }
    }
    doc
}

fn parse(doc: &str) {
    let mut parser = Parser::new(Cursor::new(doc.as_bytes().to_vec()), Vec::new())
        .with_function_call_limit(None);
    parser.parse().expect("benchmark document should parse");
}

fn bench_literal_passthrough(c: &mut Criterion) {
    let doc = generate_manifest(100, false);

    let mut group = c.benchmark_group("passthrough");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("literal_100_entries", |b| b.iter(|| parse(&doc)));
    group.finish();
}

fn bench_directive_evaluation(c: &mut Criterion) {
    let doc = generate_manifest(100, true);

    let mut group = c.benchmark_group("directives");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("generated_100_entries", |b| b.iter(|| parse(&doc)));
    group.finish();
}

criterion_group!(
    benches,
    bench_literal_passthrough,
    bench_directive_evaluation
);
criterion_main!(benches);
