//! Benchmarks for schema parsing and route extraction.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use protoroute::parser::lexer::Lexer;
use protoroute::{extract_routes, parse, ExtractConfig};

// ============================================================================
// Schema Generation
// ============================================================================

/// Build a schema with `services` services of eight methods each, with
/// messages and enums interleaved for the parser to skip.
fn generate_schema(services: usize) -> String {
    let mut schema = String::from("syntax = \"proto3\";\npackage bench.v1;\n\n");
    for s in 0..services {
        schema.push_str(&format!("// Service number {s}\nservice Service{s} {{\n"));
        for m in 0..8 {
            let verb = ["get", "post", "put", "delete", "patch"][m % 5];
            schema.push_str(&format!(
                "  // Method {m} of service {s}\n  \
                 rpc Method{m} (Request{s}) returns (stream Response{s}) {{\n    \
                 option (google.api.http) = {{\n      \
                 {verb}: \"/v1/service{s}/method{m}/{{id}}\"\n      \
                 body: \"*\"\n    }};\n  }}\n"
            ));
        }
        schema.push_str("}\n\n");
        schema.push_str(&format!(
            "message Request{s} {{\n  string id = 1;\n  map<string, int64> tags = 2;\n  \
             message Nested {{ repeated int32 values = 1 [packed = true]; }}\n}}\n\n\
             enum Kind{s} {{ KIND_UNSPECIFIED = 0; KIND_A = 1; }}\n\n"
        ));
    }
    schema
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for services in [1, 16, 128] {
        let schema = generate_schema(services);
        group.throughput(Throughput::Bytes(schema.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(services), &schema, |b, schema| {
            b.iter(|| Lexer::new(black_box(schema)).tokenize().unwrap())
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for services in [1, 16, 128] {
        let schema = generate_schema(services);
        group.throughput(Throughput::Bytes(schema.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(services), &schema, |b, schema| {
            b.iter(|| parse(black_box(schema)).unwrap())
        });
    }
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let config = ExtractConfig::default();
    let mut group = c.benchmark_group("extract_routes");
    for services in [1, 16, 128] {
        let definition = parse(&generate_schema(services)).unwrap();
        group.throughput(Throughput::Elements((services * 8) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(services),
            &definition,
            |b, definition| b.iter(|| extract_routes(black_box(definition), &config)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_extract);
criterion_main!(benches);
