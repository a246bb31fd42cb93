use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use protogen_options::{parameter::parse_parameter, resolve, ModuleMappings};

// ============================================================================
// Test Data
// ============================================================================

const EMPTY: &str = "";

const TYPICAL: &str = "FileNaming=DropPath,Visibility=Public,ReduceComments=Yes";

const FULL: &str = "FileNaming=PathToUnderscores, Visibility=Public, \
    MessageConformances=DecodableMessage, ReduceComments=No, SwiftLintDisabled=Yes, \
    SwiftProtobufModuleName=SwiftProtobuf";

fn mappings_source(entries: usize) -> String {
    let mut source = String::from("# generated\n");
    for i in 0..entries {
        source.push_str(&format!(
            "mapping {{\n  module_name: \"Module{i}\"\n  proto_file_path: \"dir{i}/a.proto\"\n  proto_file_path: [\"dir{i}/b.proto\", \"dir{i}/c.proto\"]\n}}\n"
        ));
    }
    source
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for (name, input) in [("empty", EMPTY), ("typical", TYPICAL), ("full", FULL)] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| parse_parameter(black_box(Some(input))))
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for (name, input) in [("empty", EMPTY), ("typical", TYPICAL), ("full", FULL)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| resolve(black_box(Some(input))).unwrap())
        });
    }
    group.finish();
}

fn bench_mappings(c: &mut Criterion) {
    let mut group = c.benchmark_group("module_mappings");
    for entries in [1usize, 50, 500] {
        let source = mappings_source(entries);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(entries), &source, |b, source| {
            b.iter(|| ModuleMappings::parse(black_box(source), "bench.asciipb", None).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_resolve, bench_mappings);
criterion_main!(benches);
