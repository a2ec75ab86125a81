use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::io::Read;
use xzdec::XzReader;

fn decode_all(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    XzReader::new(data)
        .read_to_end(&mut out)
        .expect("fixture decodes");
    out
}

fn bench_decode(c: &mut Criterion) {
    let lorem = include_bytes!("../test_files/good-lorem.xz");
    let elf = include_bytes!("../test_files/good-elf-x86.xz");

    let mut group = c.benchmark_group("decode");

    group.throughput(Throughput::Bytes(decode_all(lorem).len() as u64));
    group.bench_function("lorem", |b| b.iter(|| decode_all(lorem)));

    group.throughput(Throughput::Bytes(decode_all(elf).len() as u64));
    group.bench_function("elf-x86", |b| b.iter(|| decode_all(elf)));

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
