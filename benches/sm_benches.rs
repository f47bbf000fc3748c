use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sm::sm4_x4::ScalarBackend;
use sm::{BlockBackend, ChunkConfig, Direction, Sm4};

fn rand_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|_| rand::random::<u8>()).collect::<Vec<u8>>()
}

fn benchmark_sm3(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm3");

    for size in [1024usize, 4 * 1024 * 1024] {
        let random_bytes = rand_bytes(size);
        let bytes = random_bytes.as_slice();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |b, _| {
            b.iter(|| black_box(sm::sm3(bytes)));
        });

        let config = ChunkConfig::default();
        group.bench_with_input(BenchmarkId::new("chunked", size), &size, |b, _| {
            b.iter(|| black_box(sm::hash_chunked(bytes, &config)));
        });
    }

    group.finish();
}

fn benchmark_sm4(c: &mut Criterion) {
    let mut group = c.benchmark_group("sm4");
    let cipher = Sm4::new(&rand::random());
    let rk = *cipher.round_keys(Direction::Encrypt);
    let blocks: [[u8; 16]; 4] = rand::random();
    group.throughput(Throughput::Bytes(64));

    group.bench_function("encrypt_block", |b| {
        b.iter(|| black_box(cipher.encrypt_block(&blocks[0])));
    });

    group.bench_function("scalar_x4", |b| {
        b.iter(|| black_box(ScalarBackend.transform_x4(&blocks, &rk)));
    });

    let backend = sm::select_backend();
    group.bench_function(format!("{}_x4", backend.name()), |b| {
        b.iter(|| black_box(backend.transform_x4(&blocks, &rk)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_sm3, benchmark_sm4);
criterion_main!(benches);
