//! # Practice-Tracks Store Benchmarks
//!
//! | Path | Operation | Notes |
//! |------|-----------|-------|
//! | pt-01 FsArtifactStore | write | staged write + hard link, one fresh id per iteration |
//! | pt-01 FsArtifactStore | read | whole-file read of a stored archive |
//! | pt-01 EvictionSweeper | sweep_once | list + concurrent delete of expired entries |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pt_01_artifact_store::{
    ArtifactStore, EvictionSweeper, FsArtifactStore, IdGenerator, ManualTimeSource,
    SweeperConfig, UuidGenerator,
};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;
use tokio::runtime::Runtime;

const ARCHIVE_SIZES: [usize; 3] = [4 * 1024, 256 * 1024, 4 * 1024 * 1024];

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn ready_store(rt: &Runtime) -> (TempDir, Arc<FsArtifactStore>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FsArtifactStore::new(dir.path().join("downloads")));
    rt.block_on(store.ensure_ready()).unwrap();
    (dir, store)
}

fn bench_write(c: &mut Criterion) {
    let rt = runtime();
    let (_dir, store) = ready_store(&rt);

    let mut group = c.benchmark_group("pt-01-write");
    for size in ARCHIVE_SIZES {
        let archive = vec![0x5a_u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &archive, |b, archive| {
            b.to_async(&rt).iter(|| {
                let store = Arc::clone(&store);
                async move {
                    let id = UuidGenerator.generate();
                    store.write(&id, archive).await.unwrap();
                }
            })
        });
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let rt = runtime();
    let (_dir, store) = ready_store(&rt);

    let mut group = c.benchmark_group("pt-01-read");
    for size in ARCHIVE_SIZES {
        let id = UuidGenerator.generate();
        rt.block_on(store.write(&id, &vec![0xa5_u8; size])).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &id, |b, id| {
            b.to_async(&rt)
                .iter(|| async { black_box(store.read(id).await.unwrap().len()) })
        });
    }
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let rt = runtime();

    let mut group = c.benchmark_group("pt-01-sweep");
    group.sample_size(10);
    for count in [10_usize, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(BenchmarkId::new("evict_all", count), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let (_dir, store) = ready_store(&rt);
                    rt.block_on(async {
                        for _ in 0..count {
                            store.write(&UuidGenerator.generate(), b"zip").await.unwrap();
                        }
                    });

                    let clock = Arc::new(ManualTimeSource::new(SystemTime::now()));
                    clock.advance(Duration::from_secs(3600));
                    let sweeper =
                        EvictionSweeper::with_clock(store, clock, SweeperConfig::default());

                    let start = Instant::now();
                    let report = rt.block_on(sweeper.sweep_once()).unwrap();
                    total += start.elapsed();
                    assert_eq!(report.evicted_count(), count);
                }
                total
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_write, bench_read, bench_sweep);
criterion_main!(benches);
