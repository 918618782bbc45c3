//! Eviction against a real directory, with the clock under test control.

use pt_01_artifact_store::{
    ArtifactId, ArtifactStore, EvictionSweeper, FsArtifactStore, IdGenerator, ManualTimeSource,
    StoreError, SweeperConfig, UuidGenerator,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const WINDOW: Duration = Duration::from_secs(60);
const PERIOD: Duration = Duration::from_secs(60);

struct Fixture {
    _dir: TempDir,
    clock: Arc<ManualTimeSource>,
    store: Arc<FsArtifactStore>,
    sweeper: EvictionSweeper,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FsArtifactStore::new(dir.path().join("downloads")));
    store.ensure_ready().await.unwrap();
    let clock = Arc::new(ManualTimeSource::new(SystemTime::now()));
    let sweeper = EvictionSweeper::with_clock(
        store.clone(),
        clock.clone(),
        SweeperConfig {
            retention: WINDOW,
            period: PERIOD,
        },
    );
    Fixture {
        _dir: dir,
        clock,
        store,
        sweeper,
    }
}

async fn populate(store: &FsArtifactStore, count: usize, size: usize) -> Vec<ArtifactId> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        let id = UuidGenerator.generate();
        store.write(&id, &vec![n as u8; size]).await.unwrap();
        ids.push(id);
    }
    ids
}

#[tokio::test]
async fn test_sweep_with_no_eligible_entries_changes_nothing() {
    let f = fixture().await;
    let ids = populate(&f.store, 5, 16).await;

    f.clock.advance(WINDOW / 2);
    let report = f.sweeper.sweep_once().await.unwrap();

    assert_eq!(report.scanned, 5);
    assert!(report.is_noop());
    for (n, id) in ids.iter().enumerate() {
        assert_eq!(f.store.read(id).await.unwrap(), vec![n as u8; 16]);
    }
}

#[tokio::test]
async fn test_artifact_kept_through_window_and_gone_by_next_sweep() {
    let f = fixture().await;
    let ids = populate(&f.store, 1, 8).await;
    let id = ids[0];

    // Age slightly under the window: the sweep at this tick keeps it
    f.clock.advance(WINDOW - Duration::from_secs(1));
    f.sweeper.sweep_once().await.unwrap();
    assert!(f.store.exists(&id).await);

    // One period later it is past the window and goes
    f.clock.advance(PERIOD);
    let report = f.sweeper.sweep_once().await.unwrap();
    assert_eq!(report.evicted, vec![id]);
    assert_eq!(
        f.store.read(&id).await.unwrap_err(),
        StoreError::NotFound { id }
    );
}

#[tokio::test]
async fn test_entries_expire_only_once_past_the_window() {
    let f = fixture().await;
    let old = populate(&f.store, 3, 4).await;

    // File timestamps come from a coarse kernel clock; stay a second clear of
    // the boundary on either side
    f.clock.advance(WINDOW - Duration::from_secs(1));
    let report = f.sweeper.sweep_once().await.unwrap();
    assert!(report.is_noop());

    f.clock.advance(Duration::from_secs(2));
    let report = f.sweeper.sweep_once().await.unwrap();
    let mut evicted = report.evicted.clone();
    evicted.sort();
    let mut expected = old.clone();
    expected.sort();
    assert_eq!(evicted, expected);
    assert!(f.store.list_entries().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_racing_the_sweeper_see_whole_files_or_not_found() {
    const SIZE: usize = 256 * 1024;

    let f = fixture().await;
    let ids = populate(&f.store, 16, SIZE).await;

    let readers: Vec<_> = (0..8)
        .map(|r| {
            let store = f.store.clone();
            let ids = ids.clone();
            tokio::spawn(async move {
                let mut seen_missing = false;
                for round in 0..20 {
                    for (n, id) in ids.iter().enumerate() {
                        match store.read(id).await {
                            Ok(bytes) => {
                                assert_eq!(bytes.len(), SIZE, "reader {r} round {round}");
                                assert!(bytes.iter().all(|b| *b == n as u8));
                            }
                            Err(e) => {
                                assert_eq!(e, StoreError::NotFound { id: *id });
                                seen_missing = true;
                            }
                        }
                    }
                    tokio::task::yield_now().await;
                }
                seen_missing
            })
        })
        .collect();

    f.clock.advance(WINDOW + PERIOD);
    let report = f.sweeper.sweep_once().await.unwrap();
    assert_eq!(report.evicted_count(), ids.len());
    assert!(report.failed.is_empty());

    for reader in readers {
        reader.await.unwrap();
    }
    for id in &ids {
        assert!(!f.store.exists(id).await);
    }
}

#[tokio::test]
async fn test_staging_files_are_not_listed_as_artifacts() {
    let f = fixture().await;
    let ids = populate(&f.store, 2, 4).await;
    tokio::fs::write(f.store.root().join(".staging-leftover.tmp"), b"partial")
        .await
        .unwrap();
    tokio::fs::write(f.store.root().join("notes.txt"), b"ignored")
        .await
        .unwrap();

    let mut listed: Vec<_> = f
        .store
        .list_entries()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    listed.sort();
    let mut expected = ids;
    expected.sort();
    assert_eq!(listed, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_writes_leave_nothing_after_sweep() {
    const SIZE: usize = 64 * 1024 * 1024;

    let f = fixture().await;
    let payload = vec![0x42_u8; SIZE];

    // Drop writes mid-flight, as a client disconnect or request timeout does
    let mut cancelled = 0;
    for attempt in 1..=10_u64 {
        let id = UuidGenerator.generate();
        let write = f.store.write(&id, &payload);
        if tokio::time::timeout(Duration::from_millis(attempt), write)
            .await
            .is_err()
        {
            cancelled += 1;
        }
    }
    assert!(cancelled > 0, "every write finished before its deadline");

    // Blocking-pool file operations already in flight finish on their own
    tokio::time::sleep(Duration::from_millis(500)).await;

    let staging_files = || {
        std::fs::read_dir(f.store.root())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".staging-"))
            .count()
    };
    let leftovers = staging_files();

    // Still inside the window: a leftover may belong to a running write
    let report = f.sweeper.sweep_once().await.unwrap();
    assert_eq!(report.staging_removed, 0);
    assert_eq!(staging_files(), leftovers);

    f.clock.advance(Duration::from_secs(3600));
    let report = f.sweeper.sweep_once().await.unwrap();
    assert_eq!(report.staging_removed, leftovers);
    assert_eq!(staging_files(), 0);
}
