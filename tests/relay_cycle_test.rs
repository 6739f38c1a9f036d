use file_relay::adapters::{FixedClock, RecordingSleeper, VecSink};
use file_relay::{CycleReport, ErrorKind, RelayConfig, RelayDriver, UnknownErrorPolicy};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn config(watch: &Path, dest: &Path, max_cycles: u64) -> RelayConfig {
    RelayConfig {
        watch_target: watch.to_path_buf(),
        destination: dest.to_path_buf(),
        interval: Duration::from_secs(30),
        max_cycles: Some(max_cycles),
        ..RelayConfig::default()
    }
}

fn write_spaced(dir: &Path, name: &str, body: &[u8]) {
    fs::write(dir.join(name), body).unwrap();
    std::thread::sleep(Duration::from_millis(20));
}

#[tokio::test]
async fn test_newest_file_moves_first_then_older() {
    let watch = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_spaced(watch.path(), "a.txt", b"older");
    write_spaced(watch.path(), "b.txt", b"newer");

    let mut driver = RelayDriver::new(
        config(watch.path(), dest.path(), 1),
        FixedClock::epoch(),
        RecordingSleeper::default(),
        VecSink::default(),
    );

    let (first, _) = driver.run_cycle();
    match &first {
        CycleReport::Moved { path, .. } => assert_eq!(path, &watch.path().join("b.txt")),
        other => panic!("expected a move, got {other:?}"),
    }
    assert!(watch.path().join("a.txt").exists());
    assert!(!watch.path().join("b.txt").exists());
    assert_eq!(fs::read(dest.path().join("b.txt")).unwrap(), b"newer");

    let (second, _) = driver.run_cycle();
    match &second {
        CycleReport::Moved { path, destination, .. } => {
            assert_eq!(path, &watch.path().join("a.txt"));
            assert_eq!(destination, dest.path());
        }
        other => panic!("expected a move, got {other:?}"),
    }
    assert_eq!(fs::read_dir(watch.path()).unwrap().count(), 0);

    let (third, _) = driver.run_cycle();
    assert!(matches!(third, CycleReport::Empty { .. }));
    assert_eq!(driver.sink().reports().len(), 3);
}

#[tokio::test]
async fn test_collision_overwrites_destination() {
    let watch = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("data.csv"), b"stale").unwrap();
    fs::write(watch.path().join("data.csv"), b"fresh").unwrap();

    let mut driver = RelayDriver::new(
        config(watch.path(), dest.path(), 1),
        FixedClock::epoch(),
        RecordingSleeper::default(),
        VecSink::default(),
    );
    let summary = driver.run().await;

    assert_eq!(summary.moved, 1);
    assert_eq!(fs::read(dest.path().join("data.csv")).unwrap(), b"fresh");
}

#[tokio::test]
async fn test_missing_source_keeps_looping() {
    let dest = TempDir::new().unwrap();
    let sleeper = RecordingSleeper::default();
    let mut driver = RelayDriver::new(
        config(&dest.path().join("unmounted"), dest.path(), 4),
        FixedClock::epoch(),
        sleeper.clone(),
        VecSink::default(),
    );

    let summary = driver.run().await;

    assert_eq!(summary.cycles, 4);
    assert_eq!(summary.errors, 4);
    assert!(!summary.halted);
    assert_eq!(sleeper.calls().len(), 3);
    for report in driver.sink().reports() {
        match report {
            CycleReport::Error { kind, .. } => assert_eq!(*kind, ErrorKind::SourceNotFound),
            other => panic!("unexpected report {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_empty_source_writes_nothing() {
    let watch = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let mut driver = RelayDriver::new(
        config(watch.path(), dest.path(), 2),
        FixedClock::epoch(),
        RecordingSleeper::default(),
        VecSink::default(),
    );

    let summary = driver.run().await;

    assert_eq!(summary.empty, 2);
    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
    assert_eq!(fs::read_dir(watch.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_cycles_are_spaced_by_interval() {
    let watch = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let clock = FixedClock::epoch();
    let mut driver = RelayDriver::new(
        config(watch.path(), dest.path(), 4),
        clock.clone(),
        RecordingSleeper::with_clock(clock),
        VecSink::default(),
    );

    driver.run().await;

    let stamps: Vec<i64> = driver
        .sink()
        .reports()
        .iter()
        .map(|r| r.at().timestamp())
        .collect();
    assert_eq!(stamps, vec![0, 30, 60, 90]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_entry_is_skipped() {
    let watch = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_spaced(watch.path(), "a.txt", b"a");
    // a self-referencing symlink cannot be stat'ed
    std::os::unix::fs::symlink("loop", watch.path().join("loop")).unwrap();

    let mut driver = RelayDriver::new(
        config(watch.path(), dest.path(), 2),
        FixedClock::epoch(),
        RecordingSleeper::default(),
        VecSink::default(),
    );
    let summary = driver.run().await;

    assert_eq!(summary.moved, 1);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.errors, 0);
    assert!(dest.path().join("a.txt").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_unclassified_error_policy() {
    let dir = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let looped = dir.path().join("loop");
    std::os::unix::fs::symlink("loop", &looped).unwrap();

    let mut driver = RelayDriver::new(
        config(&looped, dest.path(), 3),
        FixedClock::epoch(),
        RecordingSleeper::default(),
        VecSink::default(),
    );
    let summary = driver.run().await;
    assert_eq!(summary.cycles, 3);
    assert!(!summary.halted);
    assert!(driver.sink().reports().iter().all(|r| matches!(
        r,
        CycleReport::Error { kind: ErrorKind::Unclassified, .. }
    )));

    let halting = RelayConfig {
        unknown_error_policy: UnknownErrorPolicy::Halt,
        ..config(&looped, dest.path(), 3)
    };
    let sleeper = RecordingSleeper::default();
    let mut driver = RelayDriver::new(halting, FixedClock::epoch(), sleeper.clone(), VecSink::default());
    let summary = driver.run().await;
    assert_eq!(summary.cycles, 1);
    assert!(summary.halted);
    assert!(sleeper.calls().is_empty());
}

#[tokio::test]
async fn test_destination_inside_watch_target() {
    let watch = TempDir::new().unwrap();
    let done = watch.path().join("done");
    fs::create_dir(&done).unwrap();
    write_spaced(watch.path(), "a.txt", b"older");
    write_spaced(watch.path(), "b.txt", b"newer");

    let mut driver = RelayDriver::new(
        config(watch.path(), &done, 4),
        FixedClock::epoch(),
        RecordingSleeper::default(),
        VecSink::default(),
    );
    let summary = driver.run().await;

    assert_eq!(summary.moved, 2);
    assert_eq!(summary.empty, 2);
    assert_eq!(summary.errors, 0);
    assert_eq!(fs::read_dir(&done).unwrap().count(), 2);
    assert!(done.exists());
}
