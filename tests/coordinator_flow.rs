//! Touch-driven flows through the coordinator with a real store.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use tagsync::app::{Coordinator, CoordinatorSettings, SharedState, UiMode};
use tagsync::catalog::{DirectoryCatalog, DirectoryEntry, Slot, PLACEHOLDER_TEXT};
use tagsync::domain::TrackTags;
use tagsync::indexer::{IndexerOptions, LibraryIndexer, TagReader};
use tagsync::input::{mailbox, MailboxSender};
use tagsync::storage::{Mirror, SqliteStore};
use tagsync::ui::TouchPoint;
use tagsync::Result;

const ROW_2: TouchPoint = TouchPoint { x: 180, y: 200 };
const LEFT: TouchPoint = TouchPoint { x: 20, y: 450 };
const MIDDLE: TouchPoint = TouchPoint { x: 200, y: 450 };
const EXIT: TouchPoint = TouchPoint { x: 350, y: 470 };

struct TitleOnly;

impl TagReader for TitleOnly {
    fn read(&self, path: &Path) -> Result<TrackTags> {
        Ok(TrackTags {
            title: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            album: "Album".to_string(),
            artist: "Artist".to_string(),
            ..TrackTags::default()
        })
    }
}

struct Rig {
    _scratch: tempfile::TempDir,
    db: std::path::PathBuf,
    catalog: Arc<DirectoryCatalog>,
    shared: Arc<SharedState>,
    touches: MailboxSender<TouchPoint>,
    coordinator: thread::JoinHandle<Coordinator>,
}

/// Seven folders, `dir1` newest; `dir2` holds two tracks.
fn start() -> Rig {
    let scratch = tempfile::tempdir().unwrap();
    let card = scratch.path().join("card");
    let db = scratch.path().join("media.db");
    for i in 1..=7 {
        fs::create_dir_all(card.join(format!("dir{i}"))).unwrap();
    }
    fs::write(card.join("dir2").join("first.mp3"), b"x").unwrap();
    fs::write(card.join("dir2").join("second.flac"), b"x").unwrap();
    SqliteStore::create(&db).unwrap();

    let entries = (1..=7).map(|i| DirectoryEntry {
        relative_path: format!("dir{i}"),
        modified_at: Utc.timestamp_opt(1_700_000_000 - i64::from(i), 0).unwrap(),
    });
    let catalog = Arc::new(DirectoryCatalog::from_entries(card.clone(), entries));
    let shared = Arc::new(SharedState::new());
    let (touches, receiver) = mailbox();

    let indexer = LibraryIndexer::new(
        Box::new(SqliteStore::open(&db).unwrap()),
        Box::new(TitleOnly),
        Arc::clone(&shared),
        IndexerOptions {
            library_root: card,
            drive_prefix: "a:".to_string(),
            skip_existing: true,
        },
    );
    let mut coordinator = Coordinator::new(
        Arc::clone(&catalog),
        Arc::clone(&shared),
        receiver,
        indexer,
        CoordinatorSettings {
            poll_interval: Duration::from_millis(10),
            page_debounce: Duration::from_millis(5),
        },
    );
    let coordinator = thread::spawn(move || {
        coordinator.run();
        coordinator
    });

    let rig = Rig {
        _scratch: scratch,
        db,
        catalog,
        shared,
        touches,
        coordinator,
    };
    rig.wait_until(|s| s.mode() == UiMode::Index);
    rig
}

impl Rig {
    fn wait_until(&self, condition: impl Fn(&SharedState) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition(&self.shared) {
            assert!(Instant::now() < deadline, "timed out in mode {:?}", self.shared.mode());
            thread::sleep(Duration::from_millis(2));
        }
    }

    fn media_count(&self) -> usize {
        SqliteStore::open(&self.db)
            .unwrap()
            .media(Mirror::Primary)
            .unwrap()
            .len()
    }

    fn finish(self) -> Coordinator {
        self.touches.post(EXIT);
        let coordinator = self.coordinator.join().unwrap();
        assert!(self.shared.exit_requested());
        coordinator
    }
}

#[test]
fn pages_split_seven_directories() {
    let rig = start();
    let first: Vec<String> = rig
        .catalog
        .page(0)
        .iter()
        .map(|s| s.display_text().to_string())
        .collect();
    assert_eq!(first, ["dir1", "dir2", "dir3", "dir4", "dir5"]);
    let second = rig.catalog.page(1);
    assert_eq!(second[0].display_text(), "dir6");
    assert_eq!(second[1].display_text(), "dir7");
    assert!(second[2..].iter().all(Slot::is_placeholder));
    assert_eq!(second[4].display_text(), PLACEHOLDER_TEXT);

    rig.touches.post(MIDDLE);
    rig.wait_until(|s| s.page() == 1 && s.mode() == UiMode::Index);
    rig.touches.post(MIDDLE);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(rig.shared.page(), 1);

    rig.touches.post(LEFT);
    rig.wait_until(|s| s.page() == 0 && s.mode() == UiMode::Index);
    rig.finish();
}

#[test]
fn selecting_then_declining_leaves_the_store_alone() {
    let rig = start();

    rig.touches.post(ROW_2);
    rig.wait_until(|s| s.mode() == UiMode::Confirm);
    assert_eq!(&*rig.shared.label(), "dir2");

    rig.touches.post(MIDDLE);
    rig.wait_until(|s| s.mode() == UiMode::Index);
    assert!(rig.shared.label_is_sentinel());
    assert_eq!(rig.media_count(), 0);

    let coordinator = rig.finish();
    assert!(coordinator.last_report().is_none());
}

#[test]
fn selecting_then_confirming_indexes_the_folder() {
    let rig = start();

    rig.touches.post(ROW_2);
    rig.wait_until(|s| s.mode() == UiMode::Confirm);
    rig.touches.post(LEFT);
    rig.wait_until(|s| s.mode() == UiMode::Index);

    assert!(rig.shared.label_is_sentinel());
    assert_eq!(rig.media_count(), 2);

    let coordinator = rig.finish();
    let report = coordinator.last_report().unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.counts.albums, 1);
    assert!(coordinator.state().selected.is_none());
}

#[test]
fn closed_mailbox_shuts_the_coordinator_down() {
    let rig = start();
    drop(rig.touches);
    let coordinator = rig.coordinator.join().unwrap();
    assert!(rig.shared.exit_requested());
    assert_eq!(coordinator.state().mode, UiMode::Index);
}
