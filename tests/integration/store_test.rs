//! Persistence tests for the step store
//!
//! The in-memory round trips live in the store's unit tests; these cover
//! the on-disk behavior the binary relies on between sessions.

use std::path::Path;

use stepplay::StepStore;
use tempfile::TempDir;

#[test]
fn steps_survive_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("steps.db");
    let video = Path::new("/videos/demo.mp4");

    {
        let store = StepStore::open(&db).unwrap();
        store.set_steps(video, &[1.5, 7.25, 13.0]).unwrap();
    }

    let store = StepStore::open(&db).unwrap();
    assert_eq!(store.steps_for(video).unwrap(), vec![1.5, 7.25, 13.0]);
}

#[test]
fn open_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("state").join("stepplay").join("steps.db");

    let store = StepStore::open(&db).unwrap();
    store.set_steps(Path::new("a.mp4"), &[2.0]).unwrap();

    assert!(db.exists());
}

#[test]
fn saving_again_replaces_the_stored_list() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("steps.db");
    let video = Path::new("demo.mp4");

    {
        let store = StepStore::open(&db).unwrap();
        store.set_steps(video, &[1.0, 2.0, 3.0]).unwrap();
        store.set_steps(video, &[4.5]).unwrap();
    }

    let store = StepStore::open(&db).unwrap();
    assert_eq!(store.steps_for(video).unwrap(), vec![4.5]);
}

#[test]
fn clearing_one_video_leaves_others_alone() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("steps.db");
    let store = StepStore::open(&db).unwrap();

    store.set_steps(Path::new("a.mp4"), &[1.0]).unwrap();
    store.set_steps(Path::new("b.mp4"), &[2.0]).unwrap();
    store.clear_steps(Path::new("a.mp4")).unwrap();

    assert_eq!(
        store.steps_for(Path::new("a.mp4")).unwrap(),
        Vec::<f64>::new()
    );
    assert_eq!(store.steps_for(Path::new("b.mp4")).unwrap(), vec![2.0]);
}
