//! Task store persistence tests
//!
//! Covers id allocation, load/save round trips, id continuation after load,
//! and skipping of damaged lines.

use tasklist::{NewTask, Priority, StoreError, TaskId, TaskKind, TaskStore, DEFAULT_FILE_NAME};
use tempfile::TempDir;
use anyhow::Result;
use std::fs;

fn id(n: u32) -> TaskId {
    TaskId::new(n).unwrap()
}

// ============================================================================
// Id Allocation
// ============================================================================

#[test]
fn test_ids_follow_call_order() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut store = TaskStore::in_dir(tmp.path());

    let ids = vec![
        store.add(NewTask::plain("one"))?,
        store.add(NewTask::deadline("two", "01/01/2026"))?,
        store.add(NewTask::prioritized("three", 3))?,
        store.add(NewTask::plain("four"))?,
    ];

    assert_eq!(ids, vec![id(1), id(2), id(3), id(4)]);
    let listed: Vec<TaskId> = store.list().iter().map(|t| t.id()).collect();
    assert_eq!(listed, ids);

    Ok(())
}

#[test]
fn test_load_continues_after_max_id() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(
        tmp.path().join(DEFAULT_FILE_NAME),
        "SIMPLE;7;Seventh;0\nSIMPLE;3;Third;1\n",
    )?;

    let mut store = TaskStore::in_dir(tmp.path());
    assert_eq!(store.load()?, 2);

    let new_id = store.add(NewTask::plain("next"))?;
    assert_eq!(new_id, id(8));

    Ok(())
}

#[test]
fn test_add_fails_once_ids_run_out() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(
        tmp.path().join(DEFAULT_FILE_NAME),
        format!("SIMPLE;{};Last possible id;0\n", u32::MAX),
    )?;

    let mut store = TaskStore::in_dir(tmp.path());
    assert_eq!(store.load()?, 1);
    assert_eq!(store.next_id(), None);

    assert!(matches!(store.add(NewTask::plain("one")), Err(StoreError::IdsExhausted)));
    assert!(matches!(store.add(NewTask::plain("two")), Err(StoreError::IdsExhausted)));

    let ids: Vec<TaskId> = store.list().iter().map(|t| t.id()).collect();
    assert_eq!(ids, vec![id(u32::MAX)]);

    Ok(())
}

#[test]
fn test_load_never_moves_next_id_backwards() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("other.txt");
    fs::write(&path, "SIMPLE;2;Second;0\n")?;

    let mut store = TaskStore::in_dir(tmp.path());
    for i in 0..5 {
        store.add(NewTask::plain(format!("task {}", i)))?;
    }
    store.load_from(&path)?;

    assert_eq!(store.next_id(), Some(id(6)));
    assert_eq!(store.len(), 6);

    Ok(())
}

// ============================================================================
// Load / Save
// ============================================================================

#[test]
fn test_deadline_scenario() -> Result<()> {
    let tmp = TempDir::new()?;

    let mut store = TaskStore::in_dir(tmp.path());
    let new_id = store.add(NewTask::deadline("Pay rent", "01/05/2025"))?;
    assert_eq!(new_id, id(1));
    store.save()?;

    let mut fresh = TaskStore::in_dir(tmp.path());
    assert_eq!(fresh.load()?, 1);

    let tasks = fresh.list();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id(), id(1));
    assert_eq!(tasks[0].description(), "Pay rent");
    assert_eq!(tasks[0].due(), Some("01/05/2025"));
    assert!(matches!(tasks[0].kind(), TaskKind::Deadline { .. }));
    assert!(!tasks[0].completed());

    Ok(())
}

#[test]
fn test_save_load_preserves_every_field() -> Result<()> {
    let tmp = TempDir::new()?;

    let mut store = TaskStore::in_dir(tmp.path());
    store.add(NewTask::plain("Buy milk"))?;
    let taxes = store.add(NewTask::deadline("File taxes", "15/04/2025"))?;
    let bug = store.add(NewTask::prioritized("Fix bug", 5))?;
    store.complete(taxes);
    store.complete(bug);
    store.save()?;

    let mut fresh = TaskStore::in_dir(tmp.path());
    fresh.load()?;

    assert_eq!(fresh.list(), store.list());
    assert_eq!(fresh.find(bug).and_then(|t| t.priority()).map(Priority::get), Some(5));

    Ok(())
}

#[test]
fn test_file_format() -> Result<()> {
    let tmp = TempDir::new()?;

    let mut store = TaskStore::in_dir(tmp.path());
    store.add(NewTask::plain("Buy milk"))?;
    store.add(NewTask::deadline("File taxes", "15/04/2025"))?;
    let bug = store.add(NewTask::prioritized("Fix bug", 5))?;
    store.complete(bug);
    store.save()?;

    let content = fs::read_to_string(tmp.path().join(DEFAULT_FILE_NAME))?;
    assert_eq!(
        content,
        "SIMPLE;1;Buy milk;0\nDEADLINE;2;File taxes;0;15/04/2025\nPRIORITIZED;3;Fix bug;1;5\n"
    );

    Ok(())
}

#[test]
fn test_legacy_untagged_line_survives_resave() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join(DEFAULT_FILE_NAME);
    fs::write(&path, "4;Legacy task;1\n")?;

    let mut store = TaskStore::in_dir(tmp.path());
    assert_eq!(store.load()?, 1);

    let task = store.find(id(4)).unwrap();
    assert_eq!(task.kind(), &TaskKind::Base);
    assert!(task.completed());

    store.save()?;
    assert_eq!(fs::read_to_string(&path)?, "4;Legacy task;1\n");

    Ok(())
}

#[test]
fn test_missing_file_loads_nothing() -> Result<()> {
    let tmp = TempDir::new()?;

    let mut store = TaskStore::in_dir(tmp.path());
    assert_eq!(store.load()?, 0);
    assert!(store.is_empty());
    assert_eq!(store.next_id(), Some(id(1)));

    Ok(())
}

#[test]
fn test_damaged_lines_are_skipped() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(
        tmp.path().join(DEFAULT_FILE_NAME),
        "SIMPLE;9;Well formed;0\n\
         SIMPLE;9;OnlyTwoFields\n\
         \n\
         PRIORITIZED;10;Bad priority;0;high\n\
         DEADLINE;x;Bad id;0;01/01/2025\n",
    )?;

    let mut store = TaskStore::in_dir(tmp.path());
    assert_eq!(store.load()?, 1);

    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].id(), id(9));
    assert_eq!(store.list()[0].description(), "Well formed");
    assert_eq!(store.next_id(), Some(id(10)));

    Ok(())
}

#[test]
fn test_non_utf8_line_is_skipped() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut content = b"SIMPLE;1;Good;0\n".to_vec();
    content.extend_from_slice(b"SIMPLE;2;Descri\xE7ao;0\n");
    fs::write(tmp.path().join(DEFAULT_FILE_NAME), content)?;

    let mut store = TaskStore::in_dir(tmp.path());
    assert_eq!(store.load()?, 1);

    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].description(), "Good");
    assert_eq!(store.next_id(), Some(id(2)));

    Ok(())
}

#[test]
fn test_crlf_line_endings_load() -> Result<()> {
    let tmp = TempDir::new()?;
    fs::write(
        tmp.path().join(DEFAULT_FILE_NAME),
        "SIMPLE;1;Buy milk;1\r\nDEADLINE;2;File taxes;0;15/04/2025\r\n",
    )?;

    let mut store = TaskStore::in_dir(tmp.path());
    assert_eq!(store.load()?, 2);

    assert!(store.list()[0].completed());
    assert_eq!(store.list()[1].due(), Some("15/04/2025"));

    Ok(())
}

#[test]
fn test_failed_save_leaves_store_intact() -> Result<()> {
    let tmp = TempDir::new()?;

    let mut store = TaskStore::new(tmp.path().join("no-such-dir").join(DEFAULT_FILE_NAME));
    store.add(NewTask::plain("keep me"))?;

    assert!(store.save().is_err());
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].description(), "keep me");

    Ok(())
}

// ============================================================================
// Mutation
// ============================================================================

#[test]
fn test_absent_id_reports_not_found() -> Result<()> {
    let tmp = TempDir::new()?;
    let mut store = TaskStore::in_dir(tmp.path());
    store.add(NewTask::plain("a"))?;
    store.add(NewTask::plain("b"))?;
    let before = store.list().to_vec();

    assert!(!store.complete(id(99)));
    assert!(store.remove(id(99)).is_none());
    assert_eq!(store.list(), before.as_slice());

    Ok(())
}

#[test]
fn test_edit_in_place_persists() -> Result<()> {
    let tmp = TempDir::new()?;

    let mut store = TaskStore::in_dir(tmp.path());
    let bug = store.add(NewTask::prioritized("Fix bug", 0))?;
    assert_eq!(store.find(bug).and_then(|t| t.priority()), Some(Priority::DEFAULT));

    let task = store.find_mut(bug).unwrap();
    task.set_description("Fix login bug");
    assert!(!task.set_priority(6));
    assert!(task.set_priority(4));
    store.save()?;

    let mut fresh = TaskStore::in_dir(tmp.path());
    fresh.load()?;
    let task = fresh.find(bug).unwrap();
    assert_eq!(task.description(), "Fix login bug");
    assert_eq!(task.priority().map(Priority::get), Some(4));

    Ok(())
}
