use std::fs;

use crawlwatch_engine::{
    ensure_state_dir, read_optional, AtomicFileWriter, FileSession, SessionProvider, TOKEN_KEY,
};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested").join("session.ron");
    let writer = AtomicFileWriter::new(target.clone());

    writer.write("hello").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello");

    writer.write("world").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "world");
}

#[test]
fn no_file_when_parent_is_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let writer = AtomicFileWriter::new(blocker.join("session.ron"));
    assert!(writer.write("data").is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[test]
fn missing_file_reads_as_none() {
    let temp = TempDir::new().unwrap();
    assert_eq!(read_optional(&temp.path().join("absent")).unwrap(), None);
}

#[test]
fn file_session_survives_reopen_and_clear() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.ron");

    let session = FileSession::open(&path);
    assert_eq!(session.get(), None);
    session.set("token-1");
    assert_eq!(session.get().as_deref(), Some("token-1"));

    let reopened = FileSession::open(&path);
    assert_eq!(reopened.get().as_deref(), Some("token-1"));
    assert!(fs::read_to_string(&path).unwrap().contains(TOKEN_KEY));

    reopened.clear();
    assert_eq!(reopened.get(), None);
    assert_eq!(FileSession::open(&path).get(), None);
}

#[test]
fn file_session_keeps_unrelated_keys() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.ron");
    fs::write(&path, "{\"theme\": \"dark\"}").unwrap();

    let session = FileSession::open(&path);
    session.set("abc");
    session.clear();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("theme"));
    assert!(!content.contains("abc"));
}

#[test]
fn corrupt_session_file_means_signed_out() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.ron");
    fs::write(&path, "{{{ not ron").unwrap();

    let session = FileSession::open(&path);
    assert_eq!(session.get(), None);
}
