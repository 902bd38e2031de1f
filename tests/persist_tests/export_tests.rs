//! Tests for Export
//!
//! These tests verify:
//! - Exact on-disk layout
//! - Atomic replacement of an existing file
//! - No temp files left behind on success or failure
//! - Temp directory override
//! - Permission bits of the exported file

use std::fs;
use std::path::{Path, PathBuf};

use kvdb::config::Config;
use kvdb::persist::SnapshotWriter;
use kvdb::{Database, KvError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.kvdb");
    (temp_dir, path)
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_export_empty_database_layout() {
    let (_temp, path) = setup_temp_dir();
    let db = Database::new("db").unwrap();

    db.export(&path).unwrap();

    assert_eq!(fs::read(&path).unwrap(), vec![2, b'd', b'b']);
}

#[test]
fn test_export_single_record_layout() {
    let (_temp, path) = setup_temp_dir();
    let db = Database::new("n").unwrap();
    db.insert("key", b"value".to_vec(), false).unwrap();

    db.export(&path).unwrap();

    let mut expected = vec![1, b'n'];
    expected.extend_from_slice(&3u32.to_le_bytes());
    expected.extend_from_slice(b"key");
    expected.extend_from_slice(&5u32.to_le_bytes());
    expected.extend_from_slice(b"value");

    assert_eq!(fs::read(&path).unwrap(), expected);
}

#[test]
fn test_export_empty_value_layout() {
    let (_temp, path) = setup_temp_dir();
    let db = Database::new("").unwrap();
    db.insert("k", Vec::new(), false).unwrap();

    db.export(&path).unwrap();

    let mut expected = vec![0];
    expected.extend_from_slice(&1u32.to_le_bytes());
    expected.extend_from_slice(b"k");
    expected.extend_from_slice(&0u32.to_le_bytes());

    assert_eq!(fs::read(&path).unwrap(), expected);
}

#[test]
fn test_export_file_size_matches_contents() {
    let (_temp, path) = setup_temp_dir();
    let db = Database::new("sizes").unwrap();

    let mut expected_size = 1 + "sizes".len();
    for i in 0..50 {
        let key = format!("key{}", i);
        let value = vec![7u8; i];
        expected_size += 4 + key.len() + 4 + value.len();
        db.insert(key, value, false).unwrap();
    }

    db.export(&path).unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len() as usize, expected_size);
}

// =============================================================================
// Atomic Replace Tests
// =============================================================================

#[test]
fn test_export_replaces_existing_file() {
    let (_temp, path) = setup_temp_dir();
    fs::write(&path, b"old garbage contents").unwrap();

    let db = Database::new("fresh").unwrap();
    db.export(&path).unwrap();

    let reopened = Database::open(&path, false).unwrap();
    assert_eq!(reopened.name(), "fresh");
    assert!(reopened.is_empty());
}

#[test]
fn test_export_leaves_no_temp_files() {
    let (temp, path) = setup_temp_dir();
    let db = Database::new("clean").unwrap();
    db.insert("a", b"1".to_vec(), false).unwrap();

    db.export(&path).unwrap();
    db.export(&path).unwrap();

    assert_eq!(dir_entries(temp.path()), vec!["test.kvdb".to_string()]);
}

#[test]
fn test_export_into_missing_directory_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("db.kvdb");
    let db = Database::new("x").unwrap();

    let err = db.export(&path).unwrap_err();

    assert!(matches!(err, KvError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn test_failed_rename_cleans_temp_and_keeps_target() {
    let temp = TempDir::new().unwrap();

    // A non-empty directory cannot be replaced by a file
    let target = temp.path().join("occupied");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("inner"), b"keep me").unwrap();

    let db = Database::new("x").unwrap();
    db.insert("k", b"v".to_vec(), false).unwrap();

    let err = db.export(&target).unwrap_err();

    assert!(matches!(err, KvError::Io(_)));
    assert_eq!(dir_entries(temp.path()), vec!["occupied".to_string()]);
    assert_eq!(fs::read(target.join("inner")).unwrap(), b"keep me");
}

#[test]
fn test_dropped_writer_removes_temp_file() {
    let (temp, path) = setup_temp_dir();

    {
        let mut writer = SnapshotWriter::create(&path, "abandoned", &Config::default()).unwrap();
        writer.add("k", b"v").unwrap();
        assert_eq!(writer.record_count(), 1);
        assert_eq!(dir_entries(temp.path()).len(), 1);
    }

    assert!(dir_entries(temp.path()).is_empty());
    assert!(!path.exists());
}

#[test]
fn test_writer_rejects_long_name() {
    let (temp, path) = setup_temp_dir();

    let result = SnapshotWriter::create(&path, &"x".repeat(256), &Config::default());

    assert!(matches!(result, Err(KvError::NameTooLong { len: 256 })));
    assert!(dir_entries(temp.path()).is_empty());
}

#[test]
fn test_writer_counts() {
    let (_temp, path) = setup_temp_dir();

    let mut writer = SnapshotWriter::create(&path, "ab", &Config::default()).unwrap();
    assert_eq!(writer.bytes_written(), 3);

    writer.add("key", b"value").unwrap();
    writer.add("", b"").unwrap();
    assert_eq!(writer.bytes_written(), 3 + (4 + 3 + 4 + 5) + 8);

    assert_eq!(writer.finish().unwrap(), 2);
    assert_eq!(fs::metadata(&path).unwrap().len(), 27);
}

// =============================================================================
// Temp Directory Override Tests
// =============================================================================

#[test]
fn test_export_with_temp_dir_override() {
    let temp = TempDir::new().unwrap();
    let staging = temp.path().join("staging");
    let out = temp.path().join("out");
    fs::create_dir(&staging).unwrap();
    fs::create_dir(&out).unwrap();

    let config = Config::builder().temp_dir(&staging).build();
    let db = Database::with_config("staged", config).unwrap();
    db.insert("k", b"v".to_vec(), false).unwrap();

    let path = out.join("staged.kvdb");
    db.export(&path).unwrap();

    assert!(dir_entries(&staging).is_empty());
    assert_eq!(dir_entries(&out), vec!["staged.kvdb".to_string()]);

    let reopened = Database::open(&path, false).unwrap();
    assert_eq!(reopened.get("k").unwrap(), &b"v"[..]);
}

#[cfg(unix)]
#[test]
fn test_export_with_temp_dir_on_other_filesystem() {
    let shm = Path::new("/dev/shm");
    if !shm.is_dir() {
        return;
    }

    let staging = TempDir::new_in(shm).unwrap();
    let (temp, path) = setup_temp_dir();

    let config = Config::builder().temp_dir(staging.path()).build();
    let db = Database::with_config("cross", config).unwrap();
    db.insert("k", b"v".to_vec(), false).unwrap();

    db.export(&path).unwrap();

    assert!(dir_entries(staging.path()).is_empty());
    assert_eq!(dir_entries(temp.path()), vec!["test.kvdb".to_string()]);

    let reopened = Database::open(&path, false).unwrap();
    assert_eq!(reopened.name(), "cross");
    assert_eq!(reopened.get("k").unwrap(), &b"v"[..]);
}

#[test]
fn test_export_with_missing_temp_dir_falls_back() {
    let (temp, path) = setup_temp_dir();

    let config = Config::builder()
        .temp_dir(temp.path().join("does-not-exist"))
        .build();
    let db = Database::with_config("fallback", config).unwrap();

    db.export(&path).unwrap();

    assert_eq!(dir_entries(temp.path()), vec!["test.kvdb".to_string()]);
    assert_eq!(Database::open(&path, false).unwrap().name(), "fallback");
}

// =============================================================================
// Permission Tests
// =============================================================================

#[cfg(unix)]
#[test]
fn test_export_default_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, path) = setup_temp_dir();
    Database::new("m").unwrap().export(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[cfg(unix)]
#[test]
fn test_export_custom_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let (_temp, path) = setup_temp_dir();
    let config = Config::builder().file_mode(0o600).build();
    Database::with_config("m", config)
        .unwrap()
        .export(&path)
        .unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
