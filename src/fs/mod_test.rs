use super::{FileId, FileTable, FsError, MAX_FILES, NAME_LEN};
use alloc::format;
use alloc::string::String;

#[test]
fn create_find_and_size() {
    let mut table = FileTable::new();
    table.create("hello.txt", b"Hello from the filesystem!\n").unwrap();

    let file = table.find("hello.txt").unwrap();
    assert_eq!(file.name(), "hello.txt");
    assert_eq!(file.size(), 27);
    assert_eq!(file.data(), b"Hello from the filesystem!\n");
}

#[test]
fn duplicate_names_are_rejected() {
    let mut table = FileTable::new();
    table.create("a.txt", b"one").unwrap();
    assert_eq!(table.create("a.txt", b"two"), Err(FsError::AlreadyExists));
    // The original survives untouched.
    assert_eq!(table.find("a.txt").unwrap().data(), b"one");
}

#[test]
fn table_capacity_is_bounded() {
    let mut table = FileTable::new();
    for i in 0..MAX_FILES {
        table.create(&format!("f{}", i), b"x").unwrap();
    }
    assert_eq!(table.create("overflow", b"x"), Err(FsError::TableFull));
    assert_eq!(table.len(), MAX_FILES);
}

#[test]
fn long_names_are_truncated() {
    let mut table = FileTable::new();
    let long: String = core::iter::repeat('n').take(NAME_LEN + 20).collect();
    table.create(&long, b"data").unwrap();

    let stored: String = core::iter::repeat('n').take(NAME_LEN).collect();
    assert!(table.find(&stored).is_some());
}

#[test]
fn open_returns_a_stable_nonzero_handle() {
    let mut table = FileTable::new();
    table.create("a.txt", b"a").unwrap();
    table.create("b.txt", b"b").unwrap();

    let handle = table.open("b.txt").unwrap();
    assert_ne!(handle.raw(), 0);
    assert_eq!(table.get(handle).unwrap().name(), "b.txt");

    // Deleting an unrelated file does not disturb the handle.
    table.delete("a.txt").unwrap();
    assert_eq!(table.get(handle).unwrap().name(), "b.txt");
}

#[test]
fn open_missing_file_fails() {
    let table = FileTable::new();
    assert!(table.open("nope").is_none());
}

#[test]
fn handles_dangle_after_deletion() {
    let mut table = FileTable::new();
    table.create("doomed.txt", b"bye").unwrap();
    let handle = table.open("doomed.txt").unwrap();

    table.delete("doomed.txt").unwrap();
    assert!(table.get(handle).is_none());
    assert!(table.is_empty());

    // Ids are never reused, so a recreated file gets a fresh handle.
    table.create("doomed.txt", b"again").unwrap();
    let fresh = table.open("doomed.txt").unwrap();
    assert_ne!(fresh, handle);
}

#[test]
fn delete_missing_file_fails() {
    let mut table = FileTable::new();
    assert_eq!(table.delete("ghost"), Err(FsError::NotFound));
}

#[test]
fn raw_handle_round_trip() {
    assert!(FileId::from_raw(0).is_none());
    let mut table = FileTable::new();
    table.create("a.txt", b"a").unwrap();
    let handle = table.open("a.txt").unwrap();
    assert_eq!(FileId::from_raw(handle.raw()), Some(handle));
}
