//! In-RAM file table: a flat name-to-bytes store.
//!
//! Files live entirely on the kernel heap. Handles returned by `open` are
//! opaque non-zero ids that stay stable until the file is deleted, after
//! which they simply dangle (lookups fail).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use lazy_static::lazy_static;
use spin::Mutex;

use crate::println;

#[cfg(test)]
mod mod_test;

pub const MAX_FILES: usize = 64;

/// Longest stored file name, in bytes.
pub const NAME_LEN: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    TableFull,
    AlreadyExists,
    NotFound,
    OutOfMemory,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FsError::TableFull => write!(f, "filesystem full"),
            FsError::AlreadyExists => write!(f, "file already exists"),
            FsError::NotFound => write!(f, "no such file"),
            FsError::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;

/// Opaque file handle handed out by `open`. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileId(u64);

impl FileId {
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from its integer form (the syscall surface).
    pub const fn from_raw(raw: u64) -> Option<FileId> {
        if raw == 0 {
            None
        } else {
            Some(FileId(raw))
        }
    }
}

/// One stored file.
pub struct File {
    id: u64,
    name: String,
    data: Vec<u8>,
}

impl File {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The flat file store, in creation order.
pub struct FileTable {
    files: Vec<File>,
    next_id: u64,
}

impl FileTable {
    pub const fn new() -> Self {
        FileTable {
            files: Vec::new(),
            next_id: 1,
        }
    }

    /// Store a new file. Duplicate names are rejected; the reference
    /// behavior is kept, so `create` never overwrites.
    pub fn create(&mut self, name: &str, data: &[u8]) -> FsResult<()> {
        if self.files.len() >= MAX_FILES {
            return Err(FsError::TableFull);
        }
        let name = truncated(name);
        if self.files.iter().any(|f| f.name == name) {
            return Err(FsError::AlreadyExists);
        }

        let mut stored = Vec::new();
        stored
            .try_reserve_exact(data.len())
            .map_err(|_| FsError::OutOfMemory)?;
        stored.extend_from_slice(data);

        let id = self.next_id;
        self.next_id += 1;
        self.files.push(File {
            id,
            name: String::from(name),
            data: stored,
        });
        Ok(())
    }

    /// Handle for a named file, if present.
    pub fn open(&self, name: &str) -> Option<FileId> {
        self.find(name).map(|f| FileId(f.id))
    }

    pub fn find(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Resolve a handle. Fails once the file has been deleted.
    pub fn get(&self, id: FileId) -> Option<&File> {
        self.files.iter().find(|f| f.id == id.0)
    }

    pub fn delete(&mut self, name: &str) -> FsResult<()> {
        let index = self
            .files
            .iter()
            .position(|f| f.name == name)
            .ok_or(FsError::NotFound)?;
        self.files.remove(index);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Print the file listing (the `ls` shell command).
    pub fn list(&self) {
        println!("Files:");
        println!("  NAME                SIZE");
        println!("  ------------------- -----");
        if self.files.is_empty() {
            println!("  (no files)");
            return;
        }
        for file in &self.files {
            println!("  {:<20}{}", file.name, file.data.len());
        }
    }
}

fn truncated(name: &str) -> &str {
    if name.len() <= NAME_LEN {
        return name;
    }
    let mut cut = NAME_LEN;
    while !name.is_char_boundary(cut) {
        cut -= 1;
    }
    &name[..cut]
}

lazy_static! {
    /// The kernel-wide file table.
    pub static ref FILES: Mutex<FileTable> = Mutex::new(FileTable::new());
}
