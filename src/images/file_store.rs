use std::collections::HashMap;

use bytes::Bytes;

/// A picked file waiting to be uploaded. Only ever held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl FileHandle {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn byte_size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Image id -> file handle. Deliberately neither `Serialize` nor `Clone`.
#[derive(Debug, Default)]
pub struct FileStore {
    files: HashMap<String, FileHandle>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, file: FileHandle) {
        self.files.insert(id, file);
    }

    pub fn get(&self, id: &str) -> Option<&FileHandle> {
        self.files.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<FileHandle> {
        self.files.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.files.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
