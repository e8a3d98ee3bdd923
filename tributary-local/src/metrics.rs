use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
/// Counters kept by the reader of one partition, for observing how often it has to go back to storage.
pub struct ReaderMetrics {
    rebuilds: AtomicU64,
    list_calls: AtomicU64,
    exists_calls: AtomicU64,
    files_opened: AtomicU64,
    relocations: AtomicU64,
    bytes_read: AtomicU64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// A point-in-time copy of [`ReaderMetrics`].
pub struct ReaderStats {
    /// Number of times the file index was rebuilt from storage.
    pub rebuilds: u64,
    /// Number of directory listings.
    pub list_calls: u64,
    /// Number of hour directory existence checks.
    pub exists_calls: u64,
    pub files_opened: u64,
    /// Number of times the reader landed on a later file than the one it was looking for.
    pub relocations: u64,
    pub bytes_read: u64,
}

impl ReaderMetrics {
    pub fn new() -> Self {
        Default::default()
    }

    pub(crate) fn add_rebuild(&self) {
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_list_call(&self) {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_exists_call(&self) {
        self.exists_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_file_opened(&self) {
        self.files_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_relocation(&self) {
        self.relocations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_bytes_read(&self, n: usize) {
        self.bytes_read.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ReaderStats {
        ReaderStats {
            rebuilds: self.rebuilds.load(Ordering::Relaxed),
            list_calls: self.list_calls.load(Ordering::Relaxed),
            exists_calls: self.exists_calls.load(Ordering::Relaxed),
            files_opened: self.files_opened.load(Ordering::Relaxed),
            relocations: self.relocations.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
        }
    }
}
