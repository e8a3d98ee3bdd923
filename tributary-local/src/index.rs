use std::{
    collections::{btree_map, BTreeMap},
    ops::Bound::{Excluded, Included, Unbounded},
    path::PathBuf,
};
use tributary_types::{PartitionKey, Timestamp};

use crate::{LocalErr, StorageBackend, StreamFileName, TimeWindowScanner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub path: PathBuf,
    /// Size at the time of listing; the file may have grown since.
    pub size: u64,
}

#[derive(Debug)]
/// The stream files of one partition known as of the last rebuild, in time order.
pub struct PartitionFileIndex {
    partition: PartitionKey,
    files: BTreeMap<StreamFileName, FileMeta>,
}

impl PartitionFileIndex {
    pub fn new(partition: PartitionKey) -> Self {
        Self {
            partition,
            files: Default::default(),
        }
    }

    pub fn partition(&self) -> &PartitionKey {
        &self.partition
    }

    /// Replace the contents with the files of this partition found between `from` and `to`.
    /// Returns the number of files indexed.
    pub async fn rebuild<B: StorageBackend>(
        &mut self,
        scanner: &TimeWindowScanner<B>,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<usize, LocalErr> {
        let partition = &self.partition;
        let prefix = format!("{partition}-");
        let mut files = BTreeMap::new();

        scanner
            .scan(from, to, |dir, entry| {
                if !entry.name.starts_with(&prefix) {
                    return;
                }
                match StreamFileName::decode(partition, &entry.name) {
                    Ok(name) => {
                        files.insert(
                            name,
                            FileMeta {
                                path: dir.join(&entry.name),
                                size: entry.size,
                            },
                        );
                    }
                    Err(e) => log::debug!("Ignoring {}: {e}", entry.name),
                }
            })
            .await?;

        self.files = files;
        log::debug!(
            "Indexed {} files of partition {} since {from}",
            self.files.len(),
            self.partition
        );
        Ok(self.files.len())
    }

    pub fn lookup(&self, name: &StreamFileName) -> Option<&FileMeta> {
        self.files.get(name)
    }

    /// The smallest name strictly greater than `name`.
    pub fn next_after(&self, name: &StreamFileName) -> Option<&StreamFileName> {
        self.files
            .range((Excluded(name), Unbounded))
            .next()
            .map(|(k, _)| k)
    }

    /// The smallest name greater than or equal to `name`.
    pub fn ceiling(&self, name: &StreamFileName) -> Option<&StreamFileName> {
        self.files
            .range((Included(name), Unbounded))
            .next()
            .map(|(k, _)| k)
    }

    pub fn first(&self) -> Option<&StreamFileName> {
        self.files.keys().next()
    }

    pub fn last(&self) -> Option<&StreamFileName> {
        self.files.keys().next_back()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, StreamFileName, FileMeta> {
        self.files.iter()
    }
}
