use std::{future::Future, io::ErrorKind, path::Path};
use tributary_runtime::fs::{self, AsyncReadExt, DirEntry, File};

use crate::LocalErr;

/// The storage the stream files live on. Paths are always absolute.
///
/// Every method may be called concurrently by the readers of different partitions.
pub trait StorageBackend: Send + Sync + 'static {
    type Reader: ByteReader;

    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> impl Future<Output = Result<bool, LocalErr>> + Send;

    /// List the entries of a directory, sorted by name. A missing directory lists as empty.
    fn list_children(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Vec<DirEntry>, LocalErr>> + Send;

    /// Open a file for reading from the beginning. `None` if it does not exist (anymore).
    fn open(&self, path: &Path)
        -> impl Future<Output = Result<Option<Self::Reader>, LocalErr>> + Send;
}

/// A file opened for sequential reading.
pub trait ByteReader: Send + 'static {
    /// Read some bytes into `buf`. `Ok(0)` means there is nothing more, for now;
    /// the file may still grow.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<usize, LocalErr>> + Send;
}

#[derive(Debug, Default, Clone, Copy)]
/// Stream files on the local file system.
pub struct LocalBackend;

#[derive(Debug)]
pub struct LocalFileReader {
    file: File,
}

impl StorageBackend for LocalBackend {
    type Reader = LocalFileReader;

    async fn exists(&self, path: &Path) -> Result<bool, LocalErr> {
        Ok(fs::exists(path).await?)
    }

    async fn list_children(&self, path: &Path) -> Result<Vec<DirEntry>, LocalErr> {
        match fs::list_dir(path).await {
            Ok(entries) => Ok(entries),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn open(&self, path: &Path) -> Result<Option<LocalFileReader>, LocalErr> {
        match fs::open(path).await {
            Ok(file) => Ok(Some(LocalFileReader { file })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl ByteReader for LocalFileReader {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, LocalErr> {
        Ok(self.file.read(buf).await?)
    }
}
