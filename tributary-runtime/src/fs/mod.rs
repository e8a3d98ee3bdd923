//! Async file system operations, backed by whichever runtime is enabled.
//!
//! Paths are always `std::path::Path`; converting to the runtime's own path type is done here.

use std::{io::ErrorKind, path::Path};

#[cfg(feature = "runtime-tokio")]
pub use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};

#[cfg(feature = "runtime-async-std")]
pub use async_std::{
    fs::File,
    io::{ReadExt as AsyncReadExt, WriteExt as AsyncWriteExt},
};

#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
mod no_rt;
#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
pub use no_rt::*;

pub use std::io::{Error as IoError, Result as IoResult};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One entry of a directory listing.
pub struct DirEntry {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
}

#[cfg(feature = "runtime-async-std")]
fn async_path(path: &Path) -> &async_std::path::Path {
    async_std::path::Path::new(path.as_os_str())
}

/// Open a file for reading.
pub async fn open(path: &Path) -> IoResult<File> {
    #[cfg(feature = "runtime-tokio")]
    return File::open(path).await;

    #[cfg(feature = "runtime-async-std")]
    return File::open(async_path(path)).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    return File::open(path).await;
}

/// Create a file for writing, truncating it if it already exists.
pub async fn create(path: &Path) -> IoResult<File> {
    #[cfg(feature = "runtime-tokio")]
    return File::create(path).await;

    #[cfg(feature = "runtime-async-std")]
    return File::create(async_path(path)).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    return File::create(path).await;
}

/// Read the entire file into a string.
pub async fn read_to_string(path: &Path) -> IoResult<String> {
    #[cfg(feature = "runtime-tokio")]
    return tokio::fs::read_to_string(path).await;

    #[cfg(feature = "runtime-async-std")]
    return async_std::fs::read_to_string(async_path(path)).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    return Err(no_rt::unsupported(path));
}

/// Atomically replace `_to` with `from`, on file systems that support it.
pub async fn rename(from: &Path, _to: &Path) -> IoResult<()> {
    #[cfg(feature = "runtime-tokio")]
    return tokio::fs::rename(from, _to).await;

    #[cfg(feature = "runtime-async-std")]
    return async_std::fs::rename(async_path(from), async_path(_to)).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    return Err(no_rt::unsupported(from));
}

pub async fn create_dir_all(path: &Path) -> IoResult<()> {
    #[cfg(feature = "runtime-tokio")]
    return tokio::fs::create_dir_all(path).await;

    #[cfg(feature = "runtime-async-std")]
    return async_std::fs::create_dir_all(async_path(path)).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    return Err(no_rt::unsupported(path));
}

pub async fn remove_file(path: &Path) -> IoResult<()> {
    #[cfg(feature = "runtime-tokio")]
    return tokio::fs::remove_file(path).await;

    #[cfg(feature = "runtime-async-std")]
    return async_std::fs::remove_file(async_path(path)).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    return Err(no_rt::unsupported(path));
}

/// Whether anything exists at `path`.
pub async fn exists(path: &Path) -> IoResult<bool> {
    #[cfg(feature = "runtime-tokio")]
    let res = tokio::fs::metadata(path).await;

    #[cfg(feature = "runtime-async-std")]
    let res = async_std::fs::metadata(async_path(path)).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    let res: IoResult<std::fs::Metadata> = Err(no_rt::unsupported(path));

    match res {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// List a directory, sorted by name. Entries vanishing while being listed are left out.
pub async fn list_dir(path: &Path) -> IoResult<Vec<DirEntry>> {
    let mut entries: Vec<DirEntry> = Vec::new();

    #[cfg(feature = "runtime-tokio")]
    {
        let mut dir = tokio::fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            match entry.metadata().await {
                Ok(meta) => entries.push(DirEntry {
                    name,
                    size: meta.len(),
                    is_dir: meta.is_dir(),
                }),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
    }

    #[cfg(feature = "runtime-async-std")]
    {
        use futures::StreamExt;

        let mut dir = async_std::fs::read_dir(async_path(path)).await?;
        while let Some(entry) = dir.next().await {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            match entry.metadata().await {
                Ok(meta) => entries.push(DirEntry {
                    name,
                    size: meta.len(),
                    is_dir: meta.is_dir(),
                }),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
    }

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    return Err(no_rt::unsupported(path));

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
