use futures::future::{ready, Future, Ready};
use std::{
    io::{Error as IoError, ErrorKind},
    path::Path,
};

/// Placeholder; every operation fails.
#[derive(Debug)]
pub struct File;

pub trait AsyncReadExt {
    type Future: Future<Output = Result<usize, IoError>>;

    fn read(&mut self, _: &mut [u8]) -> Self::Future;
}

pub trait AsyncWriteExt {
    type Future: Future<Output = Result<(), IoError>>;

    fn write_all(&mut self, _: &[u8]) -> Self::Future;

    fn flush(&mut self) -> Self::Future;
}

pub(crate) fn unsupported(path: &Path) -> IoError {
    IoError::new(
        ErrorKind::Other,
        format!("Please enable a runtime ({})", path.display()),
    )
}

impl File {
    pub async fn open(path: &Path) -> Result<Self, IoError> {
        Err(unsupported(path))
    }

    pub async fn create(path: &Path) -> Result<Self, IoError> {
        Err(unsupported(path))
    }

    pub async fn sync_all(&self) -> Result<(), IoError> {
        Err(IoError::new(ErrorKind::Other, "Please enable a runtime"))
    }
}

impl AsyncReadExt for File {
    type Future = Ready<Result<usize, IoError>>;

    fn read(&mut self, _: &mut [u8]) -> Self::Future {
        ready(Err(IoError::new(
            ErrorKind::Other,
            "Please enable a runtime",
        )))
    }
}

impl AsyncWriteExt for File {
    type Future = Ready<Result<(), IoError>>;

    fn write_all(&mut self, _: &[u8]) -> Self::Future {
        ready(Err(IoError::new(
            ErrorKind::Other,
            "Please enable a runtime",
        )))
    }

    fn flush(&mut self) -> Self::Future {
        ready(Err(IoError::new(
            ErrorKind::Other,
            "Please enable a runtime",
        )))
    }
}
