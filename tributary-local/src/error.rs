use tributary_types::StreamResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocalErr {
    #[error("IO Error: {0}")]
    IoError(#[source] std::io::Error),
    #[error("Checkpoint Error: {0}")]
    CheckpointErr(#[source] serde_json::Error),
}

pub type LocalResult<T> = StreamResult<T, LocalErr>;

impl From<std::io::Error> for LocalErr {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}
