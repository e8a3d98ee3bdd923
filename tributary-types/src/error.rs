use thiserror::Error;

/// Type alias of the [`Result`] type specific to `tributary`.
pub type StreamResult<T, E> = std::result::Result<T, StreamErr<E>>;

#[derive(Error, Debug)]
/// Common errors that may occur.
///
/// Stream topology anomalies (gaps, rotations, retention loss) are never errors;
/// only misconfiguration and backend failures surface here.
pub enum StreamErr<E: std::error::Error> {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("StreamKeyErr {0}")]
    StreamKeyErr(#[from] StreamKeyErr),
    #[error("Backend error: {0}")]
    Backend(E),
}

#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
#[derive(Error, Debug)]
/// Errors that may happen when processing JSON
pub enum JsonErr {
    #[error("Utf8Error {0}")]
    Utf8Error(#[from] std::str::Utf8Error),
    #[error("serde_json::Error {0}")]
    SerdeJson(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Errors that may happen when handling StreamKey or PartitionKey
pub enum StreamKeyErr {
    #[error("Invalid stream key: valid pattern is [a-zA-Z0-9._-]{{1, 249}}")]
    InvalidStreamKey,
    #[error("Invalid partition key: valid pattern is [a-zA-Z0-9._-]{{1, 249}}")]
    InvalidPartitionKey,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::PartitionKey;

    #[test]
    fn test_stream_err() {
        fn partition(key: &str) -> StreamResult<PartitionKey, std::io::Error> {
            Ok(PartitionKey::new(key)?)
        }

        assert!(partition("c1").is_ok());
        let err = partition("c 1").unwrap_err();
        assert!(matches!(
            err,
            StreamErr::StreamKeyErr(StreamKeyErr::InvalidPartitionKey)
        ));

        let err: StreamErr<std::io::Error> =
            StreamErr::Backend(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(err.to_string(), "Backend error: disk");
    }
}
