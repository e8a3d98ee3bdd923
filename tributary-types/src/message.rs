use std::{str::Utf8Error, sync::Arc};

use crate::{PartitionKey, SeqNo, StreamKey, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// One record read from a stream file. The payload is opaque; it is whatever
/// the record decoder carved out of the file, without the delimiter.
pub struct Record {
    header: RecordHeader,
    payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Where a record came from.
pub struct RecordHeader {
    stream_key: StreamKey,
    partition: PartitionKey,
    file: Arc<String>,
    offset: SeqNo,
    timestamp: Timestamp,
}

/// Common interface of byte containers.
pub trait Buffer {
    fn size(&self) -> usize;

    fn into_bytes(self) -> Vec<u8>;

    fn as_bytes(&self) -> &[u8];

    fn as_str(&self) -> Result<&str, Utf8Error>;
}

impl Record {
    pub fn new(header: RecordHeader, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    pub fn take(self) -> (RecordHeader, Vec<u8>) {
        let Self { header, payload } = self;
        (header, payload)
    }

    #[cfg(feature = "json")]
    #[cfg_attr(docsrs, doc(cfg(feature = "json")))]
    pub fn deserialize_json<D: serde::de::DeserializeOwned>(&self) -> Result<D, crate::JsonErr> {
        Ok(serde_json::from_str(self.as_str()?)?)
    }
}

impl Buffer for Record {
    fn size(&self) -> usize {
        self.payload.len()
    }

    fn into_bytes(self) -> Vec<u8> {
        self.payload
    }

    fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    fn as_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.payload)
    }
}

impl RecordHeader {
    pub fn new(
        stream_key: StreamKey,
        partition: PartitionKey,
        file: Arc<String>,
        offset: SeqNo,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            stream_key,
            partition,
            file,
            offset,
            timestamp,
        }
    }

    pub fn stream_key(&self) -> &StreamKey {
        &self.stream_key
    }

    pub fn partition(&self) -> &PartitionKey {
        &self.partition
    }

    /// Name of the stream file this record was read from.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Index of this record within its file.
    pub fn offset(&self) -> &SeqNo {
        &self.offset
    }

    /// Timestamp of the file, at minute resolution.
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}

impl Buffer for &'_ [u8] {
    fn size(&self) -> usize {
        self.len()
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_owned()
    }

    fn as_bytes(&self) -> &[u8] {
        self
    }

    fn as_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self)
    }
}

impl Buffer for &'_ str {
    fn size(&self) -> usize {
        self.len()
    }

    fn into_bytes(self) -> Vec<u8> {
        self.as_bytes().to_owned()
    }

    fn as_bytes(&self) -> &[u8] {
        str::as_bytes(self)
    }

    fn as_str(&self) -> Result<&str, Utf8Error> {
        Ok(self)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordHeader {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(serde::Serialize)]
        struct HeaderJson<'a> {
            stream_key: &'a str,
            partition: &'a str,
            file: &'a str,
            offset: SeqNo,
            timestamp: String,
        }

        HeaderJson {
            timestamp: self
                .timestamp
                .format(crate::TIMESTAMP_FORMAT)
                .expect("Timestamp format error"),
            stream_key: self.stream_key.name(),
            partition: self.partition.name(),
            file: &self.file,
            offset: self.offset,
        }
        .serialize(serializer)
    }
}
