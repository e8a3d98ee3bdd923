//! Stream file naming.
//!
//! A collector writes its files into minute directories:
//!
//! ```ignore
//! <root>/<yyyy>/<MM>/<dd>/<HH>/<mm>/<partition>-<yyyy>-<MM>-<dd>-<HH>-<mm>-<sequence>.<ext>
//! ```
//!
//! The timestamp is fixed width and the sequence is exactly 5 digits, so that within one
//! partition, sorting file names lexically is the same as sorting them by [`StreamFileName`]'s order.
//! Sequences beyond [`MAX_SEQUENCE`] cannot be named.
//! All timestamps are in UTC.

use std::{
    cmp::Ordering,
    fmt::Display,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};
use thiserror::Error;
use time::{Date, Duration, Month, PrimitiveDateTime, Time, UtcOffset};
use tributary_types::{PartitionKey, Timestamp};

/// Length of `yyyy-MM-dd-HH-mm`.
const TIMESTAMP_LEN: usize = 16;
const SEQUENCE_LEN: usize = 5;
/// The largest sequence number within one minute.
pub const MAX_SEQUENCE: u32 = 99_999;

#[derive(Debug, Clone)]
/// Identifies a stream file. Ordered by timestamp, then sequence, then partition key.
pub struct StreamFileName {
    partition: PartitionKey,
    timestamp: Timestamp,
    sequence: u32,
    extension: String,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// The name is not a stream file of the partition in question.
pub enum NameErr {
    #[error("Name does not start with the partition key")]
    PartitionMismatch,
    #[error("Malformed timestamp")]
    Timestamp,
    #[error("Malformed sequence")]
    Sequence,
    #[error("Missing extension")]
    Extension,
}

impl StreamFileName {
    /// The timestamp is floored to the minute. Fails if `sequence` is above [`MAX_SEQUENCE`].
    pub fn new<S: Into<String>>(
        partition: PartitionKey,
        timestamp: Timestamp,
        sequence: u32,
        extension: S,
    ) -> Result<Self, NameErr> {
        if sequence > MAX_SEQUENCE {
            return Err(NameErr::Sequence);
        }
        Ok(Self {
            sequence,
            ..Self::first_of_minute(partition, timestamp, extension)
        })
    }

    /// The name with sequence 0 in the minute of `timestamp`.
    pub fn first_of_minute<S: Into<String>>(
        partition: PartitionKey,
        timestamp: Timestamp,
        extension: S,
    ) -> Self {
        Self {
            partition,
            timestamp: floor_to_minute(timestamp),
            sequence: 0,
            extension: extension.into(),
        }
    }

    /// Parse a file name. Anything that is not a well-formed name of `partition` fails;
    /// callers should treat that as "not a stream file".
    pub fn decode(partition: &PartitionKey, name: &str) -> Result<Self, NameErr> {
        let rest = name
            .strip_prefix(partition.name())
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or(NameErr::PartitionMismatch)?;
        let timestamp = rest
            .get(..TIMESTAMP_LEN)
            .and_then(parse_timestamp)
            .ok_or(NameErr::Timestamp)?;
        let rest = rest
            .get(TIMESTAMP_LEN..)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or(NameErr::Sequence)?;
        let (sequence, extension) = rest.split_once('.').ok_or(NameErr::Extension)?;
        if sequence.len() != SEQUENCE_LEN || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NameErr::Sequence);
        }
        let sequence = sequence.parse().map_err(|_| NameErr::Sequence)?;
        if extension.is_empty() {
            return Err(NameErr::Extension);
        }
        Ok(Self {
            partition: partition.clone(),
            timestamp,
            sequence,
            extension: extension.to_owned(),
        })
    }

    /// Like [`StreamFileName::decode`], but also accepts a name without the `<partition>-` prefix,
    /// as written by older checkpoints.
    pub fn from_checkpoint(partition: &PartitionKey, name: &str) -> Result<Self, NameErr> {
        match Self::decode(partition, name) {
            Ok(file) => Ok(file),
            Err(NameErr::PartitionMismatch) => Self::decode(partition, &format!("{partition}-{name}")),
            Err(e) => Err(e),
        }
    }

    pub fn partition(&self) -> &PartitionKey {
        &self.partition
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Full path of this file under the stream root.
    pub fn path(&self, root: &Path) -> PathBuf {
        minute_dir(root, self.timestamp).join(self.to_string())
    }

    fn key(&self) -> (Timestamp, u32, &str) {
        (self.timestamp, self.sequence, self.partition.name())
    }
}

impl Display for StreamFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ts = self.timestamp;
        write!(
            f,
            "{}-{:04}-{:02}-{:02}-{:02}-{:02}-{:05}.{}",
            self.partition,
            ts.year(),
            u8::from(ts.month()),
            ts.day(),
            ts.hour(),
            ts.minute(),
            self.sequence,
            self.extension
        )
    }
}

impl PartialEq for StreamFileName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for StreamFileName {}

impl PartialOrd for StreamFileName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StreamFileName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for StreamFileName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let b = s.as_bytes();
    if b.len() != TIMESTAMP_LEN || [4, 7, 10, 13].iter().any(|&i| b[i] != b'-') {
        return None;
    }
    let num = |from: usize, to: usize| -> Option<u32> {
        let digits = s.get(from..to)?;
        if digits.bytes().all(|b| b.is_ascii_digit()) {
            digits.parse().ok()
        } else {
            None
        }
    };
    let date = Date::from_calendar_date(
        num(0, 4)? as i32,
        Month::try_from(num(5, 7)? as u8).ok()?,
        num(8, 10)? as u8,
    )
    .ok()?;
    let time = Time::from_hms(num(11, 13)? as u8, num(14, 16)? as u8, 0).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_utc())
}

/// Truncate to the start of the minute, in UTC.
pub fn floor_to_minute(ts: Timestamp) -> Timestamp {
    let ts = ts.to_offset(UtcOffset::UTC);
    ts - Duration::seconds(ts.second() as i64) - Duration::nanoseconds(ts.nanosecond() as i64)
}

/// Truncate to the start of the hour, in UTC.
pub fn floor_to_hour(ts: Timestamp) -> Timestamp {
    let ts = floor_to_minute(ts);
    ts - Duration::minutes(ts.minute() as i64)
}

/// `<root>/<yyyy>/<MM>/<dd>/<HH>`
pub fn hour_dir(root: &Path, ts: Timestamp) -> PathBuf {
    let ts = ts.to_offset(UtcOffset::UTC);
    root.join(format!("{:04}", ts.year()))
        .join(format!("{:02}", u8::from(ts.month())))
        .join(format!("{:02}", ts.day()))
        .join(format!("{:02}", ts.hour()))
}

/// `<root>/<yyyy>/<MM>/<dd>/<HH>/<mm>`
pub fn minute_dir(root: &Path, ts: Timestamp) -> PathBuf {
    let ts = ts.to_offset(UtcOffset::UTC);
    hour_dir(root, ts).join(format!("{:02}", ts.minute()))
}
