#![allow(dead_code)]

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};
use time::Duration as TimeDuration;
use tributary_local::{floor_to_hour, LocalConsumerOptions, StreamFileName};
use tributary_types::{PartitionKey, StreamKey, Timestamp};

pub const EXT: &str = "log";

/// Three whole hours ago, so that every file a test writes is in the past.
pub fn base_time() -> Timestamp {
    floor_to_hour(Timestamp::now_utc()) - TimeDuration::hours(3)
}

pub fn minutes(n: i64) -> TimeDuration {
    TimeDuration::minutes(n)
}

pub fn partition(name: &str) -> PartitionKey {
    PartitionKey::new(name).unwrap()
}

pub fn file_name(partition_key: &str, ts: Timestamp, seq: u32) -> StreamFileName {
    StreamFileName::new(partition(partition_key), ts, seq, EXT).unwrap()
}

/// Write a stream file under `root`, creating its minute directory.
pub fn write_file(
    root: &Path,
    partition_key: &str,
    ts: Timestamp,
    seq: u32,
    content: &str,
) -> std::io::Result<PathBuf> {
    let path = file_name(partition_key, ts, seq).path(root);
    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(&path, content)?;
    Ok(path)
}

pub fn append(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new().append(true).open(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()
}

pub fn options(root: &Path, partition_key: &str) -> LocalConsumerOptions {
    let mut options = LocalConsumerOptions::new(
        StreamKey::new("clicks").unwrap(),
        "test",
        partition(partition_key),
        root,
    );
    options.set_wait_time_for_file_create(Duration::from_millis(50));
    options
}
