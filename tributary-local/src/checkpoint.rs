use serde::{Deserialize, Serialize};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tributary_runtime::fs::{self, AsyncWriteExt};
use tributary_types::{PartitionKey, SeqNo, Timestamp};

use crate::{floor_to_minute, LocalConsumerOptions, LocalErr, Position, StreamFileName};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A persisted read position. `file` is `None` if nothing has been read yet.
pub struct Checkpoint {
    pub file: Option<StreamFileName>,
    /// Number of records of `file` already consumed.
    pub record_offset: SeqNo,
}

#[derive(Serialize, Deserialize)]
struct CheckpointJson {
    file: Option<String>,
    offset: SeqNo,
}

#[derive(Debug, Clone)]
/// Keeps the checkpoint of one consumer of one partition, in
/// `<dir>/<consumer>/<partition>.checkpoint`.
pub struct CheckpointStore {
    dir: PathBuf,
    partition: PartitionKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where a consumer starts.
pub struct StartPosition {
    pub seed: Position,
    /// True if `seed` came from a checkpoint.
    pub exact: bool,
    /// Lower bound of the first index rebuild.
    pub scan_from: Timestamp,
}

impl Checkpoint {
    pub fn new(file: StreamFileName, record_offset: SeqNo) -> Self {
        Self {
            file: Some(file),
            record_offset,
        }
    }
}

impl From<&Position> for Checkpoint {
    fn from(position: &Position) -> Self {
        Self::new(position.file.clone(), position.record_offset)
    }
}

impl CheckpointStore {
    pub fn new(dir: &Path, consumer_name: &str, partition: PartitionKey) -> Self {
        Self {
            dir: dir.join(consumer_name),
            partition,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.checkpoint", self.partition))
    }

    fn tmp_path(&self) -> PathBuf {
        self.dir.join(format!("{}.checkpoint.tmp", self.partition))
    }

    /// A missing, corrupt or foreign checkpoint is `None`. Only I/O failures are errors.
    pub async fn load(&self) -> Result<Option<Checkpoint>, LocalErr> {
        let path = self.path();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let json: CheckpointJson = match serde_json::from_str(&content) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Ignoring corrupt checkpoint {}: {e}", path.display());
                return Ok(None);
            }
        };
        let file = match json.file {
            Some(name) => match StreamFileName::from_checkpoint(&self.partition, &name) {
                Ok(file) => Some(file),
                Err(e) => {
                    log::warn!(
                        "Ignoring checkpoint {}: {name} is not a file of {}: {e}",
                        path.display(),
                        self.partition
                    );
                    return Ok(None);
                }
            },
            None => None,
        };
        Ok(Some(Checkpoint {
            file,
            record_offset: json.offset,
        }))
    }

    /// Replace the checkpoint atomically: a reader sees either the old or the new one, never a mix.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<(), LocalErr> {
        let json = serde_json::to_vec(&CheckpointJson {
            file: checkpoint.file.as_ref().map(|f| f.to_string()),
            offset: checkpoint.record_offset,
        })
        .map_err(LocalErr::CheckpointErr)?;

        fs::create_dir_all(&self.dir).await?;
        let tmp = self.tmp_path();
        let written: std::io::Result<()> = async {
            let mut file = fs::create(&tmp).await?;
            file.write_all(&json).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;
        if let Err(e) = written {
            if let Err(e) = fs::remove_file(&tmp).await {
                log::debug!("Failed to remove {}: {e}", tmp.display());
            }
            return Err(e.into());
        }
        fs::rename(&tmp, &self.path()).await?;
        log::debug!("Saved checkpoint {:?}", checkpoint);
        Ok(())
    }
}

/// Decide where to start reading: from the checkpoint if there is one, else from the start time,
/// else from the earliest retained minute, else from `now`. The first scan never goes
/// further back than `earliest`.
pub fn initial_position(
    options: &LocalConsumerOptions,
    checkpoint: Option<Checkpoint>,
    earliest: Option<Timestamp>,
    now: Timestamp,
) -> StartPosition {
    let (seed, exact) = match checkpoint {
        Some(Checkpoint {
            file: Some(file),
            record_offset,
        }) => (
            Position {
                file,
                record_offset,
                byte_offset: 0,
            },
            true,
        ),
        _ => {
            let ts = options.start_time().or(earliest).unwrap_or(now);
            let file = StreamFileName::first_of_minute(options.partition().clone(), ts, options.extension());
            (
                Position {
                    file,
                    record_offset: 0,
                    byte_offset: 0,
                },
                false,
            )
        }
    };
    let mut scan_from = seed.file.timestamp();
    if let Some(earliest) = earliest {
        scan_from = scan_from.max(floor_to_minute(earliest));
    }
    StartPosition {
        seed,
        exact,
        scan_from,
    }
}
