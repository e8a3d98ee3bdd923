use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tributary_types::{PartitionKey, StreamKey, Timestamp};

/// How long a consumer waits before retrying, when it has caught up with the stream.
pub const DEFAULT_WAIT_TIME_FOR_FILE_CREATE: Duration = Duration::from_secs(1);
pub const DEFAULT_EXTENSION: &str = "log";

#[derive(Debug, Clone)]
/// Options of a consumer of one partition of a stream on local storage.
pub struct LocalConsumerOptions {
    topic: StreamKey,
    consumer_name: String,
    partition: PartitionKey,
    root: PathBuf,
    start_time: Option<Timestamp>,
    wait_time_for_file_create: Duration,
    checkpoint_dir: Option<PathBuf>,
    extension: String,
}

impl LocalConsumerOptions {
    /// `root` is the directory containing the `<yyyy>` directories of the stream.
    pub fn new<S: Into<String>, P: Into<PathBuf>>(
        topic: StreamKey,
        consumer_name: S,
        partition: PartitionKey,
        root: P,
    ) -> Self {
        Self {
            topic,
            consumer_name: consumer_name.into(),
            partition,
            root: root.into(),
            start_time: None,
            wait_time_for_file_create: DEFAULT_WAIT_TIME_FOR_FILE_CREATE,
            checkpoint_dir: None,
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    pub fn topic(&self) -> &StreamKey {
        &self.topic
    }

    pub fn consumer_name(&self) -> &str {
        &self.consumer_name
    }

    pub fn partition(&self) -> &PartitionKey {
        &self.partition
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where to start reading, if there is no checkpoint.
    /// It must not be in the future.
    ///
    /// If unset, defaults to the earliest file retained.
    pub fn set_start_time(&mut self, v: Timestamp) -> &mut Self {
        self.start_time = Some(v);
        self
    }
    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    /// How long to wait for a new file (or new records) after reaching the end of the stream.
    ///
    /// If unset, defaults to [`DEFAULT_WAIT_TIME_FOR_FILE_CREATE`].
    pub fn set_wait_time_for_file_create(&mut self, v: Duration) -> &mut Self {
        self.wait_time_for_file_create = v;
        self
    }
    pub fn wait_time_for_file_create(&self) -> Duration {
        self.wait_time_for_file_create
    }

    /// Where to keep checkpoints. `mark` and `reset` do nothing unless this is set.
    pub fn set_checkpoint_dir<P: Into<PathBuf>>(&mut self, v: P) -> &mut Self {
        self.checkpoint_dir = Some(v.into());
        self
    }
    pub fn checkpoint_dir(&self) -> Option<&Path> {
        self.checkpoint_dir.as_deref()
    }

    /// The file extension of the stream files.
    ///
    /// If unset, defaults to [`DEFAULT_EXTENSION`].
    pub fn set_extension<S: Into<String>>(&mut self, v: S) -> &mut Self {
        self.extension = v.into();
        self
    }
    pub fn extension(&self) -> &str {
        &self.extension
    }
}
