use std::{sync::Arc, time::Duration};
use tributary_types::{
    PartitionKey, Pull, Record, RecordSource, StreamErr, StreamKey, Timestamp,
};

use crate::{
    initial_position, Checkpoint, CheckpointStore, LineDecoder, LocalBackend,
    LocalConsumerOptions, LocalErr, LocalResult, PartitionFileIndex, ReaderMetrics,
    RecordDecoder, StorageBackend, StreamCursor, TimeWindowScanner,
};

/// Reads one partition of a stream from a [`StorageBackend`], checkpointing if configured to.
pub struct LocalStreamSource<B: StorageBackend = LocalBackend, D: RecordDecoder = LineDecoder> {
    options: LocalConsumerOptions,
    cursor: StreamCursor<B, D>,
    checkpoints: Option<CheckpointStore>,
    metrics: Arc<ReaderMetrics>,
}

impl LocalStreamSource {
    /// Newline delimited records on the local file system.
    pub async fn new(options: LocalConsumerOptions) -> LocalResult<Self> {
        Self::new_with(options, LocalBackend, LineDecoder).await
    }
}

impl<B: StorageBackend, D: RecordDecoder> LocalStreamSource<B, D> {
    /// Fails with [`StreamErr::InvalidArgument`] if the start time is in the future.
    pub async fn new_with(options: LocalConsumerOptions, backend: B, decoder: D) -> LocalResult<Self> {
        let now = Timestamp::now_utc();
        if matches!(options.start_time(), Some(start) if start > now) {
            return Err(StreamErr::InvalidArgument(
                "Future start time is not accepted".to_owned(),
            ));
        }

        let metrics = Arc::new(ReaderMetrics::new());
        let scanner = TimeWindowScanner::new(
            Arc::new(backend),
            options.root().to_owned(),
            metrics.clone(),
        );
        let checkpoints = options.checkpoint_dir().map(|dir| {
            CheckpointStore::new(dir, options.consumer_name(), options.partition().clone())
        });
        let index = PartitionFileIndex::new(options.partition().clone());
        let start = initial_position(&options, None, None, now);
        let cursor = StreamCursor::new(
            options.topic().clone(),
            scanner,
            index,
            decoder,
            metrics.clone(),
            start.seed,
            start.exact,
        );

        let mut source = Self {
            options,
            cursor,
            checkpoints,
            metrics,
        };
        source.restore().await.map_err(StreamErr::Backend)?;
        Ok(source)
    }

    /// Counters of the underlying reader.
    pub fn reader_metrics(&self) -> Arc<ReaderMetrics> {
        self.metrics.clone()
    }

    pub fn options(&self) -> &LocalConsumerOptions {
        &self.options
    }

    pub fn cursor(&self) -> &StreamCursor<B, D> {
        &self.cursor
    }

    /// Move the cursor to the checkpoint, or to the start.
    async fn restore(&mut self) -> Result<(), LocalErr> {
        let checkpoint = match &self.checkpoints {
            Some(store) => store.load().await?,
            None => None,
        };
        let earliest = self.cursor.scanner().earliest_minute().await?;
        let start = initial_position(&self.options, checkpoint, earliest, Timestamp::now_utc());
        if let Some(earliest) = earliest {
            self.cursor.set_scan_floor(earliest);
        }
        log::info!(
            "Consumer {} of {}/{} starting from {} (record {})",
            self.options.consumer_name(),
            self.options.topic(),
            self.options.partition(),
            start.seed.file,
            start.seed.record_offset,
        );
        if start.exact {
            self.cursor.seek(start.seed);
        } else {
            self.cursor
                .seek_time(start.seed.file.timestamp(), self.options.extension());
        }
        self.cursor.rebuild(start.scan_from).await?;
        Ok(())
    }
}

impl<B: StorageBackend, D: RecordDecoder> RecordSource for LocalStreamSource<B, D> {
    type Error = LocalErr;

    fn topic(&self) -> &StreamKey {
        self.options.topic()
    }

    fn partition(&self) -> &PartitionKey {
        self.options.partition()
    }

    fn consumer_name(&self) -> &str {
        self.options.consumer_name()
    }

    fn start_time(&self) -> Option<Timestamp> {
        self.options.start_time()
    }

    fn wait_time(&self) -> Duration {
        self.options.wait_time_for_file_create()
    }

    fn mark_supported(&self) -> bool {
        self.checkpoints.is_some()
    }

    async fn next_record(&mut self) -> LocalResult<Pull<Record>> {
        self.cursor.pull().await.map_err(StreamErr::Backend)
    }

    /// Before anything is read, there is no file to point to; the checkpoint says so.
    async fn do_mark(&mut self) -> LocalResult<()> {
        let Some(store) = &self.checkpoints else {
            return Ok(());
        };
        let checkpoint = if self.cursor.is_exact() {
            Checkpoint::from(self.cursor.position())
        } else {
            Checkpoint {
                file: None,
                record_offset: 0,
            }
        };
        store.save(&checkpoint).await.map_err(StreamErr::Backend)
    }

    async fn do_reset(&mut self) -> LocalResult<()> {
        if self.checkpoints.is_none() {
            return Ok(());
        }
        self.restore().await.map_err(StreamErr::Backend)
    }

    fn close(&mut self) {
        self.cursor.close();
    }
}

impl<B: StorageBackend, D: RecordDecoder> std::fmt::Debug for LocalStreamSource<B, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStreamSource")
            .field("options", &self.options)
            .field("cursor", &self.cursor)
            .finish()
    }
}
