use std::sync::Arc;
use tributary_types::{PartitionKey, Pull, Record, RecordHeader, SeqNo, StreamKey, Timestamp};

use crate::{
    ByteBuffer, ByteReader, LocalErr, PartitionFileIndex, ReaderMetrics, RecordDecoder,
    StorageBackend, StreamFileName, TimeWindowScanner,
};

/// Bytes requested from storage per read.
pub const BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where a cursor is in its partition.
pub struct Position {
    pub file: StreamFileName,
    /// Number of records of `file` already delivered.
    pub record_offset: SeqNo,
    /// Number of bytes of `file` those records took up.
    pub byte_offset: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Needs to (re)locate its position before reading.
    Idle,
    Reading,
    /// The current file yielded nothing more; look for the next one.
    AtEndOfFile,
    Closed,
}

struct OpenFile<R> {
    name: StreamFileName,
    display: Arc<String>,
    reader: R,
    buffer: ByteBuffer,
    /// Records still to be discarded, when resuming in the middle of a file.
    skip: u64,
}

/// Reads the files of one partition, one after another, as a single sequence of records.
///
/// Whenever the cursor runs out of known files, it rebuilds its index from its current
/// position onwards, so files created later and files purged meanwhile are both accounted for.
pub struct StreamCursor<B: StorageBackend, D: RecordDecoder> {
    topic: StreamKey,
    scanner: TimeWindowScanner<B>,
    index: PartitionFileIndex,
    decoder: D,
    state: CursorState,
    position: Position,
    /// Whether `position` names a real file, rather than a point in time.
    exact: bool,
    /// Rebuilds never scan further back than this.
    scan_floor: Option<Timestamp>,
    file: Option<OpenFile<B::Reader>>,
    chunk: Vec<u8>,
    metrics: Arc<ReaderMetrics>,
}

impl<B: StorageBackend, D: RecordDecoder> StreamCursor<B, D> {
    /// The cursor starts out [`CursorState::Idle`] at `seed`.
    /// It is `exact` if `seed` was a real read position, rather than a point in time.
    pub fn new(
        topic: StreamKey,
        scanner: TimeWindowScanner<B>,
        index: PartitionFileIndex,
        decoder: D,
        metrics: Arc<ReaderMetrics>,
        seed: Position,
        exact: bool,
    ) -> Self {
        Self {
            topic,
            scanner,
            index,
            decoder,
            state: CursorState::Idle,
            position: seed,
            exact,
            scan_floor: None,
            file: None,
            chunk: vec![0; BUFFER_SIZE],
            metrics,
        }
    }

    /// Read the next record, without waiting for one to become available.
    pub async fn pull(&mut self) -> Result<Pull<Record>, LocalErr> {
        loop {
            match self.state {
                CursorState::Closed => return Ok(Pull::Closed),
                CursorState::Idle => {
                    if !self.relocate().await? {
                        return Ok(Pull::Pending);
                    }
                }
                CursorState::Reading => match self.read_record().await? {
                    Some(record) => return Ok(Pull::Ready(record)),
                    None => self.state = CursorState::AtEndOfFile,
                },
                CursorState::AtEndOfFile => {
                    let Some(next) = self.find_next().await? else {
                        // the current file may still grow
                        self.state = CursorState::Reading;
                        return Ok(Pull::Pending);
                    };
                    // drain what was written since the last read before leaving
                    if let Some(record) = self.read_record().await? {
                        self.state = CursorState::Reading;
                        return Ok(Pull::Ready(record));
                    }
                    let tail = self.close_file();
                    log::info!("Reading from next file {next}");
                    if !self.open_from(next, 0).await? {
                        self.state = CursorState::Idle;
                    }
                    if let Some(record) = tail {
                        return Ok(Pull::Ready(record));
                    }
                }
            }
        }
    }

    /// Release the file handle. Every pull afterwards returns [`Pull::Closed`].
    pub fn close(&mut self) {
        self.file = None;
        self.state = CursorState::Closed;
    }

    /// Continue from exactly `position`.
    pub fn seek(&mut self, position: Position) {
        self.reseed(position, true);
    }

    /// Continue from the first file of the minute of `ts`.
    pub fn seek_time(&mut self, ts: Timestamp, extension: &str) {
        let file = StreamFileName::first_of_minute(self.index.partition().clone(), ts, extension);
        self.reseed(
            Position {
                file,
                record_offset: 0,
                byte_offset: 0,
            },
            false,
        );
    }

    fn reseed(&mut self, position: Position, exact: bool) {
        if let Some(mut file) = self.file.take() {
            self.decoder.flush(&mut file.buffer);
        }
        self.position = position;
        self.exact = exact;
        if self.state != CursorState::Closed {
            self.state = CursorState::Idle;
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn index(&self) -> &PartitionFileIndex {
        &self.index
    }

    pub fn scanner(&self) -> &TimeWindowScanner<B> {
        &self.scanner
    }

    /// Set the earliest minute known to be retained.
    pub fn set_scan_floor(&mut self, ts: Timestamp) {
        self.scan_floor = Some(ts);
    }

    /// Rebuild the index with the files from `from` until now.
    pub async fn rebuild(&mut self, from: Timestamp) -> Result<usize, LocalErr> {
        let from = match self.scan_floor {
            Some(floor) => from.max(floor),
            None => from,
        };
        self.metrics.add_rebuild();
        self.index
            .rebuild(&self.scanner, from, Timestamp::now_utc())
            .await
    }

    /// Open the file at the seed position, or the one after it if it is gone.
    async fn relocate(&mut self) -> Result<bool, LocalErr> {
        let seed = self.position.clone();
        for attempt in 0..2 {
            if let Some(found) = self.index.ceiling(&seed.file).cloned() {
                let skip = if found == seed.file {
                    seed.record_offset
                } else {
                    if self.exact {
                        self.metrics.add_relocation();
                        log::info!("File {} is gone, skipping forward to {found}", seed.file);
                    }
                    0
                };
                return self.open_from(found, skip).await;
            }
            if attempt == 0 {
                self.rebuild(seed.file.timestamp()).await?;
            }
        }
        Ok(false)
    }

    async fn find_next(&mut self) -> Result<Option<StreamFileName>, LocalErr> {
        let current = self.position.file.clone();
        if let Some(next) = self.index.next_after(&current) {
            return Ok(Some(next.clone()));
        }

        self.rebuild(current.timestamp()).await?;
        if self.index.lookup(&current).is_some() {
            return Ok(self.index.next_after(&current).cloned());
        }
        let next = self.index.ceiling(&current).cloned();
        if let Some(next) = &next {
            self.metrics.add_relocation();
            log::info!("File {current} is no longer listed, skipping forward to {next}");
        }
        Ok(next)
    }

    /// Open `name`, discarding its first `skip` records. If it has vanished, move on to
    /// the next file. Returns false if there is no file to move on to.
    async fn open_from(&mut self, mut name: StreamFileName, mut skip: u64) -> Result<bool, LocalErr> {
        loop {
            let path = match self.index.lookup(&name) {
                Some(meta) => meta.path.clone(),
                None => name.path(self.scanner.root()),
            };
            if let Some(reader) = self.scanner.backend().open(&path).await? {
                self.metrics.add_file_opened();
                log::debug!("Opened {}", path.display());
                self.position = Position {
                    file: name.clone(),
                    record_offset: skip,
                    byte_offset: 0,
                };
                self.exact = true;
                self.file = Some(OpenFile {
                    display: Arc::new(name.to_string()),
                    name,
                    reader,
                    buffer: ByteBuffer::new(),
                    skip,
                });
                self.state = CursorState::Reading;
                return Ok(true);
            }

            log::info!("File {} vanished before it could be read", path.display());
            self.rebuild(name.timestamp()).await?;
            match self.index.next_after(&name).cloned() {
                Some(next) => {
                    self.metrics.add_relocation();
                    name = next;
                    skip = 0;
                }
                None => {
                    self.position = Position {
                        file: name,
                        record_offset: 0,
                        byte_offset: 0,
                    };
                    return Ok(false);
                }
            }
        }
    }

    async fn read_record(&mut self) -> Result<Option<Record>, LocalErr> {
        let Some(file) = self.file.as_mut() else {
            return Ok(None);
        };
        loop {
            let before = file.buffer.size();
            if let Some(payload) = self.decoder.decode(&mut file.buffer) {
                let size = (before - file.buffer.size()) as u64;
                self.position.byte_offset += size;
                if file.skip > 0 {
                    file.skip -= 1;
                    continue;
                }
                return Ok(Some(deliver(
                    &self.topic,
                    self.index.partition(),
                    &mut self.position,
                    file,
                    payload,
                )));
            }
            let n = file.reader.read(&mut self.chunk).await?;
            if n == 0 {
                return Ok(None);
            }
            self.metrics.add_bytes_read(n);
            file.buffer.append(&self.chunk[..n]);
        }
    }

    /// Close the current file, returning its trailing partial record if there is one.
    fn close_file(&mut self) -> Option<Record> {
        let mut file = self.file.take()?;
        let before = file.buffer.size();
        let payload = self.decoder.flush(&mut file.buffer)?;
        self.position.byte_offset += (before - file.buffer.size()) as u64;
        if file.skip > 0 {
            return None;
        }
        Some(deliver(
            &self.topic,
            self.index.partition(),
            &mut self.position,
            &file,
            payload,
        ))
    }
}

fn deliver<R>(
    topic: &StreamKey,
    partition: &PartitionKey,
    position: &mut Position,
    file: &OpenFile<R>,
    payload: Vec<u8>,
) -> Record {
    let header = RecordHeader::new(
        topic.clone(),
        partition.clone(),
        file.display.clone(),
        position.record_offset,
        file.name.timestamp(),
    );
    position.record_offset += 1;
    Record::new(header, payload)
}

impl<B: StorageBackend, D: RecordDecoder> std::fmt::Debug for StreamCursor<B, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamCursor")
            .field("topic", &self.topic)
            .field("partition", self.index.partition())
            .field("state", &self.state)
            .field("position", &self.position)
            .field("exact", &self.exact)
            .finish()
    }
}
