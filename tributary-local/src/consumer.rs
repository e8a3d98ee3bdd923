use flume::{bounded, Receiver, Sender};
use std::{
    pin::pin,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tributary_runtime::{sleep, AsyncMutex};
use tributary_types::{
    export::futures::{future::select, stream, Stream},
    ConsumerMetrics, ConsumerStats, PartitionKey, Pull, Record, RecordSource, StreamKey,
    StreamResult, Timestamp,
};

use crate::{LocalConsumerOptions, LocalResult, LocalStreamSource};

/// Drives a [`RecordSource`]: blocks while the source has nothing to offer, keeps the metrics
/// and serializes every call, so it can be shared between tasks.
pub struct MessageConsumer<S: RecordSource> {
    source: AsyncMutex<S>,
    topic: StreamKey,
    partition: PartitionKey,
    consumer_name: String,
    start_time: Option<Timestamp>,
    wait_time: Duration,
    mark_supported: bool,
    metrics: ConsumerMetrics,
    closed: AtomicBool,
    wake: Sender<()>,
    woken: Receiver<()>,
}

/// A consumer of newline delimited records on the local file system.
pub type LocalConsumer = MessageConsumer<LocalStreamSource>;

impl LocalConsumer {
    pub async fn open(options: LocalConsumerOptions) -> LocalResult<Self> {
        Ok(Self::new(LocalStreamSource::new(options).await?))
    }
}

impl<S: RecordSource> MessageConsumer<S> {
    pub fn new(source: S) -> Self {
        let (wake, woken) = bounded(1);
        Self {
            topic: source.topic().clone(),
            partition: source.partition().clone(),
            consumer_name: source.consumer_name().to_owned(),
            start_time: source.start_time(),
            wait_time: source.wait_time(),
            mark_supported: source.mark_supported(),
            source: AsyncMutex::new(source),
            metrics: ConsumerMetrics::new(),
            closed: AtomicBool::new(false),
            wake,
            woken,
        }
    }

    /// Wait for the next record. Returns `None` once the consumer is closed.
    ///
    /// While the stream has nothing new, the source is polled every `wait_time`.
    pub async fn next(&self) -> StreamResult<Option<Record>, S::Error> {
        if self.is_closed() {
            return Ok(None);
        }
        let mut source = self.source.lock().await;
        loop {
            if self.is_closed() {
                return Ok(None);
            }
            match source.next_record().await? {
                Pull::Ready(record) => {
                    self.metrics.add_messages_consumed();
                    return Ok(Some(record));
                }
                Pull::Closed => return Ok(None),
                Pull::Pending => {
                    select(pin!(sleep(self.wait_time)), pin!(self.woken.recv_async())).await;
                }
            }
        }
    }

    /// Read the next record if there is one, without waiting.
    pub async fn try_next(&self) -> StreamResult<Pull<Record>, S::Error> {
        if self.is_closed() {
            return Ok(Pull::Closed);
        }
        let pull = self.source.lock().await.next_record().await?;
        if pull.is_ready() {
            self.metrics.add_messages_consumed();
        }
        Ok(pull)
    }

    /// All records, ending when the consumer is closed.
    pub fn stream(&self) -> impl Stream<Item = StreamResult<Record, S::Error>> + '_ {
        stream::unfold(self, |consumer| async move {
            match consumer.next().await {
                Ok(Some(record)) => Some((Ok(record), consumer)),
                Ok(None) => None,
                Err(e) => Some((Err(e), consumer)),
            }
        })
    }

    /// Persist the current position. Does nothing if the source does not support it.
    pub async fn mark(&self) -> StreamResult<(), S::Error> {
        if !self.mark_supported {
            return Ok(());
        }
        self.source.lock().await.do_mark().await?;
        self.metrics.add_mark_calls();
        Ok(())
    }

    /// Go back to the last persisted position. Does nothing if the source does not support it.
    pub async fn reset(&self) -> StreamResult<(), S::Error> {
        if !self.mark_supported {
            return Ok(());
        }
        self.source.lock().await.do_reset().await?;
        self.metrics.add_reset_calls();
        Ok(())
    }

    /// Stop consuming. A pending `next` returns `None` promptly.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        // full means a wake-up is already pending
        self.wake.try_send(()).ok();
        self.source.lock().await.close();
        log::debug!("Consumer {} of {} closed", self.consumer_name, self.partition);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn topic(&self) -> &StreamKey {
        &self.topic
    }

    pub fn partition(&self) -> &PartitionKey {
        &self.partition
    }

    pub fn consumer_name(&self) -> &str {
        &self.consumer_name
    }

    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    pub fn mark_supported(&self) -> bool {
        self.mark_supported
    }

    pub fn metrics(&self) -> ConsumerStats {
        self.metrics.snapshot()
    }
}

impl<S: RecordSource> std::fmt::Debug for MessageConsumer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MessageConsumer {{ topic: {}, partition: {}, consumer_name: {} }}",
            self.topic, self.partition, self.consumer_name
        )
    }
}
