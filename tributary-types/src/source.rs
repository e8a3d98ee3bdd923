use crate::{PartitionKey, Record, StreamKey, StreamResult, Timestamp};
use futures::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a non-blocking read.
pub enum Pull<T> {
    /// A record is available.
    Ready(T),
    /// Nothing to read right now; the producer may not have written further yet,
    /// or the stream is at a gap awaiting a newer file. Try again later.
    Pending,
    /// The source has been closed. This is final.
    Closed,
}

/// Common interface of record sources, to be implemented by every kind of stream reader.
///
/// A source is driven by exactly one logical consumer at a time; it never has to be reentrant.
/// Everything shared between the variants (blocking, metrics, serializing calls) lives in the driver.
pub trait RecordSource: Sized + Send {
    type Error: std::error::Error;

    /// Topic being consumed.
    fn topic(&self) -> &StreamKey;

    /// Partition being consumed.
    fn partition(&self) -> &PartitionKey;

    /// Name of the consumer; checkpoints are kept per consumer.
    fn consumer_name(&self) -> &str;

    /// The time consumption was requested to start from, if any.
    fn start_time(&self) -> Option<Timestamp>;

    /// How long the driver should wait after [`Pull::Pending`] before trying again.
    fn wait_time(&self) -> Duration;

    /// Whether [`RecordSource::do_mark`] and [`RecordSource::do_reset`] are meaningful.
    fn mark_supported(&self) -> bool;

    /// Read the next record without waiting.
    fn next_record(
        &mut self,
    ) -> impl Future<Output = StreamResult<Pull<Record>, Self::Error>> + Send;

    /// Persist the current read position.
    fn do_mark(&mut self) -> impl Future<Output = StreamResult<(), Self::Error>> + Send;

    /// Go back to the last persisted read position.
    fn do_reset(&mut self) -> impl Future<Output = StreamResult<(), Self::Error>> + Send;

    /// Release any resource held. Subsequent reads return [`Pull::Closed`].
    fn close(&mut self);
}

impl<T> Pull<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Pull<U> {
        match self {
            Self::Ready(t) => Pull::Ready(f(t)),
            Self::Pending => Pull::Pending,
            Self::Closed => Pull::Closed,
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
