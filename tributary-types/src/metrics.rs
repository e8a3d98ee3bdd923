use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
/// Counters kept by a consumer. Monotonically increasing for the lifetime of the process.
/// Shipping them somewhere is up to the application; see [`ConsumerMetrics::snapshot`].
pub struct ConsumerMetrics {
    messages_consumed: AtomicU64,
    mark_calls: AtomicU64,
    reset_calls: AtomicU64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// A point-in-time copy of [`ConsumerMetrics`].
pub struct ConsumerStats {
    pub messages_consumed: u64,
    pub mark_calls: u64,
    pub reset_calls: u64,
}

impl ConsumerMetrics {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_messages_consumed(&self) {
        self.messages_consumed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_mark_calls(&self) {
        self.mark_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_reset_calls(&self) {
        self.reset_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ConsumerStats {
        ConsumerStats {
            messages_consumed: self.messages_consumed.load(Ordering::Relaxed),
            mark_calls: self.mark_calls.load(Ordering::Relaxed),
            reset_calls: self.reset_calls.load(Ordering::Relaxed),
        }
    }
}
