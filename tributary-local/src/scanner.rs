use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use time::{Date, Duration, Month, PrimitiveDateTime, Time};
use tributary_runtime::fs::DirEntry;
use tributary_types::Timestamp;

use crate::{floor_to_hour, floor_to_minute, hour_dir, LocalErr, ReaderMetrics, StorageBackend};

/// Walks the `<yyyy>/<MM>/<dd>/<HH>/<mm>` directory hierarchy of a stream.
#[derive(Debug)]
pub struct TimeWindowScanner<B: StorageBackend> {
    backend: Arc<B>,
    root: PathBuf,
    metrics: Arc<ReaderMetrics>,
}

impl<B: StorageBackend> Clone for TimeWindowScanner<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            root: self.root.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<B: StorageBackend> TimeWindowScanner<B> {
    pub fn new(backend: Arc<B>, root: PathBuf, metrics: Arc<ReaderMetrics>) -> Self {
        Self {
            backend,
            root,
            metrics,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Visit every file in the minute directories from the minute of `from` up to
    /// and including the minute of `to`, in time order. Missing directories are skipped.
    /// `visit` receives the minute directory and the file entry.
    pub async fn scan<F>(&self, from: Timestamp, to: Timestamp, mut visit: F) -> Result<(), LocalErr>
    where
        F: FnMut(&Path, DirEntry),
    {
        let from = floor_to_minute(from);
        let to = floor_to_minute(to);
        let mut hour = floor_to_hour(from);

        while hour <= to {
            let dir = hour_dir(&self.root, hour);
            self.metrics.add_exists_call();
            if !self.backend.exists(&dir).await? {
                log::info!("Hour directory {} does not exist", dir.display());
                hour += Duration::HOUR;
                continue;
            }

            self.metrics.add_list_call();
            for minute in self.backend.list_children(&dir).await? {
                let Some(m) = parse_num(&minute.name, 2) else {
                    continue;
                };
                if !minute.is_dir {
                    continue;
                }
                let ts = hour + Duration::minutes(m as i64);
                if m >= 60 || ts < from || ts > to {
                    continue;
                }
                let minute_dir = dir.join(&minute.name);
                self.metrics.add_list_call();
                for entry in self.backend.list_children(&minute_dir).await? {
                    if !entry.is_dir {
                        visit(&minute_dir, entry);
                    }
                }
            }

            hour += Duration::HOUR;
        }

        Ok(())
    }

    /// The earliest minute directory still retained, descending into the smallest
    /// numeric child at every level. Empty branches are backtracked from.
    pub async fn earliest_minute(&self) -> Result<Option<Timestamp>, LocalErr> {
        const WIDTHS: [usize; 5] = [4, 2, 2, 2, 2];

        // each frame: the remaining candidates of a level, smallest last
        let mut stack: Vec<Vec<(u32, PathBuf)>> = vec![self.numeric_children(&self.root, 4).await?];
        let mut parts: Vec<u32> = Vec::new();

        while let Some(frame) = stack.last_mut() {
            let Some((num, path)) = frame.pop() else {
                stack.pop();
                parts.pop();
                continue;
            };
            let level = stack.len() - 1;
            parts.truncate(level);
            parts.push(num);
            if level + 1 == WIDTHS.len() {
                if let Some(ts) = to_timestamp(&parts) {
                    return Ok(Some(ts));
                }
                parts.pop();
                continue;
            }
            let children = self.numeric_children(&path, WIDTHS[level + 1]).await?;
            stack.push(children);
        }

        Ok(None)
    }

    async fn numeric_children(
        &self,
        path: &Path,
        width: usize,
    ) -> Result<Vec<(u32, PathBuf)>, LocalErr> {
        self.metrics.add_list_call();
        let mut children: Vec<_> = self
            .backend
            .list_children(path)
            .await?
            .into_iter()
            .filter(|e| e.is_dir)
            .filter_map(|e| parse_num(&e.name, width).map(|n| (n, path.join(&e.name))))
            .collect();
        children.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(children)
    }
}

fn parse_num(s: &str, width: usize) -> Option<u32> {
    if s.len() == width && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

fn to_timestamp(parts: &[u32]) -> Option<Timestamp> {
    let &[year, month, day, hour, minute] = parts else {
        return None;
    };
    let date = Date::from_calendar_date(
        year as i32,
        Month::try_from(u8::try_from(month).ok()?).ok()?,
        u8::try_from(day).ok()?,
    )
    .ok()?;
    let time = Time::from_hms(u8::try_from(hour).ok()?, u8::try_from(minute).ok()?, 0).ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_utc())
}
