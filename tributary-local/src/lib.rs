//! # 🌊 Tributary Local
//!
//! Consume a partitioned stream of files, as written by collectors into
//! `<root>/<yyyy>/<MM>/<dd>/<HH>/<mm>/<partition>-<yyyy>-<MM>-<dd>-<HH>-<mm>-<sequence>.<ext>`.
//!
//! A [`LocalConsumer`] follows one partition in time order across file rotations,
//! picks up files as they appear, skips over files lost to retention, and can
//! checkpoint its position to resume after a restart.
//!
//! ```ignore
//! let mut options = LocalConsumerOptions::new(topic, "indexer", partition, "/data/clicks");
//! options.set_checkpoint_dir("/data/checkpoints");
//! let consumer = LocalConsumer::open(options).await?;
//! while let Some(record) = consumer.next().await? {
//!     process(record);
//!     consumer.mark().await?;
//! }
//! ```

mod backend;
mod buffer;
mod checkpoint;
mod consumer;
mod cursor;
mod decoder;
mod error;
mod index;
mod metrics;
mod name;
mod options;
mod scanner;
mod source;

pub use backend::*;
pub use buffer::*;
pub use checkpoint::*;
pub use consumer::*;
pub use cursor::*;
pub use decoder::*;
pub use error::*;
pub use index::*;
pub use metrics::*;
pub use name::*;
pub use options::*;
pub use scanner::*;
pub use source::*;
