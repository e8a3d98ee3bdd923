//! <div align="center">
//!
//!   <h1>Tributary</h1>
//!
//!   <p>
//!     <strong>🌊 Consume partitioned streams of time-rotated files</strong>
//!   </p>
//!
//! </div>
//!
//! Collectors append records into files rotated every minute, one sequence of files per collector.
//! Tributary reads such a sequence back as one ordered stream of records, following new files as
//! they are created, skipping over files removed by retention, and checkpointing its position so a
//! restarted consumer resumes where it left off.
//!
//! ## Features
//!
//! 1. Async
//!
//! Tributary provides an async API, and it supports both `tokio` and `async-std`.
//!
//! 2. Storage agnostic
//!
//! The reader only ever lists directories, checks for existence and opens files, through the
//! `StorageBackend` trait. The local file system is supported out of the box.
//!
//! 3. Resumable
//!
//! Checkpoints are written atomically; a consumer never resumes from a half written one.
//!
//! ## Architecture
//!
//! `tributary` is the facade crate re-exporting implementation from a number of sub-crates:
//!
//! + `tributary-types`: traits and types
//! + `tributary-runtime`: async runtime abstraction
//! + `tributary-local`: the consumer of streams on local storage
//!
//! ```ignore
//! use tributary::{local::{LocalConsumer, LocalConsumerOptions}, Buffer, PartitionKey, StreamKey};
//!
//! let options = LocalConsumerOptions::new(
//!     StreamKey::new("clicks")?,
//!     "indexer",
//!     PartitionKey::new("collector-1")?,
//!     "/data/clicks",
//! );
//! let consumer = LocalConsumer::open(options).await?;
//! while let Some(record) = consumer.next().await? {
//!     println!("{}", record.as_str()?);
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use tributary_types::*;

#[cfg(feature = "tributary-local")]
#[cfg_attr(docsrs, doc(cfg(feature = "local")))]
pub use tributary_local as local;

#[cfg(feature = "tributary-runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub use tributary_runtime as runtime;
