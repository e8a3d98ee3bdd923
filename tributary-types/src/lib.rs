//! # 🌊 Tributary Types
//!
//! This crate defines the traits and types shared by Tributary consumers, but does not provide any implementation.
//!
//! A stream (aka. topic) is fed by many collectors. Each collector appends records into its own
//! sequence of time-partitioned files, which we call a partition. A [`RecordSource`] reads one
//! partition in order; the driver around it takes care of blocking, metrics and checkpointing.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_debug_implementations)]

mod error;
mod message;
mod metrics;
mod source;
mod stream;

pub use error::*;
pub use message::*;
pub use metrics::*;
pub use source::*;
pub use stream::*;

pub mod export;
