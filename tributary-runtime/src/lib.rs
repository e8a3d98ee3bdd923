//! ### `tributary-runtime`: Async runtime abstraction
//!
//! This crate aligns the type signatures of the few runtime facilities Tributary needs between
//! `async-std` and `tokio`: sleeping, timeouts, an async mutex and the file system.
//! Without a runtime feature everything still compiles, but panics or errors at runtime.

#[cfg(all(feature = "runtime-async-std", feature = "runtime-tokio"))]
compile_error!("'runtime-async-std' and 'runtime-tokio' cannot be enabled at the same time");

pub mod fs;
mod mutex;
mod time;

pub use mutex::*;
pub use time::*;
