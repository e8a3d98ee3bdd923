//! Re-exports, so that downstream crates agree on the same version.

pub use futures;
pub use time;
