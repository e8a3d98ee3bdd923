use std::{future::Future, time::Duration};

#[cfg(feature = "runtime-tokio")]
pub use tokio::time::error::Elapsed as TimeoutError;

#[cfg(feature = "runtime-async-std")]
pub use async_std::future::TimeoutError;

#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
#[derive(Debug)]
pub struct TimeoutError;

#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
impl std::fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Please enable a runtime")
    }
}

#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
impl std::error::Error for TimeoutError {}

#[inline]
pub async fn sleep(_d: Duration) {
    #[cfg(feature = "runtime-async-std")]
    return async_std::task::sleep(_d).await;

    #[cfg(feature = "runtime-tokio")]
    return tokio::time::sleep(_d).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    panic!("Please enable a runtime");
}

/// Await `_f` for at most `_d`.
pub async fn timeout<F, T>(_d: Duration, _f: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    #[cfg(feature = "runtime-async-std")]
    return async_std::future::timeout(_d, _f).await;

    #[cfg(feature = "runtime-tokio")]
    return tokio::time::timeout(_d, _f).await;

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
    return Err(TimeoutError);
}
