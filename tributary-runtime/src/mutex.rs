#[cfg(feature = "runtime-tokio")]
pub use tokio::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};

#[cfg(feature = "runtime-async-std")]
pub use async_std::sync::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};

#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
mod no_rt_mutex {
    use std::ops::{Deref, DerefMut};

    /// Placeholder; every attempt to lock panics.
    #[derive(Debug)]
    pub struct AsyncMutex<T> {
        inner: T,
    }

    #[derive(Debug)]
    pub struct AsyncMutexGuard<'a, T> {
        inner: &'a mut T,
    }

    impl<T> AsyncMutex<T> {
        pub fn new(inner: T) -> Self {
            Self { inner }
        }

        pub async fn lock(&self) -> AsyncMutexGuard<'_, T> {
            unimplemented!("Please enable a runtime")
        }

        pub fn into_inner(self) -> T {
            self.inner
        }
    }

    impl<T> Deref for AsyncMutexGuard<'_, T> {
        type Target = T;

        fn deref(&self) -> &Self::Target {
            self.inner
        }
    }

    impl<T> DerefMut for AsyncMutexGuard<'_, T> {
        fn deref_mut(&mut self) -> &mut Self::Target {
            self.inner
        }
    }
}

#[cfg(not(any(feature = "runtime-tokio", feature = "runtime-async-std")))]
pub use no_rt_mutex::*;
