//! Process-wide submission lock
//!
//! A single mutual-exclusion token serializes every submission in the
//! process, across all target sheets. Row positions are assigned under this
//! lock, which is the only thing preventing two requests from computing the
//! same position. Acquisition is bounded; release happens through the RAII
//! guard on every exit path, including early returns and error paths.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{Error, Result};

/// Cross-request exclusive lock scoped to the whole gateway process
#[derive(Clone)]
pub struct SubmitLock {
    inner: Arc<Mutex<()>>,
}

impl SubmitLock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(())),
        }
    }

    /// Acquire the lock, waiting at most `timeout`.
    ///
    /// Returns [`Error::LockTimeout`] if the wait expires; the caller must
    /// not touch the store in that case.
    pub async fn acquire(&self, timeout: Duration) -> Result<SubmitGuard> {
        match tokio::time::timeout(timeout, self.inner.clone().lock_owned()).await {
            Ok(guard) => Ok(SubmitGuard { _guard: guard }),
            Err(_) => Err(Error::LockTimeout(timeout)),
        }
    }
}

impl Default for SubmitLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Held lock; dropping it releases the lock
pub struct SubmitGuard {
    _guard: OwnedMutexGuard<()>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_and_release() {
        let lock = SubmitLock::new();

        let guard = lock.acquire(Duration::from_millis(100)).await.unwrap();
        drop(guard);

        // Released on drop, so a second acquire succeeds
        lock.acquire(Duration::from_millis(100)).await.unwrap();
    }

    #[tokio::test]
    async fn acquire_times_out_while_held() {
        let lock = SubmitLock::new();
        let _held = lock.acquire(Duration::from_millis(100)).await.unwrap();

        let result = lock.acquire(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(Error::LockTimeout(_))));
    }

    #[tokio::test]
    async fn waiting_acquirer_proceeds_after_release() {
        let lock = SubmitLock::new();
        let held = lock.acquire(Duration::from_millis(100)).await.unwrap();

        let waiter = {
            let lock = lock.clone();
            tokio::spawn(async move { lock.acquire(Duration::from_secs(1)).await.is_ok() })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(held);

        assert!(waiter.await.unwrap());
    }
}
