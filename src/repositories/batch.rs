//! Bounded-concurrency batch execution
//!
//! Batch upserts fan out over the same per-entity operation with a fixed cap
//! on in-flight requests. The executor is fail-fast: the first member failure
//! fails the whole batch, no new members start, and members still in flight
//! are cancelled at their next suspension point. No retries, no per-item
//! result reporting, no completion-order guarantee.

use std::future::Future;

use futures_util::TryStreamExt;
use futures_util::stream;

/// Maximum number of in-flight operations during a batch update.
pub const MAX_CONCURRENT_UPSERTS: usize = 4;

/// Runs `op` once per item with at most `limit` operations in flight. On
/// success it completes only after every operation has completed; on the
/// first failure it returns that error.
pub async fn for_each_bounded<I, T, F, Fut, E>(items: I, limit: usize, op: F) -> Result<(), E>
where
    I: IntoIterator<Item = T>,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    stream::iter(items.into_iter().map(Ok))
        .try_for_each_concurrent(limit, op)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DataError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_all_items_complete() {
        let completed = Arc::new(AtomicUsize::new(0));

        let result = for_each_bounded(0..37, MAX_CONCURRENT_UPSERTS, |_| {
            let completed = Arc::clone(&completed);
            async move {
                completed.fetch_add(1, Ordering::SeqCst);
                Ok::<(), DataError>(())
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(completed.load(Ordering::SeqCst), 37);
    }

    #[tokio::test]
    async fn test_in_flight_operations_never_exceed_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_observed = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));

        for_each_bounded(0..32, MAX_CONCURRENT_UPSERTS, |_| {
            let in_flight = Arc::clone(&in_flight);
            let max_observed = Arc::clone(&max_observed);
            let completed = Arc::clone(&completed);
            async move {
                let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_observed.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                completed.fetch_add(1, Ordering::SeqCst);
                Ok::<(), DataError>(())
            }
        })
        .await
        .unwrap();

        assert!(max_observed.load(Ordering::SeqCst) <= MAX_CONCURRENT_UPSERTS);
        assert_eq!(completed.load(Ordering::SeqCst), 32);
    }

    #[tokio::test]
    async fn test_first_failure_fails_the_batch() {
        let result = for_each_bounded(0..16, MAX_CONCURRENT_UPSERTS, |item| async move {
            if item == 5 {
                Err(DataError::InvalidArgument(format!("item {item} rejected")))
            } else {
                Ok(())
            }
        })
        .await;

        match result {
            Err(DataError::InvalidArgument(message)) => {
                assert!(message.contains("item 5"));
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_stops_launching_new_operations() {
        let started = Arc::new(AtomicUsize::new(0));

        let result = for_each_bounded(0..1000, 1, |item| {
            let started = Arc::clone(&started);
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                if item == 3 {
                    Err(DataError::InvalidArgument("boom".to_string()))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_err());
        // with concurrency 1 nothing past the failing member may start
        assert_eq!(started.load(Ordering::SeqCst), 4);
    }
}
