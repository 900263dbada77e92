use std::{future::Future, time::Duration};

use tracing::warn;

use crate::errors::{TimelineError, TimelineResult};

/// Runs a storage call under a deadline.
///
/// On expiry the inner future is dropped, which rolls back any transaction
/// it holds, and a `Timeout` error is returned.
pub async fn with_deadline<T, F>(limit: Duration, operation: &str, fut: F) -> TimelineResult<T>
where
    F: Future<Output = TimelineResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, ?limit, "storage call timed out");
            Err(TimelineError::Timeout(format!(
                "{} did not finish within {:?}",
                operation, limit
            )))
        }
    }
}
