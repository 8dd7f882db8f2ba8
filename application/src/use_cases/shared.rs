//! Shared utilities for use cases.
//!
//! Contains cancellation checking and the cancellable-await helper used by
//! every suspension point of a run.

use crate::use_cases::failure::GenerationFailure;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(GenerationFailure::Cancelled)` if the token is cancelled.
pub(crate) fn check_cancelled(token: &CancellationToken) -> Result<(), GenerationFailure> {
    if token.is_cancelled() {
        return Err(GenerationFailure::Cancelled);
    }
    Ok(())
}

/// Await `operation`, racing it against `token`.
///
/// Cancellation wins ties, and is re-checked after the operation resumes so
/// a result that lands just after cancellation is discarded.
pub(crate) async fn cancellable<T, F>(
    token: &CancellationToken,
    operation: F,
) -> Result<T, GenerationFailure>
where
    F: Future<Output = Result<T, GenerationFailure>>,
{
    check_cancelled(token)?;
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => return Err(GenerationFailure::Cancelled),
        result = operation => result,
    };
    check_cancelled(token)?;
    result
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancellable_passes_through() {
        let token = CancellationToken::new();
        let result = cancellable(&token, async { Ok::<_, GenerationFailure>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_cancellable_observes_cancellation() {
        let token = CancellationToken::new();
        let child = token.clone();
        let pending = std::future::pending::<Result<(), GenerationFailure>>();

        tokio::spawn(async move { child.cancel() });
        let result = cancellable(&token, pending).await;
        assert_eq!(result, Err(GenerationFailure::Cancelled));
    }

    #[tokio::test]
    async fn test_cancellable_checks_before_starting() {
        let token = CancellationToken::new();
        token.cancel();
        let result = cancellable(&token, async { Ok::<_, GenerationFailure>(()) }).await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
