//! Timeouts for asynchronous test bodies
//!
//! The body runs as its own task and races a timer. When the timer wins the
//! task is detached, not aborted: it may keep running (and keep producing side
//! effects) after its failure has been reported, until the runtime shuts down.

use crate::error::{panic_message, TestFailure};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Timeout applied when a test case does not set one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Race `body` against a `duration` timer.
///
/// Must be called from within a tokio runtime.
pub async fn with_timeout<T, F>(name: &str, duration: Duration, body: F) -> Result<T, TestFailure>
where
    F: Future<Output = Result<T, TestFailure>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(body);

    match tokio::time::timeout(duration, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            let message = if join_error.is_panic() {
                panic_message(join_error.into_panic().as_ref())
            } else {
                join_error.to_string()
            };
            Err(TestFailure::Panicked {
                name: name.to_string(),
                message,
            })
        }
        Err(_elapsed) => {
            // Dropping the JoinHandle detaches the task
            debug!(test = name, ?duration, "test body abandoned after timeout");
            Err(TestFailure::TimedOut {
                name: name.to_string(),
                duration,
            })
        }
    }
}

/// Run a synchronous body, then apply the same timeout to its result.
///
/// The body has already finished when the race starts, so the timer cannot win.
pub async fn with_timeout_sync<T, F>(
    name: &str,
    duration: Duration,
    body: F,
) -> Result<T, TestFailure>
where
    F: FnOnce() -> Result<T, TestFailure>,
    T: Send + 'static,
{
    let result = body();
    with_timeout(name, duration, std::future::ready(result)).await
}
