//! Test cases

use crate::error::{panic_message, TestFailure};
use crate::testing::timeout::{with_timeout, with_timeout_sync, DEFAULT_TIMEOUT};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Whether a test case belongs to the quick subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    /// Run by default and with `--quick-tests`
    Quick,
    /// Skipped with `--quick-tests`
    Slow,
}

type SyncBody<A> = Arc<dyn Fn(&A) -> Result<(), TestFailure> + Send + Sync>;
type AsyncBody<A> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<(), TestFailure>> + Send + Sync>;

enum Body<A> {
    Sync(SyncBody<A>),
    Async(AsyncBody<A>),
}

/// A named test body
pub struct TestCase<A> {
    name: String,
    speed: Speed,
    timeout: Duration,
    body: Body<A>,
}

/// Create a test case from a synchronous function
pub fn test_case<A, F>(name: impl Into<String>, speed: Speed, body: F) -> TestCase<A>
where
    F: Fn(&A) -> Result<(), TestFailure> + Send + Sync + 'static,
{
    TestCase {
        name: name.into(),
        speed,
        timeout: DEFAULT_TIMEOUT,
        body: Body::Sync(Arc::new(body)),
    }
}

/// Create a test case from an async function
///
/// The function receives its own copy of the suite arguments since the
/// returned future may outlive the run (see [`with_timeout`]).
pub fn test_case_async<A, F, Fut>(name: impl Into<String>, speed: Speed, body: F) -> TestCase<A>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TestFailure>> + Send + 'static,
{
    TestCase {
        name: name.into(),
        speed,
        timeout: DEFAULT_TIMEOUT,
        body: Body::Async(Arc::new(move |args| body(args).boxed())),
    }
}

impl<A> TestCase<A> {
    /// Override the default two second timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<A: Clone + Send + 'static> TestCase<A> {
    /// Run the body under its timeout
    pub async fn execute(&self, args: &A) -> Result<(), TestFailure> {
        match &self.body {
            Body::Sync(body) => {
                with_timeout_sync(&self.name, self.timeout, || {
                    panic::catch_unwind(AssertUnwindSafe(|| body(args))).unwrap_or_else(
                        |payload| {
                            Err(TestFailure::Panicked {
                                name: self.name.clone(),
                                message: panic_message(payload.as_ref()),
                            })
                        },
                    )
                })
                .await
            }
            Body::Async(body) => with_timeout(&self.name, self.timeout, body(args.clone())).await,
        }
    }
}
