//! In-process test engine
//!
//! Test cases are registered on a [`Suite`], run one at a time on a
//! single-threaded tokio runtime, and reported as they complete.

pub mod case;
pub mod reporter;
pub mod runner;
pub mod timeout;

pub use case::{test_case, test_case_async, Speed, TestCase};
pub use reporter::TestReporter;
pub use runner::{Suite, TestResult, TestRun};
pub use timeout::{with_timeout, with_timeout_sync, DEFAULT_TIMEOUT};
