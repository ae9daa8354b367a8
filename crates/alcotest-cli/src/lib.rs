//! Alcotest command line front-end
//!
//! Turns a test binary's arguments into runtime options and a test filter,
//! then hands them to an [`Engine`]:
//!
//! ```text
//! suite                             run every test
//! suite test [NAME_REGEX] [CASES]   run a subset, e.g. `test parser 0,3-5`
//! suite list                        list tests
//! ```
//!
//! The bundled [`Suite`] engine runs synchronous and asynchronous test cases;
//! asynchronous ones are raced against a timeout (two seconds by default).

pub mod cli;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod testing;

pub use alcotest_config::{IntSet, RuntimeOptions, TailLimit, TestFilter};
pub use cli::{ColorChoice, NoArgs};
pub use dispatch::Runner;
pub use engine::Engine;
pub use error::{RunError, TestFailure};
pub use testing::{
    test_case, test_case_async, with_timeout, with_timeout_sync, Speed, Suite, TestCase,
    DEFAULT_TIMEOUT,
};
