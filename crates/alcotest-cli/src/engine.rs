//! Test engine interface
//!
//! The dispatcher resolves options and filters, then hands them to an engine.
//! Listing, running and reporting are the engine's business.

use crate::error::RunError;
use alcotest_config::{RuntimeOptions, TestFilter};

/// Runs and lists the tests of a suite.
pub trait Engine {
    /// Arguments the suite adds to the command line
    type Args: clap::Args;

    /// Run the selected tests.
    ///
    /// Returns `RunError::TestsFailed` when any test case failed.
    fn run(
        &self,
        args: &Self::Args,
        options: &RuntimeOptions,
        filter: &TestFilter,
    ) -> Result<(), RunError>;

    /// Print the available tests without running them
    fn list(&self, args: &Self::Args) -> Result<(), RunError>;
}
