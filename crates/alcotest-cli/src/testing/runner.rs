//! Suite runner - execute registered test cases

use crate::cli::NoArgs;
use crate::engine::Engine;
use crate::error::{RunError, TestFailure};
use crate::testing::case::{Speed, TestCase};
use crate::testing::reporter::TestReporter;
use alcotest_config::{RuntimeOptions, TestFilter};
use clap::Args;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Result of running a single test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    /// Test case passed
    Pass { duration: Duration },
    /// Test case failed or timed out
    Fail {
        failure: TestFailure,
        duration: Duration,
    },
    /// Not run: slow test under `--quick-tests`, or a previous failure with `--bail`
    Skip,
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TestResult::Skip)
    }

    pub fn duration(&self) -> Duration {
        match self {
            TestResult::Pass { duration } => *duration,
            TestResult::Fail { duration, .. } => *duration,
            TestResult::Skip => Duration::ZERO,
        }
    }
}

/// A completed test case
#[derive(Debug, Clone)]
pub struct TestRun {
    /// Name of the test the case belongs to
    pub test: String,
    /// Position of the case within its test
    pub index: usize,
    /// Name of the case
    pub case: String,
    pub result: TestResult,
}

/// Named tests, each made of numbered test cases
pub struct Suite<A = NoArgs> {
    name: String,
    tests: Vec<(String, Vec<TestCase<A>>)>,
}

impl Suite {
    /// Create a suite whose cases take no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Suite::with_args(name)
    }
}

impl<A> Suite<A> {
    /// Create a suite whose cases receive the suite's command line arguments
    pub fn with_args(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Register a test
    pub fn test(mut self, name: impl Into<String>, cases: Vec<TestCase<A>>) -> Self {
        self.tests.push((name.into(), cases));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of test cases
    pub fn len(&self) -> usize {
        self.tests.iter().map(|(_, cases)| cases.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A: Clone + Send + 'static> Suite<A> {
    /// Run the selected cases one after another
    pub async fn run_cases(
        &self,
        args: &A,
        options: &RuntimeOptions,
        filter: &TestFilter,
        reporter: &TestReporter,
    ) -> Vec<TestRun> {
        let mut runs = Vec::new();
        let mut bailed = false;

        for (test, cases) in &self.tests {
            for (index, case) in cases.iter().enumerate() {
                if !filter.selects(test, index) {
                    continue;
                }

                let skip = bailed || (options.quick_only && case.speed() == Speed::Slow);
                let result = if skip {
                    TestResult::Skip
                } else {
                    let start = Instant::now();
                    match case.execute(args).await {
                        Ok(()) => TestResult::Pass {
                            duration: start.elapsed(),
                        },
                        Err(failure) => TestResult::Fail {
                            failure,
                            duration: start.elapsed(),
                        },
                    }
                };

                if result.is_fail() && options.bail {
                    debug!(test = %test, index, "bailing out after failure");
                    bailed = true;
                }

                let run = TestRun {
                    test: test.clone(),
                    index,
                    case: case.name().to_string(),
                    result,
                };
                reporter.print_test_result(&run);
                runs.push(run);
            }
        }

        runs
    }

    /// Write one log file per executed case under `<dir>/<suite>/`
    fn write_logs(&self, runs: &[TestRun], dir: &Path) -> Result<(), RunError> {
        let suite_dir = dir.join(file_name(&self.name));
        fs::create_dir_all(&suite_dir).map_err(|source| RunError::Log {
            path: suite_dir.clone(),
            source,
        })?;

        for run in runs.iter().filter(|r| !r.result.is_skip()) {
            let path = suite_dir.join(format!("{}.{:03}.output", file_name(&run.test), run.index));
            let contents = match &run.result {
                TestResult::Fail { failure, .. } => format!("{}\n", failure),
                _ => "ok\n".to_string(),
            };
            fs::write(&path, contents).map_err(|source| RunError::Log {
                path: path.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

impl<A: Args + Clone + Send + 'static> Engine for Suite<A> {
    type Args = A;

    fn run(
        &self,
        args: &A,
        options: &RuntimeOptions,
        filter: &TestFilter,
    ) -> Result<(), RunError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(RunError::Runtime)?;

        let reporter = TestReporter::new(options);
        reporter.print_header(&self.name);

        let start = Instant::now();
        let runs = runtime.block_on(self.run_cases(args, options, filter, &reporter));
        let elapsed = start.elapsed();

        if let Some(dir) = &options.log_dir {
            self.write_logs(&runs, dir)?;
        }

        reporter.report(&self.name, &runs, elapsed, options.log_dir.as_deref());

        let failures = runs.iter().filter(|r| r.result.is_fail()).count();
        info!(suite = %self.name, runs = runs.len(), failures, "test run finished");
        if failures > 0 {
            Err(RunError::TestsFailed { failures })
        } else {
            Ok(())
        }
    }

    fn list(&self, _args: &A) -> Result<(), RunError> {
        for (test, cases) in &self.tests {
            for (index, case) in cases.iter().enumerate() {
                println!("{}  {:>3}  {}.", test, index, case.name());
            }
        }
        Ok(())
    }
}

/// Make a test name usable as a file name
fn file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
