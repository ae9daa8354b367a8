//! Test reporter - display test results

use crate::error::TestFailure;
use crate::testing::runner::{TestResult, TestRun};
use alcotest_config::{RuntimeOptions, TailLimit};
use colored::*;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// Test reporter with output configuration
pub struct TestReporter {
    /// Show durations and failure output as tests complete
    verbose: bool,
    /// One character per test case
    compact: bool,
    /// Show every failure instead of the first one
    show_errors: bool,
    /// Print a JSON summary only
    json: bool,
    tail_errors: Option<TailLimit>,
}

impl TestReporter {
    pub fn new(options: &RuntimeOptions) -> Self {
        Self {
            verbose: options.verbose,
            compact: options.compact,
            show_errors: options.show_errors,
            json: options.json,
            tail_errors: options.tail_errors,
        }
    }

    pub fn print_header(&self, suite: &str) {
        if self.json {
            return;
        }
        println!("Testing {}.", suite.bold());
    }

    /// Print a single test result
    pub fn print_test_result(&self, run: &TestRun) {
        if self.json {
            return;
        }

        if self.compact {
            let mark = match &run.result {
                TestResult::Pass { .. } => ".".green(),
                TestResult::Fail { failure, .. } if failure.is_timeout() => "T".yellow().bold(),
                TestResult::Fail { .. } => "F".red().bold(),
                TestResult::Skip => "S".dimmed(),
            };
            print!("{}", mark);
            let _ = io::stdout().flush();
            return;
        }

        let status = match &run.result {
            TestResult::Pass { .. } => "[OK]".green().bold(),
            TestResult::Fail { .. } => "[FAIL]".red().bold(),
            TestResult::Skip => "[SKIP]".dimmed(),
        };

        if self.verbose && !run.result.is_skip() {
            println!(
                "{:<7} {}  {:>3}  {}. ({:.2?})",
                status,
                run.test,
                run.index,
                run.case,
                run.result.duration()
            );
        } else {
            println!("{:<7} {}  {:>3}  {}.", status, run.test, run.index, run.case);
        }

        if self.verbose {
            if let TestResult::Fail { failure, .. } = &run.result {
                for line in self.failure_lines(failure) {
                    println!("        {}", line.dimmed());
                }
            }
        }
    }

    /// Report the end of a run
    pub fn report(&self, suite: &str, runs: &[TestRun], elapsed: Duration, log_dir: Option<&Path>) {
        if self.json {
            println!("{}", self.json_summary(suite, runs, elapsed));
            return;
        }

        // Dots need a newline
        if self.compact && !runs.is_empty() {
            println!();
        }

        self.print_failures(runs);

        if let Some(dir) = log_dir {
            println!("The full test results are available in `{}`.", dir.join(suite).display());
        }

        self.print_summary(runs, elapsed);
    }

    /// Print summary statistics
    fn print_summary(&self, runs: &[TestRun], elapsed: Duration) {
        let passed = runs.iter().filter(|r| r.result.is_pass()).count();
        let failed = runs.iter().filter(|r| r.result.is_fail()).count();
        let skipped = runs.iter().filter(|r| r.result.is_skip()).count();

        let status = if failed > 0 {
            "FAILED".red().bold()
        } else {
            "PASSED".green().bold()
        };

        println!(
            "Test result: {} | {} run, {} passed, {} failed, {} skipped in {:.3?}",
            status,
            (passed + failed).to_string().bold(),
            passed.to_string().green().bold(),
            if failed > 0 {
                failed.to_string().red().bold()
            } else {
                failed.to_string().normal()
            },
            skipped,
            elapsed
        );
    }

    /// Print details of failed tests
    fn print_failures(&self, runs: &[TestRun]) {
        let failures: Vec<_> = runs.iter().filter(|r| r.result.is_fail()).collect();
        if failures.is_empty() {
            return;
        }

        let shown = if self.show_errors { failures.len() } else { 1 };

        println!();
        for run in failures.iter().take(shown) {
            println!(
                "  {} {}  {:>3}  {}.",
                "●".red(),
                run.test.bold(),
                run.index,
                run.case
            );
            if let TestResult::Fail { failure, .. } = &run.result {
                for line in self.failure_lines(failure) {
                    println!("      {}", line.dimmed());
                }
            }
            println!();
        }

        let hidden = failures.len() - shown;
        if hidden > 0 {
            println!(
                "{} more failure{} not shown; use --show-errors to display them.",
                hidden,
                if hidden == 1 { "" } else { "s" }
            );
        }
    }

    /// Failure output cut to the configured tail
    fn failure_lines(&self, failure: &TestFailure) -> Vec<String> {
        let text = failure.to_string();
        let total = text.lines().count();
        let mut lines: Vec<String> = match self.tail_errors {
            Some(limit) => limit.tail(&text).into_iter().map(str::to_string).collect(),
            None => text.lines().map(str::to_string).collect(),
        };

        let omitted = total - lines.len();
        if omitted > 0 {
            lines.insert(0, format!("... ({} earlier lines omitted)", omitted));
        }
        lines
    }

    /// Machine-readable summary
    pub fn json_summary(
        &self,
        suite: &str,
        runs: &[TestRun],
        elapsed: Duration,
    ) -> serde_json::Value {
        let passed = runs.iter().filter(|r| r.result.is_pass()).count();
        let failed = runs.iter().filter(|r| r.result.is_fail()).count();
        let skipped = runs.iter().filter(|r| r.result.is_skip()).count();

        let results: Vec<_> = runs
            .iter()
            .map(|r| {
                let (status, error) = match &r.result {
                    TestResult::Pass { .. } => ("ok", None),
                    TestResult::Fail { failure, .. } => {
                        ("fail", Some(self.failure_lines(failure).join("\n")))
                    }
                    TestResult::Skip => ("skip", None),
                };
                serde_json::json!({
                    "test": r.test,
                    "index": r.index,
                    "case": r.case,
                    "status": status,
                    "duration_ms": r.result.duration().as_millis(),
                    "error": error,
                })
            })
            .collect();

        serde_json::json!({
            "suite": suite,
            "tests": runs.len(),
            "passed": passed,
            "failed": failed,
            "skipped": skipped,
            "duration_ms": elapsed.as_millis(),
            "results": results,
        })
    }
}
