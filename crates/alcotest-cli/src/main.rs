//! Demo test suite built on the alcotest front-end
//!
//! Shows a suite with its own command line arguments, quick and slow tests,
//! and async test cases. `--fail` and `--hang` make some cases misbehave.

use alcotest::{test_case, test_case_async, Runner, Speed, Suite, TestFailure};
use anyhow::Result;
use clap::Args;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Arguments understood by the demo suite
#[derive(Args, Debug, Clone)]
struct DemoArgs {
    /// Make one arithmetic case fail
    #[arg(long, global = true)]
    fail: bool,
    /// Make one async case hang until its timeout
    #[arg(long, global = true)]
    hang: bool,
}

fn check_eq<T: PartialEq + std::fmt::Debug>(
    what: &str,
    expected: T,
    actual: T,
) -> Result<(), TestFailure> {
    if expected == actual {
        Ok(())
    } else {
        Err(TestFailure::new(format!(
            "{}\nexpected: {:?}\n  actual: {:?}",
            what, expected, actual
        )))
    }
}

fn demo_suite() -> Suite<DemoArgs> {
    Suite::with_args("demo")
        .test(
            "arithmetic",
            vec![
                test_case("addition", Speed::Quick, |_: &DemoArgs| {
                    check_eq("1 + 1", 2, 1 + 1)
                }),
                test_case("subtraction", Speed::Quick, |args: &DemoArgs| {
                    let expected = if args.fail { 1 } else { 2 };
                    check_eq("5 - 3", expected, 5 - 3)
                }),
                test_case("large sum", Speed::Slow, |_: &DemoArgs| {
                    check_eq("sum 1..=10000", 50_005_000u64, (1..=10_000u64).sum())
                }),
            ],
        )
        .test(
            "strings",
            vec![
                test_case("concat", Speed::Quick, |_: &DemoArgs| {
                    check_eq("concat", "ab".to_string(), ["a", "b"].concat())
                }),
                test_case("uppercase", Speed::Quick, |_: &DemoArgs| {
                    check_eq("uppercase", "ABC".to_string(), "abc".to_uppercase())
                }),
            ],
        )
        .test(
            "async",
            vec![
                test_case_async("short sleep", Speed::Quick, |_: DemoArgs| async {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Ok(())
                }),
                test_case_async("maybe hangs", Speed::Quick, |args: DemoArgs| async move {
                    if args.hang {
                        std::future::pending::<()>().await;
                    }
                    Ok(())
                })
                .with_timeout(Duration::from_millis(100)),
            ],
        )
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("ALCOTEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Runner::new("demo", demo_suite()).run()?;
    Ok(())
}
