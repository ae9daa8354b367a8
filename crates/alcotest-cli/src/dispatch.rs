//! Command dispatch
//!
//! Parses the command line, resolves the runtime options and calls the engine:
//! - no subcommand: run everything
//! - `test [NAME_REGEX] [TESTCASES]`: run a filtered subset
//! - `list`: list tests

use crate::cli::{Cli, Commands};
use crate::engine::Engine;
use crate::error::RunError;
use alcotest_config::{resolve, RuntimeOptions, TestFilter};
use clap::{Args, CommandFactory, FromArgMatches};
use std::ffi::OsString;
use tracing::debug;

/// What a parsed command line asks for
#[derive(Debug, Clone)]
pub enum Action {
    /// Run tests with these options and this filter
    Run {
        options: RuntimeOptions,
        filter: TestFilter,
    },
    /// List tests
    List,
}

/// Decide what to do for a parsed command line
///
/// A filter given on the command line replaces `default_filter` entirely; the
/// two are never combined. Running without a subcommand ignores both.
pub fn plan<A: Args>(
    cli: &Cli<A>,
    defaults: &RuntimeOptions,
    default_filter: Option<&TestFilter>,
) -> Action {
    match &cli.command {
        None => Action::Run {
            options: resolve(defaults, cli.flags.values()),
            filter: TestFilter::None,
        },
        Some(Commands::Test(positional)) => {
            let filter = positional
                .to_filter()
                .or_else(|| default_filter.cloned())
                .unwrap_or_default();
            Action::Run {
                options: resolve(defaults, cli.flags.values()),
                filter,
            }
        }
        Some(Commands::List) => Action::List,
    }
}

/// Parse a command line; `name` is used in help and usage output
pub fn parse_cli<A, I, T>(name: &str, args: I) -> Result<Cli<A>, clap::Error>
where
    A: Args,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Cli::<A>::command()
        .name(name.to_string())
        .try_get_matches_from(args)?;
    Cli::<A>::from_arg_matches(&matches)
}

/// Entry point used by test suites
///
/// ```no_run
/// use alcotest::{test_case, RunError, Runner, Speed, Suite, TestFailure};
///
/// # fn main() -> Result<(), RunError> {
/// let suite = Suite::new("math").test(
///     "addition",
///     vec![test_case("small numbers", Speed::Quick, |_| {
///         if 1 + 1 == 2 {
///             Ok(())
///         } else {
///             Err(TestFailure::new("1 + 1 is not 2"))
///         }
///     })],
/// );
///
/// Runner::new("math", suite).run()
/// # }
/// ```
pub struct Runner<E: Engine> {
    name: String,
    engine: E,
    defaults: RuntimeOptions,
    default_filter: Option<TestFilter>,
    and_exit: bool,
}

impl<E: Engine> Runner<E> {
    /// Create a runner that exits the process after a successful run
    ///
    /// Failures are always returned to the caller, which decides how to exit.
    pub fn new(name: impl Into<String>, engine: E) -> Self {
        Self {
            name: name.into(),
            engine,
            defaults: RuntimeOptions::default(),
            default_filter: None,
            and_exit: true,
        }
    }

    /// Options that apply when the command line does not enable them
    pub fn with_defaults(mut self, defaults: RuntimeOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Filter used by `test` when no positional filter is given
    pub fn with_filter(mut self, filter: TestFilter) -> Self {
        self.default_filter = Some(filter);
        self
    }

    /// Whether to exit the process after a successful run
    pub fn and_exit(mut self, and_exit: bool) -> Self {
        self.and_exit = and_exit;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run with the process arguments
    pub fn run(&self) -> Result<(), RunError> {
        self.run_with_args(std::env::args_os())
    }

    /// Run with an explicit argument list (the first item is the program name)
    pub fn run_with_args<I, T>(&self, args: I) -> Result<(), RunError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let result = self.dispatch(args);
        if !self.and_exit {
            return result;
        }

        match result {
            Ok(()) => std::process::exit(0),
            // --help and --version are not failures
            Err(RunError::Args(e)) if !e.use_stderr() => e.exit(),
            Err(e) => Err(e),
        }
    }

    fn dispatch<I, T>(&self, args: I) -> Result<(), RunError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = parse_cli::<E::Args, _, _>(&self.name, args)?;
        cli.flags.color.apply();

        match plan(&cli, &self.defaults, self.default_filter.as_ref()) {
            Action::Run { options, filter } => {
                debug!(suite = %self.name, ?options, ?filter, "running tests");
                self.engine.run(&cli.suite_args, &options, &filter)
            }
            Action::List => {
                debug!(suite = %self.name, "listing tests");
                self.engine.list(&cli.suite_args)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::NoArgs;
    use alcotest_config::{parse_name_pattern, IntSet, TailLimit};
    use serial_test::serial;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Debug, Clone)]
    enum Call<A> {
        Run {
            args: A,
            options: RuntimeOptions,
            filter: TestFilter,
        },
        List,
    }

    /// Engine that records what it was asked to do
    struct Recorder<A> {
        calls: RefCell<Vec<Call<A>>>,
        fail_with: Option<usize>,
    }

    impl<A> Recorder<A> {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_with: None,
            }
        }

        fn only_run(&self) -> (A, RuntimeOptions, TestFilter)
        where
            A: Clone,
        {
            let calls = self.calls.borrow();
            assert_eq!(calls.len(), 1, "expected exactly one engine call");
            match &calls[0] {
                Call::Run {
                    args,
                    options,
                    filter,
                } => (args.clone(), options.clone(), filter.clone()),
                Call::List => panic!("Expected a run"),
            }
        }
    }

    impl<A: Args + Clone> Engine for Recorder<A> {
        type Args = A;

        fn run(
            &self,
            args: &A,
            options: &RuntimeOptions,
            filter: &TestFilter,
        ) -> Result<(), RunError> {
            self.calls.borrow_mut().push(Call::Run {
                args: args.clone(),
                options: options.clone(),
                filter: filter.clone(),
            });
            match self.fail_with {
                Some(failures) => Err(RunError::TestsFailed { failures }),
                None => Ok(()),
            }
        }

        fn list(&self, _args: &A) -> Result<(), RunError> {
            self.calls.borrow_mut().push(Call::List);
            Ok(())
        }
    }

    fn runner() -> Runner<Recorder<NoArgs>> {
        Runner::new("suite", Recorder::new()).and_exit(false)
    }

    fn name_of(filter: &TestFilter) -> Option<String> {
        match filter {
            TestFilter::Select { name, .. } => name.as_ref().map(|re| re.as_str().to_string()),
            TestFilter::None => None,
        }
    }

    fn strings_filter() -> TestFilter {
        TestFilter::Select {
            name: Some(parse_name_pattern("strings").unwrap()),
            cases: None,
        }
    }

    #[test]
    #[serial]
    fn test_root_runs_everything() {
        let runner = runner().with_filter(strings_filter());
        runner.run_with_args(["suite"]).unwrap();

        let (_, _, filter) = runner.engine().only_run();
        assert!(filter.is_none());
    }

    #[test]
    #[serial]
    fn test_positional_filter_beats_default_filter() {
        let runner = runner().with_filter(strings_filter());
        runner.run_with_args(["suite", "test", "arith"]).unwrap();

        let (_, _, filter) = runner.engine().only_run();
        assert_eq!(name_of(&filter).as_deref(), Some("arith"));
    }

    #[test]
    #[serial]
    fn test_positional_cases_replace_default_filter() {
        let runner = runner().with_filter(strings_filter());
        runner.run_with_args(["suite", "test", ".*", "2"]).unwrap();

        let (_, _, filter) = runner.engine().only_run();
        match filter {
            TestFilter::Select { name, cases } => {
                assert_eq!(name.unwrap().as_str(), ".*");
                assert_eq!(cases, Some(IntSet::parse("2").unwrap()));
            }
            TestFilter::None => panic!("Expected a selection"),
        }
    }

    #[test]
    #[serial]
    fn test_default_filter_used_without_positionals() {
        let runner = runner().with_filter(strings_filter());
        runner.run_with_args(["suite", "test"]).unwrap();

        let (_, _, filter) = runner.engine().only_run();
        assert_eq!(name_of(&filter).as_deref(), Some("strings"));
    }

    #[test]
    #[serial]
    fn test_no_filter_anywhere() {
        let runner = runner();
        runner.run_with_args(["suite", "test"]).unwrap();

        let (_, _, filter) = runner.engine().only_run();
        assert!(filter.is_none());
    }

    #[test]
    #[serial]
    fn test_defaults_merge_with_flags() {
        let runner = runner().with_defaults(RuntimeOptions {
            verbose: true,
            tail_errors: Some(TailLimit::Limit(8)),
            log_dir: Some(PathBuf::from("/ignored")),
            ..Default::default()
        });
        runner
            .run_with_args(["suite", "test", "--json", "-o", "/tmp/alcotest-logs"])
            .unwrap();

        let (_, options, _) = runner.engine().only_run();
        assert!(options.verbose);
        assert!(options.json);
        assert!(!options.compact);
        assert_eq!(options.tail_errors, Some(TailLimit::Limit(8)));
        assert_eq!(options.log_dir, Some(PathBuf::from("/tmp/alcotest-logs")));
    }

    #[test]
    #[serial]
    fn test_list_does_not_run() {
        let runner = runner();
        runner.run_with_args(["suite", "list"]).unwrap();

        let calls = runner.engine().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], Call::List));
    }

    #[test]
    #[serial]
    fn test_parse_error_runs_nothing() {
        let runner = runner();
        let err = runner
            .run_with_args(["suite", "test", "x", "7..1"])
            .unwrap_err();

        assert!(matches!(err, RunError::Args(_)));
        assert!(runner.engine().calls.borrow().is_empty());
    }

    #[test]
    #[serial]
    fn test_engine_failure_is_returned() {
        let mut engine = Recorder::<NoArgs>::new();
        engine.fail_with = Some(2);
        let runner = Runner::new("suite", engine).and_exit(false);

        let err = runner.run_with_args(["suite"]).unwrap_err();
        assert!(matches!(err, RunError::TestsFailed { failures: 2 }));
    }

    #[test]
    #[serial]
    fn test_parse_error_is_returned_when_exiting() {
        let runner = Runner::new("suite", Recorder::<NoArgs>::new());
        let err = runner
            .run_with_args(["suite", "--color=never", "test", "x", "5..3"])
            .unwrap_err();

        match err {
            RunError::Args(e) => {
                assert!(e.use_stderr());
                assert!(e.to_string().contains("lower bound is greater"));
            }
            other => panic!("Expected an argument error, got {:?}", other),
        }
        assert!(runner.engine().calls.borrow().is_empty());
    }

    #[test]
    #[serial]
    fn test_engine_failure_is_returned_when_exiting() {
        let mut engine = Recorder::<NoArgs>::new();
        engine.fail_with = Some(1);
        let runner = Runner::new("suite", engine);

        let err = runner.run_with_args(["suite", "test"]).unwrap_err();
        assert!(matches!(err, RunError::TestsFailed { failures: 1 }));
        assert_eq!(err.exit_code(), 1);
    }

    #[derive(Args, Debug, Clone)]
    struct SuiteArgs {
        /// Seed for generated inputs
        #[arg(long, global = true)]
        seed: Option<u64>,
    }

    #[test]
    #[serial]
    fn test_suite_args_reach_engine() {
        let runner = Runner::new("suite", Recorder::<SuiteArgs>::new()).and_exit(false);
        runner
            .run_with_args(["suite", "test", "--seed", "7"])
            .unwrap();

        let (args, _, _) = runner.engine().only_run();
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    #[serial]
    fn test_plan_is_pure() {
        let cli = parse_cli::<NoArgs, _, _>("suite", ["suite", "-c"]).unwrap();
        let defaults = RuntimeOptions::default();

        let first = plan(&cli, &defaults, None);
        let second = plan(&cli, &defaults, None);
        match (first, second) {
            (Action::Run { options: a, .. }, Action::Run { options: b, .. }) => {
                assert_eq!(a, b);
                assert!(a.compact);
            }
            _ => panic!("Expected run actions"),
        }
    }
}
