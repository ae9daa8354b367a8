//! Command line definition
//!
//! Every runtime flag is global so it can be given before or after the
//! subcommand. Boolean flags fall back to their `ALCOTEST_*` environment
//! variable, which accepts `1/0`, `true/false`, `yes/no` and `on/off`.

use alcotest_config::{parse_name_pattern, FlagValues, IntSet, TailLimit, TestFilter};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use regex::Regex;
use std::path::PathBuf;

/// Run the tests of this suite.
///
/// EXAMPLES:
///     <suite>                         Run every test
///     <suite> test                    Same, through the test subcommand
///     <suite> test parser             Run tests whose name matches 'parser'
///     <suite> test parser 0,3-5       Only test cases 0, 3, 4 and 5
///     <suite> list                    List tests without running them
#[derive(Parser, Debug)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    ALCOTEST_VERBOSE       Same as --verbose
    ALCOTEST_COMPACT       Same as --compact
    ALCOTEST_TAIL_ERRORS   Same as --tail-errors
    ALCOTEST_SHOW_ERRORS   Same as --show-errors
    ALCOTEST_QUICK_TESTS   Same as --quick-tests
    ALCOTEST_BAIL          Same as --bail
    ALCOTEST_COLOR         Same as --color")]
pub struct Cli<A: Args> {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub flags: RunFlags,

    /// Arguments defined by the test suite itself
    #[command(flatten)]
    pub suite_args: A,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a subset of the tests
    ///
    /// EXAMPLES:
    ///     test                     Run all tests
    ///     test 'arith|strings'     Tests matching a regular expression
    ///     test arith 4,6-10,19     Only the listed test cases
    Test(FilterArgs),

    /// List all available tests
    List,
}

/// Positional test selection
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Regular expression matched against test names
    #[arg(value_name = "NAME_REGEX", value_parser = parse_name_pattern)]
    pub name: Option<Regex>,

    /// Test case numbers to run, e.g. 4,6-10,19
    #[arg(value_name = "TESTCASES")]
    pub cases: Option<IntSet>,
}

impl FilterArgs {
    /// The filter given on the command line, if any
    pub fn to_filter(&self) -> Option<TestFilter> {
        TestFilter::from_parts(self.name.clone(), self.cases.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunFlags {
    /// Display the output of each test as it runs
    #[arg(
        short,
        long,
        global = true,
        env = "ALCOTEST_VERBOSE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub verbose: bool,

    /// Compact output: one character per test case
    #[arg(
        short,
        long,
        global = true,
        env = "ALCOTEST_COMPACT",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub compact: bool,

    /// Show only the last N lines of a failure, or 'unlimited'
    #[arg(long, global = true, env = "ALCOTEST_TAIL_ERRORS", value_name = "N")]
    pub tail_errors: Option<TailLimit>,

    /// Display the output of every failing test, not just the first
    #[arg(
        short = 'e',
        long,
        global = true,
        env = "ALCOTEST_SHOW_ERRORS",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub show_errors: bool,

    /// Only run tests marked quick
    #[arg(
        short,
        long,
        global = true,
        env = "ALCOTEST_QUICK_TESTS",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub quick_tests: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Stop after the first failing test case
    #[arg(
        long,
        global = true,
        env = "ALCOTEST_BAIL",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub bail: bool,

    /// Directory for test logs [default: <cwd>/_build/_tests]
    #[arg(short = 'o', global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// When to use colors
    #[arg(
        long,
        global = true,
        env = "ALCOTEST_COLOR",
        value_enum,
        default_value = "auto"
    )]
    pub color: ColorChoice,
}

impl RunFlags {
    /// Flag values with the log directory default filled in
    pub fn values(&self) -> FlagValues {
        FlagValues {
            verbose: self.verbose,
            compact: self.compact,
            tail_errors: self.tail_errors,
            show_errors: self.show_errors,
            quick_only: self.quick_tests,
            json: self.json,
            bail: self.bail,
            log_dir: self.output.clone().unwrap_or_else(default_log_dir),
        }
    }
}

/// `<cwd>/_build/_tests`
pub fn default_log_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("_build")
        .join("_tests")
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// Let the terminal environment decide
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Install this choice as the process-wide color override
    pub fn apply(self) {
        match self {
            ColorChoice::Auto => colored::control::unset_override(),
            ColorChoice::Always => colored::control::set_override(true),
            ColorChoice::Never => colored::control::set_override(false),
        }
    }
}

/// Argument set for suites that define no arguments of their own
#[derive(Args, Debug, Clone, Default)]
pub struct NoArgs {}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    type DefaultCli = Cli<NoArgs>;

    fn parse(args: &[&str]) -> DefaultCli {
        DefaultCli::try_parse_from(args).unwrap()
    }

    #[test]
    #[serial]
    fn test_cli_no_subcommand() {
        let cli = parse(&["suite"]);
        assert!(cli.command.is_none());
        assert!(!cli.flags.verbose);
        assert_eq!(cli.flags.color, ColorChoice::Auto);
    }

    #[test]
    #[serial]
    fn test_cli_short_flags() {
        let cli = parse(&["suite", "-v", "-c", "-e", "-q", "-o", "logs"]);
        assert!(cli.flags.verbose);
        assert!(cli.flags.compact);
        assert!(cli.flags.show_errors);
        assert!(cli.flags.quick_tests);
        assert_eq!(cli.flags.output, Some(PathBuf::from("logs")));
    }

    #[test]
    #[serial]
    fn test_cli_flags_after_subcommand() {
        let cli = parse(&["suite", "test", "--json", "-v"]);
        assert!(matches!(cli.command, Some(Commands::Test(_))));
        assert!(cli.flags.json);
        assert!(cli.flags.verbose);
    }

    #[test]
    #[serial]
    fn test_cli_test_positionals() {
        let cli = parse(&["suite", "test", "^arith", "1,3-4"]);
        match cli.command {
            Some(Commands::Test(filter)) => {
                assert_eq!(filter.name.unwrap().as_str(), "^arith");
                assert_eq!(filter.cases.unwrap().len(), 3);
            }
            _ => panic!("Expected Test command"),
        }
    }

    #[test]
    #[serial]
    fn test_cli_tail_errors() {
        let cli = parse(&["suite", "--tail-errors=unlimited"]);
        assert_eq!(cli.flags.tail_errors, Some(TailLimit::Unlimited));

        let cli = parse(&["suite", "--tail-errors", "3"]);
        assert_eq!(cli.flags.tail_errors, Some(TailLimit::Limit(3)));
    }

    #[test]
    #[serial]
    fn test_cli_rejects_negative_tail() {
        let err = DefaultCli::try_parse_from(["suite", "--tail-errors=-2"]).unwrap_err();
        assert!(err.to_string().contains("must be nonnegative"));
    }

    #[test]
    #[serial]
    fn test_cli_rejects_bad_range() {
        let err = DefaultCli::try_parse_from(["suite", "test", "x", "5..3"]).unwrap_err();
        assert!(err.to_string().contains("lower bound is greater"));
    }

    #[test]
    #[serial]
    fn test_cli_rejects_bad_regex() {
        assert!(DefaultCli::try_parse_from(["suite", "test", "("]).is_err());
    }

    #[test]
    #[serial]
    fn test_cli_list() {
        let cli = parse(&["suite", "list"]);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    #[serial]
    fn test_env_enables_flag() {
        env::set_var("ALCOTEST_VERBOSE", "1");
        env::set_var("ALCOTEST_TAIL_ERRORS", "4");
        let cli = parse(&["suite"]);
        env::remove_var("ALCOTEST_VERBOSE");
        env::remove_var("ALCOTEST_TAIL_ERRORS");

        assert!(cli.flags.verbose);
        assert_eq!(cli.flags.tail_errors, Some(TailLimit::Limit(4)));
    }

    #[test]
    #[serial]
    fn test_env_false_value() {
        env::set_var("ALCOTEST_COMPACT", "false");
        let cli = parse(&["suite"]);
        env::remove_var("ALCOTEST_COMPACT");

        assert!(!cli.flags.compact);
    }

    #[test]
    #[serial]
    fn test_flag_overrides_env() {
        env::set_var("ALCOTEST_TAIL_ERRORS", "4");
        env::set_var("ALCOTEST_COLOR", "never");
        let cli = parse(&["suite", "--tail-errors=9", "--color=always"]);
        env::remove_var("ALCOTEST_TAIL_ERRORS");
        env::remove_var("ALCOTEST_COLOR");

        assert_eq!(cli.flags.tail_errors, Some(TailLimit::Limit(9)));
        assert_eq!(cli.flags.color, ColorChoice::Always);
    }

    #[test]
    #[serial]
    fn test_values_default_log_dir() {
        let values = parse(&["suite"]).flags.values();
        assert!(values.log_dir.ends_with("_build/_tests"));
        assert!(values.log_dir.is_absolute());
    }

    #[test]
    fn test_filter_args_absent() {
        assert!(FilterArgs::default().to_filter().is_none());
    }
}
