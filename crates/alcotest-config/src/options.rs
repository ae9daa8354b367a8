//! Runtime options and the defaults/flags merge
//!
//! The merge is intentionally asymmetric:
//! - booleans are OR-ed, so flags can enable an option but never disable one
//!   the defaults turned on
//! - `tail_errors` takes the first value available, flags before defaults
//! - `log_dir` always comes from the flags, which already carry a default path

use crate::limit::TailLimit;
use std::path::PathBuf;

/// Finalized configuration handed to the test engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Stream test output live
    pub verbose: bool,
    /// Compact result rendering
    pub compact: bool,
    /// Trailing output lines shown for a failure
    pub tail_errors: Option<TailLimit>,
    /// Display captured error output
    pub show_errors: bool,
    /// Only run tests marked quick
    pub quick_only: bool,
    /// Machine-readable output
    pub json: bool,
    /// Stop after the first failing test case
    pub bail: bool,
    /// Directory for per-test logs
    pub log_dir: Option<PathBuf>,
}

/// Flag values after the argument parser applied environment fallbacks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues {
    pub verbose: bool,
    pub compact: bool,
    pub tail_errors: Option<TailLimit>,
    pub show_errors: bool,
    pub quick_only: bool,
    pub json: bool,
    pub bail: bool,
    pub log_dir: PathBuf,
}

/// Merge flag values over a defaults record
pub fn resolve(defaults: &RuntimeOptions, flags: FlagValues) -> RuntimeOptions {
    RuntimeOptions {
        verbose: flags.verbose || defaults.verbose,
        compact: flags.compact || defaults.compact,
        tail_errors: flags.tail_errors.or(defaults.tail_errors),
        show_errors: flags.show_errors || defaults.show_errors,
        quick_only: flags.quick_only || defaults.quick_only,
        json: flags.json || defaults.json,
        bail: flags.bail || defaults.bail,
        log_dir: Some(flags.log_dir),
    }
}

impl RuntimeOptions {
    /// Merge flag values over these options (see [`resolve`])
    pub fn merge(&self, flags: FlagValues) -> RuntimeOptions {
        resolve(self, flags)
    }
}
