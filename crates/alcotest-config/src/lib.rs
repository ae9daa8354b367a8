//! Alcotest Runtime Configuration
//!
//! Provides the option types shared by the alcotest command line and the
//! test engine:
//! - Range lists for selecting test cases (`4,6-10,19`)
//! - The error tail limit (`N` or `unlimited`)
//! - Test filters (name pattern plus test case numbers)
//! - Runtime options and the merge that produces them
//!
//! # Configuration Hierarchy
//!
//! Options are resolved in the following order (later wins):
//! 1. Defaults record supplied by the embedding test suite
//! 2. Environment variables (ALCOTEST_*)
//! 3. CLI flags
//!
//! Environment and flags are collapsed by the argument parser before they reach
//! [`options::resolve`]. Boolean options only ever turn on: a default of `true`
//! stays `true` whatever the flags say.
//!
//! # Example
//!
//! ```
//! use alcotest_config::{IntSet, TailLimit};
//!
//! let cases: IntSet = "4,6-10,19".parse().unwrap();
//! assert_eq!(cases.len(), 7);
//!
//! let limit: TailLimit = "unlimited".parse().unwrap();
//! assert_eq!(limit, TailLimit::Unlimited);
//! ```

pub mod filter;
pub mod limit;
pub mod options;
pub mod range_set;

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("empty range list: expected integers or ranges such as '4,6-10,19'")]
    EmptyRangeList,

    #[error("invalid range list element '{piece}': {reason}")]
    InvalidRangePiece { piece: String, reason: String },

    #[error("invalid range {lower}..{upper}: lower bound is greater than upper bound")]
    DescendingRange { lower: usize, upper: usize },

    #[error("invalid value '{0}': expected a nonnegative integer or 'unlimited'")]
    InvalidLimit(String),

    #[error("invalid value {0}: must be nonnegative or 'unlimited'")]
    NegativeLimit(i64),

    #[error("invalid test name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for configuration parsing
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use filter::{parse_name_pattern, TestFilter};
pub use limit::TailLimit;
pub use options::{resolve, FlagValues, RuntimeOptions};
pub use range_set::IntSet;
