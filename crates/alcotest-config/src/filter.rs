//! Test selection
//!
//! A filter is only parsed and carried here; deciding which tests it selects
//! is left to the engine (see [`TestFilter::selects`] for the default rule).

use crate::range_set::IntSet;
use crate::{ConfigError, ConfigResult};
use regex::Regex;

/// Which tests to run
#[derive(Debug, Clone, Default)]
pub enum TestFilter {
    /// Run everything
    #[default]
    None,
    /// Run tests matching the name pattern and the test case numbers
    Select {
        name: Option<Regex>,
        cases: Option<IntSet>,
    },
}

impl TestFilter {
    /// Build a filter from the two optional positional arguments
    ///
    /// Returns `None` when neither is present so callers can fall back to
    /// another filter.
    pub fn from_parts(name: Option<Regex>, cases: Option<IntSet>) -> Option<Self> {
        if name.is_none() && cases.is_none() {
            None
        } else {
            Some(TestFilter::Select { name, cases })
        }
    }

    /// Default selection rule: every present predicate must hold
    pub fn selects(&self, test_name: &str, index: usize) -> bool {
        match self {
            TestFilter::None => true,
            TestFilter::Select { name, cases } => {
                let name_ok = name.as_ref().map_or(true, |re| re.is_match(test_name));
                let case_ok = cases.as_ref().map_or(true, |set| set.contains(index));
                name_ok && case_ok
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TestFilter::None)
    }
}

/// Compile a test name pattern
pub fn parse_name_pattern(pattern: &str) -> ConfigResult<Regex> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
