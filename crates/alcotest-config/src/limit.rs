//! Error tail limit (`--tail-errors`)

use crate::{ConfigError, ConfigResult};
use std::fmt;
use std::str::FromStr;

/// How many trailing output lines to show for a failing test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailLimit {
    /// Show the whole output
    Unlimited,
    /// Show at most this many trailing lines
    Limit(usize),
}

impl TailLimit {
    pub fn parse(input: &str) -> ConfigResult<Self> {
        if input == "unlimited" {
            return Ok(TailLimit::Unlimited);
        }

        match input.parse::<i64>() {
            Ok(n) if n < 0 => Err(ConfigError::NegativeLimit(n)),
            Ok(n) => usize::try_from(n)
                .map(TailLimit::Limit)
                .map_err(|_| ConfigError::InvalidLimit(input.to_string())),
            Err(_) => Err(ConfigError::InvalidLimit(input.to_string())),
        }
    }

    /// Keep the trailing lines of `text` allowed by this limit
    pub fn tail<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let lines: Vec<&str> = text.lines().collect();
        match self {
            TailLimit::Unlimited => lines,
            TailLimit::Limit(n) => {
                let skip = lines.len().saturating_sub(*n);
                lines[skip..].to_vec()
            }
        }
    }
}

impl FromStr for TailLimit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TailLimit::parse(s)
    }
}

impl fmt::Display for TailLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TailLimit::Unlimited => write!(f, "unlimited"),
            TailLimit::Limit(n) => write!(f, "{}", n),
        }
    }
}
