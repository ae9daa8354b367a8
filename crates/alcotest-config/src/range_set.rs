//! Range lists
//!
//! Parses `4,6-10,19` style arguments into an ordered set of test case numbers.
//! Ranges are inclusive and may be written `LOWER-UPPER` or `LOWER..UPPER`.
//!
//! The set is kept as sorted, disjoint inclusive intervals, so a range costs
//! the same however wide it is.

use crate::{ConfigError, ConfigResult};
use std::fmt;
use std::ops::RangeInclusive;
use std::slice;
use std::str::FromStr;

/// An ordered set of non-negative integers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntSet {
    /// Sorted by lower bound; neither overlapping nor adjacent
    ranges: Vec<(usize, usize)>,
}

impl IntSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list of integers and inclusive ranges
    ///
    /// The whole parse fails if any element is invalid.
    pub fn parse(input: &str) -> ConfigResult<Self> {
        if input.is_empty() {
            return Err(ConfigError::EmptyRangeList);
        }

        let mut set = IntSet::new();
        for piece in input.split(',') {
            let (lower, upper) = parse_piece(piece)?;
            set.insert_range(lower, upper);
        }
        Ok(set)
    }

    pub fn insert(&mut self, value: usize) -> bool {
        if self.contains(value) {
            return false;
        }
        self.insert_range(value, value);
        true
    }

    /// Add every integer in `lower..=upper`
    pub fn insert_range(&mut self, lower: usize, upper: usize) {
        debug_assert!(lower <= upper);

        let start = self.ranges.partition_point(|&(_, hi)| hi.saturating_add(1) < lower);
        let mut merged = (lower, upper);
        let mut end = start;
        while end < self.ranges.len() && self.ranges[end].0 <= upper.saturating_add(1) {
            merged.0 = merged.0.min(self.ranges[end].0);
            merged.1 = merged.1.max(self.ranges[end].1);
            end += 1;
        }
        self.ranges.splice(start..end, [merged]);
    }

    pub fn contains(&self, value: usize) -> bool {
        let i = self.ranges.partition_point(|&(_, hi)| hi < value);
        self.ranges.get(i).map_or(false, |&(lo, _)| lo <= value)
    }

    /// Number of elements, saturating at `usize::MAX`
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .fold(0usize, |n, &(lo, hi)| n.saturating_add((hi - lo).saturating_add(1)))
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate in ascending order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ranges: self.ranges.iter(),
            current: None,
        }
    }

    /// The set as inclusive `(lower, upper)` intervals in ascending order
    pub fn ranges(&self) -> &[(usize, usize)] {
        &self.ranges
    }
}

/// Ascending iterator over an [`IntSet`]
pub struct Iter<'a> {
    ranges: slice::Iter<'a, (usize, usize)>,
    current: Option<RangeInclusive<usize>>,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if let Some(value) = self.current.as_mut().and_then(Iterator::next) {
                return Some(value);
            }
            let &(lo, hi) = self.ranges.next()?;
            self.current = Some(lo..=hi);
        }
    }
}

/// Parse one list element into an inclusive `(lower, upper)` pair
fn parse_piece(piece: &str) -> ConfigResult<(usize, usize)> {
    let bounds = piece
        .split_once("..")
        .or_else(|| piece.split_once('-'));

    match bounds {
        None => {
            let value = parse_bound(piece, piece)?;
            Ok((value, value))
        }
        Some((lower, upper)) => {
            let lower = parse_bound(piece, lower)?;
            let upper = parse_bound(piece, upper)?;
            if lower > upper {
                return Err(ConfigError::DescendingRange { lower, upper });
            }
            Ok((lower, upper))
        }
    }
}

fn parse_bound(piece: &str, text: &str) -> ConfigResult<usize> {
    if text.is_empty() {
        return Err(ConfigError::InvalidRangePiece {
            piece: piece.to_string(),
            reason: "expected an integer or a range such as 6-10".to_string(),
        });
    }
    text.parse::<usize>()
        .map_err(|e| ConfigError::InvalidRangePiece {
            piece: piece.to_string(),
            reason: format!("'{}' is not a nonnegative integer ({})", text, e),
        })
}

impl FromStr for IntSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntSet::parse(s)
    }
}

/// Prints `{4, 6..10, 19}`: runs of three or more values are shown as ranges
impl fmt::Display for IntSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, &(lo, hi)) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match hi - lo {
                0 => write!(f, "{}", lo)?,
                1 => write!(f, "{}, {}", lo, hi)?,
                _ => write!(f, "{}..{}", lo, hi)?,
            }
        }
        write!(f, "}}")
    }
}

impl FromIterator<usize> for IntSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = IntSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IntSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
