//! Positional selectors produced by label lookups and cube queries.

use std::ops::Range;

/// A positional selection along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A single position; the axis is dropped from the result.
    Position(usize),
    /// A contiguous half-open range of positions.
    Range(Range<usize>),
    /// An explicit list of positions, possibly repeated or non-contiguous.
    Positions(Vec<usize>),
}

impl Selector {
    /// Every position of an axis of length `len`.
    pub fn full(len: usize) -> Self {
        Selector::Range(0..len)
    }

    /// Number of positions selected (1 for a scalar).
    pub fn len(&self) -> usize {
        match self {
            Selector::Position(_) => 1,
            Selector::Range(range) => range.len(),
            Selector::Positions(positions) => positions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Selector::Position(_))
    }

    /// The selected positions in selection order.
    pub fn positions(&self) -> Vec<usize> {
        match self {
            Selector::Position(pos) => vec![*pos],
            Selector::Range(range) => range.clone().collect(),
            Selector::Positions(positions) => positions.clone(),
        }
    }

    /// Whether every selected position lies within an axis of length `len`.
    ///
    /// A range must also be ordered (`start <= end`), even when empty.
    pub fn fits(&self, len: usize) -> bool {
        match self {
            Selector::Position(pos) => *pos < len,
            Selector::Range(range) => range.start <= range.end && range.end <= len,
            Selector::Positions(positions) => positions.iter().all(|&pos| pos < len),
        }
    }

    /// Pick the selected values out of `values`.
    ///
    /// Panics unless [`fits`](Self::fits) holds for `values.len()`.
    pub fn gather<T: Copy>(&self, values: &[T]) -> Vec<T> {
        match self {
            Selector::Position(pos) => vec![values[*pos]],
            Selector::Range(range) => values[range.clone()].to_vec(),
            Selector::Positions(positions) => positions.iter().map(|&i| values[i]).collect(),
        }
    }
}

impl From<Range<usize>> for Selector {
    fn from(range: Range<usize>) -> Self {
        Selector::Range(range)
    }
}

impl From<Vec<usize>> for Selector {
    fn from(positions: Vec<usize>) -> Self {
        Selector::Positions(positions)
    }
}
