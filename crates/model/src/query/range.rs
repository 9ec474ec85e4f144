use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeFrom};

/// Half-open row window `[start, end)` produced by `$top` and `$skip`.
/// `end == None` means the window is open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl RowRange {
    /// `$top=n` on its own: `[0, n)`.
    pub fn top(n: usize) -> Self {
        Self {
            start: 0,
            end: Some(n),
        }
    }

    /// `$skip=n` on its own: `[n, ∞)`.
    pub fn skip(n: usize) -> Self {
        Self {
            start: n,
            end: None,
        }
    }

    /// Combines optional `$top` and `$skip` values. The top count is taken
    /// relative to the skipped offset.
    pub fn from_options(top: Option<usize>, skip: Option<usize>) -> Option<Self> {
        match (top, skip) {
            (None, None) => None,
            (Some(top), None) => Some(Self::top(top)),
            (None, Some(skip)) => Some(Self::skip(skip)),
            (Some(top), Some(skip)) => Some(Self {
                start: skip,
                end: Some(skip.saturating_add(top)),
            }),
        }
    }

    /// Maximum number of rows in the window, if bounded.
    pub fn limit(&self) -> Option<usize> {
        self.end.map(|end| end.saturating_sub(self.start))
    }

    pub fn as_bounded(&self) -> Option<Range<usize>> {
        self.end.map(|end| self.start..end)
    }

    pub fn as_unbounded(&self) -> RangeFrom<usize> {
        self.start..
    }
}
