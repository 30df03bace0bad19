// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Where a syntax node sits in its source buffer, as reported by the parser.
///
/// Lines are 1-based and relative to the start of the buffer text; columns and
/// character offsets are 0-based and count characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub start_line: usize,
    pub start_char: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_char: usize,
    pub end_column: usize,
}

impl Location {
    pub fn new(
        start_line: usize,
        start_char: usize,
        start_column: usize,
        end_line: usize,
        end_char: usize,
        end_column: usize,
    ) -> Self {
        Self {
            start_line,
            start_char,
            start_column,
            end_line,
            end_char,
            end_column,
        }
    }

    /// A location starting where `self` starts and ending where `other` ends.
    pub fn to(&self, other: &Location) -> Location {
        Location {
            start_line: self.start_line,
            start_char: self.start_char,
            start_column: self.start_column,
            end_line: other.end_line,
            end_char: other.end_char,
            end_column: other.end_column,
        }
    }

    pub fn range(&self) -> Range {
        Range::new(self.start_char, self.end_char)
    }

    pub fn is_empty(&self) -> bool {
        self.start_char == self.end_char
    }
}

/// A half-open span of character offsets, `[start_char, end_char)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Range {
    pub start_char: usize,
    pub end_char: usize,
}

impl Range {
    pub fn new(start_char: usize, end_char: usize) -> Self {
        Self {
            start_char,
            end_char,
        }
    }

    /// A zero-width range at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end_char.saturating_sub(self.start_char)
    }

    pub fn is_empty(&self) -> bool {
        self.start_char >= self.end_char
    }

    /// Smallest range covering both `self` and `other`.
    pub fn join(&self, other: &Range) -> Range {
        Range::new(
            self.start_char.min(other.start_char),
            self.end_char.max(other.end_char),
        )
    }

    pub fn contains(&self, other: &Range) -> bool {
        self.start_char <= other.start_char && other.end_char <= self.end_char
    }

    pub fn with_start(&self, start_char: usize) -> Range {
        Range::new(start_char, self.end_char)
    }

    pub fn with_end(&self, end_char: usize) -> Range {
        Range::new(self.start_char, end_char)
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...{}", self.start_char, self.end_char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_is_commutative_cover() {
        let a = Range::new(4, 7);
        let b = Range::new(1, 2);
        assert_eq!(a.join(&b), Range::new(1, 7));
        assert_eq!(b.join(&a), Range::new(1, 7));
        assert!(a.join(&b).contains(&a));
        assert!(a.join(&b).contains(&b));
    }

    #[test]
    fn test_location_to() {
        let a = Location::new(1, 0, 0, 1, 3, 3);
        let b = Location::new(2, 8, 2, 2, 11, 5);
        let joined = a.to(&b);
        assert_eq!(joined.range(), Range::new(0, 11));
        assert_eq!(joined.end_line, 2);
        assert_eq!(joined.end_column, 5);
    }

    #[test]
    fn test_empty_range_contained_at_edges() {
        let outer = Range::new(3, 9);
        assert!(outer.contains(&Range::empty(3)));
        assert!(outer.contains(&Range::empty(9)));
        assert!(!outer.contains(&Range::empty(10)));
        assert!(Range::empty(5).is_empty());
        assert_eq!(Range::new(3, 9).len(), 6);
    }
}
