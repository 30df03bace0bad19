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

//! Source ranges for tokens the origin tree does not carry as nodes.

use crate::cst::Node;
use stree_common::{Range, SourceBuffer, TranslateError};

pub fn range_of(node: &Node) -> Range {
    node.range()
}

/// `length` characters starting at `offset`, or ending at `offset` when `length` is negative.
pub fn range_at(offset: usize, length: isize) -> Range {
    let width = length.unsigned_abs();
    if length < 0 {
        Range::new(offset.saturating_sub(width), offset)
    } else {
        Range::new(offset, offset + width)
    }
}

/// The first `needle` inside `[start, end)`. A missing needle means the tree and the
/// buffer disagree, and is reported with the searched text.
pub fn range_find(
    buffer: &SourceBuffer,
    start: usize,
    end: usize,
    needle: &str,
) -> Result<Range, TranslateError> {
    range_search(buffer, start, end, needle)?.ok_or_else(|| TranslateError::NeedleNotFound {
        needle: needle.to_string(),
        start,
        end,
        window: buffer
            .slice(Range::new(start, end))
            .unwrap_or_default()
            .to_string(),
    })
}

/// Like `range_find`, for tokens that are allowed to be absent (`then`, `do`).
pub fn range_search(
    buffer: &SourceBuffer,
    start: usize,
    end: usize,
    needle: &str,
) -> Result<Option<Range>, TranslateError> {
    if start > end {
        return Err(TranslateError::OutOfBounds {
            start,
            end,
            len: buffer.char_len(),
        });
    }
    buffer.find(Range::new(start, end), needle)
}

/// An optional keyword (`then`, `do`) between the end of a head and the start of a
/// body. Comments and longer words that contain it do not count.
pub fn range_search_keyword(
    buffer: &SourceBuffer,
    start: usize,
    end: usize,
    keyword: &str,
) -> Result<Option<Range>, TranslateError> {
    if start > end {
        return Ok(None);
    }
    buffer.find_keyword(Range::new(start, end), keyword)
}

/// The last `needle` inside `[start, end)`.
pub fn range_find_last(
    buffer: &SourceBuffer,
    start: usize,
    end: usize,
    needle: &str,
) -> Result<Range, TranslateError> {
    buffer
        .rfind(Range::new(start, end), needle)?
        .ok_or_else(|| TranslateError::NeedleNotFound {
            needle: needle.to_string(),
            start,
            end,
            window: buffer
                .slice(Range::new(start, end))
                .unwrap_or_default()
                .to_string(),
        })
}
