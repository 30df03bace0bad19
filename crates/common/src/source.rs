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

use crate::error::TranslateError;
use crate::location::{Location, Range};

/// Immutable source text plus the metadata the translator needs to report positions.
///
/// All offsets handed in and out are character offsets. The buffer keeps a
/// char-to-byte table so slicing stays O(1) for non-ASCII input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    display_name: String,
    first_line: usize,
    /// Byte offset of every character, plus a trailing entry for the end of the text.
    char_offsets: Vec<usize>,
    /// Character offset at which each line begins.
    line_starts: Vec<usize>,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>, display_name: impl Into<String>) -> Self {
        let text = text.into();
        let mut char_offsets = Vec::with_capacity(text.len() + 1);
        let mut line_starts = vec![0];
        for (index, (byte, c)) in text.char_indices().enumerate() {
            char_offsets.push(byte);
            if c == '\n' {
                line_starts.push(index + 1);
            }
        }
        char_offsets.push(text.len());
        Self {
            text,
            display_name: display_name.into(),
            first_line: 1,
            char_offsets,
            line_starts,
        }
    }

    /// Number the first line of the buffer `first_line` instead of 1, for
    /// fragments cut out of a larger file.
    pub fn with_first_line(mut self, first_line: usize) -> Self {
        self.first_line = first_line;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.char_offsets.len() - 1
    }

    fn check(&self, range: Range) -> Result<(), TranslateError> {
        if range.start_char > range.end_char || range.end_char > self.char_len() {
            return Err(TranslateError::OutOfBounds {
                start: range.start_char,
                end: range.end_char,
                len: self.char_len(),
            });
        }
        Ok(())
    }

    pub fn slice(&self, range: Range) -> Result<&str, TranslateError> {
        self.check(range)?;
        let start = self.char_offsets[range.start_char];
        let end = self.char_offsets[range.end_char];
        Ok(&self.text[start..end])
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        let start = *self.char_offsets.get(offset)?;
        self.text[start..].chars().next()
    }

    /// First occurrence of `needle` lying entirely inside `window`.
    pub fn find(&self, window: Range, needle: &str) -> Result<Option<Range>, TranslateError> {
        let haystack = self.slice(window)?;
        Ok(haystack
            .find(needle)
            .map(|byte| self.found_at(window, haystack, byte, needle)))
    }

    /// Last occurrence of `needle` lying entirely inside `window`.
    pub fn rfind(&self, window: Range, needle: &str) -> Result<Option<Range>, TranslateError> {
        let haystack = self.slice(window)?;
        Ok(haystack
            .rfind(needle)
            .map(|byte| self.found_at(window, haystack, byte, needle)))
    }

    /// First `keyword` inside `window` that stands as a word of its own,
    /// ignoring anything after a `#` on each line.
    pub fn find_keyword(
        &self,
        window: Range,
        keyword: &str,
    ) -> Result<Option<Range>, TranslateError> {
        let haystack = self.slice(window)?;
        let width = keyword.chars().count();
        let mut line_start = window.start_char;
        for line in haystack.split_inclusive('\n') {
            let code = line.split_once('#').map_or(line, |(code, _)| code);
            for (byte, _) in code.match_indices(keyword) {
                let start = line_start + code[..byte].chars().count();
                let end = start + width;
                let before = start.checked_sub(1).and_then(|offset| self.char_at(offset));
                let after = self.char_at(end);
                if !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char) {
                    return Ok(Some(Range::new(start, end)));
                }
            }
            line_start += line.chars().count();
        }
        Ok(None)
    }

    fn found_at(&self, window: Range, haystack: &str, byte: usize, needle: &str) -> Range {
        let start = window.start_char + haystack[..byte].chars().count();
        Range::new(start, start + needle.chars().count())
    }

    fn line_index(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        }
    }

    /// The line number of `offset`, counted from `first_line`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_index(offset) + self.first_line
    }

    pub fn column_of(&self, offset: usize) -> usize {
        offset - self.line_starts[self.line_index(offset)]
    }

    /// A full `Location` for `range`, with lines relative to the buffer (1-based).
    pub fn location(&self, range: Range) -> Location {
        Location::new(
            self.line_index(range.start_char) + 1,
            range.start_char,
            self.column_of(range.start_char),
            self.line_index(range.end_char) + 1,
            range.end_char,
            self.column_of(range.end_char),
        )
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
