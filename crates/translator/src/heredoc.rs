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

//! Reassembly of string bodies that span several lines.
//!
//! Heredocs (and multi-line string literals) arrive as raw text fragments
//! interleaved with interpolations. The target dialect wants one `str` per
//! physical line, squiggly heredocs stripped of their common indentation, and
//! backslash-newline continuations folded into the line they continue.

use crate::ast;
use crate::escape::{EscapeMode, ends_with_continuation, unescape};
use stree_common::{Range, TranslateError};
use tracing::trace;

const TAB_WIDTH: usize = 8;

/// One piece of a string body.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Source text, raw until `HeredocBuilder::finish` unescapes it
    Literal { text: String, range: Range },
    /// An already translated `#{...}` or `#@var`
    Embedded(ast::Node),
}

impl Fragment {
    pub fn literal_text(&self) -> Option<&str> {
        match self {
            Fragment::Literal { text, .. } => Some(text),
            Fragment::Embedded(_) => None,
        }
    }
}

/// Cut `text` (found at `range`) after every newline.
pub fn split_lines(text: &str, range: Range) -> Vec<Fragment> {
    let mut out = vec![];
    let mut start = range.start_char;
    for line in text.split_inclusive('\n') {
        let end = start + line.chars().count();
        out.push(Fragment::Literal {
            text: line.to_string(),
            range: Range::new(start, end),
        });
        start = end;
    }
    out
}

/// Strip up to `width` columns of leading whitespace from `line`. Tabs advance to
/// the next multiple of eight and are only removed when they fit entirely.
/// Returns the remaining text and the number of columns removed.
pub fn dedent_line(line: &str, width: usize) -> (&str, usize) {
    let mut column = 0;
    let mut cut = 0;
    for (byte, c) in line.char_indices() {
        let next = match c {
            ' ' => column + 1,
            '\t' => (column / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => break,
        };
        if next > width {
            break;
        }
        column = next;
        cut = byte + c.len_utf8();
    }
    (&line[cut..], column)
}

/// Collects the fragments of one string body, then normalizes them.
#[derive(Debug)]
pub struct HeredocBuilder {
    fragments: Vec<Fragment>,
    dedent: usize,
    mode: EscapeMode,
}

impl HeredocBuilder {
    pub fn new(dedent: usize, mode: EscapeMode) -> Self {
        Self {
            fragments: vec![],
            dedent,
            mode,
        }
    }

    /// Append a fragment. A literal following a literal that has not reached the
    /// end of its line is merged into it.
    pub fn push(&mut self, fragment: Fragment) {
        if let Fragment::Literal { text, range } = &fragment {
            if let Some(Fragment::Literal {
                text: last_text,
                range: last_range,
            }) = self.fragments.last_mut()
            {
                if !last_text.ends_with('\n') {
                    last_text.push_str(text);
                    *last_range = last_range.join(range);
                    return;
                }
            }
        }
        self.fragments.push(fragment);
    }

    /// Push raw text that may span lines, one literal per physical line.
    pub fn push_text(&mut self, text: &str, range: Range) {
        for fragment in split_lines(text, range) {
            self.push(fragment);
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn apply_dedent(&mut self) {
        let mut at_line_start = true;
        for fragment in &mut self.fragments {
            match fragment {
                Fragment::Literal { text, .. } => {
                    if at_line_start {
                        let (rest, removed) = dedent_line(text, self.dedent);
                        trace!(removed, line = %text.escape_debug(), "dedent");
                        let rest = rest.to_string();
                        *text = rest;
                    }
                    at_line_start = text.ends_with('\n');
                }
                Fragment::Embedded(_) => at_line_start = false,
            }
        }
    }

    fn merge_continuations(&mut self) {
        let mut merged: Vec<Fragment> = Vec::with_capacity(self.fragments.len());
        for fragment in self.fragments.drain(..) {
            if let (
                Some(Fragment::Literal {
                    text: last_text,
                    range: last_range,
                }),
                Fragment::Literal { text, range },
            ) = (merged.last_mut(), &fragment)
            {
                if ends_with_continuation(last_text) {
                    last_text.truncate(last_text.len() - 2);
                    last_text.push_str(text);
                    *last_range = last_range.join(range);
                    continue;
                }
            }
            merged.push(fragment);
        }
        self.fragments = merged;
    }

    /// Dedent, fold continuations, and unescape. Literals left empty are dropped.
    pub fn finish(mut self) -> Result<Vec<Fragment>, TranslateError> {
        if self.dedent > 0 {
            self.apply_dedent();
        }
        if self.mode.interpolates() {
            self.merge_continuations();
        }
        let mut out = Vec::with_capacity(self.fragments.len());
        for fragment in self.fragments {
            match fragment {
                Fragment::Literal { text, range } => {
                    if text.is_empty() {
                        continue;
                    }
                    out.push(Fragment::Literal {
                        text: unescape(&text, self.mode)?,
                        range,
                    });
                }
                embedded => out.push(embedded),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeType;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn texts(fragments: &[Fragment]) -> Vec<Option<&str>> {
        fragments.iter().map(Fragment::literal_text).collect()
    }

    #[test]
    fn test_split_lines_tracks_ranges() {
        let pieces = split_lines("ab\ncd\n", Range::new(10, 16));
        assert_eq!(
            pieces,
            vec![
                Fragment::Literal {
                    text: "ab\n".into(),
                    range: Range::new(10, 13)
                },
                Fragment::Literal {
                    text: "cd\n".into(),
                    range: Range::new(13, 16)
                },
            ]
        );
    }

    #[test_case("    x", 2, "  x", 2; "partial")]
    #[test_case(" x", 4, "x", 1; "short line")]
    #[test_case("\tx", 8, "x", 8; "tab fits")]
    #[test_case("\tx", 4, "\tx", 0; "tab too wide")]
    #[test_case("  \tx", 8, "x", 8; "spaces then tab")]
    #[test_case("\n", 2, "\n", 0; "blank")]
    fn test_dedent_line(line: &str, width: usize, expected: &str, removed: usize) {
        assert_eq!(dedent_line(line, width), (expected, removed));
    }

    #[test]
    fn test_dedent_two_four_two() {
        let mut builder = HeredocBuilder::new(2, EscapeMode::Double);
        builder.push_text("  a\n    b\n  c\n", Range::new(0, 16));
        let out = builder.finish().unwrap();
        assert_eq!(texts(&out), vec![Some("a\n"), Some("  b\n"), Some("c\n")]);
    }

    #[test]
    fn test_coalesce_joins_within_a_line() {
        let mut builder = HeredocBuilder::new(0, EscapeMode::Double);
        builder.push(Fragment::Literal {
            text: "ab".into(),
            range: Range::new(0, 2),
        });
        builder.push(Fragment::Literal {
            text: "c\n".into(),
            range: Range::new(2, 4),
        });
        builder.push(Fragment::Literal {
            text: "d\n".into(),
            range: Range::new(4, 6),
        });
        assert_eq!(builder.len(), 2);
        let out = builder.finish().unwrap();
        assert_eq!(
            out[0],
            Fragment::Literal {
                text: "abc\n".into(),
                range: Range::new(0, 4)
            }
        );
    }

    #[test]
    fn test_dedent_only_touches_line_start() {
        let embedded = ast::Node::new(NodeType::Lvar, vec![ast::Value::sym("x")], None);
        let mut builder = HeredocBuilder::new(2, EscapeMode::Double);
        builder.push_text("  a ", Range::new(0, 4));
        builder.push(Fragment::Embedded(embedded));
        builder.push_text("  b\n", Range::new(8, 12));
        let out = builder.finish().unwrap();
        assert_eq!(texts(&out), vec![Some("a "), None, Some("  b\n")]);
    }

    #[test]
    fn test_whitespace_before_interpolation_is_dropped() {
        let embedded = ast::Node::new(NodeType::Lvar, vec![ast::Value::sym("x")], None);
        let mut builder = HeredocBuilder::new(2, EscapeMode::Double);
        builder.push_text("  ", Range::new(0, 2));
        builder.push(Fragment::Embedded(embedded));
        builder.push_text("\n", Range::new(6, 7));
        let out = builder.finish().unwrap();
        assert_eq!(texts(&out), vec![None, Some("\n")]);
    }

    #[test]
    fn test_continuation_merges_lines() {
        let mut builder = HeredocBuilder::new(2, EscapeMode::Double);
        builder.push_text("  a\\\n  b\n", Range::new(0, 9));
        let out = builder.finish().unwrap();
        assert_eq!(
            out,
            vec![Fragment::Literal {
                text: "ab\n".into(),
                range: Range::new(0, 9)
            }]
        );
    }

    #[test]
    fn test_raw_body_keeps_backslashes() {
        let mut builder = HeredocBuilder::new(0, EscapeMode::Raw);
        builder.push_text("a\\\nb\\n\n", Range::new(0, 7));
        let out = builder.finish().unwrap();
        assert_eq!(texts(&out), vec![Some("a\\\n"), Some("b\\n\n")]);
    }
}
