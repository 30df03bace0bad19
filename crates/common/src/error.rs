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

use serde::Serialize;
use thiserror::Error;

/// Everything that can stop a translation. All of these are contract violations: the syntax
/// tree and the source buffer disagree, or a tree shape arrived that no rule accepts.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum TranslateError {
    #[error("Could not find {needle:?} between {start} and {end} (searched {window:?})")]
    NeedleNotFound {
        needle: String,
        start: usize,
        end: usize,
        window: String,
    },
    #[error("Range {start}...{end} lies outside the source buffer ({len} characters)")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("{node} is missing its {field}")]
    MissingChild {
        node: &'static str,
        field: &'static str,
    },
    #[error("Unexpected {found} in {context}")]
    UnexpectedNode {
        context: &'static str,
        found: &'static str,
    },
    #[error("Invalid numeric literal: {0}")]
    InvalidNumericLiteral(String),
    #[error("Invalid escape sequence: {0:?}")]
    InvalidEscape(String),
}
