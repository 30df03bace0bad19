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

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Whether to attach a source map to every emitted node. Without them the output is the
    /// minimal AST export: same tree, `location` always `None`.
    pub source_maps: bool,
    /// Whether `->` becomes a `(lambda)` node rather than `(send nil :lambda)`
    pub emit_lambda: bool,
    /// Whether element reference and assignment become `index`/`indexasgn` rather than
    /// sends of `[]`/`[]=`
    pub emit_index: bool,
    /// Whether a trailing brace-less hash argument becomes `kwargs`
    pub emit_kwargs: bool,
    /// Whether `__ENCODING__` is kept as its own node instead of `Encoding::UTF_8`
    pub emit_encoding: bool,
    /// Whether `__FILE__` and `__LINE__` are replaced by the literal they evaluate to
    pub emit_file_line_as_literals: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            source_maps: true,
            emit_lambda: true,
            emit_index: true,
            emit_kwargs: true,
            emit_encoding: false,
            emit_file_line_as_literals: true,
        }
    }
}

impl TranslateOptions {
    /// The minimal export: same tree shape, no source maps.
    pub fn without_source_maps() -> Self {
        Self {
            source_maps: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let options: TranslateOptions =
            serde_json::from_str(r#"{ "source_maps": false, "emit_encoding": true }"#).unwrap();
        assert_eq!(
            options,
            TranslateOptions {
                source_maps: false,
                emit_encoding: true,
                ..TranslateOptions::default()
            }
        );
    }
}
