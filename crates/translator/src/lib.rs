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

//! Translation of a Ruby concrete syntax tree into the `parser` gem's AST dialect,
//! with a synthesized source map on every emitted node.

pub mod ancestors;
pub mod ast;
pub mod canonical;
pub mod cst;
pub mod escape;
pub mod heredoc;
pub mod numeric;
pub mod options;
pub mod ranges;
pub mod sexp;
pub mod source_map;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod translate;

pub use crate::ast::{NodeType, Value};
pub use crate::options::TranslateOptions;
pub use crate::source_map::SourceMap;
pub use stree_common::{Location, Range, SourceBuffer, TranslateError};

use crate::translate::Translator;
use tracing::debug;

/// Translate `root` with the default options.
pub fn translate(
    buffer: &SourceBuffer,
    root: &cst::Node,
) -> Result<Option<ast::Node>, TranslateError> {
    translate_with_options(buffer, root, &TranslateOptions::default())
}

pub fn translate_with_options(
    buffer: &SourceBuffer,
    root: &cst::Node,
    options: &TranslateOptions,
) -> Result<Option<ast::Node>, TranslateError> {
    debug!(
        source = buffer.display_name(),
        chars = buffer.char_len(),
        "translating"
    );
    let mut translator = Translator::new(buffer, options);
    let result = translator.translate_root(root);
    debug_assert_eq!(translator.depth(), 0, "ancestor stack left unbalanced");
    if let Err(e) = &result {
        debug!(source = buffer.display_name(), error = %e, "translation failed");
    }
    result
}
