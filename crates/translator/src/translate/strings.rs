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

//! Strings, symbols, regexps, command strings, heredocs and word lists.

use super::{Result, Translator, unexpected};
use crate::ast::{self, NodeType, Value};
use crate::cst::{Node, NodeKind};
use crate::escape::{EscapeMode, unescape};
use crate::heredoc::{Fragment, HeredocBuilder};
use crate::ranges::range_at;
use crate::source_map::SourceMap;
use itertools::Itertools;
use stree_common::Range;

fn scalar(node_type: NodeType, text: impl Into<String>) -> Value {
    match node_type {
        NodeType::Sym | NodeType::Dsym => Value::sym(text),
        _ => Value::str(text),
    }
}

fn char_len(text: &str) -> isize {
    text.chars().count() as isize
}

impl<'a> Translator<'a> {
    /// Feed the parts of a string-like literal into `builder`.
    fn collect_fragments(&mut self, parts: &'a [Node], builder: &mut HeredocBuilder) -> Result<()> {
        for part in parts {
            match &part.kind {
                NodeKind::TStringContent { value } => builder.push_text(value, part.range()),
                _ => builder.push(Fragment::Embedded(self.visit(part)?)),
            }
        }
        Ok(())
    }

    fn fragments(
        &mut self,
        parts: &'a [Node],
        dedent: usize,
        mode: EscapeMode,
    ) -> Result<Vec<Fragment>> {
        let mut builder = HeredocBuilder::new(dedent, mode);
        self.collect_fragments(parts, &mut builder)?;
        builder.finish()
    }

    /// Literal fragments become `str`s without delimiters; interpolations stay as they are.
    fn fragment_nodes(&self, fragments: Vec<Fragment>, literal: NodeType) -> Vec<Value> {
        fragments
            .into_iter()
            .map(|fragment| match fragment {
                Fragment::Literal { text, range } => {
                    let map = SourceMap::bare(range);
                    Value::Node(self.s(literal, vec![scalar(literal, text)], map))
                }
                Fragment::Embedded(node) => Value::Node(node),
            })
            .collect()
    }

    /// `str` when the body is one piece of text, `dstr` otherwise.
    fn compose_string(&self, fragments: Vec<Fragment>, map: SourceMap) -> ast::Node {
        match fragments.as_slice() {
            [] => self.s(NodeType::Str, vec![Value::str("")], map),
            [Fragment::Literal { text, .. }] => {
                self.s(NodeType::Str, vec![Value::str(text.clone())], map)
            }
            _ => self.s(NodeType::Dstr, self.fragment_nodes(fragments, NodeType::Str), map),
        }
    }

    pub(crate) fn visit_string(
        &mut self,
        node: &'a Node,
        parts: &'a [Node],
        quote: &str,
    ) -> Result<ast::Node> {
        let fragments = self.fragments(parts, 0, EscapeMode::for_quote(quote))?;
        let map = if quote.is_empty() {
            SourceMap::bare(node.range())
        } else {
            SourceMap::collection(
                Some(range_at(node.start_char(), char_len(quote))),
                Some(range_at(node.end_char(), -1)),
                node.range(),
            )
        };
        Ok(self.compose_string(fragments, map))
    }

    /// `"a" "b"`: one `dstr` of every adjacent literal, however deeply chained.
    pub(crate) fn visit_string_concat(
        &mut self,
        node: &'a Node,
        left: &'a Node,
        right: &'a Node,
    ) -> Result<ast::Node> {
        let mut children = vec![];
        for side in [left, right] {
            let translated = self.visit(side)?;
            if matches!(side.kind, NodeKind::StringConcat { .. }) {
                children.extend(translated.children);
            } else {
                children.push(Value::Node(translated));
            }
        }
        Ok(self.s(NodeType::Dstr, children, SourceMap::bare(node.range())))
    }

    /// `#{...}`
    pub(crate) fn visit_string_embexpr(
        &mut self,
        node: &'a Node,
        statements: &'a Node,
    ) -> Result<ast::Node> {
        let body = self.visit_body(statements)?;
        Ok(self.wrap_in_begin(
            body,
            range_at(node.start_char(), 2),
            range_at(node.end_char(), -1),
            node.range(),
        ))
    }

    /// Backticks and `%x(...)`; never collapsed to a plain string.
    pub(crate) fn visit_xstring(&mut self, node: &'a Node, parts: &'a [Node]) -> Result<ast::Node> {
        let fragments = self.fragments(parts, 0, EscapeMode::Double)?;
        let opening = if self.starts_with(node, "%x") { 3 } else { 1 };
        Ok(self.s(
            NodeType::Xstr,
            self.fragment_nodes(fragments, NodeType::Str),
            SourceMap::collection(
                Some(range_at(node.start_char(), opening)),
                Some(range_at(node.end_char(), -1)),
                node.range(),
            ),
        ))
    }

    pub(crate) fn visit_heredoc(
        &mut self,
        node: &'a Node,
        beginning: &'a Node,
        ending: Option<&'a Node>,
        dedent: usize,
        parts: &'a [Node],
    ) -> Result<ast::Node> {
        let opening = beginning
            .token()
            .ok_or_else(|| unexpected("heredoc opening", beginning))?;
        let squiggly = opening.starts_with("<<~");
        let identifier = opening
            .trim_start_matches("<<")
            .trim_start_matches(['~', '-']);
        let command = identifier.starts_with('`');
        let mode = if identifier.starts_with('\'') {
            EscapeMode::Raw
        } else {
            EscapeMode::Double
        };
        let fragments = self.fragments(parts, if squiggly { dedent } else { 0 }, mode)?;

        let body_end = ending
            .map(Node::start_char)
            .or_else(|| parts.last().map(Node::end_char))
            .unwrap_or(node.end_char());
        let body_start = parts.first().map(Node::start_char).unwrap_or(body_end);
        let heredoc_end = ending.map(|ending| {
            let range = ending.range();
            match ending.token() {
                Some(text) if text.ends_with('\n') => range.with_end(range.end_char - 1),
                _ => range,
            }
        });
        let map = SourceMap::Heredoc {
            heredoc_body: Some(Range::new(body_start, body_end)),
            heredoc_end,
            expression: beginning.range(),
        };

        if command {
            return Ok(self.s(NodeType::Xstr, self.fragment_nodes(fragments, NodeType::Str), map));
        }
        Ok(match fragments.as_slice() {
            [] => self.s(NodeType::Dstr, vec![], map),
            _ => self.compose_string(fragments, map),
        })
    }

    /// `:foo`, and the bare names taken by `alias` and `undef`.
    pub(crate) fn visit_symbol(&mut self, node: &'a Node, value: &'a Node) -> Result<ast::Node> {
        let name = value
            .token()
            .ok_or_else(|| unexpected("symbol name", value))?;
        let begin = self
            .starts_with(node, ":")
            .then(|| range_at(node.start_char(), 1));
        Ok(self.s(
            NodeType::Sym,
            vec![Value::sym(name)],
            SourceMap::collection(begin, None, node.range()),
        ))
    }

    /// `:"..."`, `%s(...)`, and the key of `"key": value`, which excludes its colon.
    pub(crate) fn visit_dyna_symbol(
        &mut self,
        node: &'a Node,
        parts: &'a [Node],
        quote: Option<&str>,
    ) -> Result<ast::Node> {
        let quote = quote.unwrap_or_default();
        let label = matches!(quote, "\"" | "'") && self.ends_with(node, ":");
        let end_char = if label {
            node.end_char() - 1
        } else {
            node.end_char()
        };
        let expression = Range::new(node.start_char(), end_char);
        let (begin, end) = if quote.is_empty() {
            (None, None)
        } else {
            (
                Some(range_at(node.start_char(), char_len(quote))),
                Some(range_at(end_char, -1)),
            )
        };
        let mode = EscapeMode::for_quote(quote.trim_start_matches(':'));
        let fragments = self.fragments(parts, 0, mode)?;
        let map = SourceMap::collection(begin, end, expression);
        Ok(match fragments.as_slice() {
            [Fragment::Literal { text, .. }] => {
                self.s(NodeType::Sym, vec![Value::sym(text.clone())], map)
            }
            _ => self.s(NodeType::Dsym, self.fragment_nodes(fragments, NodeType::Str), map),
        })
    }

    /// Regexp bodies are kept as written; the options follow as a sorted `regopt`.
    pub(crate) fn visit_regexp(
        &mut self,
        node: &'a Node,
        beginning: &str,
        ending: &str,
        parts: &'a [Node],
    ) -> Result<ast::Node> {
        let fragments = self.fragments(parts, 0, EscapeMode::Raw)?;
        let mut children = self.fragment_nodes(fragments, NodeType::Str);

        let options: String = ending.chars().skip(1).collect();
        let flags = options
            .chars()
            .sorted()
            .dedup()
            .map(|flag| Value::sym(flag.to_string()))
            .collect();
        let options_range = range_at(node.end_char(), -char_len(&options));
        children.push(Value::Node(self.s(
            NodeType::Regopt,
            flags,
            SourceMap::map(options_range),
        )));

        let closing = Range::new(
            options_range.start_char.saturating_sub(1),
            options_range.start_char,
        );
        Ok(self.s(
            NodeType::Regexp,
            children,
            SourceMap::collection(
                Some(range_at(node.start_char(), char_len(beginning))),
                Some(closing),
                node.range(),
            ),
        ))
    }

    /// `%w[]`, `%W[]`, `%i[]` and `%I[]`; `element` is `str` or `sym`.
    pub(crate) fn visit_words(
        &mut self,
        node: &'a Node,
        beginning: &str,
        elements: &'a [Node],
        element: NodeType,
    ) -> Result<ast::Node> {
        let interpolates = beginning.starts_with("%W") || beginning.starts_with("%I");
        let mode = if interpolates {
            EscapeMode::Double
        } else {
            EscapeMode::for_quote(beginning)
        };
        let children = elements
            .iter()
            .map(|word| {
                self.frame(word, |t| match &word.kind {
                    NodeKind::Word { parts } => t.visit_word(word, parts, element, mode),
                    NodeKind::TStringContent { value } => Ok(t.s(
                        element,
                        vec![scalar(element, unescape(value, mode)?)],
                        SourceMap::bare(word.range()),
                    )),
                    _ => Err(unexpected("word list element", word)),
                })
                .map(Value::Node)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.s(
            NodeType::Array,
            children,
            SourceMap::collection(
                Some(range_at(node.start_char(), char_len(beginning))),
                Some(range_at(node.end_char(), -1)),
                node.range(),
            ),
        ))
    }

    /// One element of a word list: a plain word, or a `dstr`/`dsym` when interpolated.
    pub(crate) fn visit_word(
        &mut self,
        node: &'a Node,
        parts: &'a [Node],
        element: NodeType,
        mode: EscapeMode,
    ) -> Result<ast::Node> {
        let fragments = self.fragments(parts, 0, mode)?;
        let map = SourceMap::bare(node.range());
        Ok(match fragments.as_slice() {
            [] => self.s(element, vec![scalar(element, "")], map),
            [Fragment::Literal { text, .. }] => {
                self.s(element, vec![scalar(element, text.clone())], map)
            }
            _ => {
                let composite = if element == NodeType::Sym {
                    NodeType::Dsym
                } else {
                    NodeType::Dstr
                };
                self.s(composite, self.fragment_nodes(fragments, NodeType::Str), map)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(NodeType::Sym, Value::sym("a"); "symbol")]
    #[test_case(NodeType::Str, Value::str("a"); "string")]
    fn test_scalar_follows_element_type(node_type: NodeType, expected: Value) {
        assert_eq!(scalar(node_type, "a"), expected);
    }
}
