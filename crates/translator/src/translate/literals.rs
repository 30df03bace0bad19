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

use super::{Result, Translator, expression, missing, unexpected};
use crate::ast::{self, NodeType, Value};
use crate::canonical::flatten_arguments;
use crate::cst::{Node, NodeKind};
use crate::escape::{EscapeMode, unescape};
use crate::numeric::{parse_float, parse_imaginary, parse_integer, parse_rational};
use crate::ranges::range_at;
use crate::source_map::SourceMap;
use stree_common::Range;

/// `$1`..`$9` and beyond are numbered references, not globals.
fn nth_ref(name: &str) -> Option<i64> {
    let digits = name.strip_prefix('$')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl<'a> Translator<'a> {
    /// Reads of variables, constants and keyword literals.
    pub(crate) fn visit_variable_token(&mut self, token: &'a Node) -> Result<ast::Node> {
        let range = token.range();
        let variable = |t: NodeType, name: &str| {
            self.s(t, vec![Value::sym(name)], SourceMap::variable(range, range))
        };
        match &token.kind {
            NodeKind::Ident { value } => Ok(variable(NodeType::Lvar, value)),
            NodeKind::IVar { value } => Ok(variable(NodeType::Ivar, value)),
            NodeKind::CVar { value } => Ok(variable(NodeType::Cvar, value)),
            NodeKind::GVar { value } | NodeKind::Backref { value } => {
                if let Some(n) = nth_ref(value) {
                    let map = SourceMap::map(range);
                    return Ok(self.s(NodeType::NthRef, vec![Value::Integer(n)], map));
                }
                if matches!(token.kind, NodeKind::Backref { .. }) {
                    let map = SourceMap::map(range);
                    return Ok(self.s(NodeType::BackRef, vec![Value::sym(value)], map));
                }
                Ok(variable(NodeType::Gvar, value))
            }
            NodeKind::Const { value } => Ok(self.s(
                NodeType::Const,
                vec![Value::Nil, Value::sym(value)],
                SourceMap::Constant {
                    double_colon: None,
                    name: Some(range),
                    operator: None,
                    expression: range,
                },
            )),
            NodeKind::Kw { value } => self.visit_keyword_literal(token, value),
            _ => Err(unexpected("variable reference", token)),
        }
    }

    pub(crate) fn visit_keyword_literal(
        &mut self,
        node: &'a Node,
        keyword: &str,
    ) -> Result<ast::Node> {
        let map = SourceMap::map(node.range());
        let literals = self.options.emit_file_line_as_literals;
        Ok(match keyword {
            "nil" => self.s(NodeType::Nil, vec![], map),
            "true" => self.s(NodeType::True, vec![], map),
            "false" => self.s(NodeType::False, vec![], map),
            "self" => self.s(NodeType::SelfRef, vec![], map),
            "__FILE__" if literals => self.s(
                NodeType::Str,
                vec![Value::str(self.buffer.display_name())],
                map,
            ),
            "__FILE__" => self.s(NodeType::File, vec![], map),
            "__LINE__" if literals => {
                let line = self.buffer.line_of(node.start_char()) as i64;
                self.s(NodeType::Int, vec![Value::Integer(line)], map)
            }
            "__LINE__" => self.s(NodeType::Line, vec![], map),
            "__ENCODING__" if self.options.emit_encoding => self.s(NodeType::Encoding, vec![], map),
            "__ENCODING__" => {
                let encoding = ast::Node::new(
                    NodeType::Const,
                    vec![Value::Nil, Value::sym("Encoding")],
                    None,
                );
                self.s(
                    NodeType::Const,
                    vec![Value::Node(encoding), Value::sym("UTF_8")],
                    map,
                )
            }
            _ => return Err(unexpected("keyword literal", node)),
        })
    }

    /// A bare `name:` label outside a hash, as a symbol.
    pub(crate) fn visit_label(&mut self, node: &'a Node, label: &str) -> Result<ast::Node> {
        let name = label.strip_suffix(':').unwrap_or(label);
        Ok(self.s(
            NodeType::Sym,
            vec![Value::sym(name)],
            SourceMap::collection(None, Some(range_at(node.end_char(), -1)), node.range()),
        ))
    }

    /// `int`, `float`, `rational` and `complex`. `sign` is the location of a sign
    /// folded in from a unary operator; a sign written in `text` is found here.
    pub(crate) fn visit_numeric(
        &mut self,
        node: &'a Node,
        text: &str,
        sign: Option<Range>,
        expression: Range,
    ) -> Result<ast::Node> {
        let sign = sign.or_else(|| {
            text.starts_with(['-', '+'])
                .then(|| range_at(node.start_char(), 1))
        });
        let (node_type, value) = match &node.kind {
            NodeKind::Int { .. } => (NodeType::Int, parse_integer(text)?),
            NodeKind::FloatLiteral { .. } => (NodeType::Float, Value::Float(parse_float(text)?)),
            NodeKind::RationalLiteral { .. } => {
                (NodeType::Rational, Value::Rational(parse_rational(text)?))
            }
            NodeKind::Imaginary { .. } => {
                (NodeType::Complex, Value::Complex(parse_imaginary(text)?))
            }
            _ => return Err(unexpected("numeric literal", node)),
        };
        Ok(self.s(node_type, vec![value], SourceMap::operator(sign, expression)))
    }

    /// `?a`
    pub(crate) fn visit_char(&mut self, node: &'a Node, text: &str) -> Result<ast::Node> {
        let raw = text.strip_prefix('?').unwrap_or(text);
        let value = unescape(raw, EscapeMode::Double)?;
        Ok(self.s(
            NodeType::Str,
            vec![Value::str(value)],
            SourceMap::collection(Some(range_at(node.start_char(), 1)), None, node.range()),
        ))
    }

    pub(crate) fn visit_array(
        &mut self,
        node: &'a Node,
        lbracket: Option<&'a Node>,
        contents: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let elements = contents.map(flatten_arguments).unwrap_or_default();
        let children = elements
            .into_iter()
            .map(|element| self.visit(element).map(Value::Node))
            .collect::<Result<Vec<_>>>()?;
        let map = match lbracket {
            Some(lbracket) => SourceMap::collection(
                Some(lbracket.range()),
                Some(range_at(node.end_char(), -1)),
                node.range(),
            ),
            None => SourceMap::bare(node.range()),
        };
        Ok(self.s(NodeType::Array, children, map))
    }

    pub(crate) fn visit_hash(
        &mut self,
        node: &'a Node,
        assocs: &'a [Node],
        braces: bool,
    ) -> Result<ast::Node> {
        let children = assocs
            .iter()
            .map(|assoc| self.visit(assoc).map(Value::Node))
            .collect::<Result<Vec<_>>>()?;
        let map = if braces {
            SourceMap::collection(
                Some(range_at(node.start_char(), 1)),
                Some(range_at(node.end_char(), -1)),
                node.range(),
            )
        } else {
            SourceMap::bare(node.range())
        };
        Ok(self.s(NodeType::Hash, children, map))
    }

    /// `key => value`, `key: value`, `"key": value` and the shorthand `key:`.
    pub(crate) fn visit_assoc(
        &mut self,
        node: &'a Node,
        key: &'a Node,
        value: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let key_range = key.range();
        match (&key.kind, value) {
            (NodeKind::Label { value: label }, value) => {
                let name = label.strip_suffix(':').unwrap_or(label);
                let name_range = key_range.with_end(key_range.end_char - 1);
                let colon = range_at(key_range.end_char, -1);
                let symbol = self.s(
                    NodeType::Sym,
                    vec![Value::sym(name)],
                    SourceMap::bare(name_range),
                );
                let (value, expression) = match value {
                    Some(value) => {
                        let translated = self.visit(value)?;
                        let end = expression(&translated).unwrap_or(value.range());
                        (translated, key_range.join(&end))
                    }
                    None => (self.shorthand_value(name, name_range), key_range),
                };
                Ok(self.s(
                    NodeType::Pair,
                    vec![Value::Node(symbol), Value::Node(value)],
                    SourceMap::operator(Some(colon), expression),
                ))
            }
            (NodeKind::DynaSymbol { .. }, Some(value)) if self.ends_with(key, ":") => {
                let symbol = self.visit(key)?;
                let translated = self.visit(value)?;
                Ok(self.s(
                    NodeType::Pair,
                    vec![Value::Node(symbol), Value::Node(translated)],
                    SourceMap::operator(
                        Some(range_at(key_range.end_char, -1)),
                        Range::new(key_range.start_char, node.end_char().max(value.end_char())),
                    ),
                ))
            }
            (_, Some(value)) => {
                let symbol = self.visit(key)?;
                let arrow = self.find(key.end_char(), value.start_char(), "=>")?;
                let translated = self.visit(value)?;
                Ok(self.s(
                    NodeType::Pair,
                    vec![Value::Node(symbol), Value::Node(translated)],
                    SourceMap::operator(
                        Some(arrow),
                        Range::new(key_range.start_char, value.end_char()),
                    ),
                ))
            }
            (_, None) => Err(missing(node, "value")),
        }
    }

    /// The implied value of `{x:}`: a method call, or a constant for `{X:}`.
    fn shorthand_value(&self, name: &str, range: Range) -> ast::Node {
        if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            self.s(
                NodeType::Const,
                vec![Value::Nil, Value::sym(name)],
                SourceMap::Constant {
                    double_colon: None,
                    name: Some(range),
                    operator: None,
                    expression: range,
                },
            )
        } else {
            self.s(
                NodeType::Send,
                vec![Value::Nil, Value::sym(name)],
                SourceMap::selector(range, range),
            )
        }
    }

    pub(crate) fn visit_assoc_splat(
        &mut self,
        node: &'a Node,
        value: Option<&'a Node>,
    ) -> Result<ast::Node> {
        match value {
            Some(value) => {
                let translated = self.visit(value)?;
                Ok(self.s(
                    NodeType::Kwsplat,
                    vec![Value::Node(translated)],
                    SourceMap::operator(Some(range_at(node.start_char(), 2)), node.range()),
                ))
            }
            None => Ok(self.s(
                NodeType::ForwardedKwrestarg,
                vec![],
                SourceMap::map(node.range()),
            )),
        }
    }

    pub(crate) fn visit_range(
        &mut self,
        node: &'a Node,
        left: Option<&'a Node>,
        operator: &'a Node,
        right: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let node_type = match operator.token() {
            Some("..") => NodeType::Irange,
            Some("...") => NodeType::Erange,
            _ => return Err(unexpected("range operator", operator)),
        };
        let left = self.visit_value(left)?;
        let right = self.visit_value(right)?;
        Ok(self.s(
            node_type,
            vec![left, right],
            SourceMap::operator(Some(operator.range()), node.range()),
        ))
    }
}
