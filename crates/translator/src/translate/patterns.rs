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

//! `case ... in` patterns.

use super::{Result, Translator, expression, join_all, unexpected};
use crate::ast::{self, NodeType, Value};
use crate::cst::{Node, NodeKind};
use crate::ranges::range_at;
use crate::source_map::SourceMap;
use std::ptr;
use stree_common::Range;

fn is_child(child: &Node, candidate: &Node) -> bool {
    ptr::eq(child, candidate)
}

impl<'a> Translator<'a> {
    /// Whether the node being visited sits in pattern position, where bare names bind
    /// and `|`/`=>` combine patterns.
    pub(crate) fn in_pattern(&self) -> bool {
        for (parent, child) in self.stack.lineage() {
            match &parent.kind {
                NodeKind::In {
                    statements,
                    consequent,
                    ..
                } => {
                    let body = is_child(child, statements)
                        || consequent.as_deref().is_some_and(|c| is_child(child, c));
                    return !body;
                }
                NodeKind::RAssign { value, .. } => return !is_child(child, value),
                NodeKind::AryPtn { .. } | NodeKind::FndPtn { .. } | NodeKind::HshPtn { .. } => {
                    return true;
                }
                NodeKind::Binary { operator, .. } if operator == "|" || operator == "=>" => {}
                NodeKind::Statements { .. } | NodeKind::Paren { .. } => {}
                NodeKind::IfNode {
                    predicate,
                    statements,
                    ..
                }
                | NodeKind::UnlessNode {
                    predicate,
                    statements,
                    ..
                } if is_child(child, statements)
                    && statements.start_char() < predicate.start_char() => {}
                _ => return false,
            }
        }
        false
    }

    /// `*rest`, `*` or `**rest` inside a pattern; `after` bounds the search for the prefix.
    fn visit_match_rest(
        &mut self,
        rest: &'a Node,
        after: usize,
        prefix: &str,
    ) -> Result<ast::Node> {
        let operator = self.find_last(after.min(rest.start_char()), rest.end_char(), prefix)?;
        let children = match &rest.kind {
            NodeKind::VarField { value: None } => vec![],
            _ => vec![Value::Node(self.visit(rest)?)],
        };
        Ok(self.s(
            NodeType::MatchRest,
            children,
            SourceMap::operator(Some(operator), operator.join(&rest.range())),
        ))
    }

    /// Wrap `inner` in `const_pattern` when the pattern names a constant, as in `Point[x, y]`.
    /// Otherwise the pattern takes its own delimiters, if written.
    fn finish_pattern(
        &mut self,
        node: &'a Node,
        node_type: NodeType,
        children: Vec<Value>,
        constant: Option<&'a Node>,
        opening: &str,
    ) -> Result<ast::Node> {
        let Some(constant) = constant else {
            let map = if self.starts_with(node, opening) {
                SourceMap::collection(
                    Some(range_at(node.start_char(), 1)),
                    Some(range_at(node.end_char(), -1)),
                    node.range(),
                )
            } else {
                SourceMap::bare(node.range())
            };
            return Ok(self.s(node_type, children, map));
        };

        let name = self.visit(constant)?;
        let inner_range = join_all(
            children
                .iter()
                .map(|child| child.as_node().and_then(expression)),
        );
        let inner = self.s(
            node_type,
            children,
            SourceMap::Collection {
                begin: None,
                end: None,
                expression: inner_range,
            },
        );
        let delimited = node.end_char() > constant.end_char();
        let (begin, end) = if delimited {
            (
                Some(range_at(constant.end_char(), 1)),
                Some(range_at(node.end_char(), -1)),
            )
        } else {
            (None, None)
        };
        Ok(self.s(
            NodeType::ConstPattern,
            vec![Value::Node(name), Value::Node(inner)],
            SourceMap::collection(begin, end, node.range()),
        ))
    }

    /// `[a, *rest, b]`. A zero-width anonymous rest after the last element records a
    /// trailing comma, `[a,]`, and selects `array_pattern_with_tail`.
    pub(crate) fn visit_array_pattern(
        &mut self,
        node: &'a Node,
        constant: Option<&'a Node>,
        requireds: &'a [Node],
        rest: Option<&'a Node>,
        posts: &'a [Node],
    ) -> Result<ast::Node> {
        let tail = match rest {
            Some(Node {
                kind: NodeKind::VarField { value: None },
                location,
                ..
            }) => location.is_empty() && posts.is_empty(),
            _ => false,
        };

        let mut children = requireds
            .iter()
            .map(|element| self.visit(element).map(Value::Node))
            .collect::<Result<Vec<_>>>()?;
        if let Some(rest) = rest
            && !tail
        {
            let after = requireds
                .last()
                .map(Node::end_char)
                .or_else(|| constant.map(Node::end_char))
                .unwrap_or(node.start_char());
            children.push(Value::Node(self.visit_match_rest(rest, after, "*")?));
        }
        for post in posts {
            children.push(Value::Node(self.visit(post)?));
        }

        let node_type = if tail {
            NodeType::ArrayPatternWithTail
        } else {
            NodeType::ArrayPattern
        };
        self.finish_pattern(node, node_type, children, constant, "[")
    }

    /// `[*, x, *]`
    pub(crate) fn visit_find_pattern(
        &mut self,
        node: &'a Node,
        constant: Option<&'a Node>,
        left: &'a Node,
        values: &'a [Node],
        right: &'a Node,
    ) -> Result<ast::Node> {
        let start = constant.map_or(node.start_char(), Node::end_char);
        let mut children = vec![Value::Node(self.visit_match_rest(left, start, "*")?)];
        for value in values {
            children.push(Value::Node(self.visit(value)?));
        }
        let after = values.last().map_or(left.end_char(), Node::end_char);
        children.push(Value::Node(self.visit_match_rest(right, after, "*")?));
        self.finish_pattern(node, NodeType::FindPattern, children, constant, "[")
    }

    /// The key of a hash pattern entry, and the location of its colon.
    fn visit_pattern_key(&mut self, key: &'a Node) -> Result<(ast::Node, Range)> {
        let range = key.range();
        let colon = range_at(range.end_char, -1);
        match &key.kind {
            NodeKind::Label { value } => {
                let name = value.strip_suffix(':').unwrap_or(value);
                Ok((
                    self.s(
                        NodeType::Sym,
                        vec![Value::sym(name)],
                        SourceMap::bare(range.with_end(colon.start_char)),
                    ),
                    colon,
                ))
            }
            NodeKind::DynaSymbol { .. } => Ok((self.visit(key)?, colon)),
            _ => Err(unexpected("hash pattern key", key)),
        }
    }

    /// `{name: pattern, bound:, **rest}`, `**nil` included.
    pub(crate) fn visit_hash_pattern(
        &mut self,
        node: &'a Node,
        constant: Option<&'a Node>,
        keywords: &'a [(Node, Option<Node>)],
        keyword_rest: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let mut children = vec![];
        for (key, value) in keywords {
            let (symbol, colon) = self.visit_pattern_key(key)?;
            let entry = match value {
                Some(value) => {
                    let pattern = self.visit(value)?;
                    let end = expression(&pattern).unwrap_or(value.range());
                    self.s(
                        NodeType::Pair,
                        vec![Value::Node(symbol), Value::Node(pattern)],
                        SourceMap::operator(Some(colon), key.range().join(&end)),
                    )
                }
                None => {
                    let name = symbol
                        .child(0)
                        .and_then(Value::as_symbol)
                        .ok_or_else(|| unexpected("hash pattern key", key))?
                        .to_string();
                    let name_range = expression(&symbol).unwrap_or(key.range());
                    self.s(
                        NodeType::MatchVar,
                        vec![Value::sym(name)],
                        SourceMap::variable(name_range, key.range()),
                    )
                }
            };
            children.push(Value::Node(entry));
        }

        if let Some(rest) = keyword_rest {
            let after = keywords
                .last()
                .map(|(key, value)| value.as_ref().map_or(key.end_char(), Node::end_char))
                .or_else(|| constant.map(Node::end_char))
                .unwrap_or(node.start_char());
            let entry = match &rest.kind {
                NodeKind::VarField { value: Some(value) } if value.is_keyword("nil") => {
                    self.nil_pattern(rest, value, after)?
                }
                NodeKind::Kw { .. } if rest.is_keyword("nil") => {
                    self.nil_pattern(rest, rest, after)?
                }
                _ => self.visit_match_rest(rest, after, "**")?,
            };
            children.push(Value::Node(entry));
        }

        self.finish_pattern(node, NodeType::HashPattern, children, constant, "{")
    }

    /// `**nil`
    fn nil_pattern(&self, rest: &'a Node, nil: &'a Node, after: usize) -> Result<ast::Node> {
        let operator = self.find_last(after.min(rest.start_char()), nil.start_char(), "**")?;
        Ok(self.s(
            NodeType::MatchNilPattern,
            vec![],
            SourceMap::Variable {
                name: Some(nil.range()),
                operator: None,
                expression: operator.join(&nil.range()),
            },
        ))
    }

    /// `^(expression)`
    pub(crate) fn visit_pinned_begin(
        &mut self,
        node: &'a Node,
        statement: &'a Node,
    ) -> Result<ast::Node> {
        let inner = self.visit(statement)?;
        let begin = range_at(node.start_char() + 1, 1);
        let end = range_at(node.end_char(), -1);
        let group = self.s(
            NodeType::Begin,
            vec![Value::Node(inner)],
            SourceMap::collection(Some(begin), Some(end), begin.join(&end)),
        );
        Ok(self.s(
            NodeType::Pin,
            vec![Value::Node(group)],
            SourceMap::selector(range_at(node.start_char(), 1), node.range()),
        ))
    }
}
