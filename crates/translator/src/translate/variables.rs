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

use super::{Result, Translator, missing, unexpected};
use crate::ast::{self, NodeType, Value};
use crate::canonical::flatten_arguments;
use crate::cst::{Node, NodeKind};
use crate::ranges::range_at;
use crate::source_map::SourceMap;
use stree_common::Range;
use tracing::trace;

impl<'a> Translator<'a> {
    /// An assignment target, or a binding inside a pattern.
    pub(crate) fn visit_var_field(
        &mut self,
        node: &'a Node,
        value: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let value = value.ok_or_else(|| missing(node, "value"))?;
        let name = value
            .token()
            .ok_or_else(|| unexpected("assignment target", value))?;
        let range = node.range();
        let name_range = value.range();

        if self.in_pattern() {
            if let NodeKind::Ident { .. } = value.kind {
                trace!(name, "pattern binding");
                return Ok(self.s(
                    NodeType::MatchVar,
                    vec![Value::sym(name)],
                    SourceMap::variable(name_range, range),
                ));
            }
        }

        let node_type = match value.kind {
            NodeKind::Ident { .. } => NodeType::Lvasgn,
            NodeKind::IVar { .. } => NodeType::Ivasgn,
            NodeKind::CVar { .. } => NodeType::Cvasgn,
            NodeKind::GVar { .. } => NodeType::Gvasgn,
            NodeKind::Const { .. } => {
                return Ok(self.s(
                    NodeType::Casgn,
                    vec![Value::Nil, Value::sym(name)],
                    SourceMap::Constant {
                        double_colon: None,
                        name: Some(name_range),
                        operator: None,
                        expression: range,
                    },
                ));
            }
            _ => return Err(unexpected("assignment target", value)),
        };
        Ok(self.s(node_type, vec![Value::sym(name)], SourceMap::variable(name_range, range)))
    }

    /// `^name`
    pub(crate) fn visit_pinned_var(
        &mut self,
        node: &'a Node,
        value: &'a Node,
    ) -> Result<ast::Node> {
        let pinned = self.visit(value)?;
        Ok(self.s(
            NodeType::Pin,
            vec![Value::Node(pinned)],
            SourceMap::selector(range_at(node.start_char(), 1), node.range()),
        ))
    }

    /// `Parent::Name`, read or assigned.
    pub(crate) fn visit_const_path(
        &mut self,
        node: &'a Node,
        parent: &'a Node,
        constant: &'a Node,
        field: bool,
    ) -> Result<ast::Node> {
        let scope = self.visit(parent)?;
        let name = constant
            .token()
            .ok_or_else(|| unexpected("constant name", constant))?;
        let double_colon = self.find(parent.end_char(), constant.start_char(), "::")?;
        Ok(self.s(
            if field { NodeType::Casgn } else { NodeType::Const },
            vec![Value::Node(scope), Value::sym(name)],
            SourceMap::Constant {
                double_colon: Some(double_colon),
                name: Some(constant.range()),
                operator: None,
                expression: node.range(),
            },
        ))
    }

    /// `::Name`, read or assigned.
    pub(crate) fn visit_top_const(
        &mut self,
        node: &'a Node,
        constant: &'a Node,
        field: bool,
    ) -> Result<ast::Node> {
        let name = constant
            .token()
            .ok_or_else(|| unexpected("constant name", constant))?;
        let double_colon = range_at(node.start_char(), 2);
        let cbase = self.s(NodeType::Cbase, vec![], SourceMap::map(double_colon));
        Ok(self.s(
            if field { NodeType::Casgn } else { NodeType::Const },
            vec![Value::Node(cbase), Value::sym(name)],
            SourceMap::Constant {
                double_colon: Some(double_colon),
                name: Some(constant.range()),
                operator: None,
                expression: node.range(),
            },
        ))
    }

    fn under_op_assign(&self) -> bool {
        matches!(
            self.stack.parent().map(|parent| &parent.kind),
            Some(NodeKind::OpAssign { .. })
        )
    }

    /// `recv.name = ...`; under an operator assignment the message keeps its plain name.
    pub(crate) fn visit_field(
        &mut self,
        node: &'a Node,
        parent: &'a Node,
        operator: &'a Node,
        name: &'a Node,
    ) -> Result<ast::Node> {
        let receiver = self.visit(parent)?;
        let message = name
            .token()
            .ok_or_else(|| unexpected("attribute name", name))?;
        let message = if self.under_op_assign() {
            message.to_string()
        } else {
            format!("{message}=")
        };
        let node_type = if operator.token() == Some("&.") {
            NodeType::Csend
        } else {
            NodeType::Send
        };
        Ok(self.s(
            node_type,
            vec![Value::Node(receiver), Value::sym(message)],
            SourceMap::Send {
                dot: Some(operator.range()),
                selector: Some(name.range()),
                operator: None,
                begin: None,
                end: None,
                expression: node.range(),
            },
        ))
    }

    /// `recv[index]`, read or assigned.
    pub(crate) fn visit_aref(
        &mut self,
        node: &'a Node,
        collection: &'a Node,
        index: Option<&'a Node>,
        field: bool,
    ) -> Result<ast::Node> {
        let receiver = self.visit(collection)?;
        let mut children = vec![Value::Node(receiver)];
        let indices = index.map(flatten_arguments).unwrap_or_default();
        let begin = self.find(collection.end_char(), node.end_char(), "[")?;
        let end = range_at(node.end_char(), -1);

        if self.options.emit_index {
            for index in indices {
                children.push(Value::Node(self.visit(index)?));
            }
            return Ok(self.s(
                if field { NodeType::Indexasgn } else { NodeType::Index },
                children,
                SourceMap::Index {
                    begin: Some(begin),
                    end: Some(end),
                    operator: None,
                    expression: node.range(),
                },
            ));
        }

        let message = if field && !self.under_op_assign() { "[]=" } else { "[]" };
        children.push(Value::sym(message));
        for index in indices {
            children.push(Value::Node(self.visit(index)?));
        }
        Ok(self.s(
            NodeType::Send,
            children,
            SourceMap::selector(begin.join(&end), node.range()),
        ))
    }

    /// `target = value`: the target node gains the value as its last child.
    pub(crate) fn visit_assign(
        &mut self,
        node: &'a Node,
        target: &'a Node,
        value: &'a Node,
    ) -> Result<ast::Node> {
        let ast::Node {
            node_type,
            mut children,
            location,
        } = self.visit(target)?;
        let operator = self.find(target.end_char(), value.start_char(), "=")?;
        children.push(Value::Node(self.visit(value)?));
        let location =
            location.map(|map| map.with_operator(operator).with_expression(node.range()));
        Ok(ast::Node::new(node_type, children, location))
    }

    /// `target op= value`, including `||=` and `&&=`.
    pub(crate) fn visit_op_assign(
        &mut self,
        node: &'a Node,
        target: &'a Node,
        operator: &'a Node,
        value: &'a Node,
    ) -> Result<ast::Node> {
        let op = operator
            .token()
            .ok_or_else(|| unexpected("assignment operator", operator))?;
        let target = self.visit(target)?;
        let value = self.visit(value)?;
        let map = SourceMap::OpAssign {
            operator: Some(operator.range()),
            expression: node.range(),
        };
        Ok(match op {
            "||=" => self.s(NodeType::OrAsgn, vec![Value::Node(target), Value::Node(value)], map),
            "&&=" => self.s(NodeType::AndAsgn, vec![Value::Node(target), Value::Node(value)], map),
            _ => self.s(
                NodeType::OpAsgn,
                vec![
                    Value::Node(target),
                    Value::sym(op.trim_end_matches('=')),
                    Value::Node(value),
                ],
                map,
            ),
        })
    }

    /// `a, b = value`
    pub(crate) fn visit_massign(
        &mut self,
        node: &'a Node,
        target: &'a Node,
        value: &'a Node,
    ) -> Result<ast::Node> {
        let targets = self.visit(target)?;
        let operator = self.find(target.end_char(), value.start_char(), "=")?;
        let translated = self.visit(value)?;
        let value = match value.kind {
            NodeKind::ArgStar { .. } => {
                self.s(
                    NodeType::Array,
                    vec![Value::Node(translated)],
                    SourceMap::bare(value.range()),
                )
            }
            _ => translated,
        };
        Ok(self.s(
            NodeType::Masgn,
            vec![Value::Node(targets), Value::Node(value)],
            SourceMap::operator(Some(operator), node.range()),
        ))
    }

    /// The left-hand side of a multiple assignment; `parens` when written in parentheses.
    pub(crate) fn visit_mlhs(
        &mut self,
        node: &'a Node,
        parts: &'a [Node],
        parens: Option<(Range, Range)>,
    ) -> Result<ast::Node> {
        let children = parts
            .iter()
            .filter(|part| !matches!(part.kind, NodeKind::ExcessedComma | NodeKind::Comma { .. }))
            .map(|part| self.visit(part).map(Value::Node))
            .collect::<Result<Vec<_>>>()?;
        let map = match parens {
            Some((begin, end)) => SourceMap::collection(Some(begin), Some(end), node.range()),
            None => SourceMap::bare(node.range()),
        };
        Ok(self.s(NodeType::Mlhs, children, map))
    }

    pub(crate) fn visit_mlhs_paren(
        &mut self,
        node: &'a Node,
        contents: &'a Node,
    ) -> Result<ast::Node> {
        let parens = (range_at(node.start_char(), 1), range_at(node.end_char(), -1));
        match &contents.kind {
            NodeKind::MLHS { parts, .. } => {
                self.frame(contents, |t| t.visit_mlhs(node, parts, Some(parens)))
            }
            _ => {
                let inner = self.visit(contents)?;
                Ok(self.s(
                    NodeType::Mlhs,
                    vec![Value::Node(inner)],
                    SourceMap::collection(Some(parens.0), Some(parens.1), node.range()),
                ))
            }
        }
    }

    /// The right-hand side `1, *b` of a multiple assignment.
    pub(crate) fn visit_mrhs(&mut self, node: &'a Node, parts: &'a [Node]) -> Result<ast::Node> {
        let children = parts
            .iter()
            .map(|part| self.visit(part).map(Value::Node))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.s(NodeType::Array, children, SourceMap::bare(node.range())))
    }
}
