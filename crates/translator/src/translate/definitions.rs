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

//! Method, class and module definitions, and their parameter lists.

use super::calls::empty_args;
use super::{Result, Translator, expression, join_all, unexpected, value_expression};
use crate::ast::{self, NodeType, Value};
use crate::cst::{Node, NodeKind};
use crate::ranges::range_at;
use crate::source_map::SourceMap;
use stree_common::Range;
use tracing::trace;

fn param_name(node: &Node) -> Result<&str> {
    node.token().ok_or_else(|| unexpected("parameter name", node))
}

impl<'a> Translator<'a> {
    fn param(
        &self,
        node_type: NodeType,
        name: &'a Node,
        operator: Option<Range>,
        expression: Range,
    ) -> Result<ast::Node> {
        Ok(self.s(
            node_type,
            vec![Value::sym(param_name(name)?)],
            SourceMap::Variable {
                name: Some(name.range()),
                operator,
                expression,
            },
        ))
    }

    /// `*rest`, `**opts` and `&blk`, any of which may be anonymous.
    fn prefixed_param(
        &self,
        node_type: NodeType,
        node: &'a Node,
        name: Option<&'a Node>,
        prefix: isize,
    ) -> Result<ast::Node> {
        let operator = range_at(node.start_char(), prefix);
        let expression = match name {
            Some(name) => operator.join(&name.range()),
            None => operator,
        };
        let children = match (name, node_type) {
            (Some(name), _) => vec![Value::sym(param_name(name)?)],
            (None, NodeType::Blockarg) => vec![Value::Nil],
            (None, _) => vec![],
        };
        Ok(self.s(
            node_type,
            children,
            SourceMap::Variable {
                name: name.map(Node::range),
                operator: Some(operator),
                expression,
            },
        ))
    }

    /// A required parameter: a name, or a parenthesized destructuring list.
    fn visit_required_param(&mut self, node: &'a Node) -> Result<ast::Node> {
        match &node.kind {
            NodeKind::Ident { .. } => self.param(NodeType::Arg, node, None, node.range()),
            NodeKind::MLHSParen { contents, .. } => self.frame(node, |t| {
                let parts: Vec<&'a Node> = match &contents.kind {
                    NodeKind::MLHS { parts, .. } => parts.iter().collect(),
                    _ => vec![&**contents],
                };
                let children = parts
                    .into_iter()
                    .filter(|part| {
                        !matches!(part.kind, NodeKind::ExcessedComma | NodeKind::Comma { .. })
                    })
                    .map(|part| t.visit_required_param(part).map(Value::Node))
                    .collect::<Result<Vec<_>>>()?;
                Ok(t.s(
                    NodeType::Mlhs,
                    children,
                    SourceMap::collection(
                        Some(range_at(node.start_char(), 1)),
                        Some(range_at(node.end_char(), -1)),
                        node.range(),
                    ),
                ))
            }),
            NodeKind::ArgStar { value } | NodeKind::RestParam { name: value } => {
                self.prefixed_param(NodeType::Restarg, node, value.as_deref(), 1)
            }
            NodeKind::VarField { value: Some(value) } => self.visit_required_param(value),
            _ => Err(unexpected("parameter", node)),
        }
    }

    fn visit_rest_param(&mut self, rest: &'a Node) -> Result<Option<ast::Node>> {
        match &rest.kind {
            NodeKind::RestParam { name } => self
                .prefixed_param(NodeType::Restarg, rest, name.as_deref(), 1)
                .map(Some),
            NodeKind::ArgsForward => Ok(Some(self.s(
                NodeType::ForwardArg,
                vec![],
                SourceMap::map(rest.range()),
            ))),
            NodeKind::ExcessedComma => Ok(None),
            _ => Err(unexpected("rest parameter", rest)),
        }
    }

    fn visit_keyword_rest_param(&mut self, rest: &'a Node) -> Result<ast::Node> {
        match &rest.kind {
            NodeKind::KwRestParam { name: Some(name) } if name.is_keyword("nil") => Ok(self.s(
                NodeType::Kwnilarg,
                vec![],
                SourceMap::Variable {
                    name: Some(name.range()),
                    operator: None,
                    expression: rest.range(),
                },
            )),
            NodeKind::KwRestParam { name } => {
                self.prefixed_param(NodeType::Kwrestarg, rest, name.as_deref(), 2)
            }
            NodeKind::ArgsForward => Ok(self.s(
                NodeType::ForwardArg,
                vec![],
                SourceMap::map(rest.range()),
            )),
            _ => Err(unexpected("keyword rest parameter", rest)),
        }
    }

    /// `name:` and `name: default`
    fn visit_keyword_param(
        &mut self,
        label: &'a Node,
        value: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let text = param_name(label)?;
        let name = text.strip_suffix(':').unwrap_or(text);
        let label_range = label.range();
        let name_range = label_range.with_end(label_range.end_char - 1);
        match value {
            None => Ok(self.s(
                NodeType::Kwarg,
                vec![Value::sym(name)],
                SourceMap::variable(name_range, label_range),
            )),
            Some(value) => {
                let default = self.visit(value)?;
                let end = expression(&default).unwrap_or(value.range());
                Ok(self.s(
                    NodeType::Kwoptarg,
                    vec![Value::sym(name), Value::Node(default)],
                    SourceMap::variable(name_range, label_range.join(&end)),
                ))
            }
        }
    }

    /// Every parameter of a `Params` node, in declaration order.
    pub(crate) fn visit_params_list(&mut self, params: &'a Node) -> Result<Vec<Value>> {
        let NodeKind::Params {
            requireds,
            optionals,
            rest,
            posts,
            keywords,
            keyword_rest,
            block,
        } = &params.kind
        else {
            return Err(unexpected("parameter list", params));
        };

        self.frame(params, |t| {
            let mut out = vec![];
            for required in requireds {
                out.push(Value::Node(t.visit_required_param(required)?));
            }
            for (name, value) in optionals {
                let operator = t.find(name.end_char(), value.start_char(), "=")?;
                let default = t.visit(value)?;
                let range = name
                    .range()
                    .join(&expression(&default).unwrap_or(value.range()));
                let mut optarg = t.param(NodeType::Optarg, name, Some(operator), range)?;
                optarg.children.push(Value::Node(default));
                out.push(Value::Node(optarg));
            }
            if let Some(rest) = rest.as_deref()
                && let Some(restarg) = t.visit_rest_param(rest)?
            {
                out.push(Value::Node(restarg));
            }
            for post in posts {
                out.push(Value::Node(t.visit_required_param(post)?));
            }
            for (label, value) in keywords {
                out.push(Value::Node(t.visit_keyword_param(label, value.as_ref())?));
            }
            if let Some(keyword_rest) = keyword_rest.as_deref() {
                out.push(Value::Node(t.visit_keyword_rest_param(keyword_rest)?));
            }
            if let Some(block) = block.as_deref() {
                let NodeKind::BlockArg { name } = &block.kind else {
                    return Err(unexpected("block parameter", block));
                };
                out.push(Value::Node(t.prefixed_param(
                    NodeType::Blockarg,
                    block,
                    name.as_deref(),
                    1,
                )?));
            }
            Ok(out)
        })
    }

    /// The `args` of a `def`: parenthesized, bare, or absent.
    fn visit_def_params(&mut self, params: Option<&'a Node>) -> Result<ast::Node> {
        let Some(params) = params else {
            return Ok(self.s(NodeType::Args, vec![], empty_args()));
        };
        match &params.kind {
            NodeKind::Paren { contents, .. } => {
                let children = match contents.as_deref() {
                    Some(contents) => self.frame(params, |t| t.visit_params_list(contents))?,
                    None => vec![],
                };
                Ok(self.s(
                    NodeType::Args,
                    children,
                    SourceMap::collection(
                        Some(range_at(params.start_char(), 1)),
                        Some(range_at(params.end_char(), -1)),
                        params.range(),
                    ),
                ))
            }
            _ => {
                let children = self.visit_params_list(params)?;
                let map = match join_all(children.iter().map(value_expression)) {
                    Some(range) => SourceMap::bare(range),
                    None => empty_args(),
                };
                Ok(self.s(NodeType::Args, children, map))
            }
        }
    }

    /// `def name`, `def recv.name`, and the endless `def name = value`.
    pub(crate) fn visit_def(
        &mut self,
        node: &'a Node,
        target: Option<&'a Node>,
        operator: Option<&'a Node>,
        name: &'a Node,
        params: Option<&'a Node>,
        bodystmt: &'a Node,
    ) -> Result<ast::Node> {
        let method = name
            .token()
            .ok_or_else(|| unexpected("method name", name))?;
        let keyword = range_at(node.start_char(), 3);
        let singleton = self.visit_opt(target)?;
        let args = self.visit_def_params(params)?;

        let endless = !matches!(bodystmt.kind, NodeKind::BodyStmt { .. });
        let (body, assignment, end) = if endless {
            let after = params.map_or(name.end_char(), Node::end_char);
            let assignment = self.find(after, bodystmt.start_char(), "=")?;
            trace!(method, "endless method");
            (Some(self.visit(bodystmt)?), Some(assignment), None)
        } else {
            (
                self.visit_body(bodystmt)?,
                None,
                Some(range_at(node.end_char(), -3)),
            )
        };

        let map = SourceMap::MethodDefinition {
            keyword: Some(keyword),
            operator: operator.map(Node::range),
            name: Some(name.range()),
            end,
            assignment,
            expression: node.range(),
        };
        Ok(match singleton {
            Some(singleton) => self.s(
                NodeType::Defs,
                vec![
                    Value::Node(singleton),
                    Value::sym(method),
                    Value::Node(args),
                    body.into(),
                ],
                map,
            ),
            None => self.s(
                NodeType::Def,
                vec![Value::sym(method), Value::Node(args), body.into()],
                map,
            ),
        })
    }

    pub(crate) fn visit_class(
        &mut self,
        node: &'a Node,
        constant: &'a Node,
        superclass: Option<&'a Node>,
        bodystmt: &'a Node,
    ) -> Result<ast::Node> {
        let name = self.visit(constant)?;
        let operator = match superclass {
            Some(superclass) => Some(self.find(constant.end_char(), superclass.start_char(), "<")?),
            None => None,
        };
        let parent = self.visit_value(superclass)?;
        let body = self.visit_body(bodystmt)?;
        Ok(self.s(
            NodeType::Class,
            vec![Value::Node(name), parent, body.into()],
            SourceMap::Definition {
                keyword: Some(range_at(node.start_char(), 5)),
                operator,
                name: Some(constant.range()),
                end: Some(range_at(node.end_char(), -3)),
                expression: node.range(),
            },
        ))
    }

    pub(crate) fn visit_module(
        &mut self,
        node: &'a Node,
        constant: &'a Node,
        bodystmt: &'a Node,
    ) -> Result<ast::Node> {
        let name = self.visit(constant)?;
        let body = self.visit_body(bodystmt)?;
        Ok(self.s(
            NodeType::Module,
            vec![Value::Node(name), body.into()],
            SourceMap::Definition {
                keyword: Some(range_at(node.start_char(), 6)),
                operator: None,
                name: Some(constant.range()),
                end: Some(range_at(node.end_char(), -3)),
                expression: node.range(),
            },
        ))
    }

    /// `class << target`
    pub(crate) fn visit_sclass(
        &mut self,
        node: &'a Node,
        target: &'a Node,
        bodystmt: &'a Node,
    ) -> Result<ast::Node> {
        let keyword = range_at(node.start_char(), 5);
        let operator = self.find(keyword.end_char, target.start_char(), "<<")?;
        let object = self.visit(target)?;
        let body = self.visit_body(bodystmt)?;
        Ok(self.s(
            NodeType::Sclass,
            vec![Value::Node(object), body.into()],
            SourceMap::Definition {
                keyword: Some(keyword),
                operator: Some(operator),
                name: None,
                end: Some(range_at(node.end_char(), -3)),
                expression: node.range(),
            },
        ))
    }

    pub(crate) fn visit_alias(
        &mut self,
        node: &'a Node,
        left: &'a Node,
        right: &'a Node,
    ) -> Result<ast::Node> {
        let new_name = self.visit(left)?;
        let old_name = self.visit(right)?;
        Ok(self.s(
            NodeType::Alias,
            vec![Value::Node(new_name), Value::Node(old_name)],
            SourceMap::keyword(range_at(node.start_char(), 5), None, None, node.range()),
        ))
    }

    pub(crate) fn visit_undef(&mut self, node: &'a Node, symbols: &'a [Node]) -> Result<ast::Node> {
        let children = symbols
            .iter()
            .map(|symbol| self.visit(symbol).map(Value::Node))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.s(
            NodeType::Undef,
            children,
            SourceMap::keyword(range_at(node.start_char(), 5), None, None, node.range()),
        ))
    }
}
