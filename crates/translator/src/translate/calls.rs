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

//! Method calls, blocks, lambdas, `super`/`yield`, and operators.

use std::collections::VecDeque;

use super::{Result, Translator, expression, unexpected};
use crate::ast::{self, NodeType, Value};
use crate::canonical::{
    CallShape, Canonical, canonical_binary, canonical_call, canonical_unary, flatten_arguments,
};
use crate::cst::{Node, NodeKind};
use crate::ranges::range_at;
use crate::source_map::SourceMap;
use stree_common::Range;
use tracing::trace;

/// Where a brace-less trailing hash sits in an argument list, if it can become `kwargs`.
fn kwargs_position(arguments: &[&Node]) -> Option<usize> {
    let last = arguments.len().checked_sub(1)?;
    let candidate = match arguments[last].kind {
        NodeKind::ArgBlock { .. } => last.checked_sub(1)?,
        _ => last,
    };
    matches!(arguments[candidate].kind, NodeKind::BareAssocHash { .. }).then_some(candidate)
}

/// `_1` through `_9`.
fn numbered_parameter(name: &str) -> Option<i64> {
    let digit = name.strip_prefix('_')?;
    let mut chars = digit.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ '1'..='9'), None) => c.to_digit(10).map(i64::from),
        _ => None,
    }
}

/// The highest numbered parameter used in `body`, not looking into nested blocks
/// or lambdas, which have their own.
pub(crate) fn max_numbered_parameter(body: &Node) -> Option<i64> {
    let mut queue: VecDeque<&Node> = body.child_nodes().into();
    let mut max = None;
    while let Some(node) = queue.pop_front() {
        match &node.kind {
            NodeKind::BlockNode { .. } | NodeKind::Lambda { .. } => continue,
            NodeKind::Ident { value } => max = max.max(numbered_parameter(value)),
            _ => {}
        }
        queue.extend(node.child_nodes());
    }
    max
}

/// Whether a regexp literal has no interpolation and declares a named group.
fn has_named_captures(node: &Node) -> bool {
    let NodeKind::RegexpLiteral { parts, .. } = &node.kind else {
        return false;
    };
    let mut source = String::new();
    for part in parts {
        match &part.kind {
            NodeKind::TStringContent { value } => source.push_str(value),
            _ => return false,
        }
    }
    source.match_indices("(?<").any(|(at, _)| {
        source[at + 3..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
    })
}

/// Parameters absent from the source: `(args)` without a location.
pub(crate) fn empty_args() -> SourceMap {
    SourceMap::Collection {
        begin: None,
        end: None,
        expression: None,
    }
}

impl<'a> Translator<'a> {
    /// Translate call arguments, turning a trailing brace-less hash into `kwargs`.
    pub(crate) fn visit_arguments(&mut self, arguments: &[&'a Node]) -> Result<Vec<Value>> {
        let kwargs = self
            .options
            .emit_kwargs
            .then(|| kwargs_position(arguments))
            .flatten();
        arguments
            .iter()
            .copied()
            .enumerate()
            .map(|(index, argument)| {
                let translated = self.visit(argument)?;
                Ok(Value::Node(if Some(index) == kwargs {
                    translated.retagged(NodeType::Kwargs)
                } else {
                    translated
                }))
            })
            .collect()
    }

    /// `send`/`csend` from the canonical call shape, with any command block folded in.
    pub(crate) fn emit_send(&mut self, shape: CallShape<'a>) -> Result<ast::Node> {
        let receiver = self.visit_value(shape.receiver)?;
        let mut children = vec![receiver, Value::sym(shape.message.as_str())];
        children.extend(self.visit_arguments(&shape.arguments)?);
        let (begin, end) = shape.parens.unzip();
        let call = self.s(
            if shape.safe_navigation {
                NodeType::Csend
            } else {
                NodeType::Send
            },
            children,
            SourceMap::Send {
                dot: shape.dot,
                selector: shape.selector,
                operator: None,
                begin,
                end,
                expression: shape.expression,
            },
        );
        match shape.block {
            Some(block) => {
                let expression = Range::new(shape.expression.start_char, block.end_char());
                self.emit_block(call, block, expression)
            }
            None => Ok(call),
        }
    }

    pub(crate) fn visit_call(&mut self, node: &'a Node) -> Result<ast::Node> {
        let shape = canonical_call(node)?;
        self.emit_send(shape)
    }

    /// `&block`, or an anonymous `&`.
    pub(crate) fn visit_block_pass(
        &mut self,
        node: &'a Node,
        value: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let value = self.visit_value(value)?;
        Ok(self.s(
            NodeType::BlockPass,
            vec![value],
            SourceMap::operator(Some(range_at(node.start_char(), 1)), node.range()),
        ))
    }

    /// `*value`. An anonymous `*` forwards the enclosing rest parameter, except as an
    /// assignment target.
    pub(crate) fn visit_splat(
        &mut self,
        node: &'a Node,
        value: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let star = range_at(node.start_char(), 1);
        match value {
            Some(value) => {
                let value = self.visit(value)?;
                Ok(self.s(
                    NodeType::Splat,
                    vec![Value::Node(value)],
                    SourceMap::operator(Some(star), node.range()),
                ))
            }
            None if matches!(
                self.stack.parent().map(|parent| &parent.kind),
                Some(NodeKind::MLHS { .. } | NodeKind::MLHSParen { .. })
            ) =>
            {
                Ok(self.s(NodeType::Splat, vec![], SourceMap::operator(Some(star), node.range())))
            }
            None => Ok(self.s(NodeType::ForwardedRestarg, vec![], SourceMap::map(node.range()))),
        }
    }

    /// A call with a block; a block given to `break`/`next`/`return`'s argument stays
    /// under the keyword.
    pub(crate) fn visit_method_add_block(
        &mut self,
        node: &'a Node,
        call: &'a Node,
        block: &'a Node,
    ) -> Result<ast::Node> {
        let flow = match &call.kind {
            NodeKind::Break { arguments } => Some((NodeType::Break, "break", Some(&**arguments))),
            NodeKind::Next { arguments } => Some((NodeType::Next, "next", Some(&**arguments))),
            NodeKind::ReturnNode { arguments } => {
                Some((NodeType::Return, "return", arguments.as_deref()))
            }
            _ => None,
        };
        let Some((node_type, keyword, arguments)) = flow else {
            let call = self.visit(call)?;
            return self.emit_block(call, block, node.range());
        };

        let inner = match arguments.map(flatten_arguments).as_deref() {
            Some([inner]) => *inner,
            _ => return Err(unexpected("block call under flow keyword", call)),
        };
        let inner_start = inner.start_char();
        let translated = self.frame(call, |t| t.visit(inner))?;
        let with_block =
            self.emit_block(translated, block, Range::new(inner_start, node.end_char()))?;
        Ok(self.s(
            node_type,
            vec![Value::Node(with_block)],
            SourceMap::keyword(
                range_at(node.start_char(), keyword.len() as isize),
                None,
                None,
                node.range(),
            ),
        ))
    }

    /// Attach `block` to an already translated call: `block`, or `numblock` when the
    /// body uses numbered parameters instead of declaring any.
    pub(crate) fn emit_block(
        &mut self,
        call: ast::Node,
        block: &'a Node,
        expression: Range,
    ) -> Result<ast::Node> {
        let NodeKind::BlockNode {
            opening,
            block_var,
            bodystmt,
        } = &block.kind
        else {
            return Err(unexpected("block", block));
        };
        self.frame(block, |t| {
            let params = match block_var {
                Some(block_var) => Some(t.visit_block_var(block_var)?),
                None => None,
            };
            let numbered = match params {
                Some(_) => None,
                None => max_numbered_parameter(bodystmt),
            };
            let body = t.visit_body(bodystmt)?;
            let end = match opening.token() {
                Some("{") => range_at(block.end_char(), -1),
                _ => range_at(block.end_char(), -3),
            };
            let map = SourceMap::collection(Some(opening.range()), Some(end), expression);
            Ok(match numbered {
                Some(count) => {
                    trace!(count, "numbered parameters");
                    t.s(
                        NodeType::Numblock,
                        vec![Value::Node(call), Value::Integer(count), body.into()],
                        map,
                    )
                }
                None => {
                    let args = params.unwrap_or_else(|| t.s(NodeType::Args, vec![], empty_args()));
                    t.s(
                        NodeType::Block,
                        vec![Value::Node(call), Value::Node(args), body.into()],
                        map,
                    )
                }
            })
        })
    }

    /// `|a, b; c|`
    fn visit_block_var(&mut self, block_var: &'a Node) -> Result<ast::Node> {
        let NodeKind::BlockVar { params, locals } = &block_var.kind else {
            return Err(unexpected("block parameters", block_var));
        };
        self.frame(block_var, |t| {
            let mut children = t.visit_params_list(params)?;
            if let NodeKind::Params {
                requireds,
                optionals,
                rest: None,
                posts,
                keywords,
                keyword_rest: None,
                block: None,
            } = &params.kind
            {
                let single = requireds.len() == 1
                    && optionals.is_empty()
                    && posts.is_empty()
                    && keywords.is_empty();
                if let (true, [Value::Node(only)]) = (single, children.as_mut_slice()) {
                    let arg = std::mem::replace(only, ast::Node::new(NodeType::Args, vec![], None));
                    *only = match arg.node_type {
                        NodeType::Mlhs => arg.retagged(NodeType::Procarg0),
                        _ => {
                            let range = expression(&arg).unwrap_or(requireds[0].range());
                            t.s(NodeType::Procarg0, vec![Value::Node(arg)], SourceMap::bare(range))
                        }
                    };
                }
            }
            children.extend(t.shadow_args(locals));
            Ok(t.s(
                NodeType::Args,
                children,
                SourceMap::collection(
                    Some(range_at(block_var.start_char(), 1)),
                    Some(range_at(block_var.end_char(), -1)),
                    block_var.range(),
                ),
            ))
        })
    }

    /// Block-local variables declared after `;` in a parameter list.
    fn shadow_args(&self, locals: &'a [Node]) -> Vec<Value> {
        locals
            .iter()
            .filter_map(|local| {
                let name = local.token()?;
                Some(Value::Node(self.s(
                    NodeType::Shadowarg,
                    vec![Value::sym(name)],
                    SourceMap::variable(local.range(), local.range()),
                )))
            })
            .collect()
    }

    /// The parameters of `->`: parenthesized, bare, or absent.
    fn visit_lambda_params(&mut self, params: &'a Node) -> Result<ast::Node> {
        self.frame(params, |t| match &params.kind {
            NodeKind::Paren {
                contents: Some(contents),
                ..
            } => {
                let children = t.visit_lambda_param_list(contents)?;
                Ok(t.s(
                    NodeType::Args,
                    children,
                    SourceMap::collection(
                        Some(range_at(params.start_char(), 1)),
                        Some(range_at(params.end_char(), -1)),
                        params.range(),
                    ),
                ))
            }
            NodeKind::Paren { contents: None, .. } => Ok(t.s(
                NodeType::Args,
                vec![],
                SourceMap::collection(
                    Some(range_at(params.start_char(), 1)),
                    Some(range_at(params.end_char(), -1)),
                    params.range(),
                ),
            )),
            _ => {
                let children = t.visit_lambda_param_list(params)?;
                if children.is_empty() {
                    Ok(t.s(NodeType::Args, children, empty_args()))
                } else {
                    Ok(t.s(NodeType::Args, children, SourceMap::bare(params.range())))
                }
            }
        })
    }

    fn visit_lambda_param_list(&mut self, node: &'a Node) -> Result<Vec<Value>> {
        match &node.kind {
            NodeKind::LambdaVar { params, locals } | NodeKind::BlockVar { params, locals } => {
                self.frame(node, |t| {
                    let mut children = t.visit_params_list(params)?;
                    children.extend(t.shadow_args(locals));
                    Ok(children)
                })
            }
            _ => self.visit_params_list(node),
        }
    }

    fn lambda_has_params(params: &Node) -> bool {
        match &params.kind {
            NodeKind::Paren { .. } => true,
            NodeKind::Params {
                requireds,
                optionals,
                rest,
                posts,
                keywords,
                keyword_rest,
                block,
            } => {
                !requireds.is_empty()
                    || !optionals.is_empty()
                    || rest.is_some()
                    || !posts.is_empty()
                    || !keywords.is_empty()
                    || keyword_rest.is_some()
                    || block.is_some()
            }
            _ => true,
        }
    }

    /// `->(a) { ... }`
    pub(crate) fn visit_lambda(
        &mut self,
        node: &'a Node,
        params: &'a Node,
        statements: &'a Node,
    ) -> Result<ast::Node> {
        let arrow = range_at(node.start_char(), 2);
        let lambda = if self.options.emit_lambda {
            self.s(NodeType::Lambda, vec![], SourceMap::map(arrow))
        } else {
            self.s(
                NodeType::Send,
                vec![Value::Nil, Value::sym("lambda")],
                SourceMap::selector(arrow, arrow),
            )
        };
        let numbered = if Self::lambda_has_params(params) {
            None
        } else {
            max_numbered_parameter(statements)
        };
        let args = self.visit_lambda_params(params)?;
        let body = self.visit_body(statements)?;

        let after_params = params.end_char().max(arrow.end_char);
        let (begin, end) = if self.ends_with(node, "}") {
            (
                self.find(after_params, node.end_char(), "{")?,
                range_at(node.end_char(), -1),
            )
        } else {
            (
                self.find(after_params, node.end_char(), "do")?,
                range_at(node.end_char(), -3),
            )
        };
        let map = SourceMap::collection(Some(begin), Some(end), node.range());
        Ok(match numbered {
            Some(count) => self.s(
                NodeType::Numblock,
                vec![Value::Node(lambda), Value::Integer(count), body.into()],
                map,
            ),
            None => self.s(
                NodeType::Block,
                vec![Value::Node(lambda), Value::Node(args), body.into()],
                map,
            ),
        })
    }

    /// Arguments of `super`/`yield`, with the parentheses when written.
    fn keyword_arguments(
        &mut self,
        arguments: Option<&'a Node>,
    ) -> Result<(Vec<Value>, Option<Range>, Option<Range>)> {
        let Some(arguments) = arguments else {
            return Ok((vec![], None, None));
        };
        let (parts, begin, end) = match &arguments.kind {
            NodeKind::ArgParen { .. } | NodeKind::Paren { .. } => {
                let parts = match &arguments.kind {
                    NodeKind::Paren {
                        contents: Some(contents),
                        ..
                    } => flatten_arguments(contents),
                    NodeKind::Paren { contents: None, .. } => vec![],
                    _ => flatten_arguments(arguments),
                };
                (
                    parts,
                    Some(range_at(arguments.start_char(), 1)),
                    Some(range_at(arguments.end_char(), -1)),
                )
            }
            _ => (flatten_arguments(arguments), None, None),
        };
        let values = self.frame(arguments, |t| t.visit_arguments(&parts))?;
        Ok((values, begin, end))
    }

    pub(crate) fn visit_super(&mut self, node: &'a Node, arguments: &'a Node) -> Result<ast::Node> {
        let (children, begin, end) = self.keyword_arguments(Some(arguments))?;
        Ok(self.s(
            NodeType::Super,
            children,
            SourceMap::keyword(range_at(node.start_char(), 5), begin, end, node.range()),
        ))
    }

    pub(crate) fn visit_yield(
        &mut self,
        node: &'a Node,
        arguments: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let (children, begin, end) = self.keyword_arguments(arguments)?;
        Ok(self.s(
            NodeType::Yield,
            children,
            SourceMap::keyword(range_at(node.start_char(), 5), begin, end, node.range()),
        ))
    }

    /// Boolean operators, pattern alternatives and bindings, `=~` with named
    /// captures, and everything else as a method call.
    pub(crate) fn visit_binary(
        &mut self,
        node: &'a Node,
        left: &'a Node,
        operator: &str,
        right: &'a Node,
    ) -> Result<ast::Node> {
        let node_type = match operator {
            "&&" | "and" => Some(NodeType::And),
            "||" | "or" => Some(NodeType::Or),
            "|" if self.in_pattern() => Some(NodeType::MatchAlt),
            "=>" if self.in_pattern() => Some(NodeType::MatchAs),
            _ => None,
        };
        if let Some(node_type) = node_type {
            let op = self.find(left.end_char(), right.start_char(), operator)?;
            let left = self.visit(left)?;
            let right = self.visit(right)?;
            return Ok(self.s(
                node_type,
                vec![Value::Node(left), Value::Node(right)],
                SourceMap::operator(Some(op), node.range()),
            ));
        }
        if operator == "=~" && has_named_captures(left) {
            let selector = self.find(left.end_char(), right.start_char(), operator)?;
            let regexp = self.visit(left)?;
            let value = self.visit(right)?;
            return Ok(self.s(
                NodeType::MatchWithLvasgn,
                vec![Value::Node(regexp), Value::Node(value)],
                SourceMap::selector(selector, node.range()),
            ));
        }
        let shape = canonical_binary(self.buffer, node)?;
        self.emit_send(shape)
    }

    pub(crate) fn visit_unary(
        &mut self,
        node: &'a Node,
        operator: &str,
        statement: &'a Node,
    ) -> Result<ast::Node> {
        if operator == "!" {
            let operand = self.visit(statement)?;
            let operand = self.check_condition(operand);
            return Ok(self.s(
                NodeType::Send,
                vec![Value::Node(operand), Value::sym("!")],
                SourceMap::selector(range_at(node.start_char(), 1), node.range()),
            ));
        }
        match canonical_unary(node)? {
            Canonical::SignedNumeric {
                literal,
                text,
                sign,
                expression,
            } => self.frame(literal, |t| t.visit_numeric(literal, &text, Some(sign), expression)),
            Canonical::Call(shape) => self.emit_send(shape),
        }
    }

    /// `not x`, `not(x)` and `not()`.
    pub(crate) fn visit_not(
        &mut self,
        node: &'a Node,
        statement: Option<&'a Node>,
        parentheses: bool,
    ) -> Result<ast::Node> {
        let keyword = range_at(node.start_char(), 3);
        let (begin, end) = if parentheses {
            let window_end = statement.map_or(node.end_char(), Node::start_char);
            (
                Some(self.find(keyword.end_char, window_end, "(")?),
                Some(range_at(node.end_char(), -1)),
            )
        } else {
            (None, None)
        };
        let operand = match statement {
            Some(statement) => {
                let operand = self.visit(statement)?;
                self.check_condition(operand)
            }
            None => {
                let (Some(begin), Some(end)) = (begin, end) else {
                    return Err(unexpected("operand of not", node));
                };
                self.s(
                    NodeType::Begin,
                    vec![],
                    SourceMap::collection(Some(begin), Some(end), begin.join(&end)),
                )
            }
        };
        Ok(self.s(
            NodeType::Send,
            vec![Value::Node(operand), Value::sym("!")],
            SourceMap::Send {
                dot: None,
                selector: Some(keyword),
                operator: None,
                begin,
                end,
                expression: node.range(),
            },
        ))
    }

    /// `defined?(value)`
    pub(crate) fn visit_defined(&mut self, node: &'a Node, value: &'a Node) -> Result<ast::Node> {
        let keyword = range_at(node.start_char(), 8);
        let begin = self.search(keyword.end_char, value.start_char(), "(")?;
        let end = begin.map(|_| range_at(node.end_char(), -1));
        let value = self.visit(value)?;
        Ok(self.s(
            NodeType::Defined,
            vec![Value::Node(value)],
            SourceMap::keyword(keyword, begin, end, node.range()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("_1", Some(1); "first")]
    #[test_case("_9", Some(9); "last")]
    #[test_case("_0", None; "zero")]
    #[test_case("_10", None; "two digits")]
    #[test_case("x", None; "plain")]
    fn test_numbered_parameter(name: &str, expected: Option<i64>) {
        assert_eq!(numbered_parameter(name), expected);
    }
}
