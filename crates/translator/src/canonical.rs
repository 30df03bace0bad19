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

//! Folding of binary operators, unary operators and the various call forms into
//! a single receiver/message/arguments/block shape.

use crate::cst::{Node, NodeKind};
use crate::ranges::{range_at, range_find, range_of};
use stree_common::{Range, SourceBuffer, TranslateError};

/// A method call in the one shape every call-like origin node reduces to.
#[derive(Debug, Clone, PartialEq)]
pub struct CallShape<'a> {
    pub receiver: Option<&'a Node>,
    /// The `.`, `&.` or `::` between receiver and message
    pub dot: Option<Range>,
    pub safe_navigation: bool,
    pub message: String,
    /// `None` for `recv.()`
    pub selector: Option<Range>,
    pub arguments: Vec<&'a Node>,
    /// The `(` and `)` around the arguments, when written
    pub parens: Option<(Range, Range)>,
    /// A `BlockNode` written as part of a command, `foo bar do ... end`
    pub block: Option<&'a Node>,
    /// The call without any block
    pub expression: Range,
}

/// What a unary expression reduces to.
#[derive(Debug, Clone, PartialEq)]
pub enum Canonical<'a> {
    Call(CallShape<'a>),
    /// A numeric literal with its sign folded into the literal text
    SignedNumeric {
        literal: &'a Node,
        text: String,
        sign: Range,
        expression: Range,
    },
}

/// The argument nodes inside an `ArgParen`/`Args` wrapper, in order.
pub fn flatten_arguments(node: &Node) -> Vec<&Node> {
    match &node.kind {
        NodeKind::Args { parts } => parts.iter().collect(),
        NodeKind::ArgParen { arguments } => arguments
            .as_deref()
            .map(flatten_arguments)
            .unwrap_or_default(),
        _ => vec![node],
    }
}

fn is_call_shaped(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::CallNode { .. }
            | NodeKind::Command { .. }
            | NodeKind::CommandCall { .. }
            | NodeKind::VCall { .. }
    )
}

fn message_text(node: &Node) -> Result<&str, TranslateError> {
    node.token().ok_or(TranslateError::UnexpectedNode {
        context: "call message",
        found: node.name(),
    })
}

fn parens_of(arguments: Option<&Node>) -> Option<(Range, Range)> {
    match arguments {
        Some(node @ Node {
            kind: NodeKind::ArgParen { .. },
            ..
        }) => Some((
            range_at(node.start_char(), 1),
            range_at(node.end_char(), -1),
        )),
        _ => None,
    }
}

fn dot_of(operator: Option<&Node>) -> (Option<Range>, bool) {
    match operator {
        Some(op) => (Some(range_of(op)), op.token() == Some("&.")),
        None => (None, false),
    }
}

/// Expression of a command whose block is attached: from the start of the call to
/// the end of its last argument or message.
fn command_expression(node: &Node, message: &Node, arguments: Option<&Node>) -> Range {
    let end = arguments
        .map(Node::end_char)
        .unwrap_or(message.end_char())
        .max(message.end_char());
    Range::new(node.start_char(), end)
}

/// Calls in any of their origin shapes: `recv.msg(args)`, `msg args`,
/// `recv.msg args`, `recv.()`, and a bare `msg`.
pub fn canonical_call(node: &Node) -> Result<CallShape<'_>, TranslateError> {
    match &node.kind {
        NodeKind::CallNode {
            receiver,
            operator,
            message,
            arguments,
        } => {
            let (dot, safe_navigation) = dot_of(operator.as_deref());
            let (message, selector) = match message {
                Some(message) => (message_text(message)?.to_string(), Some(range_of(message))),
                None => ("call".to_string(), None),
            };
            Ok(CallShape {
                receiver: receiver.as_deref(),
                dot,
                safe_navigation,
                message,
                selector,
                arguments: arguments
                    .as_deref()
                    .map(flatten_arguments)
                    .unwrap_or_default(),
                parens: parens_of(arguments.as_deref()),
                block: None,
                expression: range_of(node),
            })
        }
        NodeKind::Command {
            message,
            arguments,
            block,
        } => Ok(CallShape {
            receiver: None,
            dot: None,
            safe_navigation: false,
            message: message_text(message)?.to_string(),
            selector: Some(range_of(message)),
            arguments: flatten_arguments(arguments),
            parens: parens_of(Some(arguments)),
            block: block.as_deref(),
            expression: match block {
                Some(_) => command_expression(node, message, Some(arguments)),
                None => range_of(node),
            },
        }),
        NodeKind::CommandCall {
            receiver,
            operator,
            message,
            arguments,
            block,
        } => {
            let (dot, safe_navigation) = dot_of(Some(operator));
            Ok(CallShape {
                receiver: Some(receiver),
                dot,
                safe_navigation,
                message: message_text(message)?.to_string(),
                selector: Some(range_of(message)),
                arguments: arguments
                    .as_deref()
                    .map(flatten_arguments)
                    .unwrap_or_default(),
                parens: parens_of(arguments.as_deref()),
                block: block.as_deref(),
                expression: match block {
                    Some(_) => command_expression(node, message, arguments.as_deref()),
                    None => range_of(node),
                },
            })
        }
        NodeKind::VCall { value } => Ok(CallShape {
            receiver: None,
            dot: None,
            safe_navigation: false,
            message: message_text(value)?.to_string(),
            selector: Some(range_of(value)),
            arguments: vec![],
            parens: None,
            block: None,
            expression: range_of(node),
        }),
        _ => Err(TranslateError::UnexpectedNode {
            context: "call",
            found: node.name(),
        }),
    }
}

/// `left op right` as `left.op(right)`. The operator has no token of its own, so it
/// is found between the two operands.
pub fn canonical_binary<'a>(
    buffer: &SourceBuffer,
    node: &'a Node,
) -> Result<CallShape<'a>, TranslateError> {
    if is_call_shaped(node) {
        return canonical_call(node);
    }
    let NodeKind::Binary {
        left,
        operator,
        right,
    } = &node.kind
    else {
        return Err(TranslateError::UnexpectedNode {
            context: "binary expression",
            found: node.name(),
        });
    };
    let selector = range_find(buffer, left.end_char(), right.start_char(), operator)?;
    Ok(CallShape {
        receiver: Some(left),
        dot: None,
        safe_navigation: false,
        message: operator.clone(),
        selector: Some(selector),
        arguments: vec![right],
        parens: None,
        block: None,
        expression: range_of(node),
    })
}

fn numeric_text(node: &Node) -> Option<&str> {
    match &node.kind {
        NodeKind::Int { value }
        | NodeKind::FloatLiteral { value }
        | NodeKind::RationalLiteral { value }
        | NodeKind::Imaginary { value } => Some(value),
        _ => None,
    }
}

/// `op operand` as `operand.op()`, with `-`/`+` renamed to `-@`/`+@`. A sign in
/// front of a numeric literal becomes part of the literal instead.
pub fn canonical_unary(node: &Node) -> Result<Canonical<'_>, TranslateError> {
    if is_call_shaped(node) {
        return canonical_call(node).map(Canonical::Call);
    }
    let NodeKind::Unary {
        operator,
        statement,
    } = &node.kind
    else {
        return Err(TranslateError::UnexpectedNode {
            context: "unary expression",
            found: node.name(),
        });
    };
    let bare = operator.trim_end_matches('@');
    let sign = range_at(node.start_char(), bare.chars().count() as isize);
    if let Some(text) = numeric_text(statement) {
        let unsigned = !text.starts_with(['-', '+']);
        if unsigned && (bare == "-" || bare == "+") {
            let text = if bare == "-" {
                format!("-{text}")
            } else {
                text.to_string()
            };
            return Ok(Canonical::SignedNumeric {
                literal: statement,
                text,
                sign,
                expression: range_of(node),
            });
        }
    }
    let message = match bare {
        "-" => "-@".to_string(),
        "+" => "+@".to_string(),
        other => other.to_string(),
    };
    Ok(Canonical::Call(CallShape {
        receiver: Some(statement),
        dot: None,
        safe_navigation: false,
        message,
        selector: Some(sign),
        arguments: vec![],
        parens: None,
        block: None,
        expression: range_of(node),
    }))
}
