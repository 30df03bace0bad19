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

//! Testing utilities: assembling origin trees by hand against a source string.
//!
//! Tokens are located by searching the source text, so tests state only the text
//! of each token and the shape of the tree. Every helper panics when the text it
//! is asked for cannot be found.

use crate::cst::{Node, NodeKind};
use stree_common::{Range, SourceBuffer};

const KEYWORDS: &[&str] = &[
    "nil",
    "true",
    "false",
    "self",
    "__FILE__",
    "__LINE__",
    "__ENCODING__",
];

/// Builds origin nodes whose locations point into `source`.
///
/// A cursor tracks how far token lookup has progressed; building the operands of
/// an expression before the expression itself therefore follows source order.
pub struct TreeBuilder {
    buffer: SourceBuffer,
    cursor: usize,
}

impl TreeBuilder {
    pub fn new(source: &str) -> Self {
        Self {
            buffer: SourceBuffer::new(source, "(test)"),
            cursor: 0,
        }
    }

    pub fn buffer(&self) -> SourceBuffer {
        self.buffer.clone()
    }

    pub fn source(&self) -> &str {
        self.buffer.text()
    }

    /// Move the lookup cursor, e.g. past text no node covers.
    pub fn seek(&mut self, offset: usize) {
        self.cursor = offset;
    }

    /// Find `text` at or after the cursor, and move the cursor past it.
    pub fn locate(&mut self, text: &str) -> Range {
        let range = self.locate_after(self.cursor, text);
        self.cursor = range.end_char;
        range
    }

    pub fn locate_after(&self, offset: usize, text: &str) -> Range {
        let window = Range::new(offset, self.buffer.char_len());
        match self.buffer.find(window, text) {
            Ok(Some(range)) => range,
            _ => panic!("{text:?} not found after offset {offset} in {:?}", self.source()),
        }
    }

    /// The last occurrence of `text` ending at or before `offset`.
    pub fn locate_before(&self, offset: usize, text: &str) -> Range {
        match self.buffer.rfind(Range::new(0, offset), text) {
            Ok(Some(range)) => range,
            _ => panic!("{text:?} not found before offset {offset} in {:?}", self.source()),
        }
    }

    fn advance(&mut self, offset: usize) {
        self.cursor = self.cursor.max(offset);
    }

    pub fn at(&self, kind: NodeKind, range: Range) -> Node {
        Node::new(kind, self.buffer.location(range))
    }

    pub fn span(&self, kind: NodeKind, start: usize, end: usize) -> Node {
        self.at(kind, Range::new(start, end))
    }

    /// A token node for `text`, its variant chosen the way the lexer would.
    pub fn token(&mut self, text: &str) -> Node {
        let range = self.locate(text);
        let value = text.to_string();
        let kind = if KEYWORDS.contains(&text) {
            NodeKind::Kw { value }
        } else if text.starts_with("@@") {
            NodeKind::CVar { value }
        } else if text.starts_with('@') {
            NodeKind::IVar { value }
        } else if text.starts_with('$') {
            NodeKind::GVar { value }
        } else if text.ends_with(':') {
            NodeKind::Label { value }
        } else if text.starts_with(|c: char| c.is_ascii_uppercase()) {
            NodeKind::Const { value }
        } else {
            NodeKind::Ident { value }
        };
        self.at(kind, range)
    }

    pub fn kw(&mut self, text: &str) -> Node {
        let range = self.locate(text);
        self.at(
            NodeKind::Kw {
                value: text.to_string(),
            },
            range,
        )
    }

    pub fn op(&mut self, text: &str) -> Node {
        let range = self.locate(text);
        self.at(
            NodeKind::Op {
                value: text.to_string(),
            },
            range,
        )
    }

    pub fn int(&mut self, text: &str) -> Node {
        let range = self.locate(text);
        self.at(
            NodeKind::Int {
                value: text.to_string(),
            },
            range,
        )
    }

    pub fn float(&mut self, text: &str) -> Node {
        let range = self.locate(text);
        self.at(
            NodeKind::FloatLiteral {
                value: text.to_string(),
            },
            range,
        )
    }

    /// A bare identifier the parser could not prove is a local: a method call.
    pub fn vcall(&mut self, name: &str) -> Node {
        let value = self.token(name);
        let range = value.range();
        self.at(
            NodeKind::VCall {
                value: Box::new(value),
            },
            range,
        )
    }

    pub fn var_ref(&mut self, name: &str) -> Node {
        let value = self.token(name);
        let range = value.range();
        self.at(
            NodeKind::VarRef {
                value: Box::new(value),
            },
            range,
        )
    }

    pub fn var_field(&mut self, name: &str) -> Node {
        let value = self.token(name);
        let range = value.range();
        self.at(
            NodeKind::VarField {
                value: Some(Box::new(value)),
            },
            range,
        )
    }

    /// An anonymous `*` rest marker, covering the star.
    pub fn anonymous_rest(&mut self) -> Node {
        let range = self.locate("*");
        self.at(NodeKind::VarField { value: None }, range)
    }

    /// The zero-width rest marker a trailing comma leaves in an array pattern.
    pub fn tail_marker(&self, offset: usize) -> Node {
        self.at(NodeKind::VarField { value: None }, Range::empty(offset))
    }

    pub fn label(&mut self, text: &str) -> Node {
        let range = self.locate(text);
        self.at(
            NodeKind::Label {
                value: text.to_string(),
            },
            range,
        )
    }

    /// A single-line literal without interpolation; `literal` includes its quotes.
    pub fn string(&mut self, literal: &str) -> Node {
        let range = self.locate(literal);
        let quote = &literal[..1];
        let inner = &literal[1..literal.len() - 1];
        let content = Range::new(range.start_char + 1, range.end_char - 1);
        let parts = if inner.is_empty() {
            vec![]
        } else {
            vec![self.at(
                NodeKind::TStringContent {
                    value: inner.to_string(),
                },
                content,
            )]
        };
        self.at(
            NodeKind::StringLiteral {
                parts,
                quote: quote.to_string(),
            },
            range,
        )
    }

    pub fn binary(&mut self, left: Node, operator: &str, right: Node) -> Node {
        let range = Range::new(left.start_char(), right.end_char());
        self.advance(range.end_char);
        self.at(
            NodeKind::Binary {
                left: Box::new(left),
                operator: operator.to_string(),
                right: Box::new(right),
            },
            range,
        )
    }

    pub fn unary(&mut self, operator: &str, statement: Node) -> Node {
        let bare = operator.trim_end_matches('@');
        let sign = self.locate_before(statement.start_char(), bare);
        let range = Range::new(sign.start_char, statement.end_char());
        self.at(
            NodeKind::Unary {
                operator: operator.to_string(),
                statement: Box::new(statement),
            },
            range,
        )
    }

    pub fn assign(&mut self, target: Node, value: Node) -> Node {
        let range = Range::new(target.start_char(), value.end_char());
        self.advance(range.end_char);
        self.at(
            NodeKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
            },
            range,
        )
    }

    fn args(&self, arguments: Vec<Node>, fallback: usize) -> Node {
        let range = match (arguments.first(), arguments.last()) {
            (Some(first), Some(last)) => Range::new(first.start_char(), last.end_char()),
            _ => Range::empty(fallback),
        };
        self.at(NodeKind::Args { parts: arguments }, range)
    }

    /// `receiver.message(arguments)`, or `message(arguments)` without a receiver.
    /// Arguments are expected to be built already.
    pub fn call(
        &mut self,
        receiver: Option<Node>,
        operator: &str,
        message: &str,
        arguments: Vec<Node>,
        parens: bool,
    ) -> Node {
        let (dot, selector) = match &receiver {
            Some(receiver) => {
                let dot = self.locate_after(receiver.end_char(), operator);
                (Some(dot), self.locate_after(dot.end_char, message))
            }
            None => match arguments.first() {
                Some(first) => (None, self.locate_before(first.start_char(), message)),
                None => (None, self.locate(message)),
            },
        };
        let start = receiver
            .as_ref()
            .map_or(selector.start_char, Node::start_char);
        let args_end = arguments.last().map_or(selector.end_char, Node::end_char);

        let (arguments, end) = if parens {
            let lparen = self.locate_after(selector.end_char, "(");
            let rparen = self.locate_after(args_end.max(lparen.end_char), ")");
            let args = if arguments.is_empty() {
                None
            } else {
                Some(Box::new(self.args(arguments, lparen.end_char)))
            };
            let paren = self.at(
                NodeKind::ArgParen { arguments: args },
                Range::new(lparen.start_char, rparen.end_char),
            );
            (Some(Box::new(paren)), rparen.end_char)
        } else if arguments.is_empty() {
            (None, selector.end_char)
        } else {
            (Some(Box::new(self.args(arguments, args_end))), args_end)
        };
        self.advance(end);

        let message = self.at(
            NodeKind::Ident {
                value: message.to_string(),
            },
            selector,
        );
        let operator = dot.map(|dot| {
            Box::new(self.at(
                NodeKind::Period {
                    value: operator.to_string(),
                },
                dot,
            ))
        });
        self.at(
            NodeKind::CallNode {
                receiver: receiver.map(Box::new),
                operator,
                message: Some(Box::new(message)),
                arguments,
            },
            Range::new(start, end),
        )
    }

    /// `message arg, arg` without parentheses.
    pub fn command(&mut self, message: &str, arguments: Vec<Node>) -> Node {
        let selector = match arguments.first() {
            Some(first) => self.locate_before(first.start_char(), message),
            None => self.locate(message),
        };
        let end = arguments.last().map_or(selector.end_char, Node::end_char);
        self.advance(end);
        let message = self.at(
            NodeKind::Ident {
                value: message.to_string(),
            },
            selector,
        );
        let arguments = self.args(arguments, selector.end_char);
        self.at(
            NodeKind::Command {
                message: Box::new(message),
                arguments: Box::new(arguments),
                block: None,
            },
            Range::new(selector.start_char, end),
        )
    }

    pub fn statements(&self, body: Vec<Node>) -> Node {
        let range = match (body.first(), body.last()) {
            (Some(first), Some(last)) => Range::new(first.start_char(), last.end_char()),
            _ => Range::empty(self.cursor),
        };
        self.at(NodeKind::Statements { body }, range)
    }

    /// A whole program covering the entire source.
    pub fn program(&self, body: Vec<Node>) -> Node {
        let statements = self.statements(body);
        self.at(
            NodeKind::Program {
                statements: Box::new(statements),
            },
            Range::new(0, self.buffer.char_len()),
        )
    }

    /// A `BodyStmt` holding only `statements`.
    pub fn body(&self, body: Vec<Node>) -> Node {
        let statements = self.statements(body);
        let range = statements.range();
        self.at(
            NodeKind::BodyStmt {
                statements: Box::new(statements),
                rescue_clause: None,
                else_keyword: None,
                else_clause: None,
                ensure_clause: None,
            },
            range,
        )
    }
}
