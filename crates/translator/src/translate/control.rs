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

//! Conditionals, loops, `case`, exception handling and grouping.

use super::{Result, Translator, expression, join_all, missing, statement_nodes, unexpected};
use crate::ast::{self, NodeType, Value};
use crate::canonical::flatten_arguments;
use crate::cst::{Node, NodeKind};
use crate::ranges::range_at;
use crate::source_map::SourceMap;
use stree_common::Range;

/// A `begin` with no delimiters of its own, as produced for a statement list.
fn is_bare_begin(node: &ast::Node) -> bool {
    node.node_type == NodeType::Begin
        && matches!(
            node.location,
            Some(SourceMap::Collection {
                begin: None,
                end: None,
                ..
            })
        )
}

/// Children of a delimited `begin`-like node: a statement list is spliced in.
fn spliced(body: Option<ast::Node>) -> Vec<Value> {
    match body {
        None => vec![],
        Some(body) if is_bare_begin(&body) => body.children,
        Some(body) => vec![Value::Node(body)],
    }
}

/// Whether `statements` is written after `predicate`, as in `a if b`.
fn is_modifier(predicate: &Node, statements: &Node) -> bool {
    statements.start_char() < predicate.start_char()
}

impl<'a> Translator<'a> {
    pub(crate) fn wrap_in_begin(
        &self,
        body: Option<ast::Node>,
        begin: Range,
        end: Range,
        range: Range,
    ) -> ast::Node {
        self.s(
            NodeType::Begin,
            spliced(body),
            SourceMap::collection(Some(begin), Some(end), range),
        )
    }

    /// Rewrites applied to a value used as a condition: ranges become flip-flops and
    /// a bare regexp matches against the last read line.
    pub(crate) fn check_condition(&self, node: ast::Node) -> ast::Node {
        match node.node_type {
            NodeType::Begin if node.children.len() == 1 => {
                let ast::Node {
                    node_type,
                    children,
                    location,
                } = node;
                let children = children
                    .into_iter()
                    .map(|child| match child {
                        Value::Node(inner) => Value::Node(self.check_condition(inner)),
                        other => other,
                    })
                    .collect();
                ast::Node::new(node_type, children, location)
            }
            NodeType::And | NodeType::Or | NodeType::Irange | NodeType::Erange => {
                let node_type = match node.node_type {
                    NodeType::Irange => NodeType::Iflipflop,
                    NodeType::Erange => NodeType::Eflipflop,
                    other => other,
                };
                let children = node
                    .children
                    .into_iter()
                    .map(|child| match child {
                        Value::Node(inner) => Value::Node(self.check_condition(inner)),
                        other => other,
                    })
                    .collect();
                ast::Node::new(node_type, children, node.location)
            }
            NodeType::Regexp => {
                let range = expression(&node);
                let map = range.map(SourceMap::map);
                ast::Node::new(NodeType::MatchCurrentLine, vec![Value::Node(node)], map)
            }
            _ => node,
        }
    }

    /// `begin ... end`
    pub(crate) fn visit_kwbegin(
        &mut self,
        node: &'a Node,
        bodystmt: &'a Node,
    ) -> Result<ast::Node> {
        let body = self.visit_body(bodystmt)?;
        Ok(self.s(
            NodeType::Kwbegin,
            spliced(body),
            SourceMap::collection(
                Some(range_at(node.start_char(), 5)),
                Some(range_at(node.end_char(), -3)),
                node.range(),
            ),
        ))
    }

    /// `( ... )`
    pub(crate) fn visit_paren(
        &mut self,
        node: &'a Node,
        contents: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let body = match contents {
            Some(contents) => self.visit_body(contents)?,
            None => None,
        };
        Ok(self.wrap_in_begin(
            body,
            range_at(node.start_char(), 1),
            range_at(node.end_char(), -1),
            node.range(),
        ))
    }

    /// `BEGIN { ... }` and `END { ... }`
    pub(crate) fn visit_prepost(
        &mut self,
        node: &'a Node,
        node_type: NodeType,
        lbrace: &'a Node,
        statements: &'a Node,
    ) -> Result<ast::Node> {
        let keyword_len = if node_type == NodeType::Preexe { 5 } else { 3 };
        let body = self.visit_body(statements)?;
        Ok(self.s(
            node_type,
            vec![body.into()],
            SourceMap::keyword(
                range_at(node.start_char(), keyword_len),
                Some(lbrace.range()),
                Some(range_at(node.end_char(), -1)),
                node.range(),
            ),
        ))
    }

    /// A body with optional `rescue`, `else` and `ensure` clauses.
    pub(crate) fn visit_bodystmt(&mut self, node: &'a Node) -> Result<Option<ast::Node>> {
        let NodeKind::BodyStmt {
            statements,
            rescue_clause,
            else_keyword,
            else_clause,
            ensure_clause,
        } = &node.kind
        else {
            return Err(unexpected("body", node));
        };

        let body = self.visit_body(statements)?;
        let else_body = match else_clause.as_deref() {
            Some(clause @ Node {
                kind: NodeKind::Else { statements, .. },
                ..
            }) => self.frame(clause, |t| t.visit_body(statements))?,
            Some(clause) => self.visit_body(clause)?,
            None => None,
        };
        let else_range = else_keyword.as_deref().map(Node::range).or_else(|| {
            match else_clause.as_deref().map(|clause| &clause.kind) {
                Some(NodeKind::Else { keyword, .. }) => Some(keyword.range()),
                _ => None,
            }
        });

        let mut result = match rescue_clause.as_deref() {
            Some(rescue) => {
                let resbodies = self.visit_rescue_chain(rescue)?;
                let range = join_all(
                    std::iter::once(body.as_ref().and_then(expression))
                        .chain(resbodies.iter().map(expression))
                        .chain([else_range, else_body.as_ref().and_then(expression)]),
                )
                .unwrap_or(rescue.range());
                let mut children = vec![Value::from(body)];
                children.extend(resbodies.into_iter().map(Value::Node));
                children.push(else_body.into());
                Some(self.s(
                    NodeType::Rescue,
                    children,
                    SourceMap::Condition {
                        keyword: None,
                        begin: None,
                        else_: else_range,
                        end: None,
                        expression: range,
                    },
                ))
            }
            None => match else_body {
                Some(else_body) => {
                    let mut children = spliced(body);
                    children.extend(spliced(Some(else_body)));
                    let range = join_all(
                        children
                            .iter()
                            .map(|child| child.as_node().and_then(expression)),
                    )
                    .unwrap_or(node.range());
                    Some(self.s(NodeType::Begin, children, SourceMap::bare(range)))
                }
                None => body,
            },
        };

        if let Some(ensure) = ensure_clause.as_deref() {
            let NodeKind::Ensure {
                keyword,
                statements,
            } = &ensure.kind
            else {
                return Err(unexpected("ensure clause", ensure));
            };
            let ensure_body = self.frame(ensure, |t| t.visit_body(statements))?;
            let range = join_all([
                result.as_ref().and_then(expression),
                Some(keyword.range()),
                ensure_body.as_ref().and_then(expression),
            ])
            .unwrap_or(ensure.range());
            result = Some(self.s(
                NodeType::Ensure,
                vec![result.into(), ensure_body.into()],
                SourceMap::Condition {
                    keyword: Some(keyword.range()),
                    begin: None,
                    else_: None,
                    end: None,
                    expression: range,
                },
            ));
        }
        Ok(result)
    }

    /// Each `rescue` clause in order, as `resbody` nodes.
    fn visit_rescue_chain(&mut self, first: &'a Node) -> Result<Vec<ast::Node>> {
        let mut out = vec![];
        let mut current = Some(first);
        while let Some(clause) = current {
            let NodeKind::Rescue {
                keyword,
                exception,
                statements,
                consequent,
            } = &clause.kind
            else {
                return Err(unexpected("rescue clause", clause));
            };
            out.push(self.frame(clause, |t| {
                t.visit_resbody(keyword, exception.as_deref(), statements)
            })?);
            current = consequent.as_deref();
        }
        Ok(out)
    }

    /// `rescue A, B => e then ...`
    fn visit_resbody(
        &mut self,
        keyword: &'a Node,
        exception: Option<&'a Node>,
        statements: &'a Node,
    ) -> Result<ast::Node> {
        let (exceptions, variable) = match exception.map(|e| (e, &e.kind)) {
            Some((
                exception,
                NodeKind::RescueEx {
                    exceptions,
                    variable,
                },
            )) => self.frame(exception, |t| {
                let list = match exceptions.as_deref() {
                    Some(list) => {
                        let parts: Vec<&'a Node> = match &list.kind {
                            NodeKind::MRHS { parts } => parts.iter().collect(),
                            _ => flatten_arguments(list),
                        };
                        let values = parts
                            .into_iter()
                            .map(|part| t.visit(part).map(Value::Node))
                            .collect::<Result<Vec<_>>>()?;
                        Some(t.s(NodeType::Array, values, SourceMap::bare(list.range())))
                    }
                    None => None,
                };
                let variable = match variable.as_deref() {
                    Some(variable) => {
                        let after = exceptions
                            .as_deref()
                            .map_or(keyword.end_char(), Node::end_char);
                        let assoc = t.find(after, variable.start_char(), "=>")?;
                        Some((t.visit(variable)?, assoc, variable.end_char()))
                    }
                    None => None,
                };
                Ok((list, variable))
            })?,
            Some((exception, _)) => {
                let value = self.visit(exception)?;
                let range = exception.range();
                (
                    Some(self.s(NodeType::Array, vec![Value::Node(value)], SourceMap::bare(range))),
                    None,
                )
            }
            None => (None, None),
        };

        let head_end = variable
            .as_ref()
            .map(|(_, _, end)| *end)
            .or_else(|| exceptions.as_ref().and_then(expression).map(|r| r.end_char))
            .unwrap_or(keyword.end_char());
        let body = self.visit_body(statements)?;
        let body_start = body
            .as_ref()
            .and_then(expression)
            .map_or(statements.end_char(), |r| r.start_char);
        let then = self.search_keyword(head_end, body_start.max(head_end), "then")?;
        let end = join_all([
            Some(keyword.range()),
            exceptions.as_ref().and_then(expression),
            variable.as_ref().map(|(_, assoc, end)| Range::new(assoc.start_char, *end)),
            then,
            body.as_ref().and_then(expression),
        ])
        .unwrap_or(keyword.range());

        let (variable, assoc) = match variable {
            Some((variable, assoc, _)) => (Some(variable), Some(assoc)),
            None => (None, None),
        };
        Ok(self.s(
            NodeType::Resbody,
            vec![exceptions.into(), variable.into(), body.into()],
            SourceMap::RescueBody {
                keyword: Some(keyword.range()),
                assoc,
                begin: then,
                expression: Range::new(keyword.start_char(), end.end_char),
            },
        ))
    }

    /// `statement rescue value`
    pub(crate) fn visit_rescue_mod(
        &mut self,
        node: &'a Node,
        statement: &'a Node,
        value: &'a Node,
    ) -> Result<ast::Node> {
        let body = self.visit(statement)?;
        let keyword = self.find(statement.end_char(), value.start_char(), "rescue")?;
        let rescued = self.visit(value)?;
        let resbody_range = keyword.join(&expression(&rescued).unwrap_or(value.range()));
        let resbody = self.s(
            NodeType::Resbody,
            vec![Value::Nil, Value::Nil, Value::Node(rescued)],
            SourceMap::RescueBody {
                keyword: Some(keyword),
                assoc: None,
                begin: None,
                expression: resbody_range,
            },
        );
        Ok(self.s(
            NodeType::Rescue,
            vec![Value::Node(body), Value::Node(resbody), Value::Nil],
            SourceMap::Condition {
                keyword: None,
                begin: None,
                else_: None,
                end: None,
                expression: node.range(),
            },
        ))
    }

    /// The `else`/`elsif` branch of a conditional and the location of its keyword.
    fn visit_consequent(
        &mut self,
        consequent: Option<&'a Node>,
    ) -> Result<(Option<ast::Node>, Option<Range>)> {
        match consequent {
            None => Ok((None, None)),
            Some(clause) => match &clause.kind {
                NodeKind::Elsif { .. } => Ok((
                    Some(self.visit(clause)?),
                    Some(range_at(clause.start_char(), 5)),
                )),
                NodeKind::Else {
                    keyword,
                    statements,
                } => Ok((
                    self.frame(clause, |t| t.visit_body(statements))?,
                    Some(keyword.range()),
                )),
                _ => Err(unexpected("else branch", clause)),
            },
        }
    }

    /// `if`/`unless`, in block or modifier form.
    pub(crate) fn visit_if(
        &mut self,
        node: &'a Node,
        predicate: &'a Node,
        statements: &'a Node,
        consequent: Option<&'a Node>,
        unless: bool,
    ) -> Result<ast::Node> {
        let word = if unless { "unless" } else { "if" };
        if is_modifier(predicate, statements) {
            let body = self.visit_body(statements)?;
            let keyword = self.find(statements.end_char(), predicate.start_char(), word)?;
            let condition = self.visit(predicate)?;
            let condition = self.check_condition(condition);
            let (truthy, falsy) = if unless {
                (Value::Nil, body.into())
            } else {
                (body.into(), Value::Nil)
            };
            return Ok(self.s(
                NodeType::If,
                vec![Value::Node(condition), truthy, falsy],
                SourceMap::keyword(keyword, None, None, node.range()),
            ));
        }

        let keyword = range_at(node.start_char(), word.len() as isize);
        let condition = self.visit(predicate)?;
        let condition = self.check_condition(condition);
        let then = self.search_keyword(
            predicate.end_char(),
            statements.start_char().max(predicate.end_char()),
            "then",
        )?;
        let body = self.visit_body(statements)?;
        let (other, else_) = self.visit_consequent(consequent)?;
        let (truthy, falsy) = if unless {
            (other.into(), body.into())
        } else {
            (body.into(), other.into())
        };
        Ok(self.s(
            NodeType::If,
            vec![Value::Node(condition), truthy, falsy],
            SourceMap::Condition {
                keyword: Some(keyword),
                begin: then,
                else_,
                end: Some(range_at(node.end_char(), -3)),
                expression: node.range(),
            },
        ))
    }

    /// An `elsif` branch: a nested `if` that shares its parent's `end`.
    pub(crate) fn visit_elsif(
        &mut self,
        node: &'a Node,
        predicate: &'a Node,
        statements: &'a Node,
        consequent: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let keyword = range_at(node.start_char(), 5);
        let condition = self.visit(predicate)?;
        let condition = self.check_condition(condition);
        let then = self.search_keyword(
            predicate.end_char(),
            statements.start_char().max(predicate.end_char()),
            "then",
        )?;
        let body = self.visit_body(statements)?;
        let (other, else_) = self.visit_consequent(consequent)?;
        let range = join_all([
            Some(keyword),
            expression(&condition),
            then,
            body.as_ref().and_then(expression),
            else_,
            other.as_ref().and_then(expression),
        ])
        .unwrap_or(node.range());
        Ok(self.s(
            NodeType::If,
            vec![Value::Node(condition), body.into(), other.into()],
            SourceMap::Condition {
                keyword: Some(keyword),
                begin: then,
                else_,
                end: None,
                expression: range,
            },
        ))
    }

    /// `predicate ? truthy : falsy`
    pub(crate) fn visit_ternary(
        &mut self,
        node: &'a Node,
        predicate: &'a Node,
        truthy: &'a Node,
        falsy: &'a Node,
    ) -> Result<ast::Node> {
        let question = self.find(predicate.end_char(), truthy.start_char(), "?")?;
        let colon = self.find(truthy.end_char(), falsy.start_char(), ":")?;
        let condition = self.visit(predicate)?;
        let condition = self.check_condition(condition);
        let truthy = self.visit(truthy)?;
        let falsy = self.visit(falsy)?;
        Ok(self.s(
            NodeType::If,
            vec![Value::Node(condition), Value::Node(truthy), Value::Node(falsy)],
            SourceMap::Ternary {
                question: Some(question),
                colon: Some(colon),
                expression: node.range(),
            },
        ))
    }

    /// `while`/`until`. The modifier form applied to `begin ... end` runs its body
    /// at least once and gets its own tag.
    pub(crate) fn visit_loop(
        &mut self,
        node: &'a Node,
        predicate: &'a Node,
        statements: &'a Node,
        until: bool,
    ) -> Result<ast::Node> {
        let word = if until { "until" } else { "while" };
        if is_modifier(predicate, statements) {
            let post = matches!(
                statement_nodes(statements).as_slice(),
                [Node {
                    kind: NodeKind::Begin { .. },
                    ..
                }]
            );
            let node_type = match (post, until) {
                (true, false) => NodeType::WhilePost,
                (true, true) => NodeType::UntilPost,
                (false, false) => NodeType::While,
                (false, true) => NodeType::Until,
            };
            let body = self.visit_body(statements)?;
            let keyword = self.find(statements.end_char(), predicate.start_char(), word)?;
            let condition = self.visit(predicate)?;
            let condition = self.check_condition(condition);
            return Ok(self.s(
                node_type,
                vec![Value::Node(condition), body.into()],
                SourceMap::keyword(keyword, None, None, node.range()),
            ));
        }

        let keyword = range_at(node.start_char(), 5);
        let condition = self.visit(predicate)?;
        let condition = self.check_condition(condition);
        let begin = self.search_keyword(
            predicate.end_char(),
            statements.start_char().max(predicate.end_char()),
            "do",
        )?;
        let body = self.visit_body(statements)?;
        Ok(self.s(
            if until { NodeType::Until } else { NodeType::While },
            vec![Value::Node(condition), body.into()],
            SourceMap::keyword(
                keyword,
                begin,
                Some(range_at(node.end_char(), -3)),
                node.range(),
            ),
        ))
    }

    /// `for index in collection do ... end`
    pub(crate) fn visit_for(
        &mut self,
        node: &'a Node,
        index: &'a Node,
        collection: &'a Node,
        statements: &'a Node,
    ) -> Result<ast::Node> {
        let target = self.visit(index)?;
        let in_ = self.find(index.end_char(), collection.start_char(), "in")?;
        let iterable = self.visit(collection)?;
        let begin = self.search_keyword(
            collection.end_char(),
            statements.start_char().max(collection.end_char()),
            "do",
        )?;
        let body = self.visit_body(statements)?;
        Ok(self.s(
            NodeType::For,
            vec![Value::Node(target), Value::Node(iterable), body.into()],
            SourceMap::For {
                keyword: Some(range_at(node.start_char(), 3)),
                in_: Some(in_),
                begin,
                end: Some(range_at(node.end_char(), -3)),
                expression: node.range(),
            },
        ))
    }

    /// `case` with `when` clauses, or `case_match` with `in` clauses.
    pub(crate) fn visit_case(
        &mut self,
        node: &'a Node,
        keyword: &'a Node,
        value: Option<&'a Node>,
        consequent: &'a Node,
    ) -> Result<ast::Node> {
        let subject = self.visit_value(value)?;
        let matching = matches!(consequent.kind, NodeKind::In { .. });
        let mut children = vec![subject];
        let mut else_ = None;
        let mut else_body = Value::Nil;

        let mut current = Some(consequent);
        while let Some(clause) = current {
            current = match &clause.kind {
                NodeKind::When {
                    arguments,
                    statements,
                    consequent,
                } => {
                    let when = self.frame(clause, |t| t.visit_when(clause, arguments, statements))?;
                    children.push(Value::Node(when));
                    consequent.as_deref()
                }
                NodeKind::In {
                    pattern,
                    statements,
                    consequent,
                } => {
                    let branch = self.frame(clause, |t| t.visit_in(clause, pattern, statements))?;
                    children.push(Value::Node(branch));
                    consequent.as_deref()
                }
                NodeKind::Else {
                    keyword: else_keyword,
                    statements,
                } => {
                    else_ = Some(else_keyword.range());
                    let body = self.frame(clause, |t| t.visit_body(statements))?;
                    else_body = match body {
                        Some(body) => Value::Node(body),
                        None if matching => Value::Node(self.s(
                            NodeType::EmptyElse,
                            vec![],
                            SourceMap::map(else_keyword.range()),
                        )),
                        None => Value::Nil,
                    };
                    None
                }
                _ => return Err(unexpected("case clause", clause)),
            };
        }
        children.push(else_body);

        Ok(self.s(
            if matching {
                NodeType::CaseMatch
            } else {
                NodeType::Case
            },
            children,
            SourceMap::Condition {
                keyword: Some(keyword.range()),
                begin: None,
                else_,
                end: Some(range_at(node.end_char(), -3)),
                expression: node.range(),
            },
        ))
    }

    fn visit_when(
        &mut self,
        clause: &'a Node,
        arguments: &'a Node,
        statements: &'a Node,
    ) -> Result<ast::Node> {
        let keyword = range_at(clause.start_char(), 4);
        let mut children = self.frame(arguments, |t| {
            flatten_arguments(arguments)
                .into_iter()
                .map(|condition| t.visit(condition).map(Value::Node))
                .collect::<Result<Vec<_>>>()
        })?;
        let then = self.search_keyword(
            arguments.end_char(),
            statements.start_char().max(arguments.end_char()),
            "then",
        )?;
        let body = self.visit_body(statements)?;
        let range = join_all([
            Some(keyword),
            Some(arguments.range()),
            then,
            body.as_ref().and_then(expression),
        ])
        .unwrap_or(clause.range());
        children.push(body.into());
        Ok(self.s(
            NodeType::When,
            children,
            SourceMap::keyword(keyword, then, None, range),
        ))
    }

    /// `in pattern if guard then ...`
    fn visit_in(
        &mut self,
        clause: &'a Node,
        pattern: &'a Node,
        statements: &'a Node,
    ) -> Result<ast::Node> {
        let keyword = range_at(clause.start_char(), 2);
        let (translated, guard) = match &pattern.kind {
            NodeKind::IfNode {
                predicate,
                statements: guarded,
                consequent: None,
            }
            | NodeKind::UnlessNode {
                predicate,
                statements: guarded,
                consequent: None,
            } if is_modifier(predicate, guarded) => {
                let unless = matches!(pattern.kind, NodeKind::UnlessNode { .. });
                self.frame(pattern, |t| {
                    let translated = t
                        .visit_body(guarded)?
                        .ok_or_else(|| missing(pattern, "pattern"))?;
                    let word = if unless { "unless" } else { "if" };
                    let guard_keyword = t.find(guarded.end_char(), predicate.start_char(), word)?;
                    let condition = t.visit(predicate)?;
                    let guard = t.s(
                        if unless {
                            NodeType::UnlessGuard
                        } else {
                            NodeType::IfGuard
                        },
                        vec![Value::Node(condition)],
                        SourceMap::keyword(
                            guard_keyword,
                            None,
                            None,
                            Range::new(guard_keyword.start_char, predicate.end_char()),
                        ),
                    );
                    Ok((translated, Some(guard)))
                })?
            }
            _ => (self.visit(pattern)?, None),
        };
        let then = self.search_keyword(
            pattern.end_char(),
            statements.start_char().max(pattern.end_char()),
            "then",
        )?;
        let body = self.visit_body(statements)?;
        let range = join_all([
            Some(keyword),
            Some(pattern.range()),
            then,
            body.as_ref().and_then(expression),
        ])
        .unwrap_or(clause.range());
        Ok(self.s(
            NodeType::InPattern,
            vec![Value::Node(translated), guard.into(), body.into()],
            SourceMap::keyword(keyword, then, None, range),
        ))
    }

    /// `value => pattern` and `value in pattern`
    pub(crate) fn visit_rassign(
        &mut self,
        node: &'a Node,
        value: &'a Node,
        operator: &'a Node,
        pattern: &'a Node,
    ) -> Result<ast::Node> {
        let node_type = match operator.token() {
            Some("=>") => NodeType::MatchPattern,
            Some("in") => NodeType::MatchPatternP,
            _ => return Err(unexpected("pattern operator", operator)),
        };
        let value = self.visit(value)?;
        let pattern = self.visit(pattern)?;
        Ok(self.s(
            node_type,
            vec![Value::Node(value), Value::Node(pattern)],
            SourceMap::operator(Some(operator.range()), node.range()),
        ))
    }

    /// `break`, `next` and `return` with their arguments.
    pub(crate) fn visit_flow(
        &mut self,
        node: &'a Node,
        node_type: NodeType,
        keyword: &str,
        arguments: Option<&'a Node>,
    ) -> Result<ast::Node> {
        let children = match arguments {
            Some(arguments) => self.frame(arguments, |t| {
                flatten_arguments(arguments)
                    .into_iter()
                    .map(|argument| t.visit(argument).map(Value::Node))
                    .collect::<Result<Vec<_>>>()
            })?,
            None => vec![],
        };
        Ok(self.s(
            node_type,
            children,
            SourceMap::keyword(
                range_at(node.start_char(), keyword.len() as isize),
                None,
                None,
                node.range(),
            ),
        ))
    }
}
