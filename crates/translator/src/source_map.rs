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

use serde::Serialize;
use stree_common::Range;

/// Positions of the tokens that make up one target node, keyed by node category.
///
/// Every field except `expression` is optional: a token the source did not
/// contain (an omitted `then`, a call without parentheses) is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "map", rename_all = "snake_case")]
pub enum SourceMap {
    /// Single-token nodes: `nil`, `self`, `$&`, `(lambda)`, ...
    Map { expression: Range },
    Collection {
        begin: Option<Range>,
        end: Option<Range>,
        /// `None` only for an empty, delimiter-less argument list
        expression: Option<Range>,
    },
    Operator {
        operator: Option<Range>,
        expression: Range,
    },
    Keyword {
        keyword: Option<Range>,
        begin: Option<Range>,
        end: Option<Range>,
        expression: Range,
    },
    Send {
        dot: Option<Range>,
        selector: Option<Range>,
        operator: Option<Range>,
        begin: Option<Range>,
        end: Option<Range>,
        expression: Range,
    },
    Variable {
        name: Option<Range>,
        operator: Option<Range>,
        expression: Range,
    },
    Constant {
        double_colon: Option<Range>,
        name: Option<Range>,
        operator: Option<Range>,
        expression: Range,
    },
    Definition {
        keyword: Option<Range>,
        operator: Option<Range>,
        name: Option<Range>,
        end: Option<Range>,
        expression: Range,
    },
    MethodDefinition {
        keyword: Option<Range>,
        operator: Option<Range>,
        name: Option<Range>,
        end: Option<Range>,
        assignment: Option<Range>,
        expression: Range,
    },
    Condition {
        keyword: Option<Range>,
        begin: Option<Range>,
        #[serde(rename = "else")]
        else_: Option<Range>,
        end: Option<Range>,
        expression: Range,
    },
    Ternary {
        question: Option<Range>,
        colon: Option<Range>,
        expression: Range,
    },
    For {
        keyword: Option<Range>,
        #[serde(rename = "in")]
        in_: Option<Range>,
        begin: Option<Range>,
        end: Option<Range>,
        expression: Range,
    },
    Index {
        begin: Option<Range>,
        end: Option<Range>,
        operator: Option<Range>,
        expression: Range,
    },
    OpAssign {
        operator: Option<Range>,
        expression: Range,
    },
    RescueBody {
        keyword: Option<Range>,
        assoc: Option<Range>,
        begin: Option<Range>,
        expression: Range,
    },
    /// `expression` covers only the opening `<<~ID`; body and terminator follow on later lines.
    Heredoc {
        heredoc_body: Option<Range>,
        heredoc_end: Option<Range>,
        expression: Range,
    },
}

impl SourceMap {
    pub fn map(expression: Range) -> Self {
        SourceMap::Map { expression }
    }

    pub fn collection(begin: Option<Range>, end: Option<Range>, expression: Range) -> Self {
        SourceMap::Collection {
            begin,
            end,
            expression: Some(expression),
        }
    }

    /// A collection with no delimiters, covering `expression`.
    pub fn bare(expression: Range) -> Self {
        Self::collection(None, None, expression)
    }

    pub fn operator(operator: Option<Range>, expression: Range) -> Self {
        SourceMap::Operator {
            operator,
            expression,
        }
    }

    pub fn keyword(
        keyword: Range,
        begin: Option<Range>,
        end: Option<Range>,
        expression: Range,
    ) -> Self {
        SourceMap::Keyword {
            keyword: Some(keyword),
            begin,
            end,
            expression,
        }
    }

    pub fn variable(name: Range, expression: Range) -> Self {
        SourceMap::Variable {
            name: Some(name),
            operator: None,
            expression,
        }
    }

    pub fn selector(selector: Range, expression: Range) -> Self {
        SourceMap::Send {
            dot: None,
            selector: Some(selector),
            operator: None,
            begin: None,
            end: None,
            expression,
        }
    }

    pub fn expression(&self) -> Option<Range> {
        match self {
            SourceMap::Collection { expression, .. } => *expression,
            SourceMap::Map { expression }
            | SourceMap::Operator { expression, .. }
            | SourceMap::Keyword { expression, .. }
            | SourceMap::Send { expression, .. }
            | SourceMap::Variable { expression, .. }
            | SourceMap::Constant { expression, .. }
            | SourceMap::Definition { expression, .. }
            | SourceMap::MethodDefinition { expression, .. }
            | SourceMap::Condition { expression, .. }
            | SourceMap::Ternary { expression, .. }
            | SourceMap::For { expression, .. }
            | SourceMap::Index { expression, .. }
            | SourceMap::OpAssign { expression, .. }
            | SourceMap::RescueBody { expression, .. }
            | SourceMap::Heredoc { expression, .. } => Some(*expression),
        }
    }

    /// The populated token ranges that must lie inside `expression`.
    ///
    /// A heredoc's body and terminator sit on the lines after its opening token and are
    /// not part of its expression, so they are left out.
    pub fn sub_ranges(&self) -> Vec<Range> {
        let fields: Vec<&Option<Range>> = match self {
            SourceMap::Map { .. } | SourceMap::Heredoc { .. } => vec![],
            SourceMap::Collection { begin, end, .. } => vec![begin, end],
            SourceMap::Operator { operator, .. } | SourceMap::OpAssign { operator, .. } => {
                vec![operator]
            }
            SourceMap::Keyword {
                keyword,
                begin,
                end,
                ..
            } => vec![keyword, begin, end],
            SourceMap::Send {
                dot,
                selector,
                operator,
                begin,
                end,
                ..
            } => vec![dot, selector, operator, begin, end],
            SourceMap::Variable { name, operator, .. } => vec![name, operator],
            SourceMap::Constant {
                double_colon,
                name,
                operator,
                ..
            } => vec![double_colon, name, operator],
            SourceMap::Definition {
                keyword,
                operator,
                name,
                end,
                ..
            } => vec![keyword, operator, name, end],
            SourceMap::MethodDefinition {
                keyword,
                operator,
                name,
                end,
                assignment,
                ..
            } => vec![keyword, operator, name, end, assignment],
            SourceMap::Condition {
                keyword,
                begin,
                else_,
                end,
                ..
            } => vec![keyword, begin, else_, end],
            SourceMap::Ternary {
                question, colon, ..
            } => vec![question, colon],
            SourceMap::For {
                keyword,
                in_,
                begin,
                end,
                ..
            } => vec![keyword, in_, begin, end],
            SourceMap::Index {
                begin,
                end,
                operator,
                ..
            } => vec![begin, end, operator],
            SourceMap::RescueBody {
                keyword,
                assoc,
                begin,
                ..
            } => vec![keyword, assoc, begin],
        };
        fields.into_iter().flatten().copied().collect()
    }

    /// Whether every populated token range lies inside the expression.
    pub fn is_well_formed(&self) -> bool {
        match self.expression() {
            Some(expression) => self.sub_ranges().iter().all(|r| expression.contains(r)),
            None => self.sub_ranges().is_empty(),
        }
    }

    /// Attach the `=` of an assignment to a map that was built for the bare target.
    pub fn with_operator(self, range: Range) -> Self {
        match self {
            SourceMap::Variable {
                name, expression, ..
            } => SourceMap::Variable {
                name,
                operator: Some(range),
                expression,
            },
            SourceMap::Constant {
                double_colon,
                name,
                expression,
                ..
            } => SourceMap::Constant {
                double_colon,
                name,
                operator: Some(range),
                expression,
            },
            SourceMap::Send {
                dot,
                selector,
                begin,
                end,
                expression,
                ..
            } => SourceMap::Send {
                dot,
                selector,
                operator: Some(range),
                begin,
                end,
                expression,
            },
            SourceMap::Index {
                begin,
                end,
                expression,
                ..
            } => SourceMap::Index {
                begin,
                end,
                operator: Some(range),
                expression,
            },
            other => other,
        }
    }

    pub fn with_expression(self, range: Range) -> Self {
        let mut map = self;
        match &mut map {
            SourceMap::Collection { expression, .. } => *expression = Some(range),
            SourceMap::Map { expression }
            | SourceMap::Operator { expression, .. }
            | SourceMap::Keyword { expression, .. }
            | SourceMap::Send { expression, .. }
            | SourceMap::Variable { expression, .. }
            | SourceMap::Constant { expression, .. }
            | SourceMap::Definition { expression, .. }
            | SourceMap::MethodDefinition { expression, .. }
            | SourceMap::Condition { expression, .. }
            | SourceMap::Ternary { expression, .. }
            | SourceMap::For { expression, .. }
            | SourceMap::Index { expression, .. }
            | SourceMap::OpAssign { expression, .. }
            | SourceMap::RescueBody { expression, .. }
            | SourceMap::Heredoc { expression, .. } => *expression = range,
        }
        map
    }
}
