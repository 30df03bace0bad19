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

//! The target AST dialect: `(type children...)` nodes with a source map each.

use crate::sexp;
use crate::source_map::SourceMap;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use strum::{Display as StrumDisplay, IntoStaticStr};

/// Every node type the target dialect defines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Alias,
    And,
    AndAsgn,
    Arg,
    Args,
    Array,
    ArrayPattern,
    ArrayPatternWithTail,
    BackRef,
    Begin,
    Block,
    BlockPass,
    Blockarg,
    Break,
    Case,
    CaseMatch,
    Casgn,
    Cbase,
    Class,
    Complex,
    Const,
    ConstPattern,
    Csend,
    Cvar,
    Cvasgn,
    Def,
    #[strum(serialize = "defined?")]
    #[serde(rename = "defined?")]
    Defined,
    Defs,
    Dstr,
    Dsym,
    Eflipflop,
    EmptyElse,
    #[strum(serialize = "__ENCODING__")]
    #[serde(rename = "__ENCODING__")]
    Encoding,
    Ensure,
    Erange,
    #[strum(serialize = "__FILE__")]
    #[serde(rename = "__FILE__")]
    File,
    False,
    FindPattern,
    Float,
    For,
    ForwardArg,
    ForwardedArgs,
    ForwardedKwrestarg,
    ForwardedRestarg,
    Gvar,
    Gvasgn,
    Hash,
    HashPattern,
    If,
    IfGuard,
    Iflipflop,
    InPattern,
    Index,
    Indexasgn,
    Int,
    Irange,
    Ivar,
    Ivasgn,
    Kwarg,
    Kwargs,
    Kwbegin,
    Kwnilarg,
    Kwoptarg,
    Kwrestarg,
    Kwsplat,
    Lambda,
    #[strum(serialize = "__LINE__")]
    #[serde(rename = "__LINE__")]
    Line,
    Lvar,
    Lvasgn,
    Masgn,
    MatchAlt,
    MatchAs,
    MatchCurrentLine,
    MatchNilPattern,
    MatchPattern,
    MatchPatternP,
    MatchRest,
    MatchVar,
    MatchWithLvasgn,
    Mlhs,
    Module,
    Next,
    Nil,
    NthRef,
    Numblock,
    OpAsgn,
    Optarg,
    Or,
    OrAsgn,
    Pair,
    Pin,
    Postexe,
    Preexe,
    Procarg0,
    Rational,
    Redo,
    Regexp,
    Regopt,
    Resbody,
    Rescue,
    Restarg,
    Retry,
    Return,
    Sclass,
    #[strum(serialize = "self")]
    #[serde(rename = "self")]
    SelfRef,
    Send,
    Shadowarg,
    Splat,
    Str,
    Super,
    Sym,
    True,
    Undef,
    UnlessGuard,
    Until,
    UntilPost,
    When,
    While,
    WhilePost,
    Xstr,
    Yield,
    Zsuper,
}

/// An exact rational, always in lowest terms with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rational {
    pub numerator: i128,
    pub denominator: i128,
}

impl Rational {
    pub fn new(numerator: i128, denominator: i128) -> Self {
        fn gcd(a: i128, b: i128) -> i128 {
            if b == 0 { a.abs() } else { gcd(b, a % b) }
        }
        let divisor = gcd(numerator, denominator).max(1);
        let sign = if denominator < 0 { -1 } else { 1 };
        Self {
            numerator: sign * numerator / divisor,
            denominator: sign * denominator / divisor,
        }
    }
}

/// The imaginary part of a complex literal. Literals never carry a real part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Imaginary {
    Integer(i64),
    Float(f64),
    Rational(Rational),
}

/// A child slot of a target node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Nil,
    Node(Node),
    Symbol(String),
    Str(String),
    Integer(i64),
    /// An integer too wide for 64 bits, as decimal digits with an optional sign
    BigInteger(String),
    Float(f64),
    Rational(Rational),
    Complex(Imaginary),
}

impl Value {
    pub fn sym(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(name) => Some(name),
            _ => None,
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<Option<Node>> for Value {
    fn from(node: Option<Node>) -> Self {
        node.map_or(Value::Nil, Value::Node)
    }
}

/// A node of the target dialect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub children: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceMap>,
}

impl Node {
    pub fn new(node_type: NodeType, children: Vec<Value>, location: Option<SourceMap>) -> Self {
        Self {
            node_type,
            children,
            location,
        }
    }

    pub fn child(&self, index: usize) -> Option<&Value> {
        self.children.get(index)
    }

    pub fn child_node(&self, index: usize) -> Option<&Node> {
        self.child(index).and_then(Value::as_node)
    }

    /// The same node under a different type.
    pub fn retagged(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_location(mut self, location: Option<SourceMap>) -> Self {
        self.location = location;
        self
    }

    /// Visit this node and every node below it, parents first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in &self.children {
            if let Value::Node(node) = child {
                node.walk(f);
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&sexp::to_sexp(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_follow_dialect() {
        assert_eq!(NodeType::ArrayPatternWithTail.to_string(), "array_pattern_with_tail");
        assert_eq!(NodeType::Defined.to_string(), "defined?");
        assert_eq!(NodeType::SelfRef.to_string(), "self");
        assert_eq!(NodeType::Procarg0.to_string(), "procarg0");
        assert_eq!(NodeType::Encoding.to_string(), "__ENCODING__");
        assert_eq!(NodeType::MatchPatternP.to_string(), "match_pattern_p");
    }

    #[test]
    fn test_rational_normalizes() {
        assert_eq!(Rational::new(15, 10), Rational::new(3, 2));
        assert_eq!(Rational::new(3, -6), Rational::new(-1, 2));
        assert_eq!(Rational::new(0, 5), Rational::new(0, 1));
    }

    #[test]
    fn test_json_shape() {
        let node = Node::new(
            NodeType::Send,
            vec![Value::Nil, Value::sym("foo")],
            None,
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "send");
        assert_eq!(json["children"][0], "nil");
        assert_eq!(json["children"][1]["symbol"], "foo");
        assert!(json.get("location").is_none());
    }
}
