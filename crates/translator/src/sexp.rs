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

//! Prints target nodes as the dialect's s-expressions, e.g. `(send (int 1) :+ (int 2))`.
//! Scalars are written the way the dialect's host language inspects them.

use crate::ast::{Imaginary, Node, Rational, Value};
use itertools::Itertools;

pub fn to_sexp(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    let name: &'static str = node.node_type.into();
    out.push('(');
    out.push_str(name);
    for child in &node.children {
        out.push(' ');
        match child {
            Value::Node(node) => write_node(out, node),
            other => out.push_str(&inspect_scalar(other)),
        }
    }
    out.push(')');
}

fn inspect_scalar(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Node(node) => to_sexp(node),
        Value::Symbol(name) => inspect_symbol(name),
        Value::Str(value) => inspect_string(value),
        Value::Integer(value) => value.to_string(),
        Value::BigInteger(digits) => digits.clone(),
        Value::Float(value) => inspect_float(*value),
        Value::Rational(value) => inspect_rational(value),
        Value::Complex(imaginary) => inspect_complex(imaginary),
    }
}

const OPERATOR_SYMBOLS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "==", "!=", "===", "=~", "!~", "!", "~", "+@", "-@", "[]",
    "[]=", "<", "<=", ">", ">=", "<=>", "<<", ">>", "&", "|", "^", "`",
];

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || !c.is_ascii())
}

fn is_plain_symbol(name: &str) -> bool {
    if OPERATOR_SYMBOLS.contains(&name) {
        return true;
    }
    if let Some(rest) = name.strip_prefix("@@").or_else(|| name.strip_prefix('@')) {
        return is_identifier(rest) && !rest.starts_with(|c: char| c.is_ascii_digit());
    }
    if let Some(rest) = name.strip_prefix('$') {
        let special = rest.chars().count() == 1 && "~*$?!@/\\;,.=:<>\"&`'+0_".contains(rest);
        let numbered = !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit());
        let switch = rest.len() == 2 && rest.starts_with('-');
        return is_identifier(rest) || special || numbered || switch;
    }
    let base = name
        .strip_suffix(['?', '!', '='])
        .filter(|base| !base.ends_with(['?', '!', '=']))
        .unwrap_or(name);
    is_identifier(base) && !base.starts_with(|c: char| c.is_ascii_digit())
}

pub fn inspect_symbol(name: &str) -> String {
    if is_plain_symbol(name) {
        format!(":{name}")
    } else {
        format!(":{}", inspect_string(name))
    }
}

pub fn inspect_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0b' => out.push_str("\\v"),
            '\x0c' => out.push_str("\\f"),
            '\x1b' => out.push_str("\\e"),
            '#' if matches!(chars.peek(), Some('{') | Some('$') | Some('@')) => {
                out.push_str("\\#")
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn inspect_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if value == 0.0 || (-4..16).contains(&exponent) {
        let fixed = format!("{value}");
        if fixed.contains('.') {
            fixed
        } else {
            format!("{fixed}.0")
        }
    } else {
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{mantissa}.0")
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

fn inspect_rational(value: &Rational) -> String {
    format!("({}/{})", value.numerator, value.denominator)
}

fn inspect_complex(imaginary: &Imaginary) -> String {
    match imaginary {
        Imaginary::Integer(value) => {
            format!("(0{}{}i)", if *value < 0 { '-' } else { '+' }, value.abs())
        }
        Imaginary::Float(value) => {
            let sign = if value.is_sign_negative() { '-' } else { '+' };
            format!("(0{sign}{}i)", inspect_float(value.abs()))
        }
        Imaginary::Rational(value) => {
            let sign = if value.numerator < 0 { '-' } else { '+' };
            format!(
                "(0{sign}({}/{})*i)",
                value.numerator.abs(),
                value.denominator
            )
        }
    }
}

/// Multi-line rendering with one child node per line, for diffs of large trees.
pub fn to_sexp_pretty(node: &Node) -> String {
    fn write(out: &mut Vec<String>, node: &Node, depth: usize) {
        out.push(format!("{}({}", "  ".repeat(depth), node.node_type));
        for child in &node.children {
            match child {
                Value::Node(child) => write(out, child, depth + 1),
                scalar => {
                    if let Some(last) = out.last_mut() {
                        last.push(' ');
                        last.push_str(&inspect_scalar(scalar));
                    }
                }
            }
        }
        if let Some(last) = out.last_mut() {
            last.push(')');
        }
    }

    let mut lines = vec![];
    write(&mut lines, node, 0);
    lines.into_iter().join("\n")
}
