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

//! Numeric literal text to values.
//!
//! The accepted grammar is closed: an optional sign, a radix prefix for integers,
//! digits with `_` separators, a fraction and exponent for floats, and the `r`
//! and `i` suffixes. Anything else is rejected.

use crate::ast::{Imaginary, Rational, Value};
use stree_common::TranslateError;

fn invalid(text: &str) -> TranslateError {
    TranslateError::InvalidNumericLiteral(text.to_string())
}

/// Split off a leading sign, returning whether it was negative.
fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text.strip_prefix('+').unwrap_or(text))
    }
}

/// Drop `_` separators, which may only sit between two digits.
fn strip_separators(text: &str, original: &str) -> Result<String, TranslateError> {
    if text.starts_with('_') || text.ends_with('_') || text.contains("__") {
        return Err(invalid(original));
    }
    Ok(text.replace('_', ""))
}

fn radix_and_digits(text: &str) -> (u32, &str) {
    let lower = text.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &text[2..]),
        Some("0b") => (2, &text[2..]),
        Some("0o") => (8, &text[2..]),
        Some("0d") => (10, &text[2..]),
        _ if text.len() > 1 && text.starts_with('0') => (8, &text[1..]),
        _ => (10, text),
    }
}

/// Decimal digits of an unsigned integer of any width.
fn to_decimal(digits: &str, radix: u32, original: &str) -> Result<String, TranslateError> {
    const LIMB: u64 = 1_000_000_000;
    // Little-endian base-10^9 limbs.
    let mut limbs: Vec<u64> = vec![0];
    for c in digits.chars() {
        let digit = c.to_digit(radix).ok_or_else(|| invalid(original))? as u64;
        let mut carry = digit;
        for limb in limbs.iter_mut() {
            let value = *limb * radix as u64 + carry;
            *limb = value % LIMB;
            carry = value / LIMB;
        }
        if carry > 0 {
            limbs.push(carry);
        }
    }
    let mut out = String::new();
    for (index, limb) in limbs.iter().rev().enumerate() {
        if index == 0 {
            out.push_str(&limb.to_string());
        } else {
            out.push_str(&format!("{limb:09}"));
        }
    }
    Ok(out)
}

fn parse_unsigned_integer(text: &str, original: &str) -> Result<(u32, String), TranslateError> {
    let (radix, digits) = radix_and_digits(text);
    let digits = strip_separators(digits, original)?;
    if digits.is_empty() {
        return Err(invalid(original));
    }
    Ok((radix, digits))
}

/// An integer literal, e.g. `42`, `-0x1F`, `1_000`, `0o17`, `017`.
pub fn parse_integer(text: &str) -> Result<Value, TranslateError> {
    let (negative, body) = split_sign(text);
    let (radix, digits) = parse_unsigned_integer(body, text)?;
    if let Ok(magnitude) = i128::from_str_radix(&digits, radix) {
        let signed = if negative { -magnitude } else { magnitude };
        if let Ok(value) = i64::try_from(signed) {
            return Ok(Value::Integer(value));
        }
    }
    let decimal = to_decimal(&digits, radix, text)?;
    Ok(Value::BigInteger(if negative {
        format!("-{decimal}")
    } else {
        decimal
    }))
}

fn is_decimal_float(text: &str) -> bool {
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exponent = false;
    let mut previous = ' ';
    for c in text.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot && !seen_exponent && previous.is_ascii_digit() => seen_dot = true,
            'e' | 'E' if !seen_exponent && seen_digit => seen_exponent = true,
            '+' | '-' if matches!(previous, 'e' | 'E') => {}
            _ => return false,
        }
        previous = c;
    }
    seen_digit && previous.is_ascii_digit()
}

/// A float literal, e.g. `1.5`, `-2e10`, `1_000.5`.
pub fn parse_float(text: &str) -> Result<f64, TranslateError> {
    let (negative, body) = split_sign(text);
    let cleaned = strip_separators(body, text)?;
    if !is_decimal_float(&cleaned) {
        return Err(invalid(text));
    }
    let value: f64 = cleaned.parse().map_err(|_| invalid(text))?;
    Ok(if negative { -value } else { value })
}

fn pow10(exponent: usize, original: &str) -> Result<i128, TranslateError> {
    10i128
        .checked_pow(exponent as u32)
        .ok_or_else(|| invalid(original))
}

/// A rational literal body without its `r` suffix, e.g. `3`, `1.5`, `0x10`.
fn rational_value(text: &str, original: &str) -> Result<Rational, TranslateError> {
    let (negative, body) = split_sign(text);
    let (numerator, denominator) = match body.split_once('.') {
        Some((whole, fraction)) => {
            let whole = strip_separators(whole, original)?;
            let fraction = strip_separators(fraction, original)?;
            if whole.is_empty() || fraction.is_empty() {
                return Err(invalid(original));
            }
            let digits = format!("{whole}{fraction}");
            let numerator = digits.parse::<i128>().map_err(|_| invalid(original))?;
            (numerator, pow10(fraction.len(), original)?)
        }
        None => {
            let (radix, digits) = parse_unsigned_integer(body, original)?;
            let numerator =
                i128::from_str_radix(&digits, radix).map_err(|_| invalid(original))?;
            (numerator, 1)
        }
    };
    let numerator = if negative { -numerator } else { numerator };
    Ok(Rational::new(numerator, denominator))
}

/// A rational literal, e.g. `3r`, `1.5r`.
pub fn parse_rational(text: &str) -> Result<Rational, TranslateError> {
    let body = text.strip_suffix('r').ok_or_else(|| invalid(text))?;
    rational_value(body, text)
}

/// An imaginary literal, e.g. `2i`, `1.5i`, `3ri`, `-1i`.
pub fn parse_imaginary(text: &str) -> Result<Imaginary, TranslateError> {
    let body = text.strip_suffix('i').ok_or_else(|| invalid(text))?;
    if let Some(rational) = body.strip_suffix('r') {
        return Ok(Imaginary::Rational(rational_value(rational, text)?));
    }
    let (_, unsigned) = split_sign(body);
    let (radix, _) = radix_and_digits(unsigned);
    let looks_float = radix == 10 && unsigned.contains(['.', 'e', 'E']);
    if looks_float {
        return Ok(Imaginary::Float(parse_float(body)?));
    }
    match parse_integer(body)? {
        Value::Integer(value) => Ok(Imaginary::Integer(value)),
        _ => Err(invalid(text)),
    }
}
