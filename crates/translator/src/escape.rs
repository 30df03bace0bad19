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

//! Turning the raw text between string delimiters into the string's value.

use std::iter::Peekable;
use std::str::Chars;
use stree_common::TranslateError;
use tracing::warn;

/// How backslashes in a literal's raw text are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeMode {
    /// Single-quoted heredocs and regexp sources: text is taken as written
    Raw,
    /// `'...'`, `%q(...)`, `%w[...]`, `%i[...]`: only `\\` and escaped delimiters
    Single {
        delimiters: Option<(char, char)>,
        words: bool,
    },
    /// `"..."`, `%Q(...)`, `%W[...]`, backticks, heredocs: the full escape set
    Double,
}

fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

impl EscapeMode {
    /// The mode for a literal opened by `quote`, e.g. `'`, `%q{`, `%w[`, `"`.
    pub fn for_quote(quote: &str) -> Self {
        let mut chars = quote.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('\''), None, None) => EscapeMode::Single {
                delimiters: Some(('\'', '\'')),
                words: false,
            },
            (Some('%'), Some(kind @ ('q' | 'w' | 'i' | 's')), Some(open)) => EscapeMode::Single {
                delimiters: Some((open, closing_delimiter(open))),
                words: kind == 'w' || kind == 'i',
            },
            _ => EscapeMode::Double,
        }
    }

    pub fn interpolates(&self) -> bool {
        matches!(self, EscapeMode::Double)
    }
}

fn invalid(raw: &str) -> TranslateError {
    TranslateError::InvalidEscape(raw.to_string())
}

fn take_digits(chars: &mut Peekable<Chars>, radix: u32, max: usize) -> String {
    let mut digits = String::new();
    while digits.len() < max {
        match chars.peek() {
            Some(c) if c.is_digit(radix) => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    digits
}

fn from_code(code: u32, raw: &str) -> Result<char, TranslateError> {
    char::from_u32(code).ok_or_else(|| invalid(raw))
}

fn unicode_escape(
    chars: &mut Peekable<Chars>,
    out: &mut String,
    raw: &str,
) -> Result<(), TranslateError> {
    if chars.peek() != Some(&'{') {
        let digits = take_digits(chars, 16, 4);
        if digits.len() != 4 {
            return Err(invalid(raw));
        }
        let code = u32::from_str_radix(&digits, 16).map_err(|_| invalid(raw))?;
        out.push(from_code(code, raw)?);
        return Ok(());
    }
    chars.next();
    loop {
        while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}
        if chars.next_if_eq(&'}').is_some() {
            return Ok(());
        }
        let digits = take_digits(chars, 16, 6);
        if digits.is_empty() {
            return Err(invalid(raw));
        }
        let code = u32::from_str_radix(&digits, 16).map_err(|_| invalid(raw))?;
        out.push(from_code(code, raw)?);
    }
}

/// The character a `\c`/`\C-` or `\M-` escape applies to.
fn modified_char(chars: &mut Peekable<Chars>, raw: &str) -> Result<char, TranslateError> {
    match chars.next() {
        Some('\\') => {
            let mut nested = String::new();
            double_escape(chars, &mut nested, raw)?;
            nested.chars().next().ok_or_else(|| invalid(raw))
        }
        Some(c) => Ok(c),
        None => Err(invalid(raw)),
    }
}

fn control(c: char, raw: &str) -> Result<char, TranslateError> {
    if c == '?' {
        return Ok('\x7f');
    }
    from_code(c as u32 & 0x9f, raw)
}

/// One escape in a double-quoted literal; the backslash has been consumed.
fn double_escape(
    chars: &mut Peekable<Chars>,
    out: &mut String,
    raw: &str,
) -> Result<(), TranslateError> {
    let Some(c) = chars.next() else {
        out.push('\\');
        return Ok(());
    };
    match c {
        'n' => out.push('\n'),
        't' => out.push('\t'),
        's' => out.push(' '),
        'r' => out.push('\r'),
        'a' => out.push('\x07'),
        'b' => out.push('\x08'),
        'e' => out.push('\x1b'),
        'f' => out.push('\x0c'),
        'v' => out.push('\x0b'),
        '\n' => {}
        '0'..='7' => {
            let mut digits = c.to_string();
            digits.push_str(&take_digits(chars, 8, 2));
            let code = u32::from_str_radix(&digits, 8).map_err(|_| invalid(raw))?;
            out.push(from_code(code, raw)?);
        }
        'x' => {
            let digits = take_digits(chars, 16, 2);
            if digits.is_empty() {
                return Err(invalid(raw));
            }
            let code = u32::from_str_radix(&digits, 16).map_err(|_| invalid(raw))?;
            out.push(from_code(code, raw)?);
        }
        'u' => unicode_escape(chars, out, raw)?,
        'c' => {
            let target = modified_char(chars, raw)?;
            out.push(control(target, raw)?);
        }
        'C' | 'M' => {
            if chars.next() != Some('-') {
                return Err(invalid(raw));
            }
            let target = modified_char(chars, raw)?;
            if c == 'C' {
                out.push(control(target, raw)?);
            } else {
                warn!(raw, "meta escape approximated as a code point");
                out.push(from_code(target as u32 | 0x80, raw)?);
            }
        }
        other => {
            if other.is_ascii_alphabetic() {
                warn!(raw, escape = %other, "unknown escape passed through");
            }
            out.push(other);
        }
    }
    Ok(())
}

/// The value of a literal whose source text (between delimiters) is `raw`.
pub fn unescape(raw: &str, mode: EscapeMode) -> Result<String, TranslateError> {
    if mode == EscapeMode::Raw || !raw.contains('\\') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match mode {
            EscapeMode::Double => double_escape(&mut chars, &mut out, raw)?,
            EscapeMode::Single { delimiters, words } => match chars.peek().copied() {
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                Some(next)
                    if delimiters.is_some_and(|(open, close)| next == open || next == close)
                        || (words && next.is_whitespace()) =>
                {
                    chars.next();
                    out.push(next);
                }
                _ => out.push('\\'),
            },
            EscapeMode::Raw => out.push('\\'),
        }
    }
    Ok(out)
}

/// Whether `raw` ends in a backslash-newline line continuation.
pub fn ends_with_continuation(raw: &str) -> bool {
    let Some(body) = raw.strip_suffix('\n') else {
        return false;
    };
    let backslashes = body.chars().rev().take_while(|c| *c == '\\').count();
    backslashes % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r"a\nb", "a\nb"; "newline")]
    #[test_case(r"\t\s\e", "\t \x1b"; "named")]
    #[test_case(r"\101\0", "A\0"; "octal")]
    #[test_case(r"\x41\x7", "A\x07"; "hex")]
    #[test_case(r"\u00e9", "\u{e9}"; "unicode four digits")]
    #[test_case(r"\u{48 49}", "HI"; "unicode braces")]
    #[test_case(r"\cA\C-b", "\x01\x02"; "control")]
    #[test_case(r"\c?", "\x7f"; "delete")]
    #[test_case(r#"\"\\\#"#, "\"\\#"; "quotes and backslash")]
    #[test_case("a\\\nb", "ab"; "line continuation")]
    fn test_double(raw: &str, expected: &str) {
        assert_eq!(unescape(raw, EscapeMode::Double).unwrap(), expected);
    }

    #[test_case("'", r"it\'s \n", r"it's \n"; "single quote")]
    #[test_case("'", r"a\\b", r"a\b"; "backslash")]
    #[test_case("%q(", r"\(\)\x", r"()\x"; "percent delimiters")]
    #[test_case("%w[", r"a\ b", "a b"; "escaped word space")]
    fn test_single(quote: &str, raw: &str, expected: &str) {
        assert_eq!(unescape(raw, EscapeMode::for_quote(quote)).unwrap(), expected);
    }

    #[test]
    fn test_raw_is_untouched() {
        assert_eq!(unescape(r"\d+\n", EscapeMode::Raw).unwrap(), r"\d+\n");
    }

    #[test_case(r"\x"; "empty hex")]
    #[test_case(r"\u12"; "short unicode")]
    #[test_case(r"\u{110000}"; "outside unicode")]
    #[test_case(r"\C"; "control without dash")]
    fn test_invalid(raw: &str) {
        assert!(matches!(
            unescape(raw, EscapeMode::Double),
            Err(TranslateError::InvalidEscape(_))
        ));
    }

    #[test_case("a\\\n", true; "continuation")]
    #[test_case("a\\\\\n", false; "escaped backslash")]
    #[test_case("a\n", false; "plain newline")]
    #[test_case("a\\", false; "no newline")]
    fn test_ends_with_continuation(raw: &str, expected: bool) {
        assert_eq!(ends_with_continuation(raw), expected);
    }
}
