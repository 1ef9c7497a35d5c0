//! Line-level lexer for assembly source.
//!
//! Splits one source line into its labels and an optional statement
//! (instruction or directive with operands), and parses literal operands.

use crate::common::AsmError;

/// A parsed statement: a mnemonic or directive followed by its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Lowercased mnemonic or directive (directives keep their leading `.`).
    pub head: String,
    /// Operand tokens, in order.
    pub operands: Vec<String>,
}

impl Statement {
    /// Returns the normalized text of the statement, e.g. `li a0, 5`.
    pub fn text(&self) -> String {
        if self.operands.is_empty() {
            self.head.clone()
        } else {
            format!("{} {}", self.head, self.operands.join(", "))
        }
    }

    /// Returns true when the statement is an assembler directive.
    pub fn is_directive(&self) -> bool {
        self.head.starts_with('.')
    }
}

/// One lexed source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    /// Labels defined on this line, in order.
    pub labels: Vec<String>,
    /// The statement following the labels, if any.
    pub statement: Option<Statement>,
}

/// Lexes a single line of source.
pub fn lex_line(raw: &str) -> Result<Line, AsmError> {
    let mut rest = strip_comment(raw).trim();
    let mut line = Line::default();

    while let Some((head, tail)) = rest.split_once(':') {
        let head = head.trim();
        if !is_identifier(head) {
            break;
        }
        line.labels.push(head.to_string());
        rest = tail.trim_start();
    }

    if rest.is_empty() {
        return Ok(line);
    }

    let (head, tail) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(h, t)| (h, t.trim()));
    line.statement = Some(Statement {
        head: head.to_ascii_lowercase(),
        operands: split_operands(tail)?,
    });
    Ok(line)
}

/// Returns true for names usable as labels.
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '.')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$')
}

/// Removes a trailing `#` or `;` comment, ignoring markers inside quotes.
fn strip_comment(raw: &str) -> &str {
    let mut quote = None;
    let mut escaped = false;
    for (idx, c) in raw.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '#' | ';' => return &raw[..idx],
                _ => {}
            },
        }
    }
    raw
}

/// Splits operands on commas and whitespace outside quotes.
fn split_operands(text: &str) -> Result<Vec<String>, AsmError> {
    let mut operands = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    let mut escaped = false;

    for c in text.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            ',' => operands.push(std::mem::take(&mut current)),
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    operands.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if quote.is_some() {
        return Err(AsmError::StringLiteral(text.to_string()));
    }
    if !current.is_empty() {
        operands.push(current);
    }
    operands.retain(|op| !op.is_empty());
    Ok(operands)
}

/// Parses an integer literal: decimal, `0x` hex, `0b` binary, or a character literal.
pub fn parse_int(token: &str) -> Result<i64, AsmError> {
    let invalid = || AsmError::InvalidImmediate(token.to_string());

    if let Some(inner) = token.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        let bytes = unescape(inner).map_err(|_| invalid())?;
        return match bytes.as_slice() {
            [b] => Ok(i64::from(*b)),
            _ => Err(invalid()),
        };
    }

    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let lower = digits.to_ascii_lowercase();
    let magnitude = if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2)
    } else {
        lower.parse::<i64>()
    }
    .map_err(|_| invalid())?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Parses a double-quoted string literal into raw bytes.
pub fn parse_string(token: &str) -> Result<Vec<u8>, AsmError> {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| AsmError::StringLiteral(token.to_string()))
        .and_then(|inner| unescape(inner).map_err(|()| AsmError::StringLiteral(token.to_string())))
}

fn unescape(inner: &str) -> Result<Vec<u8>, ()> {
    let mut out = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let byte = match chars.next().ok_or(())? {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            '0' => 0,
            '\\' => b'\\',
            '"' => b'"',
            '\'' => b'\'',
            _ => return Err(()),
        };
        out.push(byte);
    }
    Ok(out)
}
