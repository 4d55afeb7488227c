//! Numeric literal decoding.
//!
//! Integers are decoded in base 2, 8, 10 or 16 into signed 32-bit values.
//! Floats are decoded to correctly rounded IEEE-754 single precision:
//!
//! - decimal literals through an arbitrary-precision [`decimal::Decimal`]
//! - hexadecimal literals through mantissa/exponent arithmetic in [`hex`]
//!
//! The scanner decides which kind a literal is and validates its shape;
//! the functions here only convert.

pub mod decimal;
pub mod hex;

use crate::errors::errors::ErrorImpl;

/// Layout of an IEEE-754 binary format.
#[derive(Debug, Clone, Copy)]
pub struct FloatInfo {
    pub mantbits: u32,
    pub expbits: u32,
    pub bias: i32,
}

pub const F32_INFO: FloatInfo = FloatInfo {
    mantbits: 23,
    expbits: 8,
    bias: -127,
};

impl FloatInfo {
    /// Packs a mantissa (implicit bit allowed) and an unbiased exponent.
    pub fn assemble(&self, mant: u64, exp: i32) -> u64 {
        let mut bits = mant & ((1u64 << self.mantbits) - 1);
        bits |= (((exp - self.bias) & ((1i32 << self.expbits) - 1)) as u64) << self.mantbits;
        bits
    }
}

/// Splits a literal into its base and digits. A lone leading zero
/// followed by more digits is a legacy octal prefix.
pub fn split_prefix(literal: &str) -> (u32, &str) {
    let bytes = literal.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1].to_ascii_lowercase() {
            b'x' => return (16, &literal[2..]),
            b'o' => return (8, &literal[2..]),
            b'b' => return (2, &literal[2..]),
            _ => return (8, &literal[1..]),
        }
    }

    (10, literal)
}

/// Prefix character of a literal: `x`, `o`, `b`, `0` for legacy octal.
pub fn prefix_of(literal: &str) -> Option<char> {
    let mut chars = literal.chars();
    match (chars.next(), chars.next()) {
        (Some('0'), Some(c)) => match c.to_ascii_lowercase() {
            c @ ('x' | 'o' | 'b') => Some(c),
            _ => Some('0'),
        },
        _ => None,
    }
}

/// Human name of a literal with the given prefix character, used in
/// diagnostics.
pub fn literal_name(prefix: Option<char>) -> &'static str {
    match prefix {
        Some('x') => "hexadecimal literal",
        Some('o') | Some('0') => "octal literal",
        Some('b') => "binary literal",
        _ => "decimal literal",
    }
}

/// Index of the first misplaced `_`, if any.
///
/// An underscore must sit between two digits; a base prefix counts as a
/// digit, so `0x_1F` is accepted and `0_x1F` is not.
pub fn invalid_separator(literal: &str) -> Option<usize> {
    let bytes = literal.as_bytes();
    let mut hex = false;
    // '0' for a digit, '_' for a separator, '.' for anything else
    let mut previous = b'.';
    let mut i = 0;

    if bytes.len() >= 2 && bytes[0] == b'0' {
        let prefix = bytes[1].to_ascii_lowercase();
        if matches!(prefix, b'x' | b'o' | b'b') {
            hex = prefix == b'x';
            previous = b'0';
            i = 2;
        }
    }

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'_' {
            if previous != b'0' {
                return Some(i);
            }
            previous = b'_';
        } else if c.is_ascii_digit() || (hex && c.is_ascii_hexdigit()) {
            previous = b'0';
        } else {
            if previous == b'_' {
                return Some(i - 1);
            }
            previous = b'.';
        }
        i += 1;
    }

    if previous == b'_' {
        return Some(bytes.len() - 1);
    }

    None
}

fn parse_unsigned(literal: &str, limit: u64) -> Result<u64, ErrorImpl> {
    let (base, digits) = split_prefix(literal);
    let mut value: u64 = 0;

    for c in digits.chars().filter(|c| *c != '_') {
        let digit = c.to_digit(base).ok_or_else(|| ErrorImpl::InvalidDigit {
            digit: c,
            base: literal_name(prefix_of(literal)).to_string(),
        })?;

        value = value
            .checked_mul(base as u64)
            .and_then(|value| value.checked_add(digit as u64))
            .filter(|value| *value <= limit)
            .ok_or_else(|| ErrorImpl::IntegerOverflow {
                literal: literal.to_string(),
            })?;
    }

    Ok(value)
}

/// Decodes an integer literal. Values above `i32::MAX` overflow.
pub fn parse_int(literal: &str) -> Result<i32, ErrorImpl> {
    parse_unsigned(literal, i32::MAX as u64).map(|value| value as i32)
}

/// Decodes a float literal of either base.
pub fn parse_float(literal: &str) -> Result<f32, ErrorImpl> {
    if is_hex(literal) {
        hex::parse_hex(literal)
    } else {
        decimal::parse_decimal(literal)
    }
}

/// Decodes the magnitude of an imaginary literal, `body` being the
/// literal without its `i` suffix. Legacy octal looking bodies are
/// decimal.
pub fn parse_imag(body: &str) -> Result<f32, ErrorImpl> {
    let prefixed = matches!(prefix_of(body), Some('x' | 'o' | 'b'));
    let is_float = if is_hex(body) {
        body.contains(&['.', 'p', 'P'][..])
    } else {
        body.contains(&['.', 'e', 'E'][..])
    };

    if prefixed && !is_float {
        return parse_unsigned(body, u64::MAX).map(|value| value as f32);
    }

    parse_float(body)
}

fn is_hex(literal: &str) -> bool {
    literal.starts_with("0x") || literal.starts_with("0X")
}
