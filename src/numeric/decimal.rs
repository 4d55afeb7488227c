//! Arbitrary-precision decimal used to turn decimal float literals into
//! correctly rounded single precision values.
//!
//! The literal is read into a digit buffer with a decimal point index,
//! then repeatedly scaled by powers of two until it sits in `[0.5, 1)`.
//! The binary exponent is the sum of those shifts; the mantissa is the
//! rounded integer left after shifting by the mantissa width.

use tracing::trace;

use crate::errors::errors::ErrorImpl;

use super::{FloatInfo, F32_INFO};

const MAX_DIGITS: usize = 800;

/// Largest shift handled in one step: 64-bit accumulator minus 4 bits of
/// headroom for a decimal digit.
const MAX_SHIFT: u32 = 60;

/// Binary shift that moves a decimal exponent by at least one.
const POWTAB: [i32; 9] = [1, 3, 6, 9, 13, 16, 19, 23, 26];

#[derive(Clone)]
pub struct Decimal {
    /// Digit values 0..=9, most significant first.
    digits: [u8; MAX_DIGITS],
    nd: usize,
    /// Decimal point index relative to the first digit.
    dp: i32,
    /// Nonzero digits were dropped.
    trunc: bool,
}

impl std::fmt::Debug for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decimal")
            .field("digits", &self.digits())
            .field("dp", &self.dp)
            .field("trunc", &self.trunc)
            .finish()
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Decimal {
            digits: [0; MAX_DIGITS],
            nd: 0,
            dp: 0,
            trunc: false,
        }
    }
}

impl Decimal {
    /// Reads `digits[.digits][e[+-]digits]`. Underscores are skipped; their
    /// placement is checked by the scanner.
    pub fn parse(literal: &str) -> Option<Decimal> {
        let bytes = literal.as_bytes();
        let mut decimal = Decimal::default();
        let mut saw_dot = false;
        let mut saw_digits = false;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'_' => {}
                b'.' => {
                    if saw_dot {
                        return None;
                    }
                    saw_dot = true;
                    decimal.dp = decimal.nd as i32;
                }
                c @ b'0'..=b'9' => {
                    saw_digits = true;
                    if c == b'0' && decimal.nd == 0 {
                        // leading zero
                        decimal.dp -= 1;
                    } else if decimal.nd < MAX_DIGITS {
                        decimal.digits[decimal.nd] = c - b'0';
                        decimal.nd += 1;
                    } else if c != b'0' {
                        decimal.trunc = true;
                    }
                }
                _ => break,
            }
            i += 1;
        }

        if !saw_digits {
            return None;
        }
        if !saw_dot {
            decimal.dp = decimal.nd as i32;
        }

        if i < bytes.len() && bytes[i].to_ascii_lowercase() == b'e' {
            i += 1;
            let mut sign = 1;
            match bytes.get(i) {
                Some(b'+') => i += 1,
                Some(b'-') => {
                    i += 1;
                    sign = -1;
                }
                _ => {}
            }
            if !bytes.get(i).is_some_and(|c| c.is_ascii_digit()) {
                return None;
            }

            let mut exponent: i32 = 0;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
                if bytes[i] != b'_' && exponent < 10000 {
                    exponent = exponent * 10 + (bytes[i] - b'0') as i32;
                }
                i += 1;
            }
            decimal.dp += exponent * sign;
        }

        if i != bytes.len() {
            return None;
        }

        Some(decimal)
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.nd]
    }

    pub fn decimal_point(&self) -> i32 {
        self.dp
    }

    pub fn truncated(&self) -> bool {
        self.trunc
    }

    /// Multiplies by `2^k`, or divides by `2^-k` when `k` is negative.
    pub fn shift(&mut self, mut k: i32) {
        if self.nd == 0 {
            return;
        }

        if k > 0 {
            while k > MAX_SHIFT as i32 {
                self.left_shift(MAX_SHIFT);
                k -= MAX_SHIFT as i32;
            }
            self.left_shift(k as u32);
        } else if k < 0 {
            while k < -(MAX_SHIFT as i32) {
                self.right_shift(MAX_SHIFT);
                k += MAX_SHIFT as i32;
            }
            self.right_shift((-k) as u32);
        }
    }

    fn left_shift(&mut self, k: u32) {
        // least significant digit first
        let mut shifted: Vec<u8> = Vec::with_capacity(self.nd + 20);
        let mut n: u64 = 0;

        for r in (0..self.nd).rev() {
            n += (self.digits[r] as u64) << k;
            shifted.push((n % 10) as u8);
            n /= 10;
        }
        while n > 0 {
            shifted.push((n % 10) as u8);
            n /= 10;
        }

        let delta = (shifted.len() - self.nd) as i32;
        let keep = shifted.len().min(MAX_DIGITS);
        let dropped = shifted.len() - keep;

        if shifted[..dropped].iter().any(|&digit| digit != 0) {
            self.trunc = true;
        }
        for (w, &digit) in shifted.iter().rev().take(keep).enumerate() {
            self.digits[w] = digit;
        }

        self.nd = keep;
        self.dp += delta;
        self.trim();
    }

    fn right_shift(&mut self, k: u32) {
        let mut r = 0;
        let mut w = 0;
        let mut n: u64 = 0;

        // Pick up enough leading digits to produce one output digit.
        while n >> k == 0 {
            if r >= self.nd {
                if n == 0 {
                    self.nd = 0;
                    self.dp = 0;
                    return;
                }
                while n >> k == 0 {
                    n *= 10;
                    r += 1;
                }
                break;
            }
            n = n * 10 + self.digits[r] as u64;
            r += 1;
        }
        self.dp -= r as i32 - 1;

        let mask = (1u64 << k) - 1;

        while r < self.nd {
            let c = self.digits[r] as u64;
            let digit = n >> k;
            n &= mask;
            self.digits[w] = digit as u8;
            w += 1;
            n = n * 10 + c;
            r += 1;
        }

        while n > 0 {
            let digit = n >> k;
            n &= mask;
            if w < MAX_DIGITS {
                self.digits[w] = digit as u8;
                w += 1;
            } else if digit > 0 {
                self.trunc = true;
            }
            n *= 10;
        }

        self.nd = w;
        self.trim();
    }

    fn trim(&mut self) {
        while self.nd > 0 && self.digits[self.nd - 1] == 0 {
            self.nd -= 1;
        }
        if self.nd == 0 {
            self.dp = 0;
        }
    }

    /// Whether rounding to `nd` digits goes up. Exact halves round to even
    /// unless digits were truncated.
    fn should_round_up(&self, nd: i32) -> bool {
        if nd < 0 || nd as usize >= self.nd {
            return false;
        }

        let nd = nd as usize;
        if self.digits[nd] == 5 && nd + 1 == self.nd {
            if self.trunc {
                return true;
            }
            return nd > 0 && self.digits[nd - 1] % 2 == 1;
        }

        self.digits[nd] >= 5
    }

    /// Integer part, rounded.
    pub fn rounded_integer(&self) -> u64 {
        if self.dp > 20 {
            return u64::MAX;
        }

        let mut n: u64 = 0;
        let mut i = 0;
        while (i as i32) < self.dp && i < self.nd {
            n = n * 10 + self.digits[i] as u64;
            i += 1;
        }
        while (i as i32) < self.dp {
            n *= 10;
            i += 1;
        }

        if self.should_round_up(self.dp) {
            n += 1;
        }

        n
    }

    /// Converts to the bit pattern described by `info`. The flag reports
    /// overflow, in which case the bits hold infinity.
    pub fn float_bits(&mut self, info: &FloatInfo) -> (u64, bool) {
        let max_biased = (1i32 << info.expbits) - 1;

        if self.nd == 0 {
            return (info.assemble(0, info.bias), false);
        }
        if self.dp > 310 {
            return (info.assemble(0, max_biased + info.bias), true);
        }
        if self.dp < -330 {
            return (info.assemble(0, info.bias), false);
        }

        // Scale into [0.5, 1).
        let mut exp: i32 = 0;
        while self.dp > 0 {
            let n = POWTAB.get(self.dp as usize).copied().unwrap_or(27);
            self.shift(-n);
            exp += n;
        }
        while self.dp < 0 || (self.dp == 0 && self.digits[0] < 5) {
            let n = POWTAB.get((-self.dp) as usize).copied().unwrap_or(27);
            self.shift(n);
            exp -= n;
        }

        // [0.5, 1) to [1, 2)
        exp -= 1;

        // Denormal: clamp the exponent and shift the value down instead.
        if exp < info.bias + 1 {
            let n = info.bias + 1 - exp;
            self.shift(-n);
            exp += n;
        }

        if exp - info.bias >= max_biased {
            return (info.assemble(0, max_biased + info.bias), true);
        }

        self.shift(1 + info.mantbits as i32);
        let mut mant = self.rounded_integer();

        // Rounding carried into a new bit.
        if mant == 2 << info.mantbits {
            mant >>= 1;
            exp += 1;
            if exp - info.bias >= max_biased {
                return (info.assemble(0, max_biased + info.bias), true);
            }
        }

        if mant & (1 << info.mantbits) == 0 {
            exp = info.bias;
        }

        (info.assemble(mant, exp), false)
    }
}

/// Decodes a decimal float literal.
pub fn parse_decimal(literal: &str) -> Result<f32, ErrorImpl> {
    let mut decimal = Decimal::parse(literal).ok_or_else(|| ErrorImpl::InvalidNumber {
        literal: literal.to_string(),
    })?;

    let (bits, overflow) = decimal.float_bits(&F32_INFO);
    trace!(literal, bits, overflow, "decimal float");

    if overflow {
        return Err(ErrorImpl::FloatOverflow {
            literal: literal.to_string(),
        });
    }

    Ok(f32::from_bits(bits as u32))
}
