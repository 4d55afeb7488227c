use tracing::trace;

use crate::errors::errors::ErrorImpl;

use super::{FloatInfo, F32_INFO};

/// Hex digits kept in the 64-bit mantissa; later digits only set the
/// truncation flag.
const MAX_MANTISSA_DIGITS: usize = 16;

/// Decodes a hexadecimal float literal such as `0x1.8p-3`. The `p`
/// exponent is mandatory.
pub fn parse_hex(literal: &str) -> Result<f32, ErrorImpl> {
    let invalid = || ErrorImpl::InvalidNumber {
        literal: literal.to_string(),
    };

    let body = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    let bytes = body.as_bytes();

    let mut mantissa: u64 = 0;
    let mut nd = 0;
    let mut nd_mant = 0;
    let mut dp: i32 = 0;
    let mut saw_dot = false;
    let mut saw_digits = false;
    let mut trunc = false;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'_' => {}
            b'.' => {
                if saw_dot {
                    return Err(invalid());
                }
                saw_dot = true;
                dp = nd as i32;
            }
            _ if c.is_ascii_hexdigit() => {
                saw_digits = true;
                if c == b'0' && nd == 0 {
                    dp -= 1;
                } else {
                    nd += 1;
                    if nd_mant < MAX_MANTISSA_DIGITS {
                        mantissa = mantissa * 16 + (c as char).to_digit(16).unwrap_or(0) as u64;
                        nd_mant += 1;
                    } else if c != b'0' {
                        trunc = true;
                    }
                }
            }
            _ => break,
        }
        i += 1;
    }

    if !saw_digits {
        return Err(invalid());
    }
    if !saw_dot {
        dp = nd as i32;
    }

    // Digits count four bits each.
    dp *= 4;
    let nd_mant = nd_mant as i32 * 4;

    if !bytes.get(i).is_some_and(|c| c.eq_ignore_ascii_case(&b'p')) {
        return Err(ErrorImpl::HexMantissaRequiresHexExponent);
    }
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
        return Err(ErrorImpl::ExponentHasNoDigits);
    }

    let mut exponent: i32 = 0;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
        if bytes[i] != b'_' && exponent < 10000 {
            exponent = exponent * 10 + (bytes[i] - b'0') as i32;
        }
        i += 1;
    }
    dp += exponent * sign;

    if i != bytes.len() {
        return Err(invalid());
    }

    let exp = if mantissa != 0 { dp - nd_mant } else { 0 };

    let (bits, overflow) = hex_float_bits(mantissa, exp, trunc, &F32_INFO);
    trace!(literal, bits, overflow, "hex float");

    if overflow {
        return Err(ErrorImpl::FloatOverflow {
            literal: literal.to_string(),
        });
    }

    Ok(f32::from_bits(bits as u32))
}

/// Rounds `mantissa * 2^exp` to the format described by `info`.
///
/// The mantissa is normalised to a leading one, the mantissa bits and two
/// extra bits: a round bit and a sticky bit that collects everything
/// shifted out below it.
pub(crate) fn hex_float_bits(
    mut mantissa: u64,
    mut exp: i32,
    trunc: bool,
    info: &FloatInfo,
) -> (u64, bool) {
    let max_exp = (1i32 << info.expbits) + info.bias - 2;
    let min_exp = info.bias + 1;

    // mantissa is now implicitly divided by 2^mantbits
    exp += info.mantbits as i32;

    while mantissa != 0 && mantissa >> (info.mantbits + 2) == 0 {
        mantissa <<= 1;
        exp -= 1;
    }
    if trunc {
        mantissa |= 1;
    }
    while mantissa >> (1 + info.mantbits + 2) != 0 {
        mantissa = (mantissa >> 1) | (mantissa & 1);
        exp += 1;
    }

    // Denormalize; the -2 accounts for the rounding bits.
    while mantissa > 1 && exp < min_exp - 2 {
        mantissa = (mantissa >> 1) | (mantissa & 1);
        exp += 1;
    }

    // round half to even
    let mut round = mantissa & 3;
    mantissa >>= 2;
    round |= mantissa & 1;
    exp += 2;
    if round == 3 {
        mantissa += 1;
        if mantissa == 1 << (1 + info.mantbits) {
            mantissa >>= 1;
            exp += 1;
        }
    }

    if mantissa >> info.mantbits == 0 {
        exp = info.bias;
    }

    if exp > max_exp {
        return (info.assemble(1 << info.mantbits, max_exp + 1), true);
    }

    (info.assemble(mantissa, exp), false)
}
