//! Hexadecimal floating-point text codec.
//!
//! IPPcode22 serializes floats in the hexadecimal notation produced by
//! Python's `float.hex()` (WRITE output) and accepted by
//! `float.fromhex()` (source literals and READ input). This module
//! implements both directions; the round-trip is bit-exact for every
//! finite value.

/// Format a float in hexadecimal notation.
///
/// Normal values render as `[-]0x1.{13 hex digits}p{±exp}`, zeros as
/// `[-]0x0.0p+0`, subnormals as `[-]0x0.{13 hex digits}p-1022`.
pub fn format(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v.is_sign_negative() { "-inf" } else { "inf" }.to_string();
    }

    let bits = v.to_bits();
    let sign = if bits >> 63 == 1 { "-" } else { "" };
    let exp = ((bits >> 52) & 0x7ff) as i64;
    let frac = bits & ((1u64 << 52) - 1);

    if exp == 0 {
        if frac == 0 {
            format!("{sign}0x0.0p+0")
        } else {
            format!("{sign}0x0.{frac:013x}p-1022")
        }
    } else {
        format!("{sign}0x1.{frac:013x}p{:+}", exp - 1023)
    }
}

/// Parse hexadecimal floating-point notation.
///
/// Accepts `[sign] [0x] hexdigits [. hexdigits] [p decimal-exponent]`
/// plus `inf`/`infinity`/`nan`, case-insensitively and with surrounding
/// whitespace. Returns `None` on any malformed input.
pub fn parse_hex(s: &str) -> Option<f64> {
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let lower = s.to_ascii_lowercase();
    match lower.as_str() {
        "inf" | "infinity" => {
            return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY })
        }
        "nan" => return Some(f64::NAN),
        _ => {}
    }

    let s = lower.strip_prefix("0x").unwrap_or(&lower);
    let (mantissa_text, exp_text) = match s.find('p') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let exp: i32 = match exp_text {
        Some(e) => e.parse().ok()?,
        None => 0,
    };
    let (int_part, frac_part) = match mantissa_text.find('.') {
        Some(i) => (&mantissa_text[..i], &mantissa_text[i + 1..]),
        None => (mantissa_text, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    // Accumulate up to 60 mantissa bits; digits beyond that only
    // matter for rounding and are folded into a sticky bit.
    let mut mantissa: u64 = 0;
    let mut scale: i32 = exp;
    let mut dropped_nonzero = false;
    for c in int_part.chars() {
        let d = c.to_digit(16)? as u64;
        if mantissa >> 59 == 0 {
            mantissa = mantissa * 16 + d;
        } else {
            scale = scale.saturating_add(4);
            if d != 0 {
                dropped_nonzero = true;
            }
        }
    }
    for c in frac_part.chars() {
        let d = c.to_digit(16)? as u64;
        if mantissa >> 59 == 0 {
            mantissa = mantissa * 16 + d;
            scale -= 4;
        } else if d != 0 {
            dropped_nonzero = true;
        }
    }
    if dropped_nonzero {
        mantissa |= 1;
    }

    let magnitude = ldexp(mantissa as f64, scale);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a float literal: hexadecimal notation when the text contains
/// `0x` or `p`, decimal notation otherwise.
pub fn parse(s: &str) -> Option<f64> {
    if s.contains("0x") || s.contains('p') {
        parse_hex(s)
    } else {
        s.trim().parse().ok()
    }
}

// Scale by a power of two, stepping the exponent so no intermediate
// overflows or underflows before the final result would.
fn ldexp(mut v: f64, mut e: i32) -> f64 {
    while e > 1000 {
        v *= f64::powi(2.0, 1000);
        e -= 1000;
    }
    while e < -1000 {
        v *= f64::powi(2.0, -1000);
        e += 1000;
    }
    v * f64::powi(2.0, e)
}
