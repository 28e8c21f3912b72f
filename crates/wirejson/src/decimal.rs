//! Exact base-10 numbers for literals beyond `f64` precision.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Maximum number of significant digits a [`Decimal`] holds.
pub const MAX_DIGITS: u32 = 38;

/// Exact decimal number: `mantissa * 10^-scale`.
///
/// Used for number literals carrying more digits than a double keeps, so
/// long identifiers and currency amounts survive a decode untouched.
/// Equality is numeric: `1.50` equals `1.5`.
///
/// ```
/// use wirejson::Decimal;
///
/// let d: Decimal = "12345.678901234567890".parse().unwrap();
/// assert_eq!(d.to_string(), "12345.678901234567890");
/// assert_eq!(d, "12345.67890123456789".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

/// Error returned when text is not a plain decimal literal or overflows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal literal")]
pub struct ParseDecimalError;

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };

    /// Builds `mantissa * 10^-scale`. Returns `None` when `scale` exceeds
    /// [`MAX_DIGITS`].
    pub const fn new(mantissa: i128, scale: u32) -> Option<Self> {
        if scale > MAX_DIGITS {
            return None;
        }
        Some(Self { mantissa, scale })
    }

    pub const fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub const fn scale(&self) -> u32 {
        self.scale
    }

    pub const fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    /// Strips trailing fractional zeros: `1.500` becomes `1.5`.
    pub fn normalize(self) -> Self {
        let mut mantissa = self.mantissa;
        let mut scale = self.scale;
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    /// Nearest `f64`, rounded through the textual form.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self {
            mantissa: i128::from(value),
            scale: 0,
        }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let a = self.normalize();
        let b = other.normalize();
        a.mantissa == b.mantissa && a.scale == b.scale
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        // Same sign: align scales, falling back to f64 when alignment overflows.
        let (a, b) = (self.normalize(), other.normalize());
        let scale = a.scale.max(b.scale);
        let lift = |d: Decimal| {
            10i128
                .checked_pow(scale - d.scale)
                .and_then(|m| d.mantissa.checked_mul(m))
        };
        match (lift(a), lift(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.to_f64().total_cmp(&b.to_f64()),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{int}.{frac}")
        } else {
            f.write_str("0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Accepts an optional sign, digits and at most one decimal point.
    /// Trailing fractional zeros are dropped before accumulation, so
    /// `"1.50"` parses with scale 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (int, frac) = match body.split_once('.') {
            Some((int, frac)) => (int, frac.trim_end_matches('0')),
            None => (body, ""),
        };
        let had_digits = body.bytes().any(|b| b.is_ascii_digit());
        if !had_digits || frac.len() > MAX_DIGITS as usize {
            return Err(ParseDecimalError);
        }
        let mut magnitude: u128 = 0;
        for b in int.bytes().chain(frac.bytes()) {
            if !b.is_ascii_digit() {
                return Err(ParseDecimalError);
            }
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(u128::from(b - b'0')))
                .ok_or(ParseDecimalError)?;
        }
        let mantissa = if negative {
            if magnitude > 1u128 << 127 {
                return Err(ParseDecimalError);
            }
            (magnitude as i128).wrapping_neg()
        } else {
            i128::try_from(magnitude).map_err(|_| ParseDecimalError)?
        };
        Ok(Self {
            mantissa,
            scale: frac.len() as u32,
        })
    }
}
