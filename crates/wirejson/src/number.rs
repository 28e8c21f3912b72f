//! Number classification shared by the decoder and encoder.
//!
//! The decoder picks a precision class from the literal's *format*: an
//! exponent means `Float`, a decimal point with more than
//! [`MAX_DOUBLE_DIGITS`] digits means `Decimal`, a shorter one `Float`, and a
//! bare digit run `Integer` (widening to `Decimal` when it overflows `i64`).
//! The encoder formats floats and decimals so that rule lands them back in
//! their own class.

use std::fmt;

use crate::decimal::Decimal;
use crate::value::Value;

/// Most digits a literal with a decimal point may carry and still decode as
/// `Float`.
pub const MAX_DOUBLE_DIGITS: usize = 15;

pub(crate) const NUM_SIGN: u8 = 0;
pub(crate) const NUM_DIGIT: u8 = 1;
pub(crate) const NUM_POINT: u8 = 64;
pub(crate) const NUM_EXPONENT: u8 = 128;
pub(crate) const NUM_NONE: u8 = 255;

/// Character class of every byte that may appear in a number run.
pub(crate) const NUMBER_CLASS: [u8; 256] = {
    let mut table = [NUM_NONE; 256];
    table[b'+' as usize] = NUM_SIGN;
    table[b'-' as usize] = NUM_SIGN;
    let mut c = b'0';
    while c <= b'9' {
        table[c as usize] = NUM_DIGIT;
        c += 1;
    }
    table[b'.' as usize] = NUM_POINT;
    table[b'e' as usize] = NUM_EXPONENT;
    table[b'E' as usize] = NUM_EXPONENT;
    table
};

/// Shape of a scanned number run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NumberShape {
    pub digits: usize,
    pub point: bool,
    pub exponent: bool,
}

/// Scans the run of number characters at the start of `data`.
/// Returns the run length and its shape.
pub(crate) fn scan(data: &[u8]) -> (usize, NumberShape) {
    let mut shape = NumberShape::default();
    let mut len = 0;
    for &b in data {
        match NUMBER_CLASS[b as usize] {
            NUM_DIGIT => shape.digits += 1,
            NUM_POINT => shape.point = true,
            NUM_EXPONENT => shape.exponent = true,
            NUM_SIGN => {}
            _ => break,
        }
        len += 1;
    }
    (len, shape)
}

/// Converts a scanned run into a value of its precision class.
/// `None` means the text does not parse in that class.
pub(crate) fn classify(text: &str, shape: NumberShape) -> Option<Value> {
    if shape.exponent || (shape.point && shape.digits <= MAX_DOUBLE_DIGITS) {
        return text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float);
    }
    if shape.point {
        return text.parse::<Decimal>().ok().map(Value::Decimal);
    }
    match text.parse::<i64>() {
        Ok(n) => Some(Value::Integer(n)),
        Err(_) => text.parse::<Decimal>().ok().map(Value::Decimal),
    }
}

fn count_digits(text: &str) -> usize {
    text.bytes().filter(u8::is_ascii_digit).count()
}

/// Text for a finite float that decodes back to `Float`.
pub(crate) fn float_text<F: fmt::Display + fmt::LowerExp>(value: F) -> String {
    let plain = value.to_string();
    let digits = count_digits(&plain);
    if plain.contains('.') {
        if digits <= MAX_DOUBLE_DIGITS {
            return plain;
        }
    } else if digits < MAX_DOUBLE_DIGITS {
        return plain + ".0";
    }
    format!("{value:e}")
}

/// Text for a decimal that decodes back to `Decimal`: always carries a point
/// and at least `MAX_DOUBLE_DIGITS + 1` digits.
pub(crate) fn decimal_text(value: &Decimal) -> String {
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    for _ in count_digits(&text)..=MAX_DOUBLE_DIGITS {
        text.push('0');
    }
    text
}
