use regex::Regex;
use std::sync::LazyLock;

// `\d` covers every Unicode decimal digit (general category Nd)
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit run pattern is valid"));

static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("decimal digit pattern is valid"));

/// Parse mileage from recognized text
/// Expected format: "123456 km", "123456km", "123456" or free text around a number
/// Returns the first run of digits, or None when the text holds no number
pub fn parse_mileage(text: &str) -> Option<i64> {
    // Unit suffix is stripped before matching, case-sensitive
    let cleaned = strip_unit(text);

    let digits = DIGIT_RUN.find(&cleaned)?.as_str();

    // Runs too long for i64 are not a plausible odometer value
    digits.chars().try_fold(0i64, |acc, c| {
        acc.checked_mul(10)?.checked_add(i64::from(digit_value(c)?))
    })
}

/// Value of a decimal digit in any script.
/// Nd digits are encoded in contiguous blocks of ten, zero first.
fn digit_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((c as u32 - start) % 10)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

fn strip_unit(text: &str) -> String {
    text.replace(" km", "").replace("km", "")
}
