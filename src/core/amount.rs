//! Amount field input handling.
//!
//! Two filters run on every edit, mirroring how a text input sees keystrokes:
//! [`admits`] decides whether a key may reach the field at all, and
//! [`normalize`] rewrites whatever text results (typed or pasted) into a
//! plain decimal string with at most one `.` separator.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A keystroke delivered to the amount field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Tab,
    Enter,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    pub fn is_navigation(&self) -> bool {
        !matches!(self, Key::Char(_))
    }
}

/// Inline validation failure for the amount field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    InvalidValue,
    NotPositive,
}

impl AmountError {
    pub fn message(&self) -> &'static str {
        match self {
            AmountError::InvalidValue => "Enter a valid value",
            AmountError::NotPositive => "Enter a value greater than zero",
        }
    }
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AmountError {}

fn is_separator(c: char) -> bool {
    c == '.' || c == ','
}

fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || is_separator(c)
}

/// Keydown filter. Navigation keys always pass; a second separator never does.
pub fn admits(current: &str, key: Key) -> bool {
    match key {
        Key::Char(c) if !is_amount_char(c) => false,
        Key::Char(c) if is_separator(c) => !current.contains(is_separator),
        _ => true,
    }
}

/// Rewrites raw field text into digits with at most one `.`.
///
/// Commas become dots; only the first dot survives and the digits after any
/// later separator are merged into what precedes them.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut has_point = false;
    for c in raw.chars().filter(|c| is_amount_char(*c)) {
        if is_separator(c) {
            if !has_point {
                out.push('.');
                has_point = true;
            }
        } else {
            out.push(c);
        }
    }
    out
}

// Leading number of `value` as plain text such as `-12.5`. Trailing garbage
// is ignored; `None` when no digit precedes the first unrecognised character.
fn leading_number(value: &str) -> Option<String> {
    let mut chars = value.trim_start().chars().peekable();
    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut int_part = String::new();
    let mut frac_part = String::new();
    let mut seen_separator = false;
    for c in chars {
        match c {
            '0'..='9' if seen_separator => frac_part.push(c),
            '0'..='9' => int_part.push(c),
            c if is_separator(c) && !seen_separator => seen_separator = true,
            _ => break,
        }
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if int_part.is_empty() {
        int_part.push('0');
    }

    let sign = if negative { "-" } else { "" };
    Some(if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    })
}

/// Numeric value of the leading number of `value`, accepting `.` or `,` as
/// separator. `"12.5abc"` is 12.5.
///
/// Any run of digits has a value here, however long, so this is what decides
/// whether the field holds a number and whether it is positive.
pub fn parse_number(value: &str) -> Option<f64> {
    leading_number(value)?.parse().ok()
}

/// The leading number of `value` as a `Decimal`, for the conversion request.
///
/// `None` when there is no number, or when it does not fit a `Decimal`: too
/// many integer digits, or a non-zero fraction so small it would round to zero.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let text = leading_number(value)?;
    let amount = Decimal::from_str(&text).ok()?;
    if amount.is_zero() && text.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        return None;
    }
    Some(amount)
}

// "00", "0.00", "0,00" and friends.
fn is_zero_literal(value: &str) -> bool {
    let value = value.trim();
    value.contains('0') && value.chars().all(|c| c == '0' || is_separator(c))
}

/// Inline validation. Empty input is a valid "nothing entered yet" state.
pub fn validate(value: &str) -> Option<AmountError> {
    if value.trim().is_empty() {
        return None;
    }
    let Some(number) = parse_number(value) else {
        return Some(AmountError::InvalidValue);
    };
    if number <= 0.0 || is_zero_literal(value) {
        return Some(AmountError::NotPositive);
    }
    None
}

/// Same as [`validate`], rendered as text. Empty string means no error.
pub fn validation_message(value: &str) -> &'static str {
    validate(value).map_or("", |e| e.message())
}

/// The amount text box. Edits happen at the end of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountField {
    value: String,
}

impl AmountField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Applies a keystroke. Returns whether the value changed.
    pub fn press(&mut self, key: Key) -> bool {
        if !admits(&self.value, key) {
            return false;
        }
        match key {
            Key::Char(c) => {
                let mut proposed = self.value.clone();
                proposed.push(c);
                self.commit(normalize(&proposed))
            }
            Key::Backspace => {
                let mut proposed = self.value.clone();
                if proposed.pop().is_none() {
                    return false;
                }
                self.commit(normalize(&proposed))
            }
            Key::Delete | Key::Tab | Key::Enter | Key::ArrowLeft | Key::ArrowRight => false,
        }
    }

    /// Types `text` one key at a time.
    pub fn type_text(&mut self, text: &str) -> bool {
        text.chars()
            .fold(false, |changed, c| self.press(Key::Char(c)) || changed)
    }

    /// Appends pasted text. Pasting skips the keydown filter, so only
    /// [`normalize`] constrains the result.
    pub fn paste(&mut self, text: &str) -> bool {
        let proposed = format!("{}{}", self.value, text);
        self.commit(normalize(&proposed))
    }

    /// Replaces the whole value, as if the text were selected and pasted over.
    pub fn replace(&mut self, text: &str) -> bool {
        self.commit(normalize(text))
    }

    pub fn clear(&mut self) -> bool {
        self.commit(String::new())
    }

    fn commit(&mut self, next: String) -> bool {
        if next == self.value {
            return false;
        }
        self.value = next;
        true
    }
}
