use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A JSON number kept as its exact decimal text.
///
/// The text always matches the JSON number grammar; it is never re-formatted,
/// so integers wider than 64 bits or decimals with more precision than a
/// double survive a decode/encode cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// The stored decimal text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number from a finite `f64`. Returns `None` for NaN and infinities,
    /// which JSON cannot represent.
    pub fn from_f64(value: f64) -> Option<Self> {
        value.is_finite().then(|| Self(format!("{value:?}")))
    }

    /// Number from text another JSON implementation already validated.
    pub(crate) fn from_serde(number: &serde_json::Number) -> Self {
        Self(number.to_string())
    }

    /// Parse the text as `T`, naming `target` in the error.
    pub(crate) fn parse<T: FromStr>(&self, target: &'static str) -> Result<T, ValueError> {
        self.0.parse().map_err(|_| ValueError::NumericRange {
            text: self.0.clone(),
            target,
        })
    }

    pub(crate) fn to_f64(&self) -> Result<f64, ValueError> {
        let value: f64 = self.parse("f64")?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValueError::NumericRange {
                text: self.0.clone(),
                target: "f64",
            })
        }
    }
}

impl FromStr for Number {
    type Err = ValueError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if scan_number(text.as_bytes(), 0) == Some(text.len()) {
            Ok(Self(text.to_owned()))
        } else {
            Err(ValueError::InvalidNumber(text.to_owned()))
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! number_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

number_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Length-scan one JSON number starting at `start`.
///
/// Returns the index one past its last byte, or `None` if the bytes at
/// `start` do not begin a complete JSON number.
pub(crate) fn scan_number(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }

    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i = skip_digits(bytes, i + 1),
        _ => return None,
    }

    if bytes.get(i) == Some(&b'.') {
        let fraction = i + 1;
        i = skip_digits(bytes, fraction);
        if i == fraction {
            return None;
        }
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exponent = i;
        i = skip_digits(bytes, exponent);
        if i == exponent {
            return None;
        }
    }

    Some(i)
}

fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}
