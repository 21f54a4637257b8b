// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar values inferred from `key=value` tokens.

use std::fmt;

use serde::Serialize;

/// A field value decoded from a CGMiner response.
///
/// CGMiner does not declare types: everything arrives as text. The type is
/// inferred from the shape of the token, see [`Scalar::infer`].
///
/// # Examples
///
/// ```
/// use avalon_lib::response::Scalar;
///
/// assert_eq!(Scalar::infer("5"), Scalar::Int(5));
/// assert_eq!(Scalar::infer("5.0"), Scalar::Float(5.0));
/// assert_eq!(Scalar::infer("5.5.5"), Scalar::Str("5.5.5".to_string()));
/// assert_eq!(Scalar::infer("-3"), Scalar::Str("-3".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Token made only of ASCII digits.
    Int(i64),
    /// Token made of ASCII digits and exactly one decimal point.
    Float(f64),
    /// Anything else, verbatim.
    Str(String),
}

impl Scalar {
    /// Infers the scalar type of a (trimmed) token.
    ///
    /// Tried in order: integer, float, string. A token that matches a numeric
    /// shape but does not convert (an integer wider than `i64`) is kept as a
    /// string.
    #[must_use]
    pub fn infer(token: &str) -> Self {
        if is_digits(token) {
            return token
                .parse()
                .map_or_else(|_| Self::Str(token.to_string()), Self::Int);
        }

        if token.matches('.').count() == 1 && is_digits(&token.replacen('.', "", 1)) {
            return token
                .parse()
                .map_or_else(|_| Self::Str(token.to_string()), Self::Float);
        }

        Self::Str(token.to_string())
    }

    /// Returns the integer value, if this is an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Str(_) => None,
        }
    }

    /// Returns the string value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_integer() {
        assert_eq!(Scalar::infer("5"), Scalar::Int(5));
        assert_eq!(Scalar::infer("0042"), Scalar::Int(42));
    }

    #[test]
    fn infers_float() {
        assert_eq!(Scalar::infer("5.0"), Scalar::Float(5.0));
        assert_eq!(Scalar::infer("63.97"), Scalar::Float(63.97));
        assert_eq!(Scalar::infer(".5"), Scalar::Float(0.5));
        assert_eq!(Scalar::infer("5."), Scalar::Float(5.0));
    }

    #[test]
    fn falls_back_to_string() {
        assert_eq!(Scalar::infer("5.5.5"), Scalar::from("5.5.5"));
        assert_eq!(Scalar::infer("S"), Scalar::from("S"));
        assert_eq!(Scalar::infer("-1"), Scalar::from("-1"));
        assert_eq!(Scalar::infer("1e3"), Scalar::from("1e3"));
        assert_eq!(Scalar::infer("."), Scalar::from("."));
        assert_eq!(Scalar::infer(""), Scalar::from(""));
    }

    #[test]
    fn oversized_integer_stays_string() {
        let token = "99999999999999999999999";
        assert_eq!(Scalar::infer(token), Scalar::from(token));
    }

    #[test]
    fn accessors() {
        assert_eq!(Scalar::Int(7).as_i64(), Some(7));
        assert_eq!(Scalar::Int(7).as_f64(), Some(7.0));
        assert_eq!(Scalar::Float(1.5).as_i64(), None);
        assert_eq!(Scalar::from("x").as_str(), Some("x"));
        assert_eq!(Scalar::from("x").as_f64(), None);
    }

    #[test]
    fn display_renders_plain_value() {
        assert_eq!(Scalar::Int(3).to_string(), "3");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::from("Pool 0").to_string(), "Pool 0");
    }
}
