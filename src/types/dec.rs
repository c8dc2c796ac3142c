//! Fixed-point decimal with 18 fractional digits
//!
//! Serialized as a decimal string (`"0.335000000000000000"`) so values stay
//! exact across codecs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

pub const PRECISION: u32 = 18;
const SCALE: i128 = 10i128.pow(PRECISION);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dec(i128);

impl Dec {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(SCALE)
    }

    /// `value * 10^-prec`, e.g. `new_with_prec(335, 3)` is 0.335
    ///
    /// Returns `None` if `prec` exceeds [`PRECISION`].
    pub fn new_with_prec(value: i64, prec: u32) -> Option<Self> {
        if prec > PRECISION {
            return None;
        }
        Some(Self(value as i128 * 10i128.pow(PRECISION - prec)))
    }

    pub const fn from_atomics(atomics: i128) -> Self {
        Self(atomics)
    }

    pub const fn atomics(&self) -> i128 {
        self.0
    }

    /// Whether the value lies in `[0, 1]`
    pub fn is_fraction(&self) -> bool {
        *self >= Self::zero() && *self <= Self::one()
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = SCALE as u128;
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            abs / scale,
            abs % scale,
            width = PRECISION as usize
        )
    }
}

impl FromStr for Dec {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CodecError::Invalid(format!("decimal {:?}: {}", s, reason));

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty() {
            return Err(invalid("missing integer part"));
        }
        if frac_part.len() > PRECISION as usize {
            return Err(invalid("too many fractional digits"));
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid("not a number"));
        }

        let int_value: i128 = int_part.parse().map_err(|_| invalid("integer part overflows"))?;
        let frac_value: i128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac_part, width = PRECISION as usize);
            padded.parse().map_err(|_| invalid("bad fraction"))?
        };

        let atomics = int_value
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(frac_value))
            .ok_or_else(|| invalid("out of range"))?;
        Ok(Self(if negative { -atomics } else { atomics }))
    }
}

impl TryFrom<String> for Dec {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dec> for String {
    fn from(value: Dec) -> Self {
        value.to_string()
    }
}
