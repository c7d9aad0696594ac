//! Base-12 (duodecimal) digit sequences.
//!
//! A [`DigitSequence`] is most-significant digit first, with no leading zero
//! except for the single-digit representation of zero. Text form uses the
//! alphabet `0123456789AB`.

use std::fmt;
use std::str::FromStr;

use num_traits::Zero;
use thiserror::Error;

use lychrel_types::Number;

/// The only supported radix.
pub const BASE: u32 = 12;

const ALPHABET: &[u8; BASE as usize] = b"0123456789AB";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigitError {
    #[error("digit sequence must not be empty")]
    Empty,
    #[error("digit sequence must not start with zero")]
    LeadingZero,
    #[error("digit {digit} at position {position} is outside 0..=11")]
    DigitOutOfRange { position: usize, digit: u8 },
    #[error("character '{ch}' at position {position} is not a duodecimal digit")]
    InvalidChar { position: usize, ch: char },
}

/// Validated base-12 digits, most-significant first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigitSequence(Vec<u8>);

impl DigitSequence {
    /// Validate raw digits.
    pub fn new(digits: Vec<u8>) -> Result<Self, DigitError> {
        validate(&digits)?;
        Ok(Self(digits))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Digits in reverse order. The result may start with zero, so it is
    /// returned raw rather than as a `DigitSequence`.
    #[must_use]
    pub fn reversed(&self) -> Vec<u8> {
        self.0.iter().rev().copied().collect()
    }

    #[must_use]
    pub fn value(&self) -> Number {
        value_be(&self.0)
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self
            .0
            .iter()
            .map(|&digit| char::from(ALPHABET[usize::from(digit)]))
            .collect();
        f.write_str(&text)
    }
}

impl FromStr for DigitSequence {
    type Err = DigitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .chars()
            .enumerate()
            .map(|(position, ch)| {
                ch.to_digit(BASE)
                    .map(|digit| digit as u8)
                    .ok_or(DigitError::InvalidChar { position, ch })
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Self::new(digits)
    }
}

/// Digits of `n`, most-significant first. Zero is `[0]`.
#[must_use]
pub fn to_base12(n: &Number) -> DigitSequence {
    if n.is_zero() {
        return DigitSequence(vec![0]);
    }
    DigitSequence(n.to_radix_be(BASE))
}

/// Inverse of [`to_base12`]. Rejects leading zeros and out-of-range digits.
pub fn from_base12(digits: &[u8]) -> Result<Number, DigitError> {
    validate(digits)?;
    Ok(value_be(digits))
}

fn validate(digits: &[u8]) -> Result<(), DigitError> {
    match digits {
        [] => return Err(DigitError::Empty),
        [0, _, ..] => return Err(DigitError::LeadingZero),
        _ => {}
    }
    if let Some((position, &digit)) = digits
        .iter()
        .enumerate()
        .find(|&(_, &digit)| u32::from(digit) >= BASE)
    {
        return Err(DigitError::DigitOutOfRange { position, digit });
    }
    Ok(())
}

pub(crate) fn is_palindromic(digits: &[u8]) -> bool {
    digits.iter().eq(digits.iter().rev())
}

/// Value of unchecked big-endian digits. Leading zeros are value-neutral.
pub(crate) fn value_be(digits: &[u8]) -> Number {
    Number::from_radix_be(digits, BASE).unwrap_or_default()
}

/// Value of big-endian `digits` read back to front, i.e. the reversal.
pub(crate) fn reversed_value(digits: &[u8]) -> Number {
    Number::from_radix_le(digits, BASE).unwrap_or_default()
}
