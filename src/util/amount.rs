//! Money as an integer number of cents
//!
//! Values typed by the user are read as exact decimals (see `Decimal`)
//! and only rounded once, when they become an `Amount`. Nothing goes through
//! floating point, so summing many bills never drifts.

use std::{fmt, ops};

use thiserror::Error;

/// A non-negative quantity of money, in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(u64);

/// An exact decimal number `mantissa / 10^scale`
///
/// Built from the digits of a token, e.g. `"34.560"` is `Decimal { mantissa: 34560, scale: 3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    mantissa: u128,
    scale: u32,
}

/// Ways in which the digits of a numeric token can be unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    /// the digit string does not fit in the mantissa
    #[error("{0} has too many digits to be represented")]
    TooManyDigits(String),
    /// the computed value does not fit in an amount of cents
    #[error("{0} is too large to be used as an amount of money")]
    Overflow(String),
}

impl Amount {
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> u64 {
        self.0
    }

    /// `None` if the sum no longer fits in cents
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// `percent`% of `self`, rounded half-up to the nearest cent
    pub fn percent(self, percent: Decimal) -> Result<Self, DecimalError> {
        let overflow = || DecimalError::Overflow(format!("{}% of {}", percent, self));
        let num = (self.0 as u128)
            .checked_mul(percent.mantissa)
            .ok_or_else(overflow)?;
        let den = pow10(percent.scale)
            .and_then(|p| p.checked_mul(100))
            .ok_or_else(overflow)?;
        let cents = div_half_up(num, den).ok_or_else(overflow)?;
        u64::try_from(cents).map(Self).map_err(|_| overflow())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Decimal {
    /// Assemble from the integer and fractional digit strings
    ///
    /// Either part may be empty (`"12."` or `".5"`), but the caller
    /// guarantees that both only contain ASCII digits.
    pub fn from_digits(integer: &str, fraction: &str) -> Result<Self, DecimalError> {
        let too_many = || DecimalError::TooManyDigits(format!("{}.{}", integer, fraction));
        let scale = u32::try_from(fraction.len()).map_err(|_| too_many())?;
        let mut mantissa: u128 = 0;
        for c in integer.bytes().chain(fraction.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add((c - b'0') as u128))
                .ok_or_else(too_many)?;
        }
        // the scale must stay usable as a power of ten
        pow10(scale).ok_or_else(too_many)?;
        Ok(Self { mantissa, scale })
    }

    /// Whole number, e.g. a percentage of exactly 100
    pub fn integer(n: u64) -> Self {
        Self {
            mantissa: n as u128,
            scale: 0,
        }
    }

    /// Round half-up to the nearest cent
    pub fn to_amount(self) -> Result<Amount, DecimalError> {
        let overflow = || DecimalError::Overflow(format!("{}", self));
        let cents = if self.scale <= 2 {
            pow10(2 - self.scale).and_then(|p| self.mantissa.checked_mul(p))
        } else {
            pow10(self.scale - 2).and_then(|p| div_half_up(self.mantissa, p))
        };
        cents
            .and_then(|c| u64::try_from(c).ok())
            .map(Amount)
            .ok_or_else(overflow)
    }

    /// Compare with a whole number without rounding
    pub fn equals_integer(self, n: u64) -> bool {
        pow10(self.scale)
            .and_then(|p| (n as u128).checked_mul(p))
            .map(|scaled| scaled == self.mantissa)
            .unwrap_or(false)
    }
}

impl ops::Add for Decimal {
    type Output = Option<Self>;
    fn add(self, other: Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let lhs = self.mantissa.checked_mul(pow10(scale - self.scale)?)?;
        let rhs = other.mantissa.checked_mul(pow10(scale - other.scale)?)?;
        Some(Self {
            mantissa: lhs.checked_add(rhs)?,
            scale,
        })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = format!("{:0>width$}", self.mantissa, width = self.scale as usize + 1);
        let (int, frac) = digits.split_at(digits.len() - self.scale as usize);
        if frac.is_empty() {
            write!(f, "{}", int)
        } else {
            write!(f, "{}.{}", int, frac)
        }
    }
}

fn pow10(exp: u32) -> Option<u128> {
    10u128.checked_pow(exp)
}

// round(num / den) with halves rounded up, for nonnegative numbers
fn div_half_up(num: u128, den: u128) -> Option<u128> {
    num.checked_add(den / 2).map(|n| n / den)
}
