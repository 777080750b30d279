//! Currency amounts.
//!
//! A thin newtype over `rust_decimal::Decimal`, kept to four fraction digits
//! so group sums are exact and independent of summation order.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const FRACTION_DIGITS: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Largest accepted input magnitude (one quadrillion).
    ///
    /// `Decimal` holds about 7.9e28, so sums of bounded inputs cannot overflow
    /// for any row count a file can hold.
    pub const MAX_INPUT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

    /// Whole currency units (e.g. a quantity or `300` dollars).
    pub fn from_units(units: i64) -> Self {
        Amount(Decimal::from(units))
    }

    /// Build from a count of 1/10 000 units.
    pub fn from_raw(raw: i64) -> Self {
        Amount(Decimal::new(raw, FRACTION_DIGITS))
    }

    /// Round a float to the nearest representable amount.
    pub fn from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64(value).map(Self::rounded)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Parse a plain decimal such as `261.96`, `-383.031` or `$1,234.5`.
    ///
    /// More than four fraction digits are rounded half away from zero.
    /// Magnitudes above [`Amount::MAX_INPUT`] are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ',' | '$' | '_'))
            .collect();

        let (sign, body) = match cleaned.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", cleaned.strip_prefix('+').unwrap_or(&cleaned)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let canonical = if frac_part.is_empty() {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part}")
        };

        let value = Decimal::from_str(&canonical).ok()?;
        if value.abs() > Self::MAX_INPUT {
            return None;
        }
        Some(Self::rounded(value))
    }

    fn rounded(value: Decimal) -> Self {
        Amount(value.round_dp_with_strategy(FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = if self.0.is_zero() { Decimal::ZERO } else { self.0.normalize() };
        if value.scale() < 2 {
            value.rescale(2);
        }
        write!(f, "{value}")
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s).ok_or_else(|| format!("Invalid amount '{s}'"))
    }
}

// Saturating ops never trigger for bounded inputs; they keep arithmetic panic-free.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

// Serialized as the decimal string so JSON snapshots keep full precision.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
