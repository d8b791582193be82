use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// An exact rational number used for container usage.
///
/// Backed by an arbitrary-precision ratio, so sums over capacities with a
/// large common multiple never overflow. Always reduced with a positive
/// denominator, so structural equality is numeric equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fraction(BigRational);

impl Fraction {
    pub fn zero() -> Fraction {
        Fraction(BigRational::zero())
    }

    /// `num / den`. A zero denominator is treated as 1.
    pub fn new(num: impl Into<BigInt>, den: impl Into<BigInt>) -> Fraction {
        let den = den.into();
        let den = if den.is_zero() { BigInt::one() } else { den };
        Fraction(BigRational::new(num.into(), den))
    }

    pub fn from_integer(n: impl Into<BigInt>) -> Fraction {
        Fraction(BigRational::from_integer(n.into()))
    }

    /// Container usage of `quantity` units at `capacity` units per container.
    pub fn usage(quantity: u64, capacity: u64) -> Fraction {
        Fraction::new(quantity, capacity.max(1))
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn floor(&self) -> BigInt {
        self.0.floor().to_integer()
    }

    pub fn ceil(&self) -> BigInt {
        self.0.ceil().to_integer()
    }

    /// `floor` as a count: negative values give 0, values past `u64::MAX`
    /// saturate.
    pub fn floor_count(&self) -> u64 {
        to_count(self.floor())
    }

    /// `ceil` as a count, clamped like [`Fraction::floor_count`].
    pub fn ceil_count(&self) -> u64 {
        to_count(self.ceil())
    }

    /// Multiply by a whole number.
    pub fn scale(&self, k: u64) -> Fraction {
        Fraction(&self.0 * BigRational::from_integer(BigInt::from(k)))
    }

    /// Decimal rendering for display, rounded to 4 places. Values outside
    /// the `Decimal` range saturate.
    pub fn to_decimal(&self) -> Decimal {
        let scaled = (&self.0 * BigRational::from_integer(BigInt::from(10_000)))
            .round()
            .to_integer();
        let saturated = if scaled.is_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        };
        scaled
            .to_i128()
            .and_then(|n| Decimal::try_from_i128_with_scale(n, 4).ok())
            .map(|d| d.normalize())
            .unwrap_or(saturated)
    }
}

fn to_count(n: BigInt) -> u64 {
    if n.is_negative() {
        0
    } else {
        n.to_u64().unwrap_or(u64::MAX)
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Fraction::zero()
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 + rhs.0)
    }
}

impl AddAssign for Fraction {
    fn add_assign(&mut self, rhs: Fraction) {
        self.0 += rhs.0;
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        Fraction(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Fraction {
    fn sum<I: Iterator<Item = Fraction>>(iter: I) -> Fraction {
        iter.fold(Fraction::zero(), |acc, f| acc + f)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.denom().is_one() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
