//! Exact rational arithmetic.
//!
//! A thin wrapper over [`num_rational::Ratio`], which keeps values in lowest
//! terms with the sign carried by the numerator, so structural equality is
//! numeric equality. The wrapper adds a non-panicking constructor, a checked
//! division and the display form used in question text.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_rational::Ratio;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RationalError {
    #[error("division by zero")]
    DivisionByZero,
}

/// A reduced fraction `numer / denom` with `denom > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRational", into = "RawRational")]
pub struct Rational(Ratio<i64>);

#[derive(Serialize, Deserialize)]
struct RawRational {
    numer: i64,
    denom: i64,
}

impl TryFrom<RawRational> for Rational {
    type Error = RationalError;

    fn try_from(raw: RawRational) -> Result<Self, Self::Error> {
        Rational::new(raw.numer, raw.denom)
    }
}

impl From<Rational> for RawRational {
    fn from(r: Rational) -> Self {
        RawRational {
            numer: r.numer(),
            denom: r.denom(),
        }
    }
}

impl Rational {
    pub const ZERO: Rational = Rational(Ratio::new_raw(0, 1));

    /// Build a rational from any numerator/denominator pair, reducing it.
    pub fn new(numer: i64, denom: i64) -> Result<Self, RationalError> {
        // Ratio::new panics on a zero denominator
        if denom == 0 {
            return Err(RationalError::DivisionByZero);
        }
        Ok(Self(Ratio::new(numer, denom)))
    }

    /// Build a whole number.
    pub fn integer(n: i64) -> Self {
        Self(Ratio::from_integer(n))
    }

    pub fn numer(&self) -> i64 {
        *self.0.numer()
    }

    pub fn denom(&self) -> i64 {
        *self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.numer() == 0
    }

    /// Divide, failing when `rhs` is zero.
    pub fn checked_div(self, rhs: Rational) -> Result<Rational, RationalError> {
        if rhs.is_zero() {
            return Err(RationalError::DivisionByZero);
        }
        Ok(Self(self.0 / rhs.0))
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        Self(self.0 * rhs.0)
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Self(-self.0)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom() == 1 {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}
