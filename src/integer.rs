use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};

use crate::error::{Error, Result};

/// Represents a JOLT integer: signed, arbitrary precision.
///
/// A `Value` containing an integer can be constructed using the `From`
/// trait for the native integer types, or parsed from a decimal string
/// with [`Int::from_str`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Int {
    n: BigInt,
}

impl Int {
    /// The integer zero.
    pub fn zero() -> Int {
        Int { n: BigInt::zero() }
    }

    /// Returns `true` if the integer is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.n.is_zero()
    }

    /// Returns `true` if the integer is strictly negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.n.sign() == Sign::Minus
    }

    /// Returns the integer represented as `i64` if possible, or else `None`.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        self.n.to_i64()
    }

    /// Returns the integer represented as `u64` if possible, or else `None`.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        self.n.to_u64()
    }

    /// Borrow the underlying big integer.
    #[inline]
    pub fn as_bigint(&self) -> &BigInt {
        &self.n
    }

    /// Magnitude as big-endian bytes with no leading zeros; empty for zero.
    pub fn magnitude_bytes(&self) -> Vec<u8> {
        if self.n.is_zero() {
            Vec::new()
        } else {
            self.n.magnitude().to_bytes_be()
        }
    }

    /// Rebuild an integer from a sign flag and big-endian magnitude bytes,
    /// as laid out on the wire.
    pub fn from_sign_magnitude(negative: bool, magnitude: &[u8]) -> Int {
        let mag = BigUint::from_bytes_be(magnitude);
        let sign = if mag.is_zero() {
            Sign::NoSign
        } else if negative {
            Sign::Minus
        } else {
            Sign::Plus
        };
        Int {
            n: BigInt::from_biguint(sign, mag),
        }
    }
}

impl FromStr for Int {
    type Err = Error;

    /// Parses exactly `-?[0-9]+`; any other form is rejected.
    fn from_str(s: &str) -> Result<Int> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidNumber(s.to_string()));
        }
        let n = BigInt::from_str(s).map_err(|_| Error::InvalidNumber(s.to_string()))?;
        Ok(Int { n })
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.n, f)
    }
}

impl fmt::Debug for Int {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Int({})", self.n)
    }
}

impl From<BigInt> for Int {
    fn from(n: BigInt) -> Self {
        Int { n }
    }
}

impl From<i64> for Int {
    fn from(n: i64) -> Self {
        Int { n: BigInt::from(n) }
    }
}

impl From<i32> for Int {
    fn from(n: i32) -> Self {
        Int { n: BigInt::from(n) }
    }
}

impl From<u64> for Int {
    fn from(n: u64) -> Self {
        Int { n: BigInt::from(n) }
    }
}
