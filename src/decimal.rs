use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{Error, Result};

/// Significant digits kept when parsing a literal, matching IEEE 754
/// decimal128. Rounding is half-to-even. Once constructed, a `Decimal` is
/// carried through the codec exactly: `1.20` and `1.2` stay distinct on the
/// wire.
pub const PRECISION: usize = 34;

/// Represents a JOLT decimal: `(-1)^sign * coefficient * 10^exponent`,
/// where the coefficient is a non-negative big integer and the exponent is
/// a signed 32-bit value.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal {
    negative: bool,
    coeff: BigUint,
    exponent: i32,
}

impl Decimal {
    /// Assemble a decimal from its wire parts. A zero coefficient keeps its
    /// sign and exponent, so `-0` and `0.00` survive a round trip.
    pub fn from_parts(negative: bool, coeff: BigUint, exponent: i32) -> Decimal {
        Decimal {
            negative,
            coeff,
            exponent,
        }
    }

    /// Returns `true` if the coefficient is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeff.is_zero()
    }

    /// Returns `true` if the sign flag is set.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// The power-of-ten exponent.
    #[inline]
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Borrow the coefficient.
    #[inline]
    pub fn coefficient(&self) -> &BigUint {
        &self.coeff
    }

    /// Coefficient as big-endian bytes with no leading zeros; empty for
    /// zero.
    pub fn coefficient_bytes(&self) -> Vec<u8> {
        if self.coeff.is_zero() {
            Vec::new()
        } else {
            self.coeff.to_bytes_be()
        }
    }
}

impl FromStr for Decimal {
    type Err = Error;

    /// Parses the common decimal/scientific grammar:
    /// `[+-]? digits [. digits]? [(e|E) [+-]? digits]?` (a bare fraction
    /// like `.5` is also accepted). The coefficient is rounded to
    /// [`PRECISION`] significant digits, half to even.
    fn from_str(s: &str) -> Result<Decimal> {
        let bad = || Error::InvalidNumber(s.to_string());

        let mut rest = s.as_bytes();
        let negative = match rest.first().copied() {
            Some(b'-') => {
                rest = &rest[1..];
                true
            }
            Some(b'+') => {
                rest = &rest[1..];
                false
            }
            _ => false,
        };

        // Split off the exponent part first.
        let (mantissa, exp_part) = match rest.iter().position(|&b| b == b'e' || b == b'E') {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };

        let (int_digits, frac_digits) = match mantissa.iter().position(|&b| b == b'.') {
            Some(i) => {
                let frac = &mantissa[i + 1..];
                if frac.contains(&b'.') {
                    return Err(bad());
                }
                (&mantissa[..i], frac)
            }
            None => (mantissa, &mantissa[..0]),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(bad());
        }
        if !int_digits.iter().all(u8::is_ascii_digit)
            || !frac_digits.iter().all(u8::is_ascii_digit)
        {
            return Err(bad());
        }

        let mut exponent: i64 = match exp_part {
            Some(e) => {
                let (sign, digits) = match e.first().copied() {
                    Some(b'-') => (-1i64, &e[1..]),
                    Some(b'+') => (1, &e[1..]),
                    _ => (1, e),
                };
                if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
                    return Err(bad());
                }
                let text = std::str::from_utf8(digits).map_err(|_| bad())?;
                sign * text.parse::<i64>().map_err(|_| bad())?
            }
            None => 0,
        };
        exponent -= frac_digits.len() as i64;

        let mut digits = Vec::with_capacity(int_digits.len() + frac_digits.len());
        digits.extend_from_slice(int_digits);
        digits.extend_from_slice(frac_digits);
        let text = std::str::from_utf8(&digits).map_err(|_| bad())?;
        let mut coeff = BigUint::from_str(text).map_err(|_| bad())?;

        // Round to working precision, half to even, the way the reference
        // arithmetic context does on parse.
        let ndigits = decimal_digits(&coeff);
        if ndigits > PRECISION {
            let drop = (ndigits - PRECISION) as u32;
            let divisor = BigUint::from(10u32).pow(drop);
            let rem = &coeff % &divisor;
            coeff /= &divisor;
            let twice = &rem * 2u32;
            if twice > divisor || (twice == divisor && coeff.bit(0)) {
                coeff += 1u32;
                if decimal_digits(&coeff) > PRECISION {
                    // 99…9 rounded up to 10^PRECISION; dropping the extra
                    // digit is exact.
                    coeff /= 10u32;
                    exponent += 1;
                }
            }
            exponent += drop as i64;
        }

        let exponent = i32::try_from(exponent).map_err(|_| bad())?;
        Ok(Decimal {
            negative,
            coeff,
            exponent,
        })
    }
}

fn decimal_digits(n: &BigUint) -> usize {
    if n.is_zero() {
        1
    } else {
        n.to_string().len()
    }
}

impl fmt::Display for Decimal {
    /// General Decimal Arithmetic to-scientific-string: plain notation when
    /// the exponent is non-positive and the adjusted exponent is at least
    /// -6, exponential (`d.dddE±n`) otherwise.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let digits = self.coeff.to_string();
        let exp = self.exponent as i64;
        let ndig = digits.len() as i64;
        let adjusted = exp + ndig - 1;

        if exp <= 0 && adjusted >= -6 {
            if exp == 0 {
                f.write_str(&digits)
            } else {
                let point = ndig + exp;
                if point > 0 {
                    let (int, frac) = digits.split_at(point as usize);
                    write!(f, "{}.{}", int, frac)
                } else {
                    write!(f, "0.{}{}", "0".repeat(-point as usize), digits)
                }
            }
        } else {
            if ndig == 1 {
                f.write_str(&digits)?;
            } else {
                let (head, tail) = digits.split_at(1);
                write!(f, "{}.{}", head, tail)?;
            }
            if adjusted < 0 {
                write!(f, "E-{}", -adjusted)
            } else {
                write!(f, "E+{}", adjusted)
            }
        }
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parts(s: &str) -> (bool, String, i32) {
        let d: Decimal = s.parse().unwrap();
        (d.is_negative(), d.coefficient().to_string(), d.exponent())
    }

    #[test]
    fn parse_plain() {
        assert_eq!(parts("0"), (false, "0".into(), 0));
        assert_eq!(parts("12"), (false, "12".into(), 0));
        assert_eq!(parts("-12"), (true, "12".into(), 0));
        assert_eq!(parts("1999.95"), (false, "199995".into(), -2));
        assert_eq!(parts(".5"), (false, "5".into(), -1));
        assert_eq!(parts("5."), (false, "5".into(), 0));
    }

    #[test]
    fn parse_scientific() {
        assert_eq!(parts("1e3"), (false, "1".into(), 3));
        assert_eq!(parts("1.5E-3"), (false, "15".into(), -4));
        assert_eq!(parts("-2.50e+2"), (true, "250".into(), 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        for case in ["", "-", ".", "e3", "1.2.3", "1e", "1e+", "0x1", "1_000", "Infinity", "NaN"] {
            assert!(case.parse::<Decimal>().is_err(), "{:?} should be rejected", case);
        }
    }

    #[test]
    fn trailing_zeros_are_preserved() {
        assert_eq!(parts("1.20"), (false, "120".into(), -2));
        assert_eq!(parts("1.2"), (false, "12".into(), -1));
        assert_eq!(parts("0.00"), (false, "0".into(), -2));
    }

    #[test]
    fn display_plain_and_scientific() {
        for case in ["0", "12", "-12", "1999.95", "1.20", "0.00", "0.000005"] {
            let d: Decimal = case.parse().unwrap();
            assert_eq!(d.to_string(), case, "literal should display unchanged");
        }
        let d: Decimal = "2e1".parse().unwrap();
        assert_eq!(d.to_string(), "2E+1");
        let d: Decimal = "1.5e-7".parse().unwrap();
        assert_eq!(d.to_string(), "1.5E-7");
        let d = Decimal::from_parts(false, BigUint::from(0u32), 1);
        assert_eq!(d.to_string(), "0E+1");
    }

    #[test]
    fn rounds_to_34_digits_half_even() {
        // 35 digits, remainder exactly half, even last kept digit: truncate.
        let d: Decimal = "12345678901234567890123456789012345".parse().unwrap();
        assert_eq!(
            d.coefficient().to_string(),
            "1234567890123456789012345678901234"
        );
        assert_eq!(d.exponent(), 1);

        // Odd last kept digit: round up.
        let d: Decimal = "12345678901234567890123456789012315".parse().unwrap();
        assert_eq!(
            d.coefficient().to_string(),
            "1234567890123456789012345678901232"
        );

        // All nines carries into an extra digit, which drops exactly.
        let d: Decimal = "99999999999999999999999999999999995".parse().unwrap();
        assert_eq!(
            d.coefficient().to_string(),
            format!("1{}", "0".repeat(33))
        );
        assert_eq!(d.exponent(), 2);
    }

    #[test]
    fn coefficient_bytes_empty_for_zero() {
        let d: Decimal = "0.00".parse().unwrap();
        assert!(d.coefficient_bytes().is_empty());
        let d: Decimal = "256".parse().unwrap();
        assert_eq!(d.coefficient_bytes(), vec![0x01, 0x00]);
    }

    #[test]
    fn negative_zero_keeps_sign() {
        let d: Decimal = "-0".parse().unwrap();
        assert!(d.is_negative());
        assert!(d.is_zero());
        assert_eq!(d.to_string(), "-0");
    }
}
