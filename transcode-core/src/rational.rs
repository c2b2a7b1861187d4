//! Rational number type for precise time and rate representation.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::Error;

/// A rational number represented as a numerator and denominator.
///
/// Used for precise representation of frame rates, frame durations and the
/// ratios between them. Arithmetic results are always reduced.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    /// Numerator
    pub num: i64,
    /// Denominator (must be positive)
    pub den: i64,
}

impl Rational {
    /// Create a new rational number.
    ///
    /// # Panics
    ///
    /// Panics if denominator is zero.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "Denominator cannot be zero");
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        Self { num, den }
    }

    /// Create a rational from an integer.
    pub fn from_int(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Create a zero rational.
    pub const fn zero() -> Self {
        Self { num: 0, den: 1 }
    }

    /// Create a rational representing one.
    pub const fn one() -> Self {
        Self { num: 1, den: 1 }
    }

    /// Check if this rational is positive.
    pub fn is_positive(&self) -> bool {
        self.num > 0
    }

    /// Reduce the rational to its simplest form.
    pub fn reduce(&self) -> Self {
        let (num, den) = reduce_wide(self.num as i128, self.den as i128);
        Self {
            num: num as i64,
            den: den as i64,
        }
    }

    /// Check if this rational is a whole number.
    pub fn is_integer(&self) -> bool {
        self.num % self.den == 0
    }

    /// Largest integer not greater than this value.
    pub fn floor(&self) -> i64 {
        self.num.div_euclid(self.den)
    }

    /// Round to the nearest integer, ties to the even neighbour.
    ///
    /// `5/2` rounds to 2, `7/2` rounds to 4 and `-1/2` rounds to 0.
    pub fn round_half_even(&self) -> i64 {
        let floor = self.floor();
        let twice_rem = 2 * (self.num as i128 - floor as i128 * self.den as i128);
        match twice_rem.cmp(&(self.den as i128)) {
            Ordering::Less => floor,
            Ordering::Greater => floor + 1,
            Ordering::Equal if floor % 2 == 0 => floor,
            Ordering::Equal => floor + 1,
        }
    }

    /// Get the reciprocal of this rational.
    ///
    /// # Panics
    ///
    /// Panics if the numerator is zero.
    pub fn recip(&self) -> Self {
        assert!(self.num != 0, "Cannot take reciprocal of zero");
        if self.num < 0 {
            Self::new(-self.den, -self.num)
        } else {
            Self::new(self.den, self.num)
        }
    }

    /// Multiply by an integer.
    ///
    /// # Panics
    ///
    /// Panics if the reduced product does not fit in `i64`.
    pub fn mul_int(&self, n: i64) -> Self {
        Self::from_wide(self.num as i128 * n as i128, self.den as i128)
    }

    /// Multiply by an integer, or `None` if the reduced product does not fit.
    pub fn checked_mul_int(&self, n: i64) -> Option<Self> {
        Self::try_from_wide(self.num as i128 * n as i128, self.den as i128)
    }

    /// Exact quotient `self / rhs` in lowest terms, before narrowing to `i64`.
    ///
    /// The denominator is non-negative and only zero when `rhs` is zero.
    pub fn wide_quotient(&self, rhs: &Self) -> (i128, i128) {
        reduce_wide(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }

    fn try_from_wide(num: i128, den: i128) -> Option<Self> {
        let (num, den) = reduce_wide(num, den);
        Some(Self {
            num: i64::try_from(num).ok()?,
            den: i64::try_from(den).ok()?,
        })
    }

    fn from_wide(num: i128, den: i128) -> Self {
        assert!(den != 0, "Denominator cannot be zero");
        match Self::try_from_wide(num, den) {
            Some(r) => r,
            None => panic!("Rational overflow: {}/{}", num, den),
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({}/{})", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        lhs.cmp(&rhs)
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let num = self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128;
        Self::from_wide(num, self.den as i128 * rhs.den as i128)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        let num = self.num as i128 * rhs.den as i128 - rhs.num as i128 * self.den as i128;
        Self::from_wide(num, self.den as i128 * rhs.den as i128)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_wide(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self::from_wide(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            num: -self.num,
            den: self.den,
        }
    }
}

impl FromStr for Rational {
    type Err = Error;

    /// Parse `"num/den"` or a bare integer such as `"25"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((num, den)) => (num.trim(), den.trim()),
            None => (s, "1"),
        };
        let num: i64 = num
            .parse()
            .map_err(|_| Error::invalid_param(format!("bad numerator in rational '{}'", s)))?;
        let den: i64 = den
            .parse()
            .map_err(|_| Error::invalid_param(format!("bad denominator in rational '{}'", s)))?;
        if den == 0 {
            return Err(Error::invalid_param(format!("zero denominator in rational '{}'", s)));
        }
        Ok(Self::new(num, den).reduce())
    }
}

/// Calculate the greatest common divisor using Euclidean algorithm.
fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Lowest terms with a non-negative denominator.
fn reduce_wide(num: i128, den: i128) -> (i128, i128) {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if num == 0 {
        return (0, if den == 0 { 0 } else { 1 });
    }
    let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
    (num / g, den / g)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_new() {
        let r = Rational::new(1, 2);
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn test_rational_negative_den() {
        let r = Rational::new(1, -2);
        assert_eq!(r.num, -1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn test_rational_reduce() {
        let r = Rational::new(4, 8).reduce();
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn test_rational_add() {
        let a = Rational::new(1, 2);
        let b = Rational::new(1, 3);
        let c = a + b;
        assert_eq!(c, Rational::new(5, 6));
    }

    #[test]
    fn test_rational_mul() {
        let a = Rational::new(2, 3);
        let b = Rational::new(3, 4);
        let c = a * b;
        assert_eq!(c, Rational::new(1, 2));
    }

    #[test]
    fn test_wide_arithmetic_does_not_overflow() {
        let max = Rational::new(i64::MAX, 1);
        assert_eq!(max / max, Rational::one());
        assert_eq!(
            Rational::new(i64::MAX, 3) * Rational::new(3, i64::MAX),
            Rational::one()
        );
        assert_eq!(max - max + Rational::one(), Rational::one());
        assert_eq!(Rational::new(i64::MAX, 2).mul_int(2), max);
    }

    #[test]
    fn test_checked_mul_int() {
        assert_eq!(
            Rational::new(5, 4).checked_mul_int(2),
            Some(Rational::new(5, 2))
        );
        assert_eq!(Rational::new(i64::MAX, 1).checked_mul_int(2), None);
    }

    #[test]
    fn test_wide_quotient() {
        let container = Rational::new(30000, 1001);
        assert_eq!(container.wide_quotient(&Rational::new(24000, 1001)), (5, 4));
        let (num, den) = container.wide_quotient(&Rational::new(1, i64::MAX));
        assert_eq!(den, 143);
        assert!(num > i64::MAX as i128);
    }

    #[test]
    #[should_panic(expected = "Rational overflow")]
    fn test_overflow_panics() {
        let _ = Rational::new(i64::MAX, 1) + Rational::new(i64::MAX, 1);
    }

    #[test]
    fn test_rational_ord() {
        let a = Rational::new(1, 2);
        let b = Rational::new(1, 3);
        assert!(a > b);
    }

    #[test]
    fn test_rational_div() {
        let container = Rational::new(30000, 1001);
        let clip = Rational::new(24000, 1001);
        assert_eq!(container / clip, Rational::new(5, 4));
    }

    #[test]
    fn test_rational_is_integer() {
        assert!(Rational::new(4, 2).is_integer());
        assert!(Rational::new(48, 1).is_integer());
        assert!(!Rational::new(3, 2).is_integer());
        assert!(Rational::zero().is_integer());
    }

    #[test]
    fn test_rational_floor() {
        assert_eq!(Rational::new(7, 2).floor(), 3);
        assert_eq!(Rational::new(-7, 2).floor(), -4);
        assert_eq!(Rational::new(6, 3).floor(), 2);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(Rational::new(5, 2).round_half_even(), 2);
        assert_eq!(Rational::new(7, 2).round_half_even(), 4);
        assert_eq!(Rational::new(1, 2).round_half_even(), 0);
        assert_eq!(Rational::new(-1, 2).round_half_even(), 0);
        assert_eq!(Rational::new(-3, 2).round_half_even(), -2);
        assert_eq!(Rational::new(25, 12).round_half_even(), 2);
        assert_eq!(Rational::new(30000, 1001).round_half_even(), 30);
        assert_eq!(Rational::new(11, 4).round_half_even(), 3);
    }

    #[test]
    fn test_rational_neg() {
        assert_eq!(-Rational::new(1, 3), Rational::new(-1, 3));
    }

    #[test]
    fn test_rational_from_str() {
        assert_eq!("30000/1001".parse::<Rational>().unwrap(), Rational::new(30000, 1001));
        assert_eq!("25".parse::<Rational>().unwrap(), Rational::new(25, 1));
        assert_eq!(" 48 / 2 ".parse::<Rational>().unwrap(), Rational::new(24, 1));
        assert!("24/0".parse::<Rational>().is_err());
        assert!("abc".parse::<Rational>().is_err());
        assert!("1/x".parse::<Rational>().is_err());
    }

    #[test]
    fn test_rational_display() {
        assert_eq!(Rational::new(24000, 1001).to_string(), "24000/1001");
        assert_eq!(Rational::new(25, 1).to_string(), "25");
    }
}
