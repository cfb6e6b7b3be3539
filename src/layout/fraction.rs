use std::cmp::Ordering;
use std::ops::{Add, Sub};

/// An exact rational number, always normalized (gcd 1, positive denominator).
///
/// The placement engine repeatedly rescales placements when a wider overlap
/// group subsumes a narrower one; floats would drift across those rescales,
/// so all width arithmetic stays rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    num: i64,
    den: i64,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// Create a normalized fraction. `den` must be nonzero.
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "fraction denominator must be nonzero");
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        let g = gcd(num.unsigned_abs(), den.unsigned_abs());
        if g <= 1 {
            Fraction { num, den }
        } else {
            Fraction {
                num: num / g as i64,
                den: den / g as i64,
            }
        }
    }

    pub fn num(&self) -> i64 {
        self.num
    }

    pub fn den(&self) -> i64 {
        self.den
    }

    /// Divide by a positive integer
    pub fn div(self, n: i64) -> Self {
        Fraction::new(self.num, self.den * n)
    }

    /// Largest integer `<=` this fraction
    pub fn floor(self) -> i64 {
        self.num.div_euclid(self.den)
    }

    /// Smallest integer `>=` this fraction
    pub fn ceil(self) -> i64 {
        -((-self.num).div_euclid(self.den))
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, rhs: Fraction) -> Fraction {
        Fraction::new(self.num * rhs.den + rhs.num * self.den, self.den * rhs.den)
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        Fraction::new(self.num * rhs.den - rhs.num * self.den, self.den * rhs.den)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplication preserves order
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        assert_eq!(Fraction::new(2, 4), Fraction::new(1, 2));
        assert_eq!(Fraction::new(6, 8), Fraction::new(3, 4));
        assert_eq!(Fraction::new(0, 5), Fraction::ZERO);
        assert_eq!(Fraction::new(3, -6), Fraction::new(-1, 2));
        assert_eq!(Fraction::new(5, 5), Fraction::ONE);
    }

    #[test]
    fn test_add_sub_exact() {
        let half = Fraction::new(1, 2);
        let third = Fraction::new(1, 3);
        assert_eq!(half + third, Fraction::new(5, 6));
        assert_eq!(Fraction::ONE - (half + third), Fraction::new(1, 6));
        assert_eq!(half - half, Fraction::ZERO);
    }

    #[test]
    fn test_div() {
        assert_eq!(Fraction::ONE.div(2), Fraction::new(1, 2));
        assert_eq!(Fraction::new(1, 2).div(2), Fraction::new(1, 4));
        assert_eq!(Fraction::new(3, 4).div(1), Fraction::new(3, 4));
        assert_eq!(Fraction::new(2, 3).div(2), Fraction::new(1, 3));
    }

    #[test]
    fn test_floor_ceil() {
        assert_eq!(Fraction::new(7, 2).floor(), 3);
        assert_eq!(Fraction::new(7, 2).ceil(), 4);
        assert_eq!(Fraction::new(6, 2).floor(), 3);
        assert_eq!(Fraction::new(6, 2).ceil(), 3);
        assert_eq!(Fraction::new(-1, 2).floor(), -1);
        assert_eq!(Fraction::new(-1, 2).ceil(), 0);
    }

    #[test]
    fn test_ordering() {
        assert!(Fraction::new(1, 3) < Fraction::new(1, 2));
        assert!(Fraction::new(5, 6) > Fraction::new(3, 4));
        assert!(Fraction::new(2, 4) == Fraction::new(1, 2));
        assert!(Fraction::new(-1, 6) < Fraction::ZERO);
    }

    #[test]
    fn test_no_drift_across_repeated_rescaling() {
        // 1 - 1/3 - 1/3 - 1/3 must be exactly zero
        let third = Fraction::ONE.div(3);
        let left = Fraction::ONE - third - third - third;
        assert_eq!(left, Fraction::ZERO);
    }
}
