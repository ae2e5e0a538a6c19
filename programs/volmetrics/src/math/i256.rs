// SPDX-License-Identifier: MIT

use anchor_lang::prelude::*;
use primitive_types::U256;

use crate::error::ErrorCode;

use core::cmp::Ordering;
use core::convert::TryFrom;
use core::fmt;
use core::ops::{Add, Neg, Sub};

/**
 * @dev A 256-bit signed integer stored as two's complement in a U256.
 *
 * Log returns, drift and value-at-risk can all be negative while the math kernel is unsigned, so the estimators
 * carry their intermediate values in this type. The checked_* methods are the ones used by program code; the
 * operator impls panic on overflow and are meant for tests and constants.
 *
 * Range: -2^255 to 2^255 - 1
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I256 {
    /// Internal storage as unsigned 256-bit integer (two's complement)
    pub value: U256,
}

const SIGN_BIT: U256 = U256([0, 0, 0, 0x8000000000000000]);

impl I256 {
    pub const ZERO: I256 = I256 {
        value: U256([0, 0, 0, 0]),
    };

    /// -2^255
    pub const MIN: I256 = I256 { value: SIGN_BIT };

    /// 2^255 - 1
    pub const MAX: I256 = I256 {
        value: U256([0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0x7FFFFFFFFFFFFFFF]),
    };

    /// Little-endian limbs, the layout used for account storage.
    pub fn from_limbs(limbs: [u64; 4]) -> Self {
        I256 { value: U256(limbs) }
    }

    pub fn to_limbs(&self) -> [u64; 4] {
        self.value.0
    }

    /**
     * @dev Builds a value from a magnitude and a sign. Reverts if the magnitude does not fit.
     */
    pub fn from_magnitude(magnitude: U256, negative: bool) -> Result<Self> {
        let positive = I256::try_from(magnitude).or_else(|err| {
            // -2^255 has no positive counterpart
            if negative && magnitude == SIGN_BIT {
                Ok(Self::MIN)
            } else {
                Err(err)
            }
        })?;
        if negative && positive != Self::MIN {
            positive.checked_neg()
        } else {
            Ok(positive)
        }
    }

    pub fn is_negative(&self) -> bool {
        self.value >= SIGN_BIT
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /**
     * @dev Returns the magnitude. Total, since |MIN| = 2^255 fits in a U256.
     */
    pub fn abs(&self) -> U256 {
        if self.is_negative() {
            (!self.value).overflowing_add(U256::one()).0
        } else {
            self.value
        }
    }

    pub fn checked_neg(&self) -> Result<Self> {
        require!(self.value != Self::MIN.value, ErrorCode::MathOverflow);
        Ok(I256 {
            value: (!self.value).overflowing_add(U256::one()).0,
        })
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        let (sum, _) = self.value.overflowing_add(other.value);
        let result = I256 { value: sum };
        // overflow iff both operands share a sign that the result does not
        let self_neg = self.is_negative();
        require!(
            self_neg != other.is_negative() || result.is_negative() == self_neg,
            ErrorCode::MathOverflow
        );
        Ok(result)
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        let (diff, _) = self.value.overflowing_sub(other.value);
        let result = I256 { value: diff };
        let self_neg = self.is_negative();
        require!(
            self_neg == other.is_negative() || result.is_negative() == self_neg,
            ErrorCode::MathOverflow
        );
        Ok(result)
    }

    /**
     * @dev Multiplies by an unsigned plain integer.
     */
    pub fn checked_mul_u256(&self, factor: U256) -> Result<Self> {
        let magnitude = self.abs().checked_mul(factor).ok_or(ErrorCode::MathOverflow)?;
        Self::from_magnitude(magnitude, self.is_negative())
    }

    /**
     * @dev Divides by an unsigned plain integer, truncating toward zero.
     */
    pub fn checked_div_u256(&self, divisor: U256) -> Result<Self> {
        require!(!divisor.is_zero(), ErrorCode::MathOverflow);
        Self::from_magnitude(self.abs() / divisor, self.is_negative())
    }

    /**
     * @dev Converts to U256, reverting for negative values.
     */
    pub fn to_u256(&self) -> Result<U256> {
        require!(!self.is_negative(), ErrorCode::MathOverflow);
        Ok(self.value)
    }
}

impl Default for I256 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Neg for I256 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        if self.value == Self::MIN.value {
            panic!("I256: negation overflow");
        }
        I256 {
            value: (!self.value).overflowing_add(U256::one()).0,
        }
    }
}

impl Add for I256 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        match self.checked_add(&other) {
            Ok(v) => v,
            Err(_) => panic!("I256: addition overflow"),
        }
    }
}

impl Sub for I256 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        match self.checked_sub(&other) {
            Ok(v) => v,
            Err(_) => panic!("I256: subtraction overflow"),
        }
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        let magnitude = U256::from(value.unsigned_abs());
        if value < 0 {
            I256 {
                value: (!magnitude).overflowing_add(U256::one()).0,
            }
        } else {
            I256 { value: magnitude }
        }
    }
}

impl TryFrom<U256> for I256 {
    type Error = anchor_lang::error::Error;

    fn try_from(value: U256) -> Result<Self> {
        require!(value < SIGN_BIT, ErrorCode::MathOverflow);
        Ok(I256 { value })
    }
}

impl PartialOrd for I256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for I256 {
    fn cmp(&self, other: &Self) -> Ordering {
        // flipping the sign bit maps two's complement order onto unsigned order
        (self.value ^ SIGN_BIT).cmp(&(other.value ^ SIGN_BIT))
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.abs())
        } else {
            write!(f, "{}", self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_i64() {
        assert_eq!(I256::from(0i64), I256::ZERO);
        assert_eq!(I256::from(-1i64).value, U256::MAX);
        assert_eq!(I256::from(42i64).value, U256::from(42u64));
        assert_eq!(I256::from(i64::MIN).abs(), U256::from(1u64 << 63));
    }

    #[test]
    fn test_add_sub() {
        let a = I256::from(100i64);
        let b = I256::from(-250i64);
        assert_eq!(a + b, I256::from(-150i64));
        assert_eq!(a - b, I256::from(350i64));
        assert_eq!(b - a, I256::from(-350i64));
        assert_eq!(b + (-b), I256::ZERO);
    }

    #[test]
    fn test_checked_overflow() {
        assert!(I256::MAX.checked_add(&I256::from(1i64)).is_err());
        assert!(I256::MIN.checked_sub(&I256::from(1i64)).is_err());
        assert!(I256::MIN.checked_neg().is_err());
        assert!(I256::MAX.checked_sub(&I256::from(-1i64)).is_err());
        assert!(I256::MIN.checked_add(&I256::from(-1i64)).is_err());
        assert_eq!(I256::MAX.checked_add(&I256::MIN).unwrap(), I256::from(-1i64));
    }

    #[test]
    #[should_panic(expected = "I256: negation overflow")]
    fn test_neg_overflow() {
        let _ = -I256::MIN;
    }

    #[test]
    fn test_mul_div_u256() {
        let a = I256::from(-7i64);
        assert_eq!(a.checked_mul_u256(U256::from(3u64)).unwrap(), I256::from(-21i64));
        // truncates toward zero
        assert_eq!(a.checked_div_u256(U256::from(2u64)).unwrap(), I256::from(-3i64));
        assert_eq!(I256::from(7i64).checked_div_u256(U256::from(2u64)).unwrap(), I256::from(3i64));
        assert!(a.checked_div_u256(U256::zero()).is_err());
        assert!(I256::MAX.checked_mul_u256(U256::from(2u64)).is_err());
    }

    #[test]
    fn test_from_magnitude() {
        assert_eq!(I256::from_magnitude(U256::from(5u64), true).unwrap(), I256::from(-5i64));
        assert_eq!(I256::from_magnitude(U256::from(5u64), false).unwrap(), I256::from(5i64));
        assert_eq!(I256::from_magnitude(SIGN_BIT, true).unwrap(), I256::MIN);
        assert!(I256::from_magnitude(SIGN_BIT, false).is_err());
        assert!(I256::from_magnitude(U256::MAX, true).is_err());
    }

    #[test]
    fn test_ordering() {
        let mut values = vec![
            I256::from(3i64),
            I256::MIN,
            I256::from(-3i64),
            I256::MAX,
            I256::ZERO,
        ];
        values.sort();
        assert_eq!(
            values,
            vec![I256::MIN, I256::from(-3i64), I256::ZERO, I256::from(3i64), I256::MAX]
        );
    }

    #[test]
    fn test_limbs_and_display() {
        let v = I256::from(-12345i64);
        assert_eq!(I256::from_limbs(v.to_limbs()), v);
        assert_eq!(format!("{}", v), "-12345");
        assert_eq!(format!("{}", I256::from(678i64)), "678");
        assert_eq!(v.abs(), U256::from(12345u64));
        assert!(v.to_u256().is_err());
    }
}
