// SPDX-License-Identifier: MIT

use anchor_lang::prelude::*;
use primitive_types::{U256, U512};

use crate::error::ErrorCode;

/**
 * @dev Checked integer arithmetic over U256 plus the integer square root.
 */
pub struct Math;

impl Math {
    pub fn add(a: U256, b: U256) -> Result<U256> {
        Ok(a.checked_add(b).ok_or(ErrorCode::MathOverflow)?)
    }

    pub fn mul(a: U256, b: U256) -> Result<U256> {
        Ok(a.checked_mul(b).ok_or(ErrorCode::MathOverflow)?)
    }

    pub fn div_down(a: U256, b: U256) -> Result<U256> {
        require!(!b.is_zero(), ErrorCode::MathOverflow);
        Ok(a / b)
    }

    /**
     * @dev Returns floor(sqrt(x)) using the Babylonian method.
     *
     * Starts from z = (x + 1) / 2 and iterates z = (x / z + z) / 2 while the estimate keeps decreasing. The
     * sequence is non-increasing once above the root, so integer division forces termination. The start value is
     * computed as (x >> 1) + (x & 1) so that x = U256::MAX does not wrap.
     */
    pub fn sqrt(x: U256) -> U256 {
        let mut z = (x >> 1u32) + (x & U256::one());
        let mut y = x;
        while z < y {
            y = z;
            z = (x / z + z) >> 1u32;
        }
        y
    }

    /**
     * @dev floor(sqrt(x)) of a 512-bit value. The root always fits in 256 bits.
     *
     * Starts from 2^ceil(bits / 2), which is never below the root, so the same decreasing iteration applies and
     * converges in a few steps instead of halving down from x / 2.
     */
    pub fn sqrt_512(x: U512) -> Result<U256> {
        if x.is_zero() {
            return Ok(U256::zero());
        }
        let mut y = U512::one() << ((x.bits() + 1) / 2);
        loop {
            let z = (x / y + y) >> 1u32;
            if z >= y {
                break;
            }
            y = z;
        }
        U256::try_from(y).map_err(|_| ErrorCode::MathOverflow.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_floor(x: U256) {
        let r = Math::sqrt(x);
        assert!(r.full_mul(r) <= x.full_mul(U256::one()), "sqrt({})^2 > x", x);
        let next = r + U256::one();
        assert!(next.full_mul(next) > x.full_mul(U256::one()), "(sqrt({}) + 1)^2 <= x", x);
    }

    #[test]
    fn test_sqrt_small() {
        assert_eq!(Math::sqrt(U256::zero()), U256::zero());
        assert_eq!(Math::sqrt(U256::one()), U256::one());
        assert_eq!(Math::sqrt(U256::from(2u64)), U256::one());
        assert_eq!(Math::sqrt(U256::from(3u64)), U256::one());
        assert_eq!(Math::sqrt(U256::from(4u64)), U256::from(2u64));
        assert_eq!(Math::sqrt(U256::from(99u64)), U256::from(9u64));
        assert_eq!(Math::sqrt(U256::from(100u64)), U256::from(10u64));
    }

    #[test]
    fn test_sqrt_floor_property() {
        for v in 0u64..2000 {
            check_floor(U256::from(v));
        }
        let mut x = U256::from(0x2545f4914f6cdd1du64);
        for _ in 0..100 {
            check_floor(x);
            x = x.overflowing_mul(U256::from(0x9e3779b97f4a7c15u64)).0;
        }
    }

    #[test]
    fn test_sqrt_perfect_squares() {
        let root = U256::from(u128::MAX);
        assert_eq!(Math::sqrt(root * root), root);
        assert_eq!(Math::sqrt(root * root - U256::one()), root - U256::one());
    }

    #[test]
    fn test_sqrt_max() {
        // floor(sqrt(2^256 - 1)) = 2^128 - 1
        assert_eq!(Math::sqrt(U256::MAX), U256::from(u128::MAX));
        check_floor(U256::MAX);
    }

    #[test]
    fn test_sqrt_512() {
        assert_eq!(Math::sqrt_512(U512::zero()).unwrap(), U256::zero());
        assert_eq!(Math::sqrt_512(U512::one()).unwrap(), U256::one());
        assert_eq!(Math::sqrt_512(U512::from(99u64)).unwrap(), U256::from(9u64));
        // agrees with the 256-bit root wherever both apply
        let mut x = U256::from(0x2545f4914f6cdd1du64);
        for _ in 0..100 {
            assert_eq!(Math::sqrt_512(x.full_mul(U256::one())).unwrap(), Math::sqrt(x));
            x = x.overflowing_mul(U256::from(0x9e3779b97f4a7c15u64)).0;
        }
        // (2^256 - 1)^2 and 2^512 - 1
        assert_eq!(Math::sqrt_512(U256::MAX.full_mul(U256::MAX)).unwrap(), U256::MAX);
        assert_eq!(Math::sqrt_512(U512::MAX).unwrap(), U256::MAX);
        let root = U256::from(3u64) << 200u32;
        let square = root.full_mul(root);
        assert_eq!(Math::sqrt_512(square - U512::one()).unwrap(), root - U256::one());
    }

    #[test]
    fn test_checked_helpers() {
        assert_eq!(Math::add(U256::one(), U256::one()).unwrap(), U256::from(2u64));
        assert!(Math::add(U256::MAX, U256::one()).is_err());
        assert!(Math::mul(U256::MAX, U256::from(2u64)).is_err());
        assert!(Math::div_down(U256::one(), U256::zero()).is_err());
        assert_eq!(Math::div_down(U256::from(7u64), U256::from(2u64)).unwrap(), U256::from(3u64));
    }
}
