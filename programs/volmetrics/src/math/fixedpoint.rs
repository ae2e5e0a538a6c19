// SPDX-License-Identifier: MIT

use anchor_lang::prelude::*;
use primitive_types::{U256, U512};

use crate::error::ErrorCode;
use super::logexpmath::FIXED_1;
use super::math::Math;

/**
 * @dev Multiplication and division of binary fixed point values (scale FIXED_1 = 2^127).
 *
 * Products are formed in 512 bits before rescaling, so two in-range operands never wrap; only a result that
 * does not fit back into 256 bits reverts.
 */
pub struct FixedPoint;

impl FixedPoint {
    pub const ONE: U256 = FIXED_1;

    pub fn mul_down(a: U256, b: U256) -> Result<U256> {
        let product = a.full_mul(b) >> 127u32;
        Self::narrow(product)
    }

    pub fn div_down(a: U256, b: U256) -> Result<U256> {
        require!(!b.is_zero(), ErrorCode::MathOverflow);
        let inflated = a.full_mul(Self::ONE);
        Self::narrow(inflated / U512::from(b))
    }

    /**
     * @dev numerator / denominator as a fixed point value, both arguments plain integers.
     */
    pub fn from_ratio(numerator: U256, denominator: U256) -> Result<U256> {
        Self::div_down(numerator, denominator)
    }

    /**
     * @dev Converts a decimal fixed point value with `decimals` digits into binary fixed point.
     */
    pub fn from_decimal(value: U256, decimals: u8) -> Result<U256> {
        let scale = U256::from(10u64).checked_pow(U256::from(decimals)).ok_or(ErrorCode::MathOverflow)?;
        Self::div_down(value, scale)
    }

    /**
     * @dev Square root of a fixed point value: sqrt(x * FIXED_1), with the product formed in 512 bits. Total over
     * U256.
     */
    pub fn sqrt(x: U256) -> Result<U256> {
        Math::sqrt_512(x.full_mul(Self::ONE))
    }

    fn narrow(value: U512) -> Result<U256> {
        U256::try_from(value).map_err(|_| ErrorCode::MathOverflow.into())
    }
}

/// Converts a fixed point value to f64, for comparing against float references in tests.
#[cfg(test)]
pub fn to_f64(v: U256) -> f64 {
    let mut acc = 0f64;
    for (i, limb) in v.0.iter().enumerate() {
        acc += (*limb as f64) * 2f64.powi(64 * i as i32);
    }
    acc / 2f64.powi(127)
}

/// Converts a non-negative f64 to fixed point. Exact for every f64 that is representable at the 2^127 scale.
#[cfg(test)]
pub fn from_f64(v: f64) -> U256 {
    assert!(v >= 0.0 && v.is_finite());
    if v == 0.0 {
        return U256::zero();
    }
    let bits = v.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    // v = mantissa * 2^(exponent - 1075), fixed point adds 127
    let shift = exponent - 1075 + 127;
    if shift >= 0 {
        U256::from(mantissa) << shift as u32
    } else {
        U256::from(mantissa) >> (-shift) as u32
    }
}
