// SPDX-License-Identifier: MIT
// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the
// Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE
// WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR
// OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use anchor_lang::prelude::*;
use primitive_types::U256;

use crate::error::ErrorCode;
use super::bits::floor_log2;
use super::i256::I256;

/**
 * @dev Natural logarithm and exponentiation for unsigned binary fixed point numbers.
 *
 * A fixed point value v represents the real number v / FIXED_1 with FIXED_1 = 2^127. The scale is tied to the
 * 127 fractional bits extracted by the logarithm (squaring a value in [1, 2) must fit in 256 bits) and to the
 * correction constants of the exponential, whose products with the running result are sized for it.
 *
 * ln works on log2 first: the integer part comes from a bit width estimate, the fractional part from repeated
 * squaring. The result is converted to base e with a 10 decimal approximation of ln(2).
 *
 * optimal_exp reduces x modulo 2^-3, evaluates a degree 20 Taylor polynomial on the remainder and then multiplies
 * in e^(2^k) for every bit k in [-3, 3] present in x.
 */
pub struct LogExpMath;

// 1.0 = 2^127
pub const FIXED_1: U256 = U256([0, 0x8000000000000000, 0, 0]);
// 2.0 = 2^128
pub const FIXED_2: U256 = U256([0, 0, 1, 0]);

// Number of fractional bits extracted by the logarithm.
pub const MAX_PRECISION: u8 = 127;

// ln(2) and log10(2) scaled by BASE
pub const BASE: U256 = U256([10_000_000_000, 0, 0, 0]);
pub const LOG_E_2: U256 = U256([6_931_471_806, 0, 0, 0]);
pub const LOG_10_2: U256 = U256([3_010_299_957, 0, 0, 0]);

// optimal_exp is defined for x < 16.0 = 2^131
pub const OPT_EXP_MAX_VAL: U256 = U256([0, 0, 8, 0]);

// 2^-3 = 2^124, the lowest bit handled by the correction table
const EXP_REMAINDER_MODULUS: U256 = U256([0, 0x1000000000000000, 0, 0]);
const EXP_FIRST_CORRECTION_BIT: u32 = 124;

// 20!
const FACTORIAL_20: U256 = U256([0x21c3677c82b40000, 0, 0, 0]);

// 20! / k! for k = 2..=20
const TAYLOR_COEFFICIENTS: [u64; 19] = [
    0x10e1b3be415a0000, // 20! / 02!
    0x05a0913f6b1e0000, // 20! / 03!
    0x0168244fdac78000, // 20! / 04!
    0x004807432bc18000, // 20! / 05!
    0x000c0135dca04000, // 20! / 06!
    0x0001b707b1cdc000, // 20! / 07!
    0x000036e0f639b800, // 20! / 08!
    0x00000618fee9f800, // 20! / 09!
    0x0000009c197dcc00, // 20! / 10!
    0x0000000e30dce400, // 20! / 11!
    0x000000012ebd1300, // 20! / 12!
    0x0000000017499f00, // 20! / 13!
    0x0000000001a9d480, // 20! / 14!
    0x00000000001c6380, // 20! / 15!
    0x000000000001c638, // 20! / 16!
    0x0000000000001ab8, // 20! / 17!
    0x000000000000017c, // 20! / 18!
    0x0000000000000014, // 20! / 19!
    0x0000000000000001, // 20! / 20!
];

// (numerator, denominator) with numerator / denominator = e^(2^k), k = -3..=3
const EXP_CORRECTIONS: [(U256, U256); 7] = [
    // e^(2^-3)
    (
        U256([0x7d624d3e5eba95f9, 0xc3d6a24ed8221878, 0x1, 0]),
        U256([0x82b9793ac6d1e776, 0x8ebef9eac820ae86, 0x1, 0]),
    ),
    // e^(2^-2)
    (
        U256([0x82b9793ac6d1e778, 0x8ebef9eac820ae86, 0x1, 0]),
        U256([0xaceb46aa619baed4, 0x368b2fc6f9609fe7, 0x1, 0]),
    ),
    // e^(2^-1)
    (
        U256([0xaceb46aa619baed5, 0x368b2fc6f9609fe7, 0x1, 0]),
        U256([0x75bd8f0520a9f21f, 0xbc5ab1b16779be35, 0, 0]),
    ),
    // e^(2^0)
    (
        U256([0x75bd8f0520a9f21e, 0xbc5ab1b16779be35, 0, 0]),
        U256([0x6ddbab84b40a55c9, 0x454aaa8efe072e7f, 0, 0]),
    ),
    // e^(2^1)
    (
        U256([0x6ddbab84b40a55c5, 0x454aaa8efe072e7f, 0, 0]),
        U256([0xf4578099615711ea, 0x0960aadc109e7a3b, 0, 0]),
    ),
    // e^(2^2)
    (
        U256([0xf4578099615711d7, 0x0960aadc109e7a3b, 0, 0]),
        U256([0x77f9a8cf01fdce3d, 0x002bf84208204f59, 0, 0]),
    ),
    // e^(2^3)
    (
        U256([0x77f9a8cf01fdc307, 0x002bf84208204f59, 0, 0]),
        U256([0xb95b4cbee7e65d11, 0x000003c6ab775dd0, 0, 0]),
    ),
];

impl LogExpMath {
    /**
     * @dev Natural logarithm, floor(ln(x / FIXED_1) * FIXED_1).
     *
     * Reverts with InvalidInput for x == 0 and NegativeLogarithm for x < FIXED_1, whose logarithm is negative.
     * Use ln_signed for arguments below one.
     */
    pub fn ln(x: U256) -> Result<U256> {
        require!(!x.is_zero(), ErrorCode::InvalidInput);
        require!(x >= FIXED_1, ErrorCode::NegativeLogarithm);
        let log2 = Self::log2(x)?;
        Self::scale_log2(log2, LOG_E_2)
    }

    /**
     * @dev Base 10 logarithm, same domain as ln.
     */
    pub fn log10(x: U256) -> Result<U256> {
        require!(!x.is_zero(), ErrorCode::InvalidInput);
        require!(x >= FIXED_1, ErrorCode::NegativeLogarithm);
        let log2 = Self::log2(x)?;
        Self::scale_log2(log2, LOG_10_2)
    }

    /**
     * @dev Natural logarithm for any positive argument. Below one, ln(x) = -ln(1 / x).
     */
    pub fn ln_signed(x: U256) -> Result<I256> {
        require!(!x.is_zero(), ErrorCode::InvalidInput);
        if x >= FIXED_1 {
            I256::try_from(Self::ln(x)?)
        } else {
            // FIXED_1^2 = 2^254 fits, and 1 / x >= 1 for x < FIXED_1
            let inverse = (FIXED_1 * FIXED_1) / x;
            I256::try_from(Self::ln(inverse)?)?.checked_neg()
        }
    }

    /**
     * @dev Natural exponentiation, floor(e^(x / FIXED_1) * FIXED_1), for 0 <= x < OPT_EXP_MAX_VAL.
     */
    pub fn optimal_exp(x: U256) -> Result<U256> {
        require!(x < OPT_EXP_MAX_VAL, ErrorCode::InvalidInput);

        // Taylor expansion of e^y for the part of x below 2^-3:
        // e^y = 1 + y + sum(y^k * (20! / k!), k = 2..=20) / 20!
        let y = x % EXP_REMAINDER_MODULUS;
        let mut z = y;
        let mut res = U256::zero();
        for coefficient in TAYLOR_COEFFICIENTS.iter() {
            z = (z * y) / FIXED_1;
            res += z * U256::from(*coefficient);
        }
        res = res / FACTORIAL_20 + y + FIXED_1;

        // multiply by e^(2^k) for every remaining bit of x
        for (i, (numerator, denominator)) in EXP_CORRECTIONS.iter().enumerate() {
            let bit = U256::one() << (EXP_FIRST_CORRECTION_BIT + i as u32);
            if !(x & bit).is_zero() {
                res = res.checked_mul(*numerator).ok_or(ErrorCode::MathOverflow)? / *denominator;
            }
        }

        Ok(res)
    }

    /**
     * @dev Natural exponentiation for a signed exponent. Negative exponents are computed as 1 / e^(-x), both sides
     * bounded by OPT_EXP_MAX_VAL in magnitude.
     */
    pub fn exp_signed(x: I256) -> Result<U256> {
        if x.is_negative() {
            let positive = Self::optimal_exp(x.abs())?;
            Ok((FIXED_1 * FIXED_1) / positive)
        } else {
            Self::optimal_exp(x.to_u256()?)
        }
    }

    /**
     * @dev log2(x) in fixed point for x >= FIXED_1.
     */
    fn log2(mut x: U256) -> Result<U256> {
        let mut res = U256::zero();

        // integer part: bring x into [1, 2). floor_log2 yields the whole shift at once, so no loop is needed
        if x >= FIXED_2 {
            let count = floor_log2(x / FIXED_1)?;
            x >>= count as u32;
            res = U256::from(count) * FIXED_1;
        }

        // fractional part: each squaring doubles log2(x), a carry past 2 yields the next bit
        if x > FIXED_1 {
            let mut i = MAX_PRECISION;
            while i > 0 {
                x = (x * x) / FIXED_1;
                if x >= FIXED_2 {
                    x >>= 1u32;
                    res += U256::one() << (i - 1) as u32;
                }
                i -= 1;
            }
        }

        Ok(res)
    }

    fn scale_log2(log2: U256, factor: U256) -> Result<U256> {
        let scaled = log2.checked_mul(factor).ok_or(ErrorCode::MathOverflow)?;
        Ok(scaled / BASE)
    }
}
