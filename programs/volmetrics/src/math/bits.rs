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

/// Inputs below this use the linear scan, everything else the binary search.
pub const LINEAR_SCAN_LIMIT: u64 = 256;

/**
 * @dev Estimates the bit width of an unsigned integer, i.e. floor(log2(n)).
 *
 * Both implementations return the same value for every input they accept, the split only exists because the
 * linear scan is cheaper for tiny values and the binary search runs in a constant 8 steps for the rest.
 * Callers must not pass zero.
 */
pub trait BitWidth {
    fn floor_log2(n: U256) -> u8;
}

/// Shift right one bit at a time. At most 8 iterations for n < 256.
pub struct LinearScan;

impl BitWidth for LinearScan {
    fn floor_log2(mut n: U256) -> u8 {
        let mut res: u8 = 0;
        while n > U256::one() {
            n >>= 1u32;
            res += 1;
        }
        res
    }
}

/// Binary search over the bit positions 128, 64, ..., 1. Exactly 8 iterations.
pub struct BinarySearch;

impl BitWidth for BinarySearch {
    fn floor_log2(mut n: U256) -> u8 {
        let mut res: u8 = 0;
        let mut s: u32 = 128;
        while s > 0 {
            if n >= (U256::one() << s) {
                n >>= s;
                res |= s as u8;
            }
            s >>= 1;
        }
        res
    }
}

/**
 * @dev Returns the largest k such that 2^k <= n. Reverts with InvalidInput for n == 0.
 */
pub fn floor_log2(n: U256) -> Result<u8> {
    require!(!n.is_zero(), ErrorCode::InvalidInput);
    if n < U256::from(LINEAR_SCAN_LIMIT) {
        Ok(LinearScan::floor_log2(n))
    } else {
        Ok(BinarySearch::floor_log2(n))
    }
}
