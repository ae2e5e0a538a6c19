use anchor_lang::prelude::*;
use primitive_types::U256;

use crate::error::ErrorCode;
use crate::math::logexpmath::BASE;
use crate::math::{FixedPoint, LogExpMath, Math, FIXED_1, I256, OPT_EXP_MAX_VAL};

/// Psi^-1(1 - alpha) for alpha = 5%, 1%, 0.1%, 0.01%，10 位小数
pub const DEFAULT_QUANTILES: [i64; 4] = [16_448_536_270, 23_263_478_740, 30_902_323_062, 37_190_164_855];

/// 向后看的周期数：以 10 分钟为周期时约为 1 天、7 天、14 天、30 天
pub const DEFAULT_HORIZONS: [u64; 4] = [144, 1008, 2016, 4320];

/**
 * @dev Converts a normal quantile given with 10 decimals (e.g. 16448536270 for Psi^-1(0.95)) to fixed point.
 */
pub fn quantile_from_decimal(quantile: i64) -> Result<I256> {
    let magnitude = FixedPoint::from_ratio(U256::from(quantile.unsigned_abs()), BASE)?;
    I256::from_magnitude(magnitude, quantile < 0)
}

/**
 * @dev Value-at-risk bracket e^(mu * n * t + sigma * sqrt(n * t) * z) - 1.
 *
 * `drift` and `sig_sqrd` are per second, `period` is t in seconds and `periods` the number of periods n ahead.
 * `quantile` is z = Psi^-1(1 - alpha), supplied by the caller. Reverts with MathOverflow when the exponent leaves
 * (-16, 16).
 */
pub fn value_at_risk(
    drift: I256,
    sig_sqrd: U256,
    period: u64,
    periods: u64,
    quantile: I256,
) -> Result<I256> {
    require!(period > 0 && periods > 0, ErrorCode::InvalidInput);
    let horizon = Math::mul(U256::from(period), U256::from(periods))?;

    let drift_term = drift.checked_mul_u256(horizon)?;

    // sigma * sqrt(n * t) = sqrt(sigma^2 * n * t)
    let horizon_sigma = FixedPoint::sqrt(Math::mul(sig_sqrd, horizon)?)?;
    let shock = FixedPoint::mul_down(horizon_sigma, quantile.abs())?;
    let shock_term = I256::from_magnitude(shock, quantile.is_negative())?;

    let exponent = drift_term.checked_add(&shock_term)?;
    require!(exponent.abs() < OPT_EXP_MAX_VAL, ErrorCode::MathOverflow);

    let growth = I256::try_from(LogExpMath::exp_signed(exponent)?)?;
    growth.checked_sub(&I256::try_from(FIXED_1)?)
}

/**
 * @dev Value-at-risk brackets for every horizon in `periods` (rows) and every quantile (columns).
 */
pub fn value_at_risk_grid(
    drift: I256,
    sig_sqrd: U256,
    period: u64,
    periods: &[u64],
    quantiles: &[I256],
) -> Result<Vec<Vec<I256>>> {
    require!(!periods.is_empty() && !quantiles.is_empty(), ErrorCode::InvalidInput);
    let mut grid = Vec::with_capacity(periods.len());
    for n in periods.iter() {
        let mut row = Vec::with_capacity(quantiles.len());
        for z in quantiles.iter() {
            row.push(value_at_risk(drift, sig_sqrd, period, *n, *z)?);
        }
        grid.push(row);
    }
    Ok(grid)
}
