use anchor_lang::prelude::*;
use primitive_types::U256;

use crate::error::ErrorCode;
use crate::math::I256;

/// 累计价格的定点精度（UQ112x112）
pub const PC_RESOLUTION: u32 = 112;

/// ln(1.0001) * 2^127，tick 价格的底数
pub const LN_TICK_BASE: U256 = U256([0x1630e3dfaf547287, 0x000346d1a0cb0000, 0, 0]);

/// 价格方向
/// Price0: price0 = token1 / token0（每个 base 能换多少 quote）
/// Price1: price1 = token0 / token1（每个 quote 能换多少 base）
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceDirection {
    Price0,
    Price1,
}

/// 一次累计价格观测（Uniswap v2 风格，两个方向各一个累加器）
/// 累计值按 U256 的小端 limb 存储，允许按 2^256 回绕
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    pub timestamp: i64,
    pub price0_cumulative: [u64; 4],
    pub price1_cumulative: [u64; 4],
}

impl Observation {
    pub fn new(timestamp: i64, price0_cumulative: U256, price1_cumulative: U256) -> Self {
        Observation {
            timestamp,
            price0_cumulative: price0_cumulative.0,
            price1_cumulative: price1_cumulative.0,
        }
    }

    pub fn cumulative(&self, direction: PriceDirection) -> U256 {
        match direction {
            PriceDirection::Price0 => U256(self.price0_cumulative),
            PriceDirection::Price1 => U256(self.price1_cumulative),
        }
    }
}

/// 一次 tick 累计观测（Uniswap v3 风格）
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickObservation {
    pub timestamp: i64,
    pub tick_cumulative: i64,
}

/**
 * @dev Rolling time weighted average prices over `window` consecutive observations, expressed as the amount of
 * the output token received for `amount_in` units of the input token.
 *
 * twap = (pc_last - pc_first) / (t_last - t_first) is a UQ112x112 price; the cumulative difference wraps like the
 * accumulator itself. Windows that produce a zero amount are skipped.
 */
pub fn twaps_from_cumulatives(
    observations: &[Observation],
    window: usize,
    amount_in: U256,
    direction: PriceDirection,
) -> Result<Vec<U256>> {
    require!(window >= 2, ErrorCode::InvalidInput);
    require!(observations.len() >= window, ErrorCode::InsufficientSamples);

    let mut amounts = Vec::with_capacity(observations.len() - window + 1);
    for range in observations.windows(window) {
        let first = &range[0];
        let last = &range[window - 1];
        require!(last.timestamp > first.timestamp, ErrorCode::InvalidInput);

        let elapsed = last
            .timestamp
            .checked_sub(first.timestamp)
            .ok_or(ErrorCode::MathOverflow)?;
        let (delta, _) = last
            .cumulative(direction)
            .overflowing_sub(first.cumulative(direction));
        let twap = delta / U256::from(elapsed as u64);

        let amount_out = U256::try_from(twap.full_mul(amount_in) >> PC_RESOLUTION)
            .map_err(|_| ErrorCode::MathOverflow)?;
        if !amount_out.is_zero() {
            amounts.push(amount_out);
        }
    }
    Ok(amounts)
}

/**
 * @dev Log TWAPs ln(1.0001^(dtick / dt)) from tick cumulatives, as signed fixed point values.
 *
 * Observations are taken every `period` seconds but may arrive irregularly. For each observation the lookback
 * (1 to 2 * (window + 1) rows back) whose elapsed time is closest to `window * period` seconds is used; the
 * first observations without a full lookback are skipped, and so is any window whose elapsed time is not
 * positive or misses the target by more than `tolerance` seconds. Price1 inverts the price, which negates the log.
 *
 * The result stays in log space: a tick average of 200000 is e^20, outside the exponential's domain, while the
 * estimator only needs differences of logs.
 */
pub fn log_twaps_from_tick_cumulatives(
    observations: &[TickObservation],
    period: u64,
    window: u64,
    tolerance: u64,
    direction: PriceDirection,
) -> Result<Vec<I256>> {
    require!(period > 0 && window > 0, ErrorCode::InvalidInput);
    let target = window.checked_mul(period).ok_or(ErrorCode::MathOverflow)?;
    let max_lookback = window
        .checked_add(1)
        .and_then(|w| w.checked_mul(2))
        .ok_or(ErrorCode::MathOverflow)? as usize;
    require!(observations.len() > max_lookback, ErrorCode::InsufficientSamples);

    let mut log_twaps = Vec::with_capacity(observations.len() - max_lookback);
    for j in max_lookback..observations.len() {
        let current = &observations[j];

        // lookback whose elapsed time is closest to the target, first one on ties
        let mut best: Option<(i64, u128)> = None;
        let mut best_lookback = 1;
        for lookback in 1..=max_lookback {
            let dt = current
                .timestamp
                .checked_sub(observations[j - lookback].timestamp)
                .ok_or(ErrorCode::MathOverflow)?;
            let miss = (dt as i128 - target as i128).unsigned_abs();
            if best.map_or(true, |(_, best_miss)| miss < best_miss) {
                best = Some((dt, miss));
                best_lookback = lookback;
            }
        }
        let (dt, miss) = match best {
            Some(found) => found,
            None => continue,
        };
        if dt <= 0 || miss > tolerance as u128 {
            continue;
        }

        let dtick = current
            .tick_cumulative
            .checked_sub(observations[j - best_lookback].tick_cumulative)
            .ok_or(ErrorCode::MathOverflow)?;
        let log_twap = I256::from(dtick)
            .checked_mul_u256(LN_TICK_BASE)?
            .checked_div_u256(U256::from(dt as u64))?;
        log_twaps.push(match direction {
            PriceDirection::Price0 => log_twap,
            PriceDirection::Price1 => log_twap.checked_neg()?,
        });
    }
    Ok(log_twaps)
}
