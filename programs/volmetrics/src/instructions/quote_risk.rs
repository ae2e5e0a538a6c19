use anchor_lang::prelude::*;
use crate::state::Market;
use crate::error::ErrorCode;
use crate::math::I256;
use crate::stats::{quantile_from_decimal, value_at_risk_grid, DEFAULT_HORIZONS, DEFAULT_QUANTILES};

/// 根据已存储的估计结果计算 VaR
#[derive(Accounts)]
pub struct QuoteValueAtRisk<'info> {
    pub market: AccountLoader<'info, Market>,
}

/// 对每个 (n, z) 计算 e^(mu*n*t + sigma*sqrt(n*t)*z) - 1 并输出到日志
/// periods: 向后看的周期数 n，为空时使用 DEFAULT_HORIZONS
/// quantiles: 正态分位数 z = Psi^-1(1 - alpha)，10 位小数（例如 alpha = 5% 时为 16448536270），为空时使用
/// DEFAULT_QUANTILES
pub fn quote_value_at_risk(
    ctx: Context<QuoteValueAtRisk>,
    periods: Vec<u64>,
    quantiles: Vec<i64>,
) -> Result<()> {
    let market = ctx.accounts.market.load()?;
    require!(market.has_metrics(), ErrorCode::InsufficientSamples);

    let periods = if periods.is_empty() { DEFAULT_HORIZONS.to_vec() } else { periods };
    let quantiles = if quantiles.is_empty() { DEFAULT_QUANTILES.to_vec() } else { quantiles };

    let mut zs: Vec<I256> = Vec::with_capacity(quantiles.len());
    for quantile in quantiles.iter() {
        zs.push(quantile_from_decimal(*quantile)?);
    }
    let grid = value_at_risk_grid(market.drift(), market.sig_sqrd(), market.period, &periods, &zs)?;

    for (n, row) in periods.iter().zip(grid.iter()) {
        for (quantile, var) in quantiles.iter().zip(row.iter()) {
            msg!("Value at risk: periods: {}, quantile: {}, bracket: {}", n, quantile, var);
        }
    }
    Ok(())
}
