use anchor_lang::prelude::*;
use primitive_types::U256;
use crate::math::FixedPoint;
use crate::state::Market;
use crate::stats::{
    log_twaps_from_tick_cumulatives, twaps_from_cumulatives, GbmEstimate, GbmEstimator, Observation,
    TickObservation,
};

/// 推送价格样本并更新估计结果
#[derive(Accounts)]
pub struct UpdateMetrics<'info> {
    #[account(mut)]
    pub market: AccountLoader<'info, Market>,

    /// 市场管理员 - 样本来自链下预言机，只接受管理员推送
    pub authority: Signer<'info>,
}

/// 用价格样本更新漂移和方差
/// samples: 按时间顺序、间隔为 period 的价格样本（amount_in 个输入 token 换到的输出数量，按输出 token 的 decimals
/// 换算为定点价格），零值会被忽略
pub fn update_metrics(ctx: Context<UpdateMetrics>, samples: Vec<u128>) -> Result<()> {
    let market = &mut ctx.accounts.market.load_mut()?;
    market.verify_address(&ctx.accounts.market.key(), ctx.program_id)?;
    market.verify_authority(&ctx.accounts.authority.key())?;

    let decimals = market.output_decimals();
    let mut prices = Vec::with_capacity(samples.len());
    for sample in samples.iter() {
        prices.push(FixedPoint::from_decimal(U256::from(*sample), decimals)?);
    }
    let estimate = GbmEstimator::estimate(&prices, market.period)?;
    store(market, &estimate)
}

/// 用累计价格观测更新漂移和方差
/// 先按 window 计算滚动 TWAP，再以 TWAP 作为样本
pub fn update_metrics_from_cumulatives(
    ctx: Context<UpdateMetrics>,
    observations: Vec<Observation>,
) -> Result<()> {
    let market = &mut ctx.accounts.market.load_mut()?;
    market.verify_address(&ctx.accounts.market.key(), ctx.program_id)?;
    market.verify_authority(&ctx.accounts.authority.key())?;

    let amounts = twaps_from_cumulatives(
        &observations,
        market.window as usize,
        U256::from(market.amount_in),
        market.direction(),
    )?;
    msg!("Computed {} TWAPs from {} observations", amounts.len(), observations.len());

    let decimals = market.output_decimals();
    let mut twaps = Vec::with_capacity(amounts.len());
    for amount in amounts.iter() {
        twaps.push(FixedPoint::from_decimal(*amount, decimals)?);
    }
    let estimate = GbmEstimator::estimate(&twaps, market.period)?;
    store(market, &estimate)
}

/// 用 tick 累计观测更新漂移和方差
/// 窗口长度为 window * period 秒，允许 tolerance 秒的误差；TWAP 保持在对数空间
pub fn update_metrics_from_tick_cumulatives(
    ctx: Context<UpdateMetrics>,
    observations: Vec<TickObservation>,
) -> Result<()> {
    let market = &mut ctx.accounts.market.load_mut()?;
    market.verify_address(&ctx.accounts.market.key(), ctx.program_id)?;
    market.verify_authority(&ctx.accounts.authority.key())?;

    let log_twaps = log_twaps_from_tick_cumulatives(
        &observations,
        market.period,
        market.window,
        market.tolerance,
        market.direction(),
    )?;
    msg!("Computed {} tick TWAPs from {} observations", log_twaps.len(), observations.len());

    let estimate = GbmEstimator::estimate_from_log_prices(&log_twaps, market.period)?;
    store(market, &estimate)
}

fn store(market: &mut Market, estimate: &GbmEstimate) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    market.record(estimate, now);

    msg!(
        "Metrics updated: samples: {}, drift: {}, sig_sqrd: {}, volatility: {}",
        estimate.sample_count,
        estimate.drift,
        estimate.sig_sqrd,
        estimate.volatility
    );
    Ok(())
}
