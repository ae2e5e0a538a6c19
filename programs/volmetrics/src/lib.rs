use anchor_lang::prelude::*;

pub mod instructions;
pub mod state;
pub mod error;
pub mod math;
pub mod stats;

use instructions::*;
use stats::{Observation, PriceDirection, TickObservation};
declare_id!("2KdjUQ3dCotiGAokbwmeNRRbkGFFStppoKcjeoD13ymF");

#[program]
pub mod volmetrics {
    use super::*;

    /// 创建市场（PDA），从 mint 账户读取两个 token 的 decimals
    pub fn initialize_market(
        ctx: Context<InitializeMarket>,
        period: u64,
        window: u64,
        tolerance: u64,
        direction: PriceDirection,
    ) -> Result<()> {
        instructions::initialize_market(ctx, period, window, tolerance, direction)
    }

    /// 修改样本间隔、TWAP 窗口和窗口误差
    pub fn modify_params(
        ctx: Context<ModifyParams>,
        period: u64,
        window: u64,
        tolerance: u64,
    ) -> Result<()> {
        instructions::modify_params(ctx, period, window, tolerance)
    }

    /// 用价格样本估计漂移和方差
    pub fn update_metrics(
        ctx: Context<UpdateMetrics>,
        samples: Vec<u128>,
    ) -> Result<()> {
        instructions::update_metrics(ctx, samples)
    }

    /// 用累计价格观测（先转换为 TWAP）估计漂移和方差
    pub fn update_metrics_from_cumulatives(
        ctx: Context<UpdateMetrics>,
        observations: Vec<Observation>,
    ) -> Result<()> {
        instructions::update_metrics_from_cumulatives(ctx, observations)
    }

    /// 用 tick 累计观测（Uniswap v3 风格）估计漂移和方差
    pub fn update_metrics_from_tick_cumulatives(
        ctx: Context<UpdateMetrics>,
        observations: Vec<TickObservation>,
    ) -> Result<()> {
        instructions::update_metrics_from_tick_cumulatives(ctx, observations)
    }

    /// 根据已存储的估计结果输出 VaR 表（每个周期数 x 每个分位数）
    /// quantiles: 正态分位数，10 位小数；两个参数为空时使用默认值
    pub fn quote_value_at_risk(
        ctx: Context<QuoteValueAtRisk>,
        periods: Vec<u64>,
        quantiles: Vec<i64>,
    ) -> Result<()> {
        instructions::quote_value_at_risk(ctx, periods, quantiles)
    }
}
