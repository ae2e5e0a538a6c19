use anchor_lang::prelude::*;
use crate::state::Market;
use crate::error::ErrorCode;

/// 修改市场的估计参数
#[derive(Accounts)]
pub struct ModifyParams<'info> {
    #[account(mut)]
    pub market: AccountLoader<'info, Market>,

    /// 市场管理员 - 必须签名参数修改操作
    pub authority: Signer<'info>,
}

/// 修改估计参数
/// 注意：已存储的估计结果不会重新计算，下一次 update_metrics 才会使用新参数
pub fn modify_params(
    ctx: Context<ModifyParams>,
    period: u64,
    window: u64,
    tolerance: u64,
) -> Result<()> {
    require!(period > 0, ErrorCode::InvalidInput);
    require!(window >= 2, ErrorCode::InvalidInput);

    let market = &mut ctx.accounts.market.load_mut()?;

    // 验证市场地址和管理员权限
    market.verify_address(&ctx.accounts.market.key(), ctx.program_id)?;
    market.verify_authority(&ctx.accounts.authority.key())?;

    let old_period = market.period;
    let old_window = market.window;
    let old_tolerance = market.tolerance;
    market.period = period;
    market.window = window;
    market.tolerance = tolerance;

    msg!(
        "Market params modified: period: {} -> {}, window: {} -> {}, tolerance: {} -> {}",
        old_period,
        period,
        old_window,
        window,
        old_tolerance,
        tolerance
    );
    Ok(())
}
