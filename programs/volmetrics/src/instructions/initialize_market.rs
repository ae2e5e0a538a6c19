use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use crate::state::Market;
use crate::error::ErrorCode;
use crate::stats::PriceDirection;

/// 创建市场账户
#[derive(Accounts)]
pub struct InitializeMarket<'info> {
    /// 市场 PDA
    /// 地址：seeds = [b"market", base_mint.key(), quote_mint.key()]
    #[account(
        init,
        payer = payer,
        space = Market::space(),
        seeds = [b"market", base_mint.key().as_ref(), quote_mint.key().as_ref()],
        bump
    )]
    pub market: AccountLoader<'info, Market>,

    /// 基础 token 的 mint 账户（读取 decimals）
    pub base_mint: Account<'info, Mint>,

    /// 报价 token 的 mint 账户（读取 decimals）
    pub quote_mint: Account<'info, Mint>,

    /// 市场管理员
    pub authority: Signer<'info>,

    /// 支付创建账户的费用
    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// 创建市场
/// period: 样本间隔（秒）
/// window: TWAP 滚动窗口（累计价格为观测数量，tick 累计为周期数）
/// tolerance: tick 累计窗口长度允许的误差（秒）
/// direction: 估计 Price0（base -> quote）还是 Price1（quote -> base）
pub fn initialize_market(
    ctx: Context<InitializeMarket>,
    period: u64,
    window: u64,
    tolerance: u64,
    direction: PriceDirection,
) -> Result<()> {
    require!(period > 0, ErrorCode::InvalidInput);
    require!(window >= 2, ErrorCode::InvalidInput);

    let base_decimals = ctx.accounts.base_mint.decimals;
    let quote_decimals = ctx.accounts.quote_mint.decimals;
    // TWAP 以 1 个完整输入 token 的输出数量计
    let input_decimals = match direction {
        PriceDirection::Price0 => base_decimals,
        PriceDirection::Price1 => quote_decimals,
    };
    let amount_in = 10u64
        .checked_pow(input_decimals as u32)
        .ok_or(ErrorCode::MathOverflow)?;

    let market = &mut ctx.accounts.market.load_init()?;
    market.authority = ctx.accounts.authority.key();
    market.base_mint = ctx.accounts.base_mint.key();
    market.quote_mint = ctx.accounts.quote_mint.key();
    market.period = period;
    market.window = window;
    market.tolerance = tolerance;
    market.amount_in = amount_in;
    market.base_decimals = base_decimals;
    market.quote_decimals = quote_decimals;
    market.bump = ctx.bumps.market;
    market.is_price0 = (direction == PriceDirection::Price0) as u8;

    msg!(
        "Market initialized: base: {} ({} decimals), quote: {} ({} decimals), direction: {:?}, period: {}, window: {}, tolerance: {}",
        market.base_mint,
        base_decimals,
        market.quote_mint,
        quote_decimals,
        direction,
        period,
        window,
        tolerance
    );
    Ok(())
}
