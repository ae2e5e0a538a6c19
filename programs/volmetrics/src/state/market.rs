use anchor_lang::prelude::*;
use primitive_types::U256;
use static_assertions::const_assert_eq;
use std::mem::size_of;

use crate::error::ErrorCode;
use crate::math::I256;
use crate::stats::{GbmEstimate, PriceDirection};

/// 市场账户（PDA，seeds = [b"market", base_mint, quote_mint]）
///
/// 记录估计参数以及最近一次的 GBM 估计结果
/// U256 / I256 以 4 个 u64 小端 limb 存储，保持 zero_copy 的 8 字节对齐
#[account(zero_copy)]
#[repr(C)]
#[derive(Debug)]
pub struct Market {
    /// 市场管理员 - 负责推送样本和修改参数 (32 bytes)
    pub authority: Pubkey,
    /// 基础 token 的 mint (32 bytes)
    pub base_mint: Pubkey,
    /// 报价 token 的 mint (32 bytes)
    pub quote_mint: Pubkey,
    /// 相邻样本之间的时间间隔（秒）
    pub period: u64,
    /// TWAP 滚动窗口：累计价格为观测数量，tick 累计为周期数（窗口长度 = window * period 秒）
    pub window: u64,
    /// tick 累计窗口长度允许的误差（秒）
    pub tolerance: u64,
    /// 计算 TWAP 输出数量时使用的输入数量 = 10^(输入 token 的 decimals)
    pub amount_in: u64,
    /// 最近一次估计使用的样本数量
    pub sample_count: u64,
    /// 最近一次估计的 unix 时间戳
    pub last_update: i64,
    pub base_decimals: u8,
    pub quote_decimals: u8,
    pub bump: u8,
    /// 1 = Price0（base -> quote），0 = Price1（quote -> base）
    pub is_price0: u8,
    /// 填充字节（确保后面的 limb 数组 8 字节对齐）
    pub padding: [u8; 4],
    /// 漂移 mu（I256，每秒）
    pub drift: [u64; 4],
    /// 方差 sigma^2（U256，每秒）
    pub sig_sqrd: [u64; 4],
    /// 波动率 sigma（U256）
    pub volatility: [u64; 4],
}

// 32 * 3 + 8 * 6 + 8 + 32 * 3 = 248 bytes
const_assert_eq!(size_of::<Market>(), 248);
const_assert_eq!(size_of::<Market>() % 8, 0);

impl Market {
    /// 验证管理员权限
    pub fn verify_authority(&self, authority: &Pubkey) -> Result<()> {
        require!(*authority == self.authority, ErrorCode::InvalidAuthority);
        Ok(())
    }

    /// 用保存的 bump 重新推导 PDA，确认账户就是该市场
    pub fn verify_address(&self, key: &Pubkey, program_id: &Pubkey) -> Result<()> {
        let address = Pubkey::create_program_address(
            &[
                b"market",
                self.base_mint.as_ref(),
                self.quote_mint.as_ref(),
                &[self.bump],
            ],
            program_id,
        )
        .map_err(|_| ErrorCode::InvalidMarket)?;
        require!(address == *key, ErrorCode::InvalidMarket);
        Ok(())
    }

    pub fn direction(&self) -> PriceDirection {
        if self.is_price0 != 0 {
            PriceDirection::Price0
        } else {
            PriceDirection::Price1
        }
    }

    /// 输入 token 的 decimals（决定 amount_in）
    pub fn input_decimals(&self) -> u8 {
        match self.direction() {
            PriceDirection::Price0 => self.base_decimals,
            PriceDirection::Price1 => self.quote_decimals,
        }
    }

    /// 输出 token 的 decimals（样本和 TWAP 数量按此换算为定点价格）
    pub fn output_decimals(&self) -> u8 {
        match self.direction() {
            PriceDirection::Price0 => self.quote_decimals,
            PriceDirection::Price1 => self.base_decimals,
        }
    }

    pub fn drift(&self) -> I256 {
        I256::from_limbs(self.drift)
    }

    pub fn sig_sqrd(&self) -> U256 {
        U256(self.sig_sqrd)
    }

    pub fn volatility(&self) -> U256 {
        U256(self.volatility)
    }

    pub fn has_metrics(&self) -> bool {
        self.sample_count > 0
    }

    /// 写入新的估计结果
    pub fn record(&mut self, estimate: &GbmEstimate, timestamp: i64) {
        self.drift = estimate.drift.to_limbs();
        self.sig_sqrd = estimate.sig_sqrd.0;
        self.volatility = estimate.volatility.0;
        self.sample_count = estimate.sample_count;
        self.last_update = timestamp;
    }

    /// 计算账户所需的空间大小
    pub fn space() -> usize {
        8 + // discriminator
        size_of::<Market>()
    }
}
