use anchor_lang::prelude::*;
use primitive_types::U256;

use crate::error::ErrorCode;
use crate::math::{FixedPoint, LogExpMath, Math, I256};

/// 由价格样本估计出的 GBM 参数（均为 2^127 定点数，单位为每秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GbmEstimate {
    /// 漂移 mu = mean(r) / t
    pub drift: I256,
    /// 方差 sigma^2 = var(r) / t
    pub sig_sqrd: U256,
    /// 波动率 sigma
    pub volatility: U256,
    /// 实际参与估计的样本数量（过滤掉非正价格之后）
    pub sample_count: u64,
}

/**
 * @dev Maximum likelihood estimates of drift and variance for a geometric Brownian motion.
 *
 * For prices p_0..p_n observed every `period` seconds the log returns r_i = ln(p_i / p_(i-1)) are i.i.d. normal
 * with mean mu * t and variance sigma^2 * t, so mu = mean(r) / t and sigma^2 = var(r) / t where var uses the
 * population divisor n.
 */
pub struct GbmEstimator;

impl GbmEstimator {
    /**
     * @dev Signed fixed point log returns of consecutive positive samples. Zero samples are dropped.
     */
    pub fn log_returns(samples: &[U256]) -> Result<Vec<I256>> {
        let prices: Vec<U256> = samples.iter().copied().filter(|p| !p.is_zero()).collect();
        require!(prices.len() >= 2, ErrorCode::InsufficientSamples);

        let mut returns = Vec::with_capacity(prices.len() - 1);
        for pair in prices.windows(2) {
            let ratio = FixedPoint::from_ratio(pair[1], pair[0])?;
            returns.push(LogExpMath::ln_signed(ratio)?);
        }
        Ok(returns)
    }

    pub fn estimate(samples: &[U256], period: u64) -> Result<GbmEstimate> {
        require!(period > 0, ErrorCode::InvalidInput);
        let returns = Self::log_returns(samples)?;
        Self::from_returns(&returns, period)
    }

    /**
     * @dev Same estimates from prices already in log space (e.g. tick TWAPs): r_i = l_i - l_(i-1).
     */
    pub fn estimate_from_log_prices(log_prices: &[I256], period: u64) -> Result<GbmEstimate> {
        require!(period > 0, ErrorCode::InvalidInput);
        require!(log_prices.len() >= 2, ErrorCode::InsufficientSamples);

        let mut returns = Vec::with_capacity(log_prices.len() - 1);
        for pair in log_prices.windows(2) {
            returns.push(pair[1].checked_sub(&pair[0])?);
        }
        Self::from_returns(&returns, period)
    }

    fn from_returns(returns: &[I256], period: u64) -> Result<GbmEstimate> {
        let n = U256::from(returns.len() as u64);
        let t = U256::from(period);

        let mut sum = I256::ZERO;
        for r in returns.iter() {
            sum = sum.checked_add(r)?;
        }
        let mean = sum.checked_div_u256(n)?;

        let mut squares = U256::zero();
        for r in returns.iter() {
            let deviation = r.checked_sub(&mean)?.abs();
            squares = Math::add(squares, FixedPoint::mul_down(deviation, deviation)?)?;
        }
        let variance = Math::div_down(squares, n)?;

        let sig_sqrd = Math::div_down(variance, t)?;
        Ok(GbmEstimate {
            drift: mean.checked_div_u256(t)?,
            sig_sqrd,
            volatility: FixedPoint::sqrt(sig_sqrd)?,
            sample_count: returns.len() as u64 + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::fixedpoint::to_f64;
    use crate::math::FIXED_1;

    fn prices(values: &[u64]) -> Vec<U256> {
        values.iter().map(|v| U256::from(*v)).collect()
    }

    fn signed_f64(v: I256) -> f64 {
        let magnitude = to_f64(v.abs());
        if v.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    #[test]
    fn test_log_returns() {
        let returns = GbmEstimator::log_returns(&prices(&[1000, 2000, 1000])).unwrap();
        assert_eq!(returns.len(), 2);
        assert!((signed_f64(returns[0]) - 2f64.ln()).abs() < 1e-9);
        assert!((signed_f64(returns[1]) + 2f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_zero_samples_are_filtered() {
        let with_gaps = GbmEstimator::log_returns(&prices(&[0, 1000, 0, 1100, 1210])).unwrap();
        let clean = GbmEstimator::log_returns(&prices(&[1000, 1100, 1210])).unwrap();
        assert_eq!(with_gaps, clean);
    }

    #[test]
    #[should_panic]
    fn test_insufficient_samples() {
        let _ = GbmEstimator::estimate(&prices(&[0, 1000, 0]), 600).unwrap();
    }

    #[test]
    #[should_panic]
    fn test_zero_period() {
        let _ = GbmEstimator::estimate(&prices(&[1000, 1100]), 0).unwrap();
    }

    #[test]
    fn test_constant_growth() {
        // every step doubles: no variance, drift = ln(2) / t
        let estimate = GbmEstimator::estimate(&prices(&[1, 2, 4, 8, 16, 32]), 600).unwrap();
        assert_eq!(estimate.sample_count, 6);
        assert_eq!(estimate.sig_sqrd, U256::zero());
        assert_eq!(estimate.volatility, U256::zero());
        let expected = LogExpMath::ln(FIXED_1 * U256::from(2u64)).unwrap() / U256::from(600u64);
        assert_eq!(estimate.drift.to_u256().unwrap(), expected);
    }

    #[test]
    fn test_alternating_path() {
        // 1000, 1100, 1000, ... : returns +-ln(1.1), mean ~ 0, variance ln(1.1)^2
        let estimate = GbmEstimator::estimate(&prices(&[1000, 1100, 1000, 1100, 1000]), 600).unwrap();
        let ln11 = 1.1f64.ln();
        println!("drift = {}, sig_sqrd = {}", signed_f64(estimate.drift), to_f64(estimate.sig_sqrd));
        assert!(signed_f64(estimate.drift).abs() < 1e-15);
        let expected = ln11 * ln11 / 600.0;
        assert!(((to_f64(estimate.sig_sqrd) - expected) / expected).abs() < 1e-8);
        let vol = to_f64(estimate.volatility);
        assert!(((vol - expected.sqrt()) / expected.sqrt()).abs() < 1e-8);
    }

    #[test]
    fn test_matches_float_reference() {
        let path = [
            1_850_120_000u64,
            1_861_400_000,
            1_843_990_000,
            1_870_020_000,
            1_902_330_000,
            1_899_870_000,
            1_888_000_000,
            1_915_450_000,
        ];
        let period = 3600u64;
        let estimate = GbmEstimator::estimate(&prices(&path), period).unwrap();

        let rs: Vec<f64> = path.windows(2).map(|w| (w[1] as f64 / w[0] as f64).ln()).collect();
        let mean = rs.iter().sum::<f64>() / rs.len() as f64;
        let var = rs.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / rs.len() as f64;
        let mu = mean / period as f64;
        let ss = var / period as f64;

        println!("mu = {} (f64 {}), sig_sqrd = {} (f64 {})", signed_f64(estimate.drift), mu, to_f64(estimate.sig_sqrd), ss);
        assert!(((signed_f64(estimate.drift) - mu) / mu).abs() < 1e-7);
        assert!(((to_f64(estimate.sig_sqrd) - ss) / ss).abs() < 1e-7);
    }

    #[test]
    fn test_volatile_short_period() {
        // returns +-ln(10^6) sampled every second: variance ~190.9 per second
        let estimate = GbmEstimator::estimate(&prices(&[1, 1_000_000, 1]), 1).unwrap();
        let r = 1e6f64.ln();
        let expected = r * r;
        println!("sig_sqrd = {} (f64 {})", to_f64(estimate.sig_sqrd), expected);
        assert!(((to_f64(estimate.sig_sqrd) - expected) / expected).abs() < 1e-8);
        assert!(((to_f64(estimate.volatility) - r) / r).abs() < 1e-8);
        assert!(signed_f64(estimate.drift).abs() < 1e-9);
    }

    #[test]
    fn test_log_prices_match_prices() {
        let path = [1000u64, 1100, 1045, 1210, 1190];
        let from_prices = GbmEstimator::estimate(&prices(&path), 600).unwrap();
        let logs: Vec<I256> = path
            .iter()
            .map(|p| LogExpMath::ln_signed(FixedPoint::from_ratio(U256::from(*p), U256::from(1000u64)).unwrap()).unwrap())
            .collect();
        let from_logs = GbmEstimator::estimate_from_log_prices(&logs, 600).unwrap();
        assert_eq!(from_logs.sample_count, from_prices.sample_count);
        let ss = to_f64(from_prices.sig_sqrd);
        assert!(((to_f64(from_logs.sig_sqrd) - ss) / ss).abs() < 1e-8);
        let mu = signed_f64(from_prices.drift);
        assert!(((signed_f64(from_logs.drift) - mu) / mu).abs() < 1e-8);
    }

    #[test]
    fn test_log_prices_constant_step() {
        let step = I256::from(-5i64).checked_mul_u256(crate::stats::twap::LN_TICK_BASE).unwrap();
        let logs: Vec<I256> = (0..6).map(|i| step.checked_mul_u256(U256::from(i as u64)).unwrap()).collect();
        let estimate = GbmEstimator::estimate_from_log_prices(&logs, 60).unwrap();
        assert_eq!(estimate.sig_sqrd, U256::zero());
        assert_eq!(estimate.drift, step.checked_div_u256(U256::from(60u64)).unwrap());
        assert!(GbmEstimator::estimate_from_log_prices(&logs[..1], 60).is_err());
    }
}
