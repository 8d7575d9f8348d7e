//! Static market catalog: which trades and stakes the simulation permits.

/// A permitted conversion between two assets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingPair {
    /// Asset sold.
    pub from: &'static str,
    /// Asset bought.
    pub to: &'static str,
    /// Illustrative conversion rate (display only).
    pub rate: f64,
    /// Trade fee, percent of the traded amount.
    pub fee_percent: f64,
}

/// A staking pool with its yield parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StakingPool {
    /// Stakeable asset.
    pub asset: &'static str,
    /// Annual percentage yield.
    pub apy: f64,
    /// Smallest stake the pool accepts.
    pub min_amount: f64,
    /// Lock period in days.
    pub lock_period_days: u32,
    /// Illustrative pool size (display only).
    pub total_staked: f64,
}

const TRADING_PAIRS: [TradingPair; 6] = [
    TradingPair { from: "BTC", to: "ETH", rate: 15.2, fee_percent: 0.25 },
    TradingPair { from: "ETH", to: "BTC", rate: 0.066, fee_percent: 0.25 },
    TradingPair { from: "BTC", to: "ADA", rate: 72_500.0, fee_percent: 0.5 },
    TradingPair { from: "ETH", to: "ADA", rate: 4_800.0, fee_percent: 0.5 },
    TradingPair { from: "ADA", to: "DOT", rate: 0.18, fee_percent: 1.0 },
    TradingPair { from: "DOT", to: "ADA", rate: 5.5, fee_percent: 1.0 },
];

const STAKING_POOLS: [StakingPool; 4] = [
    StakingPool { asset: "BTC", apy: 4.5, min_amount: 0.01, lock_period_days: 30, total_staked: 1_250.5 },
    StakingPool { asset: "ETH", apy: 6.2, min_amount: 0.1, lock_period_days: 60, total_staked: 8_945.2 },
    StakingPool { asset: "ADA", apy: 8.1, min_amount: 100.0, lock_period_days: 90, total_staked: 125_000.0 },
    StakingPool { asset: "DOT", apy: 12.5, min_amount: 10.0, lock_period_days: 120, total_staked: 25_000.0 },
];

/// All permitted trading pairs.
#[must_use]
pub const fn trading_pairs() -> &'static [TradingPair] {
    &TRADING_PAIRS
}

/// All staking pools.
#[must_use]
pub const fn staking_pools() -> &'static [StakingPool] {
    &STAKING_POOLS
}

/// Looks up the pair for a `from`/`to` conversion.
#[must_use]
pub fn find_pair(from: &str, to: &str) -> Option<&'static TradingPair> {
    TRADING_PAIRS
        .iter()
        .find(|pair| pair.from == from && pair.to == to)
}

/// Looks up the staking pool for an asset.
#[must_use]
pub fn find_pool(asset: &str) -> Option<&'static StakingPool> {
    STAKING_POOLS.iter().find(|pool| pool.asset == asset)
}
