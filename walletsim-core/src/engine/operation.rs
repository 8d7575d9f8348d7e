//! Operation records and their lifecycle types.

use serde::{Deserialize, Serialize};

/// The kind of simulated financial action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationKind {
    /// Catalog-checked conversion between two assets.
    Trade,
    /// Deposit into a staking pool.
    Stake,
    /// Uncatalogued conversion at a randomized rate.
    Swap,
    /// Strategy-based investment.
    Invest,
}

/// Lifecycle status of an operation. `Pending` transitions exactly once to
/// a terminal state; terminal states never revert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OperationStatus {
    /// Created, settlement not yet resolved.
    Pending,
    /// Settled successfully.
    Completed,
    /// Settlement failed.
    Failed,
}

impl OperationStatus {
    /// Returns `true` for `Completed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Risk profile for an investment operation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InvestmentStrategy {
    /// 5% illustrative annual return.
    Conservative,
    /// 12% illustrative annual return.
    Moderate,
    /// 25% illustrative annual return.
    Aggressive,
}

impl InvestmentStrategy {
    /// Illustrative annual rate of return for the strategy.
    #[must_use]
    pub const fn annual_rate(self) -> f64 {
        match self {
            Self::Conservative => 0.05,
            Self::Moderate => 0.12,
            Self::Aggressive => 0.25,
        }
    }
}

/// A simulated financial operation with a pending → terminal lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Opaque unique token.
    pub id: String,
    /// What kind of action this is.
    pub kind: OperationKind,
    /// Asset spent or staked.
    pub from_asset: String,
    /// Asset received; absent for stake and invest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_asset: Option<String>,
    /// Amount of `from_asset`, always positive.
    pub amount: f64,
    /// Fee charged, never negative.
    pub fee: f64,
    /// Current lifecycle status.
    pub status: OperationStatus,
    /// Creation instant, unix milliseconds.
    pub created_at_ms: u64,
    /// Projected return, where the operation kind defines one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_return: Option<f64>,
    /// Staking lock period in days, for stake operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staking_period_days: Option<u32>,
}
