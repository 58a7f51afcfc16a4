//! Backtesting engine for validating the staking policy

pub mod metrics;
pub mod simulator;

pub use metrics::{
    analyze_by_market, analyze_by_odds_range, calculate_report, sharpe_ratio, PerformanceReport,
    SegmentReport,
};
pub use simulator::{BankrollSimulator, SettledBet, SimulationConfig, SimulationResult};
