//! Simulation Metrics
//!
//! Performance reporting over settled bets: win rate, ROI, drawdown,
//! profit factor and how closely the staking tracked the recommender.

use super::simulator::SettledBet;
use serde::{Deserialize, Serialize};

/// Performance report over a simulated bet history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    // Basic metrics
    pub total_bets: usize,
    pub winning_bets: usize,
    pub win_rate: f64,
    pub roi: f64,

    // Averages across placed bets
    pub avg_edge: f64,
    pub avg_odds: f64,
    pub avg_stake: f64,

    // Risk metrics
    pub profit_factor: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,

    // Win/Loss
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub net_profit: f64,

    /// Mean ratio of placed stake to the recommended fraction of the
    /// bankroll at placement. 1.0 means staking exactly as recommended;
    /// rounding and the minimum-stake rule pull it away from 1.
    pub kelly_adherence: f64,
}

impl Default for PerformanceReport {
    fn default() -> Self {
        Self {
            total_bets: 0,
            winning_bets: 0,
            win_rate: 0.0,
            roi: 0.0,
            avg_edge: 0.0,
            avg_odds: 0.0,
            avg_stake: 0.0,
            profit_factor: 0.0,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            gross_profit: 0.0,
            gross_loss: 0.0,
            net_profit: 0.0,
            kelly_adherence: 0.0,
        }
    }
}

/// Calculate the report from settled bets
pub fn calculate_report(bets: &[SettledBet], total_staked: f64) -> PerformanceReport {
    if bets.is_empty() {
        return PerformanceReport::default();
    }

    // Basic metrics
    let total_bets = bets.len();
    let winning_bets = bets.iter().filter(|b| b.won).count();
    let win_rate = winning_bets as f64 / total_bets as f64;

    // Averages
    let avg_edge: f64 = bets.iter().map(|b| b.edge).sum::<f64>() / total_bets as f64;
    let avg_odds: f64 = bets.iter().map(|b| b.decimal_odds).sum::<f64>() / total_bets as f64;
    let avg_stake: f64 = bets.iter().map(|b| b.stake).sum::<f64>() / total_bets as f64;

    // Profit/Loss calculation
    let profits: Vec<f64> = bets.iter().map(|b| b.profit).collect();
    let gross_profit: f64 = profits.iter().filter(|&&p| p > 0.0).sum();
    let gross_loss: f64 = profits.iter().filter(|&&p| p < 0.0).map(|p| p.abs()).sum();
    let net_profit: f64 = profits.iter().sum();

    // Profit Factor
    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    // Drawdown over cumulative profit
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0f64;
    let mut cumulative = 0.0f64;
    for &p in &profits {
        cumulative += p;
        if cumulative > peak {
            peak = cumulative;
        }
        let drawdown = peak - cumulative;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }

    let max_drawdown_pct = if total_staked > 0.0 {
        max_drawdown / total_staked
    } else {
        0.0
    };

    // ROI
    let roi = if total_staked > 0.0 {
        net_profit / total_staked
    } else {
        0.0
    };

    // Kelly adherence
    let ratios: Vec<f64> = bets
        .iter()
        .filter_map(|b| {
            let intended = b.recommended_fraction * b.bankroll_before;
            if intended > 0.0 {
                Some(b.stake / intended)
            } else {
                None
            }
        })
        .collect();
    let kelly_adherence = if ratios.is_empty() {
        0.0
    } else {
        ratios.iter().sum::<f64>() / ratios.len() as f64
    };

    PerformanceReport {
        total_bets,
        winning_bets,
        win_rate,
        roi,
        avg_edge,
        avg_odds,
        avg_stake,
        profit_factor,
        max_drawdown,
        max_drawdown_pct,
        gross_profit,
        gross_loss,
        net_profit,
        kelly_adherence,
    }
}

/// Per-bet Sharpe ratio of stake returns
pub fn sharpe_ratio(bets: &[SettledBet], risk_free_rate: f64) -> f64 {
    if bets.is_empty() {
        return 0.0;
    }

    let returns: Vec<f64> = bets
        .iter()
        .filter(|b| b.stake > 0.0)
        .map(|b| b.profit / b.stake)
        .collect();
    if returns.is_empty() {
        return 0.0;
    }

    let mean_return: f64 = returns.iter().sum::<f64>() / returns.len() as f64;

    let variance: f64 = returns
        .iter()
        .map(|r| (r - mean_return).powi(2))
        .sum::<f64>()
        / returns.len() as f64;

    let std_return = variance.sqrt();

    if std_return == 0.0 {
        return 0.0;
    }

    (mean_return - risk_free_rate) / std_return
}

/// Aggregated results for one slice of the bet history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentReport {
    pub key: String,
    pub bets: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub staked: f64,
    pub profit: f64,
    pub roi: f64,
}

fn summarize(key: String, group: &[&SettledBet]) -> SegmentReport {
    let total = group.len();
    let wins = group.iter().filter(|b| b.won).count();
    let staked: f64 = group.iter().map(|b| b.stake).sum();
    let profit: f64 = group.iter().map(|b| b.profit).sum();

    SegmentReport {
        key,
        bets: total,
        wins,
        win_rate: if total > 0 {
            wins as f64 / total as f64
        } else {
            0.0
        },
        staked,
        profit,
        roi: if staked > 0.0 { profit / staked } else { 0.0 },
    }
}

/// Analyze bet results by market type
pub fn analyze_by_market(bets: &[SettledBet]) -> Vec<SegmentReport> {
    use std::collections::HashMap;

    let mut grouped: HashMap<String, Vec<&SettledBet>> = HashMap::new();
    for bet in bets {
        grouped.entry(bet.market_type.to_string()).or_default().push(bet);
    }

    let mut results: Vec<SegmentReport> = grouped
        .iter()
        .map(|(key, group)| summarize(key.clone(), group))
        .collect();

    results.sort_by(|a, b| a.key.cmp(&b.key));
    results
}

/// Analyze bet results by odds range
pub fn analyze_by_odds_range(bets: &[SettledBet]) -> Vec<SegmentReport> {
    use std::collections::HashMap;

    let mut grouped: HashMap<&str, Vec<&SettledBet>> = HashMap::new();
    for bet in bets {
        let key = if bet.decimal_odds < 1.5 {
            "favourites (<1.5)"
        } else if bet.decimal_odds <= 3.0 {
            "mid (1.5-3)"
        } else {
            "longshots (>3)"
        };
        grouped.entry(key).or_default().push(bet);
    }

    let mut results: Vec<SegmentReport> = grouped
        .iter()
        .map(|(key, group)| summarize(key.to_string(), group))
        .collect();

    results.sort_by(|a, b| a.key.cmp(&b.key));
    results
}
