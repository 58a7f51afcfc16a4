//! Bankroll Simulator
//!
//! Replays settled candidates through the recommender to validate the
//! staking policy on historical data. The bankroll compounds: each
//! stake is sized from the bankroll as it stood when the bet was
//! placed.

use super::metrics::{calculate_report, PerformanceReport};
use crate::config::RiskConfig;
use crate::core::kelly::stake_amount;
use crate::core::recommend::StakeRecommender;
use crate::data::SettledRow;
use crate::error::ValidationError;
use crate::models::MarketType;
use serde::{Deserialize, Serialize};

/// One placed and settled bet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettledBet {
    pub market_type: MarketType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    pub decimal_odds: f64,
    pub predicted_probability: f64,
    pub edge: f64,
    /// Stake fraction the recommender asked for
    pub recommended_fraction: f64,
    /// Bankroll when the bet was placed
    pub bankroll_before: f64,
    /// Currency actually staked after rounding and the minimum-stake rule
    pub stake: f64,
    pub won: bool,
    pub payout: f64,
    pub profit: f64,
}

/// Simulation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub bets: Vec<SettledBet>,
    pub total_candidates: usize,
    /// Candidates the recommender ruled out
    pub skipped_ineligible: usize,
    /// Eligible candidates whose stake rounded away to nothing
    pub skipped_below_minimum: usize,
    pub starting_bankroll: f64,
    pub final_bankroll: f64,
    /// Bankroll after each placed bet, starting value first
    pub bankroll_history: Vec<f64>,
    pub total_staked: f64,
    pub total_returned: f64,
    pub report: Option<PerformanceReport>,
}

impl SimulationResult {
    pub fn new(starting_bankroll: f64) -> Self {
        Self {
            bets: Vec::new(),
            total_candidates: 0,
            skipped_ineligible: 0,
            skipped_below_minimum: 0,
            starting_bankroll,
            final_bankroll: starting_bankroll,
            bankroll_history: vec![starting_bankroll],
            total_staked: 0.0,
            total_returned: 0.0,
            report: None,
        }
    }

    pub fn total_profit(&self) -> f64 {
        self.total_returned - self.total_staked
    }

    pub fn roi(&self) -> f64 {
        if self.total_staked == 0.0 {
            0.0
        } else {
            self.total_profit() / self.total_staked
        }
    }

    pub fn finalize(&mut self) {
        self.report = Some(calculate_report(&self.bets, self.total_staked));
    }
}

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub starting_bankroll: f64,
    /// Stake increment passed to the staking rule
    pub round_to: f64,
    /// Smallest stake the bettor will place
    pub min_stake: f64,
    pub risk: RiskConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            starting_bankroll: 1000.0,
            round_to: 1.0,
            min_stake: 1.0,
            risk: RiskConfig::default(),
        }
    }
}

/// Bankroll simulator
pub struct BankrollSimulator {
    pub config: SimulationConfig,
    recommender: StakeRecommender,
}

impl BankrollSimulator {
    /// Create a new simulator
    pub fn new(config: SimulationConfig) -> Self {
        let recommender = StakeRecommender::new(config.risk);
        Self {
            config,
            recommender,
        }
    }

    /// Replay settled candidates in order.
    ///
    /// Strict about input: any row the recommender rejects aborts the
    /// whole run, so a dirty file never produces a silently short
    /// result.
    pub fn run(&self, rows: &[SettledRow]) -> Result<SimulationResult, ValidationError> {
        let mut result = SimulationResult::new(self.config.starting_bankroll);
        let mut bankroll = self.config.starting_bankroll;

        for row in rows {
            result.total_candidates += 1;

            let candidate = row.to_request().to_candidate()?;
            let rec = self.recommender.recommend_candidate(&candidate)?;

            if !rec.eligible {
                result.skipped_ineligible += 1;
                continue;
            }

            let stake = stake_amount(
                rec.recommended_stake_fraction,
                bankroll,
                self.config.round_to,
                self.config.min_stake,
            );
            if stake <= 0.0 {
                result.skipped_below_minimum += 1;
                continue;
            }

            let payout = if row.won {
                stake * rec.decimal_odds
            } else {
                0.0
            };
            let profit = payout - stake;
            let bankroll_before = bankroll;
            bankroll += profit;

            result.bets.push(SettledBet {
                market_type: rec.market_type,
                selection: rec.selection.clone(),
                decimal_odds: rec.decimal_odds,
                predicted_probability: rec.predicted_probability,
                edge: rec.edge,
                recommended_fraction: rec.recommended_stake_fraction,
                bankroll_before,
                stake,
                won: row.won,
                payout,
                profit,
            });
            result.total_staked += stake;
            result.total_returned += payout;
            result.bankroll_history.push(bankroll);
        }

        result.final_bankroll = bankroll;
        result.finalize();
        Ok(result)
    }

    /// Print summary of a simulation run
    pub fn print_summary(&self, result: &SimulationResult) {
        let risk = self.recommender.config();

        println!("\n{}", "=".repeat(60));
        println!("SIMULATION RESULTS");
        println!("{}", "=".repeat(60));
        println!("Starting bankroll: {:.2}", result.starting_bankroll);
        println!(
            "Risk: max stake {:.1}%, {:.2}x Kelly, min edge {:.1}%",
            risk.max_stake_percent * 100.0,
            risk.kelly_fraction,
            risk.min_edge_threshold * 100.0
        );
        println!("{}", "-".repeat(60));
        println!("Candidates: {}", result.total_candidates);
        println!("Bets placed: {}", result.bets.len());
        println!("Skipped (ineligible): {}", result.skipped_ineligible);
        println!("Skipped (below minimum): {}", result.skipped_below_minimum);
        println!("{}", "-".repeat(60));
        println!("Total staked: {:.2}", result.total_staked);
        println!("Total returned: {:.2}", result.total_returned);
        println!("Total profit: {:.2}", result.total_profit());
        println!("Final bankroll: {:.2}", result.final_bankroll);
        println!("ROI: {:.1}%", result.roi() * 100.0);

        if let Some(ref report) = result.report {
            println!("{}", "-".repeat(60));
            println!("Win rate: {:.1}%", report.win_rate * 100.0);
            println!("Average edge: {:.3}", report.avg_edge);
            println!("Profit factor: {:.2}", report.profit_factor);
            println!(
                "Max drawdown: {:.2} ({:.1}%)",
                report.max_drawdown,
                report.max_drawdown_pct * 100.0
            );
            println!("Kelly adherence: {:.2}", report.kelly_adherence);
        }

        println!("{}", "=".repeat(60));
    }
}
