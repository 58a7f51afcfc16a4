//! valbet - Kelly-criterion stake recommendations for esports betting markets
//!
//! This library provides:
//! - Edge detection against bookmaker implied probabilities
//! - Fractional Kelly stake sizing with a hard bankroll cap
//! - Normal-model win probabilities for over/under line markets
//! - Odds conversion and best-quote selection across bookmakers
//! - Bankroll simulation over settled bet history
//!
//! # Example
//!
//! ```
//! use valbet::config::RiskConfig;
//! use valbet::core::recommend::StakeRecommender;
//! use valbet::models::{MarketType, ModelEstimate, Quote};
//!
//! let recommender = StakeRecommender::new(RiskConfig::default());
//! let quote = Quote::new(MarketType::MatchWinner, 2.0);
//! let estimate = ModelEstimate::probability(0.55);
//!
//! let rec = recommender.recommend(&estimate, &quote).unwrap();
//! assert!(rec.eligible);
//! assert!((rec.recommended_stake_fraction - 0.025).abs() < 1e-9);
//! ```

pub mod backtesting;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::RiskConfig;
pub use core::recommend::{rank_by_edge, StakeRecommender};
pub use error::ValidationError;
pub use models::{
    BetCandidate, Confidence, MarketType, ModelEstimate, Quote, RecommendRequest,
    StakeRecommendation,
};
