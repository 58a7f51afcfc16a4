//! Core stake-sizing logic

pub mod kelly;
pub mod odds;
pub mod probability;
pub mod recommend;

// Re-export commonly used items
pub use kelly::{full_kelly_fraction, stake_amount};
pub use odds::{
    american_to_decimal, best_quote, decimal_to_american, implied_probability, MIN_DECIMAL_ODDS,
};
pub use probability::{normal_cdf, over_probability};
pub use recommend::StakeRecommender;
