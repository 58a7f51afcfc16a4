//! Kelly Criterion Bet Sizing
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b = (p*odds - 1) / (odds - 1)
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)
//!     odds = decimal odds (e.g., 2.5 means 2.5x return)

/// Calculate the unscaled Kelly fraction for a single bet
///
/// # Arguments
/// * `probability` - Estimated probability of winning (0-1)
/// * `decimal_odds` - Decimal odds (e.g., 2.5 = 2.5x return)
///
/// # Returns
/// Full Kelly fraction (negative when the bet has no edge)
///
/// # Examples
/// ```
/// use valbet::core::kelly::full_kelly_fraction;
/// let kelly = full_kelly_fraction(0.55, 2.0); // EV = 1.10
/// assert!((kelly - 0.10).abs() < 1e-9);
/// ```
pub fn full_kelly_fraction(probability: f64, decimal_odds: f64) -> f64 {
    if decimal_odds <= 1.0 {
        return 0.0;
    }

    // f* = (p * odds - 1) / (odds - 1)
    (probability * decimal_odds - 1.0) / (decimal_odds - 1.0)
}

/// Convert a recommended bankroll fraction into a currency stake
///
/// Rounds down to the nearest `round_to` step. A stake that rounds
/// below `min_stake` is bumped up to the minimum when the unrounded
/// amount is at least half of it, otherwise dropped to zero.
///
/// # Arguments
/// * `fraction` - Recommended stake as a bankroll fraction
/// * `bankroll` - Current bankroll
/// * `round_to` - Stake increment (0 disables rounding)
/// * `min_stake` - Smallest stake the bettor will place
pub fn stake_amount(fraction: f64, bankroll: f64, round_to: f64, min_stake: f64) -> f64 {
    if fraction <= 0.0 || bankroll <= 0.0 {
        return 0.0;
    }

    let raw = bankroll * fraction;
    let stake = if round_to > 0.0 {
        (raw / round_to).floor() * round_to
    } else {
        raw
    };

    if stake < min_stake {
        if raw < min_stake / 2.0 {
            return 0.0;
        }
        return min_stake;
    }

    stake
}
