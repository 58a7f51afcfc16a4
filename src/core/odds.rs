//! Odds conversions and best-quote selection.

use crate::models::Quote;

/// Lowest decimal odds the engine will price. Anything shorter carries
/// no meaningful payout and breaks the Kelly denominator as odds
/// approach 1.0.
pub const MIN_DECIMAL_ODDS: f64 = 1.01;

/// Bookmakers in tie-break priority order, sharpest book first.
pub const BOOKMAKER_PRIORITY: [&str; 6] = [
    "pinnacle",
    "draftkings",
    "fanduel",
    "betmgm",
    "betrivers",
    "williamhill_us",
];

/// Probability implied by decimal odds, bookmaker margin included.
pub fn implied_probability(decimal_odds: f64) -> f64 {
    1.0 / decimal_odds
}

/// Convert decimal odds to an American price. `decimal` must be
/// greater than 1.0. Truncates toward zero like the upstream feeds do.
pub fn decimal_to_american(decimal: f64) -> i32 {
    if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0) as i32
    } else {
        (-100.0 / (decimal - 1.0)) as i32
    }
}

/// Convert an American price to decimal odds. `american` must be
/// nonzero; zero converts to infinite odds and fails validation later.
pub fn american_to_decimal(american: i32) -> f64 {
    if american > 0 {
        american as f64 / 100.0 + 1.0
    } else {
        100.0 / (american as f64).abs() + 1.0
    }
}

/// Pick the best quote for a bettor: highest decimal odds, ties broken
/// by [`BOOKMAKER_PRIORITY`]. Quotes without a bookmaker rank last.
pub fn best_quote(quotes: &[Quote]) -> Option<&Quote> {
    quotes.iter().max_by(|a, b| {
        a.decimal_odds
            .total_cmp(&b.decimal_odds)
            .then_with(|| bookmaker_rank(b).cmp(&bookmaker_rank(a)))
    })
}

fn bookmaker_rank(quote: &Quote) -> usize {
    quote
        .bookmaker
        .as_deref()
        .and_then(|name| {
            BOOKMAKER_PRIORITY
                .iter()
                .position(|known| name.eq_ignore_ascii_case(known))
        })
        .unwrap_or(BOOKMAKER_PRIORITY.len())
}
