//! CSV loading for candidate and settled-bet files.
//!
//! Candidate files carry one market per row with the same columns as
//! the JSON request body: `market_type`, optional `selection` and
//! `bookmaker`, `decimal_odds`, then either `predicted_probability` or
//! the `mu`/`sigma`/`line` triple, plus optional `confidence`. Settled
//! files append a `won` column (`true`/`false`) for replaying past
//! bets through the simulator.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::models::{MarketType, RecommendRequest};

/// A candidate with its settled outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettledRow {
    pub market_type: MarketType,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub bookmaker: Option<String>,
    pub decimal_odds: f64,
    #[serde(default)]
    pub predicted_probability: Option<f64>,
    #[serde(default)]
    pub mu: Option<f64>,
    #[serde(default)]
    pub sigma: Option<f64>,
    #[serde(default)]
    pub line: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub won: bool,
}

impl SettledRow {
    /// The candidate portion of the row, outcome stripped.
    pub fn to_request(&self) -> RecommendRequest {
        RecommendRequest {
            market_type: self.market_type,
            selection: self.selection.clone(),
            bookmaker: self.bookmaker.clone(),
            decimal_odds: self.decimal_odds,
            predicted_probability: self.predicted_probability,
            mu: self.mu,
            sigma: self.sigma,
            line: self.line,
            confidence: self.confidence,
        }
    }
}

/// Read candidate rows from any reader.
pub fn read_candidates<R: io::Read>(reader: R) -> Result<Vec<RecommendRequest>, csv::Error> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize().collect()
}

/// Load candidate rows from a CSV file.
pub fn load_candidates<P: AsRef<Path>>(path: P) -> Result<Vec<RecommendRequest>, csv::Error> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    rdr.deserialize().collect()
}

/// Read settled rows from any reader.
pub fn read_settled<R: io::Read>(reader: R) -> Result<Vec<SettledRow>, csv::Error> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize().collect()
}

/// Load settled rows from a CSV file.
pub fn load_settled<P: AsRef<Path>>(path: P) -> Result<Vec<SettledRow>, csv::Error> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    rdr.deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES_CSV: &str = "\
market_type,selection,bookmaker,decimal_odds,predicted_probability,mu,sigma,line,confidence
match_winner,Sentinels,pinnacle,2.10,0.52,,,,0.7
total_rounds,over,draftkings,1.90,,24.8,3.0,23.5,
map_winner,,,1.65,0.68,,,,
";

    const SETTLED_CSV: &str = "\
market_type,selection,bookmaker,decimal_odds,predicted_probability,mu,sigma,line,confidence,won
match_winner,Sentinels,pinnacle,2.00,0.55,,,,,true
match_winner,Fnatic,betmgm,3.00,0.80,,,,,false
";

    #[test]
    fn test_read_candidates() {
        let rows = read_candidates(CANDIDATES_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].selection.as_deref(), Some("Sentinels"));
        assert_eq!(rows[0].predicted_probability, Some(0.52));
        assert_eq!(rows[0].mu, None);
        assert_eq!(rows[0].confidence, Some(0.7));

        assert_eq!(rows[1].market_type, MarketType::TotalRounds);
        assert_eq!(rows[1].predicted_probability, None);
        assert_eq!(rows[1].mu, Some(24.8));
        assert_eq!(rows[1].sigma, Some(3.0));
        assert_eq!(rows[1].line, Some(23.5));

        assert_eq!(rows[2].selection, None);
        assert_eq!(rows[2].bookmaker, None);
    }

    #[test]
    fn test_read_settled() {
        let rows = read_settled(SETTLED_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].won);
        assert!(!rows[1].won);
    }

    #[test]
    fn test_settled_to_request_strips_outcome() {
        let rows = read_settled(SETTLED_CSV.as_bytes()).unwrap();
        let req = rows[0].to_request();
        assert_eq!(req.market_type, MarketType::MatchWinner);
        assert_eq!(req.predicted_probability, Some(0.55));
        assert!((req.decimal_odds - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_read_candidates_rejects_bad_numbers() {
        let bad = "\
market_type,selection,bookmaker,decimal_odds,predicted_probability,mu,sigma,line,confidence
match_winner,,,not_a_number,0.5,,,,
";
        assert!(read_candidates(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_read_candidates_rejects_unknown_market() {
        let bad = "\
market_type,selection,bookmaker,decimal_odds,predicted_probability,mu,sigma,line,confidence
handicap,,,2.0,0.5,,,,
";
        assert!(read_candidates(bad.as_bytes()).is_err());
    }
}
