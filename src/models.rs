//! Shared data model: markets, odds quotes, model estimates and the
//! stake recommendations derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Betting market category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    MatchWinner,
    MapWinner,
    TotalRounds,
    PlayerProp,
}

impl MarketType {
    /// Line markets settle over/under a numeric line; the rest are
    /// binary win/lose markets.
    pub fn is_line_market(&self) -> bool {
        matches!(self, MarketType::TotalRounds | MarketType::PlayerProp)
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarketType::MatchWinner => "match_winner",
            MarketType::MapWinner => "map_winner",
            MarketType::TotalRounds => "total_rounds",
            MarketType::PlayerProp => "player_prop",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MarketType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "match_winner" => Ok(MarketType::MatchWinner),
            "map_winner" => Ok(MarketType::MapWinner),
            "total_rounds" => Ok(MarketType::TotalRounds),
            "player_prop" => Ok(MarketType::PlayerProp),
            other => Err(ValidationError::UnknownMarketType(other.to_string())),
        }
    }
}

/// A priced market offer from a bookmaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub market_type: MarketType,
    /// Team, map side or player the odds are quoted for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmaker: Option<String>,
    pub decimal_odds: f64,
}

impl Quote {
    pub fn new(market_type: MarketType, decimal_odds: f64) -> Self {
        Self {
            market_type,
            selection: None,
            bookmaker: None,
            decimal_odds,
        }
    }

    /// Build a quote from American odds. `american` must be nonzero;
    /// zero converts to infinite decimal odds and is rejected downstream.
    pub fn from_american(market_type: MarketType, american: i32) -> Self {
        Self::new(market_type, crate::core::odds::american_to_decimal(american))
    }

    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }

    pub fn with_bookmaker(mut self, bookmaker: impl Into<String>) -> Self {
        self.bookmaker = Some(bookmaker.into());
        self
    }

    /// Probability the odds imply with the bookmaker margin left in
    pub fn implied_probability(&self) -> f64 {
        crate::core::odds::implied_probability(self.decimal_odds)
    }
}

/// Upstream model output for one market: either a direct win
/// probability or a normal (mu, sigma) total against a quoted line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelEstimate {
    Probability {
        predicted_probability: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        confidence: Option<f64>,
    },
    Distribution {
        mu: f64,
        sigma: f64,
        line: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        confidence: Option<f64>,
    },
}

impl ModelEstimate {
    pub fn probability(predicted_probability: f64) -> Self {
        ModelEstimate::Probability {
            predicted_probability,
            confidence: None,
        }
    }

    pub fn regression(mu: f64, sigma: f64, line: f64) -> Self {
        ModelEstimate::Distribution {
            mu,
            sigma,
            line,
            confidence: None,
        }
    }

    pub fn with_confidence(self, value: f64) -> Self {
        match self {
            ModelEstimate::Probability {
                predicted_probability,
                ..
            } => ModelEstimate::Probability {
                predicted_probability,
                confidence: Some(value),
            },
            ModelEstimate::Distribution {
                mu, sigma, line, ..
            } => ModelEstimate::Distribution {
                mu,
                sigma,
                line,
                confidence: Some(value),
            },
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            ModelEstimate::Probability { confidence, .. } => *confidence,
            ModelEstimate::Distribution { confidence, .. } => *confidence,
        }
    }
}

/// Qualitative confidence grade attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Grade from model confidence and computed edge.
    pub fn grade(model_confidence: f64, edge: f64) -> Self {
        if model_confidence > 0.8 && edge > 0.05 {
            Confidence::High
        } else if model_confidence > 0.6 && edge > 0.03 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        write!(f, "{}", s)
    }
}

/// One market to evaluate: a quote paired with the model's estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetCandidate {
    pub quote: Quote,
    pub estimate: ModelEstimate,
}

impl BetCandidate {
    pub fn new(quote: Quote, estimate: ModelEstimate) -> Self {
        Self { quote, estimate }
    }
}

/// Stake recommendation for a single candidate.
///
/// Pure function of its inputs: contains no timestamps or identifiers,
/// so identical inputs always produce identical records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeRecommendation {
    pub market_type: MarketType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmaker: Option<String>,
    pub decimal_odds: f64,
    pub predicted_probability: f64,
    pub implied_probability: f64,
    /// predicted_probability - implied_probability
    pub edge: f64,
    /// Expected gross return per unit staked (probability x odds)
    pub expected_value: f64,
    /// Unscaled Kelly fraction; negative when the model sees no edge
    pub full_kelly: f64,
    /// Fractional Kelly stake before clipping
    pub kelly_stake_fraction: f64,
    /// Final stake as a bankroll fraction, zero unless eligible
    pub recommended_stake_fraction: f64,
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

/// Flat request body for a single recommendation.
///
/// Carries either `predicted_probability` or the full `mu`/`sigma`/`line`
/// triple; the probability wins when both are present. Doubles as the
/// CSV row shape for batch files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub market_type: MarketType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmaker: Option<String>,
    pub decimal_odds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RecommendRequest {
    /// Assemble the typed candidate, or fail when neither estimate
    /// form is complete.
    pub fn to_candidate(&self) -> Result<BetCandidate, ValidationError> {
        let mut quote = Quote::new(self.market_type, self.decimal_odds);
        quote.selection = self.selection.clone();
        quote.bookmaker = self.bookmaker.clone();

        let estimate = if let Some(p) = self.predicted_probability {
            ModelEstimate::Probability {
                predicted_probability: p,
                confidence: self.confidence,
            }
        } else if let (Some(mu), Some(sigma), Some(line)) = (self.mu, self.sigma, self.line) {
            ModelEstimate::Distribution {
                mu,
                sigma,
                line,
                confidence: self.confidence,
            }
        } else {
            return Err(ValidationError::IncompleteEstimate);
        };

        Ok(BetCandidate::new(quote, estimate))
    }
}

/// Batch recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendBatchRequest {
    pub candidates: Vec<RecommendRequest>,
}

/// Batch recommendation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendBatchResponse {
    /// All evaluations in request order
    pub recommendations: Vec<StakeRecommendation>,
    /// Eligible subset sorted by edge, best first
    pub eligible: Vec<StakeRecommendation>,
    pub total: usize,
    pub eligible_count: usize,
    /// Summed edge across the eligible subset
    pub total_edge: f64,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
