//! Stake recommendation engine.
//!
//! [`StakeRecommender`] turns a model estimate and a market quote into
//! a sized stake: validate inputs, measure the edge over the implied
//! probability, size with fractional Kelly, clip to the bankroll cap,
//! then gate on the minimum edge. Evaluation is pure; the same inputs
//! always produce the same recommendation.

use crate::config::RiskConfig;
use crate::core::kelly::full_kelly_fraction;
use crate::core::odds::{implied_probability, MIN_DECIMAL_ODDS};
use crate::core::probability::over_probability;
use crate::error::ValidationError;
use crate::models::{BetCandidate, Confidence, ModelEstimate, Quote, StakeRecommendation};

/// Stake sizing engine holding the process risk configuration.
#[derive(Debug, Clone)]
pub struct StakeRecommender {
    config: RiskConfig,
}

impl StakeRecommender {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Evaluate one estimate against one quote.
    ///
    /// Errors mean "no recommendation": the caller must abstain rather
    /// than treat the result as a zero stake.
    pub fn recommend(
        &self,
        estimate: &ModelEstimate,
        quote: &Quote,
    ) -> Result<StakeRecommendation, ValidationError> {
        match *estimate {
            ModelEstimate::Probability {
                predicted_probability,
                confidence,
            } => self.evaluate(predicted_probability, confidence, quote),
            ModelEstimate::Distribution {
                mu,
                sigma,
                line,
                confidence,
            } => self.evaluate_distribution(mu, sigma, line, confidence, quote),
        }
    }

    /// Evaluate a regression-market estimate: probability of clearing
    /// `line` comes from the normal CDF of (mu, sigma).
    pub fn recommend_for_regression(
        &self,
        mu: f64,
        sigma: f64,
        line: f64,
        quote: &Quote,
    ) -> Result<StakeRecommendation, ValidationError> {
        self.evaluate_distribution(mu, sigma, line, None, quote)
    }

    /// Evaluate one candidate.
    pub fn recommend_candidate(
        &self,
        candidate: &BetCandidate,
    ) -> Result<StakeRecommendation, ValidationError> {
        self.recommend(&candidate.estimate, &candidate.quote)
    }

    /// Evaluate a batch in input order. Fails on the first invalid
    /// candidate; items are independent so a valid prefix implies
    /// nothing about the rest.
    pub fn recommend_all(
        &self,
        candidates: &[BetCandidate],
    ) -> Result<Vec<StakeRecommendation>, ValidationError> {
        candidates
            .iter()
            .map(|candidate| self.recommend_candidate(candidate))
            .collect()
    }

    fn evaluate_distribution(
        &self,
        mu: f64,
        sigma: f64,
        line: f64,
        confidence: Option<f64>,
        quote: &Quote,
    ) -> Result<StakeRecommendation, ValidationError> {
        if !(sigma > 0.0) {
            return Err(ValidationError::NonPositiveSigma(sigma));
        }

        let predicted = over_probability(mu, sigma, line);
        self.evaluate(predicted, confidence, quote)
    }

    fn evaluate(
        &self,
        predicted_probability: f64,
        confidence: Option<f64>,
        quote: &Quote,
    ) -> Result<StakeRecommendation, ValidationError> {
        // NaN fails both comparisons
        if !(predicted_probability > 0.0 && predicted_probability < 1.0) {
            return Err(ValidationError::ProbabilityOutOfRange(predicted_probability));
        }
        if !quote.decimal_odds.is_finite() || quote.decimal_odds < MIN_DECIMAL_ODDS {
            return Err(ValidationError::OddsOutOfRange(quote.decimal_odds));
        }
        if let Some(c) = confidence {
            if !(0.0..=1.0).contains(&c) {
                return Err(ValidationError::ConfidenceOutOfRange(c));
            }
        }

        let implied = implied_probability(quote.decimal_odds);
        let edge = predicted_probability - implied;

        let full_kelly = full_kelly_fraction(predicted_probability, quote.decimal_odds);
        let kelly_stake_fraction = full_kelly * self.config.kelly_fraction;
        let clipped = kelly_stake_fraction
            .min(self.config.max_stake_percent)
            .max(0.0);

        let eligible = edge >= self.config.min_edge_threshold && clipped > 0.0;
        let recommended_stake_fraction = if eligible { clipped } else { 0.0 };

        Ok(StakeRecommendation {
            market_type: quote.market_type,
            selection: quote.selection.clone(),
            bookmaker: quote.bookmaker.clone(),
            decimal_odds: quote.decimal_odds,
            predicted_probability,
            implied_probability: implied,
            edge,
            expected_value: predicted_probability * quote.decimal_odds,
            full_kelly,
            kelly_stake_fraction,
            recommended_stake_fraction,
            eligible,
            confidence: confidence.map(|c| Confidence::grade(c, edge)),
        })
    }
}

impl Default for StakeRecommender {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}

/// Eligible recommendations sorted by edge, best first.
pub fn rank_by_edge(recommendations: &[StakeRecommendation]) -> Vec<StakeRecommendation> {
    let mut eligible: Vec<StakeRecommendation> = recommendations
        .iter()
        .filter(|r| r.eligible)
        .cloned()
        .collect();
    eligible.sort_by(|a, b| b.edge.total_cmp(&a.edge));
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarketType;

    fn recommender() -> StakeRecommender {
        StakeRecommender::default()
    }

    fn quote(odds: f64) -> Quote {
        Quote::new(MarketType::MatchWinner, odds)
    }

    #[test]
    fn test_modest_edge_gets_quarter_kelly() {
        // edge 0.05, full Kelly 0.10, quarter Kelly 0.025 under the cap
        let rec = recommender()
            .recommend(&ModelEstimate::probability(0.55), &quote(2.0))
            .unwrap();

        assert!((rec.edge - 0.05).abs() < 1e-9);
        assert!((rec.full_kelly - 0.10).abs() < 1e-9);
        assert!((rec.kelly_stake_fraction - 0.025).abs() < 1e-9);
        assert!((rec.recommended_stake_fraction - 0.025).abs() < 1e-9);
        assert!(rec.eligible);
    }

    #[test]
    fn test_edge_threshold_gates_stake() {
        // edge 0.01 sits below the 0.02 threshold
        let rec = recommender()
            .recommend(&ModelEstimate::probability(0.51), &quote(2.0))
            .unwrap();

        assert!((rec.edge - 0.01).abs() < 1e-9);
        assert!(!rec.eligible);
        assert_eq!(rec.recommended_stake_fraction, 0.0);
        // The raw fractional Kelly is still reported
        assert!((rec.kelly_stake_fraction - 0.005).abs() < 1e-9);
    }

    #[test]
    fn test_large_edge_clips_to_cap() {
        // quarter Kelly would be 0.175, cap is 0.05
        let rec = recommender()
            .recommend(&ModelEstimate::probability(0.80), &quote(3.0))
            .unwrap();

        assert!((rec.kelly_stake_fraction - 0.175).abs() < 1e-9);
        assert!((rec.recommended_stake_fraction - 0.05).abs() < 1e-9);
        assert!(rec.eligible);
    }

    #[test]
    fn test_negative_edge_recommends_nothing() {
        let rec = recommender()
            .recommend(&ModelEstimate::probability(0.30), &quote(2.0))
            .unwrap();

        assert!(rec.edge < 0.0);
        assert!(rec.full_kelly < 0.0);
        assert!(!rec.eligible);
        assert_eq!(rec.recommended_stake_fraction, 0.0);
    }

    #[test]
    fn test_regression_at_line_is_even_money() {
        let rec = recommender()
            .recommend_for_regression(13.5, 3.0, 13.5, &quote(2.0))
            .unwrap();

        assert!((rec.predicted_probability - 0.5).abs() < 1e-9);
        assert!(rec.edge.abs() < 1e-9);
        assert!(!rec.eligible);
    }

    #[test]
    fn test_regression_over_estimate() {
        // mu a third of a sigma over the line: p ~ 0.63 against 1.9 odds
        let rec = recommender()
            .recommend_for_regression(13.5, 3.0, 12.5, &quote(1.9))
            .unwrap();

        assert!((rec.predicted_probability - 0.6306).abs() < 1e-3);
        assert!(rec.edge > 0.09);
        assert!(rec.eligible);
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let r = recommender();
        for p in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = r
                .recommend(&ModelEstimate::probability(p), &quote(2.0))
                .unwrap_err();
            assert!(matches!(err, ValidationError::ProbabilityOutOfRange(_)));
        }
    }

    #[test]
    fn test_rejects_odds_below_floor() {
        let r = recommender();
        for odds in [1.0, 1.005, 0.5, 0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = r
                .recommend(&ModelEstimate::probability(0.55), &quote(odds))
                .unwrap_err();
            assert!(matches!(err, ValidationError::OddsOutOfRange(_)));
        }
    }

    #[test]
    fn test_rejects_non_positive_sigma() {
        let r = recommender();
        for sigma in [0.0, -1.0, f64::NAN] {
            let err = r
                .recommend_for_regression(13.5, sigma, 12.5, &quote(2.0))
                .unwrap_err();
            assert!(matches!(err, ValidationError::NonPositiveSigma(_)));
        }
    }

    #[test]
    fn test_rejects_confidence_out_of_range() {
        let r = recommender();
        for c in [-0.1, 1.1, f64::NAN] {
            let est = ModelEstimate::probability(0.55).with_confidence(c);
            let err = r.recommend(&est, &quote(2.0)).unwrap_err();
            assert!(matches!(err, ValidationError::ConfidenceOutOfRange(_)));
        }
    }

    #[test]
    fn test_confidence_grade_attached_when_present() {
        let r = recommender();

        let est = ModelEstimate::probability(0.62).with_confidence(0.85);
        let rec = r.recommend(&est, &quote(2.0)).unwrap();
        assert_eq!(rec.confidence, Some(Confidence::High));

        let rec = r
            .recommend(&ModelEstimate::probability(0.62), &quote(2.0))
            .unwrap();
        assert_eq!(rec.confidence, None);
    }

    #[test]
    fn test_bounds_hold_across_grid() {
        let r = recommender();
        let cap = r.config().max_stake_percent;

        for p_step in 1..20 {
            for odds_step in 1..15 {
                let p = p_step as f64 * 0.05;
                if p >= 1.0 {
                    continue;
                }
                let odds = 1.0 + odds_step as f64 * 0.35;
                let rec = r
                    .recommend(&ModelEstimate::probability(p), &quote(odds))
                    .unwrap();

                assert!(rec.recommended_stake_fraction >= 0.0);
                assert!(rec.recommended_stake_fraction <= cap + 1e-12);
                assert_eq!(rec.recommended_stake_fraction > 0.0, rec.eligible);
            }
        }
    }

    #[test]
    fn test_stake_monotonic_in_probability() {
        let r = recommender();
        let mut prev = 0.0;
        for p_step in 1..99 {
            let p = p_step as f64 / 100.0;
            let rec = r
                .recommend(&ModelEstimate::probability(p), &quote(2.0))
                .unwrap();
            assert!(
                rec.recommended_stake_fraction >= prev - 1e-12,
                "stake fell from {} to {} at p={}",
                prev,
                rec.recommended_stake_fraction,
                p
            );
            prev = rec.recommended_stake_fraction;
        }
    }

    #[test]
    fn test_zero_cap_disables_betting() {
        let config = RiskConfig::new(0.0, 0.25, 0.02).unwrap();
        let rec = StakeRecommender::new(config)
            .recommend(&ModelEstimate::probability(0.80), &quote(3.0))
            .unwrap();

        assert!(!rec.eligible);
        assert_eq!(rec.recommended_stake_fraction, 0.0);
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let r = recommender();
        let est = ModelEstimate::probability(0.55).with_confidence(0.7);
        let q = quote(2.0).with_selection("Sentinels").with_bookmaker("pinnacle");

        let a = r.recommend(&est, &q).unwrap();
        let b = r.recommend(&est, &q).unwrap();

        let a_json = serde_json::to_string(&a).unwrap();
        let b_json = serde_json::to_string(&b).unwrap();
        assert_eq!(a_json, b_json);
    }

    #[test]
    fn test_recommend_all_fails_fast() {
        let r = recommender();
        let candidates = vec![
            BetCandidate::new(quote(2.0), ModelEstimate::probability(0.55)),
            BetCandidate::new(quote(1.0), ModelEstimate::probability(0.55)),
            BetCandidate::new(quote(2.0), ModelEstimate::probability(0.60)),
        ];

        let err = r.recommend_all(&candidates).unwrap_err();
        assert!(matches!(err, ValidationError::OddsOutOfRange(_)));
    }

    #[test]
    fn test_recommend_all_preserves_order() {
        let r = recommender();
        let candidates = vec![
            BetCandidate::new(quote(2.0), ModelEstimate::probability(0.51)),
            BetCandidate::new(quote(3.0), ModelEstimate::probability(0.80)),
            BetCandidate::new(quote(2.0), ModelEstimate::probability(0.55)),
        ];

        let recs = r.recommend_all(&candidates).unwrap();
        assert_eq!(recs.len(), 3);
        assert!((recs[0].predicted_probability - 0.51).abs() < 1e-12);
        assert!((recs[1].predicted_probability - 0.80).abs() < 1e-12);
        assert!((recs[2].predicted_probability - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_rank_by_edge_sorts_eligible_descending() {
        let r = recommender();
        let candidates = vec![
            BetCandidate::new(quote(2.0), ModelEstimate::probability(0.55)),
            BetCandidate::new(quote(2.0), ModelEstimate::probability(0.51)),
            BetCandidate::new(quote(3.0), ModelEstimate::probability(0.80)),
        ];

        let recs = r.recommend_all(&candidates).unwrap();
        let ranked = rank_by_edge(&recs);

        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].edge >= ranked[1].edge);
        assert!((ranked[0].predicted_probability - 0.80).abs() < 1e-12);
    }
}
