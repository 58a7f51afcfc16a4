use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::warn;

use crate::AppState;
use valbet::core::recommend::rank_by_edge;
use valbet::error::ValidationError;
use valbet::models::{RecommendBatchRequest, RecommendBatchResponse, RecommendRequest};

/// Evaluate a single candidate
pub async fn recommend_single(
    state: web::Data<Arc<AppState>>,
    req: web::Json<RecommendRequest>,
) -> Result<HttpResponse, ValidationError> {
    let candidate = req.to_candidate()?;
    let recommendation = state.recommender.recommend_candidate(&candidate)?;

    Ok(HttpResponse::Ok().json(recommendation))
}

/// Evaluate a batch of candidates
pub async fn recommend_batch(
    state: web::Data<Arc<AppState>>,
    req: web::Json<RecommendBatchRequest>,
) -> Result<HttpResponse, ValidationError> {
    let mut recommendations = Vec::with_capacity(req.candidates.len());

    for (index, request) in req.candidates.iter().enumerate() {
        let evaluated = request
            .to_candidate()
            .and_then(|candidate| state.recommender.recommend_candidate(&candidate));

        match evaluated {
            Ok(rec) => recommendations.push(rec),
            Err(e) => {
                warn!("Rejecting batch: candidate {} invalid: {}", index, e);
                return Err(e);
            }
        }
    }

    let eligible = rank_by_edge(&recommendations);
    let total_edge: f64 = eligible.iter().map(|r| r.edge).sum();

    let response = RecommendBatchResponse {
        total: recommendations.len(),
        eligible_count: eligible.len(),
        total_edge,
        recommendations,
        eligible,
    };

    Ok(HttpResponse::Ok().json(response))
}
