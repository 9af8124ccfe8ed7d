//! Offer REST endpoints: register offers and apply them to a cart.

use crate::rest::{api_error, ApiError, AppState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use offer_core::types::{AddOfferRequest, AddOfferResponse, ApplyRequest, ApplyResponse};
use offer_core::{Offer, OfferError};
use tracing::warn;

/// POST /api/v1/offer
pub async fn handle_add_offer(
    State(state): State<AppState>,
    Json(request): Json<AddOfferRequest>,
) -> Result<Json<AddOfferResponse>, ApiError> {
    match state.engine.add_offer(&request) {
        Ok(_) => Ok(Json(AddOfferResponse::success())),
        Err(e) => {
            warn!(
                restaurant_id = request.restaurant_id,
                offer_type = %request.offer_type,
                error = %e,
                "Offer rejected"
            );
            metrics::counter!("api.offers_rejected", "reason" => e.code()).increment(1);
            Err(api_error(&e))
        }
    }
}

/// POST /api/v1/cart/apply_offer
pub async fn handle_apply_offer(
    State(state): State<AppState>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, ApiError> {
    let cart_value = state.engine.apply_to_cart(&request).await.map_err(|e| {
        warn!(user_id = request.user_id, error = %e, "Apply request rejected");
        api_error(&e)
    })?;
    Ok(Json(ApplyResponse { cart_value }))
}

/// GET /api/v1/offers/:restaurant_id
pub async fn handle_list_offers(
    State(state): State<AppState>,
    Path(restaurant_id): Path<u64>,
) -> Result<Json<Vec<Offer>>, ApiError> {
    let store = state.engine.store();
    if !store.is_valid_restaurant(restaurant_id) {
        let (_, body) = api_error(&OfferError::InvalidRestaurant(restaurant_id));
        return Err((StatusCode::NOT_FOUND, body));
    }
    Ok(Json(store.offers_by_restaurant(restaurant_id)))
}
