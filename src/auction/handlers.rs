use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;

use super::protocol::{BidRequest, BidResponse, ResponseStatus, ResultResponse, UpdateResponse};
use super::service::AuctionService;
use super::state::{BidOutcome, StateSnapshot};

pub async fn handle_bid(
    Extension(service): Extension<Arc<AuctionService>>,
    Json(req): Json<BidRequest>,
) -> (StatusCode, Json<BidResponse>) {
    tracing::debug!("Bid request {} from user {}", req.request_id, req.user_id);

    let response = match service.place_bid(&req.user_id, req.amount).await {
        BidOutcome::Accepted { message } => BidResponse {
            status: ResponseStatus::Accepted,
            message,
        },
        BidOutcome::Rejected { message } => BidResponse {
            status: ResponseStatus::Rejected,
            message,
        },
    };

    (StatusCode::OK, Json(response))
}

pub async fn handle_result(
    Extension(service): Extension<Arc<AuctionService>>,
) -> (StatusCode, Json<ResultResponse>) {
    let outcome = service.result().await;

    (
        StatusCode::OK,
        Json(ResultResponse {
            status: ResponseStatus::Accepted,
            message: outcome.message,
        }),
    )
}

pub async fn handle_update(
    Extension(service): Extension<Arc<AuctionService>>,
    Json(snapshot): Json<StateSnapshot>,
) -> (StatusCode, Json<UpdateResponse>) {
    let status = if service.accept_update(snapshot).await {
        ResponseStatus::Accepted
    } else {
        // Business rejection, not a transport error: delivered as a payload
        ResponseStatus::Rejected
    };

    (StatusCode::OK, Json(UpdateResponse { status }))
}
