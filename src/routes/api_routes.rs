use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::warn;

use crate::errors::AppError;
use crate::models::{HistoryResponse, RelayRequest, RelayResponse};
use crate::service::relay_service::RelayService;

/// POST `/api/gemini`: relays one message upstream and returns the reply.
pub async fn gemini_handler(
    State(svc): State<RelayService>,
    body: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Json<RelayResponse>, AppError> {
    let message = match body {
        Ok(Json(req)) => req.message,
        Err(rejection) => {
            warn!("Unreadable relay request: {rejection}");
            None
        }
    };

    let reply = svc.relay(message.as_deref()).await?;
    Ok(Json(RelayResponse { reply }))
}

/// GET `/api/history`: the most recent exchanges, newest first.
pub async fn history_handler(
    State(svc): State<RelayService>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = svc.history().await?;
    Ok(Json(HistoryResponse { history }))
}
