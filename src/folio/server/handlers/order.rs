//! The persisted display order.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::model::OrderEntry;
use crate::server::{ApiError, ApiResult, AppState};
use crate::store::DataStore;

#[derive(Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Vec<OrderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn current<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> ApiResult<Json<OrderResponse>> {
    let api = state.api.lock().await;
    let order = api.get_order()?.order.unwrap_or_default();
    Ok(Json(OrderResponse {
        success: true,
        order,
        message: None,
    }))
}

/// Body is `{"order": [...]}`. Entries are bare ids or `{id, category, position}`
/// records and are stored exactly as sent.
pub async fn save<S: DataStore + Send + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<OrderResponse>> {
    let order = parse_order(body)?;
    let mut api = state.api.lock().await;
    let result = api.save_order(order)?;
    Ok(Json(OrderResponse {
        success: true,
        order: result.order.unwrap_or_default(),
        message: Some("Order updated".to_string()),
    }))
}

fn parse_order(mut body: Value) -> ApiResult<Vec<OrderEntry>> {
    match body.get_mut("order").map(Value::take) {
        Some(entries @ Value::Array(_)) => serde_json::from_value(entries).map_err(|e| {
            ApiError::BadRequest(format!("Order entries must be ids or records: {}", e))
        }),
        _ => Err(ApiError::BadRequest(
            "Order must be an array under \"order\"".to_string(),
        )),
    }
}
