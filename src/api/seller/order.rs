//! Seller order endpoints

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::ApiResult;
use crate::api::register::db_error;
use crate::auth::SellerIdentity;
use crate::db;
use crate::db::orders::{OrderItemCreate, OrderWithItems};
use crate::error::AppError;
use crate::state::AppState;
use crate::util::now_millis;

#[derive(Debug, Deserialize)]
pub struct OrderCreateRequest {
    pub items: Vec<OrderItemCreate>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<SellerIdentity>,
    Json(req): Json<OrderCreateRequest>,
) -> ApiResult<OrderWithItems> {
    let order = db::orders::record_sale(
        &state.pool,
        &identity.account_id,
        &req.items,
        now_millis(),
    )
    .await
    .map_err(AppError::from)?;

    tracing::info!(
        account_id = %identity.account_id,
        order_id = order.order.id,
        total = %order.order.total_amount,
        "Order recorded"
    );
    Ok(Json(order))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<SellerIdentity>,
) -> ApiResult<Vec<OrderWithItems>> {
    let orders = db::orders::list_for_seller(&state.pool, &identity.account_id)
        .await
        .map_err(db_error)?;
    Ok(Json(orders))
}
