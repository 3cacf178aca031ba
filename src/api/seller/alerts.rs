//! Restock alert endpoint

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::ApiResult;
use crate::api::register::db_error;
use crate::auth::SellerIdentity;
use crate::db;
use crate::report::{RestockReport, compute_restock_report};
use crate::state::AppState;

pub async fn inventory_alerts(
    State(state): State<AppState>,
    Extension(identity): Extension<SellerIdentity>,
) -> ApiResult<RestockReport> {
    let rows = db::reports::sales_rows_for_seller(&state.pool, &identity.account_id)
        .await
        .map_err(db_error)?;
    Ok(Json(compute_restock_report(&rows)))
}
