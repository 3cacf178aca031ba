//! Seller product catalog endpoints

use axum::extract::State;
use axum::{Extension, Json};

use crate::api::ApiResult;
use crate::api::register::db_error;
use crate::auth::SellerIdentity;
use crate::db;
use crate::db::products::{Product, ProductCreate};
use crate::error::AppError;
use crate::state::AppState;
use crate::util::now_millis;

pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<SellerIdentity>,
    Json(req): Json<ProductCreate>,
) -> ApiResult<Product> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Product name must not be empty"));
    }
    if req.category.trim().is_empty() {
        return Err(AppError::validation("Category must not be empty"));
    }
    if req.price.is_sign_negative() {
        return Err(AppError::validation("Price must not be negative"));
    }
    if req.quantity_in_stock < 0 {
        return Err(AppError::validation("Stock must not be negative"));
    }

    let product = db::products::create(&state.pool, &identity.account_id, &req, now_millis())
        .await
        .map_err(db_error)?;

    tracing::info!(
        account_id = %identity.account_id,
        product_id = product.id,
        "Product created"
    );
    Ok(Json(product))
}

pub async fn list_products(
    State(state): State<AppState>,
    Extension(identity): Extension<SellerIdentity>,
) -> ApiResult<Vec<Product>> {
    let products = db::products::list_for_seller(&state.pool, &identity.account_id)
        .await
        .map_err(db_error)?;
    Ok(Json(products))
}
