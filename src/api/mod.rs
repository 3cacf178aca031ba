//! HTTP routes

pub mod health;
pub mod register;
pub mod seller;

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::seller_auth_middleware;
use crate::error::AppError;
use crate::state::AppState;

/// Handler result: JSON body on success, structured error otherwise
pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/signup", post(register::signup))
        .route("/verify-otp", post(register::verify_otp))
        .route("/resend-code", post(register::resend_code))
        .route("/login", post(seller::login));

    let authed = Router::new()
        .route(
            "/me",
            get(seller::get_profile)
                .patch(seller::update_profile)
                .delete(seller::delete_account),
        )
        .route(
            "/products",
            post(seller::create_product).get(seller::list_products),
        )
        .route(
            "/orders",
            post(seller::create_order).get(seller::list_orders),
        )
        .route("/inventory/alerts", get(seller::inventory_alerts))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            seller_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(authed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
