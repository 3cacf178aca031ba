//! Seller authentication: session tokens + request middleware

pub mod seller_auth;
pub mod token;

pub use seller_auth::{SellerIdentity, seller_auth_middleware};
