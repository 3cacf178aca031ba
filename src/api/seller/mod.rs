//! Authenticated seller endpoints

mod account;
mod alerts;
mod auth;
mod order;
mod product;

pub use account::{delete_account, get_profile, update_profile};
pub use alerts::inventory_alerts;
pub use auth::login;
pub use order::{create_order, list_orders};
pub use product::{create_product, list_products};
