//! Database access layer
//!
//! Plain sqlx query functions grouped by table. Multi-table invariants
//! (code consumption, order recording) run inside explicit transactions
//! here rather than in handlers.

pub mod accounts;
pub mod one_time_codes;
pub mod orders;
pub mod products;
pub mod reports;
