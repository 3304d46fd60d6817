//! PostgreSQL persistence adapters built on Diesel.

mod diesel_access_store;
mod diesel_user_store;
mod models;
mod pool;
mod schema;

pub use diesel_access_store::DieselAccessStore;
pub use diesel_user_store::DieselUserStore;
pub use pool::{DbPool, PoolError, PoolSettings};
