//! Persistence adapters implementing the repository ports.
//!
//! The Diesel adapters back the production deployment; the in-memory
//! adapters serve tests and database-less local runs with identical
//! semantics.

pub mod diesel_trade_offer_repository;
pub mod diesel_user_repository;
pub mod memory;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_trade_offer_repository::DieselTradeOfferRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use memory::{InMemoryTradeOfferRepository, InMemoryUserRepository};
pub use pool::{DbPool, PoolConfig, PoolError};
