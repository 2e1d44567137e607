//! Driven adapters that take the domain's ports to real infrastructure:
//! PostgreSQL persistence, the Steam Community inventory endpoint, and JWT
//! credentials.

pub mod persistence;
pub mod steam;
pub mod tokens;
