//! Steam Community adapters.

pub mod dto;
pub mod inventory_client;

pub use inventory_client::{SteamInventoryClient, DEFAULT_STEAM_BASE_URL};
