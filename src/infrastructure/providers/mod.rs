//! Cloud provider implementations.

pub mod static_inventory;

pub use static_inventory::StaticProvider;
