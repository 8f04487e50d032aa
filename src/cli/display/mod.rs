//! Terminal rendering helpers.

pub mod table;
