//! Outbound adapters implementing the domain's driven ports.

pub mod access_gate;
pub mod notify;
pub mod persistence;
pub mod security;
