//! User administration backend library.
//!
//! Hexagonal layout: `domain` holds the entities, ports, and the admin
//! service; `inbound` the HTTP adapter; `outbound` the persistence,
//! security, gate, and notification adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
