//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, UserAdminCommand, UserAdminQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication use-case backing `POST /login`.
    pub login: Arc<dyn LoginService>,
    /// Read use-cases for listings and forms.
    pub query: Arc<dyn UserAdminQuery>,
    /// Mutation use-cases for create/update/delete.
    pub command: Arc<dyn UserAdminCommand>,
}

impl HttpState {
    /// Bundle the driving port implementations for the HTTP adapter.
    pub fn new(
        login: Arc<dyn LoginService>,
        query: Arc<dyn UserAdminQuery>,
        command: Arc<dyn UserAdminCommand>,
    ) -> Self {
        Self {
            login,
            query,
            command,
        }
    }
}
