//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every endpoint of the inbound layer, the domain schemas
//! they reference, and the session cookie security scheme. Swagger UI
//! serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the user administration API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "User administration API",
        description = "Session-authenticated CRUD over user accounts with \
                       role and permission assignment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_form,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::view_user,
        crate::inbound::http::users::edit_form,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::FieldViolation,
        crate::domain::User,
        crate::domain::Role,
        crate::domain::Permission,
        crate::domain::ports::AccessCatalog,
        crate::domain::ports::EditForm,
        crate::inbound::http::users::LoginRequest,
        crate::inbound::http::users::CreateUserBody,
        crate::inbound::http::users::UpdateUserBody,
    ))
)]
pub struct ApiDoc;
