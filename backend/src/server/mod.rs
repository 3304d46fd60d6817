//! Server construction and port wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use admin_backend::ApiDoc;
use admin_backend::domain::UserAdminService;
use admin_backend::domain::ports::{
    FixtureLoginService, InMemoryAccessStore, InMemoryUserStore, PermitAllGate,
};
use admin_backend::inbound::http::health::{HealthState, live, ready};
use admin_backend::inbound::http::state::HttpState;
use admin_backend::inbound::http::users::{
    create_form, create_user, delete_user, edit_form, list_users, login, update_user, view_user,
};
use admin_backend::outbound::access_gate::AssignmentBackedGate;
use admin_backend::outbound::notify::LogWelcomeNotifier;
use admin_backend::outbound::persistence::{DieselAccessStore, DieselUserStore};
use admin_backend::outbound::security::{Argon2PasswordHasher, OsRandomPasswordGenerator};

/// Build the handler state: Diesel-backed ports when a pool is configured,
/// in-memory fixtures otherwise.
fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            let users = Arc::new(DieselUserStore::new(pool.clone()));
            let access = Arc::new(DieselAccessStore::new(pool.clone()));
            let gate = Arc::new(AssignmentBackedGate::new(Arc::clone(&access)));
            let service = Arc::new(UserAdminService::new(
                users,
                access,
                gate,
                Arc::new(OsRandomPasswordGenerator::new()),
                Arc::new(Argon2PasswordHasher::new()),
                Arc::new(LogWelcomeNotifier::new()),
            ));
            let query: Arc<dyn admin_backend::domain::ports::UserAdminQuery> =
                service.clone();
            HttpState::new(Arc::new(FixtureLoginService), query, service)
        }
        None => {
            info!("no database configured, serving from in-memory stores");
            let service = Arc::new(UserAdminService::new(
                Arc::new(InMemoryUserStore::new()),
                Arc::new(InMemoryAccessStore::with_default_catalogue()),
                Arc::new(PermitAllGate),
                Arc::new(OsRandomPasswordGenerator::new()),
                Arc::new(Argon2PasswordHasher::new()),
                Arc::new(LogWelcomeNotifier::new()),
            ));
            let query: Arc<dyn admin_backend::domain::ports::UserAdminQuery> =
                service.clone();
            HttpState::new(Arc::new(FixtureLoginService), query, service)
        }
    }
}

/// Construct and start the HTTP server.
///
/// # Errors
///
/// Returns an error when the listen address cannot be bound.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let state = build_http_state(&config);
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(login)
            .service(list_users)
            .service(create_form)
            .service(create_user)
            .service(edit_form)
            .service(view_user)
            .service(update_user)
            .service(delete_user);

        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    info!(%bind_addr, "user administration backend listening");
    Ok(server.run())
}
