//! Server construction and adapter wiring.

mod config;

pub use config::{AppSettings, ServerConfig};

use config::StorageBackend;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use tvtrackr::ApiDoc;
use tvtrackr::Trace;
use tvtrackr::domain::ports::UserService;
use tvtrackr::domain::{AccountService, PasswordHasher};
use tvtrackr::inbound::http::auth::TokenService;
use tvtrackr::inbound::http::configure;
use tvtrackr::inbound::http::state::HttpState;
use tvtrackr::outbound::memory::InMemoryUserRepository;
use tvtrackr::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, run_migrations};
use tvtrackr::outbound::tvdb::TvdbClient;

/// Build the account service over the configured repository.
///
/// For `postgres`, pending migrations are applied before the pool opens.
///
/// # Errors
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be built.
async fn build_user_service(
    storage: &StorageBackend,
    hasher: PasswordHasher,
) -> std::io::Result<Arc<dyn UserService>> {
    match storage {
        StorageBackend::Memory => {
            info!(storage = "memory", "using in-memory user repository");
            let repository = Arc::new(InMemoryUserRepository::new());
            Ok(Arc::new(AccountService::new(repository, hasher)))
        }
        StorageBackend::Postgres { database_url } => {
            run_migrations(database_url)
                .await
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(database_url.clone()))
                .await
                .map_err(std::io::Error::other)?;
            info!(storage = "postgres", "using PostgreSQL user repository");
            let repository = Arc::new(DieselUserRepository::new(pool));
            Ok(Arc::new(AccountService::new(repository, hasher)))
        }
    }
}

async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let users = build_user_service(&config.storage, config.hasher.clone()).await?;
    let search = TvdbClient::new(
        config.tvdb.base_url.clone(),
        config.tvdb.api_key.clone(),
        config.tvdb.timeout,
    )
    .map_err(std::io::Error::other)?;
    let tokens = TokenService::new(&config.signing_secret, Arc::new(DefaultClock));
    Ok(HttpState::new(users, Arc::new(search), Arc::new(tokens)))
}

fn build_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from a validated [`ServerConfig`].
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when adapter construction, migrations,
/// or binding the socket fails.
pub async fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(build_http_state(&config).await?);
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || build_app(state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "server listening");
    Ok(server)
}
