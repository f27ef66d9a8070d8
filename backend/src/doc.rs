//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] documents the five `/api/v1` routes, their schemas, and the
//! bearer security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Series, User};
use crate::inbound::http::series::{FollowRequest, FollowResponse};
use crate::inbound::http::users::{CredentialsRequest, LoginResponse};

/// Register the JWT bearer scheme referenced by protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "tvtrackr API",
        description = "Accounts, bearer-token sessions, followed series and TheTVDB search."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::series::search_series,
        crate::inbound::http::series::follow_series,
        crate::inbound::http::series::followed_series,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Series,
        CredentialsRequest,
        LoginResponse,
        FollowRequest,
        FollowResponse
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "series", description = "Series search and follows")
    )
)]
pub struct ApiDoc;
