//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::ports::{MockSeriesSearch, MockUserService};
use crate::domain::{User, UserId, Username};
use crate::inbound::http::auth::{SigningSecret, TokenService};
use crate::inbound::http::state::HttpState;

/// Signing secret shared by handler tests.
pub const TEST_SECRET: &[u8] = b"handler-tests-signing-secret-000";

/// Token service over the wall clock and [`TEST_SECRET`].
pub fn test_tokens() -> Arc<TokenService> {
    let secret = SigningSecret::new(TEST_SECRET).expect("test secret is long enough");
    Arc::new(TokenService::new(&secret, Arc::new(DefaultClock)))
}

/// State wired to the given mocks.
pub fn state_with(users: MockUserService, search: MockSeriesSearch) -> HttpState {
    HttpState::new(Arc::new(users), Arc::new(search), test_tokens())
}

/// A user named `username` with a fresh id.
pub fn user(username: &str) -> User {
    User::new(
        UserId::random(),
        Username::new(username).expect("valid username"),
    )
}

/// `Authorization` header value for `user` signed by `tokens`.
pub fn bearer_for(tokens: &TokenService, user: &User) -> String {
    format!("Bearer {}", tokens.issue(user).expect("token issues"))
}
