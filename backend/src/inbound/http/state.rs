//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{SeriesSearch, UserService};
use crate::inbound::http::auth::TokenService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserService>,
    pub search: Arc<dyn SeriesSearch>,
    pub tokens: Arc<TokenService>,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use tvtrackr::domain::{AccountService, HashCost, PasswordHasher};
    /// use tvtrackr::inbound::http::auth::{SigningSecret, TokenService};
    /// use tvtrackr::inbound::http::state::HttpState;
    /// use tvtrackr::outbound::memory::InMemoryUserRepository;
    /// use tvtrackr::outbound::tvdb::TvdbClient;
    ///
    /// let hasher = PasswordHasher::new(HashCost::minimal()).expect("cost");
    /// let users = AccountService::new(Arc::new(InMemoryUserRepository::new()), hasher);
    /// let search = TvdbClient::new(
    ///     "https://api4.thetvdb.com/v4".parse().expect("url"),
    ///     "api-key",
    ///     std::time::Duration::from_secs(10),
    /// )
    /// .expect("client");
    /// let secret = SigningSecret::new(vec![7_u8; 32]).expect("secret");
    /// let state = HttpState::new(
    ///     Arc::new(users),
    ///     Arc::new(search),
    ///     Arc::new(TokenService::new(&secret, Arc::new(DefaultClock))),
    /// );
    /// # let _ = state;
    /// ```
    pub fn new(
        users: Arc<dyn UserService>,
        search: Arc<dyn SeriesSearch>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            search,
            tokens,
        }
    }
}
