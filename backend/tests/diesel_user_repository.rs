//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Each test starts its own cluster, applies the embedded migrations through
//! `run_migrations`, and drives the repository and account service through a
//! dedicated Tokio runtime. The cluster bootstrap must happen outside any
//! runtime, so the tests themselves are synchronous.

use std::sync::Arc;

use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

use tvtrackr::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError, UserService};
use tvtrackr::domain::{
    AccountService, Credentials, ErrorCode, HashCost, PasswordHasher, Series, SeriesId, User,
    UserId, Username,
};
use tvtrackr::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, run_migrations};

#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::{handle_cluster_setup_failure, test_cluster};

/// Field order matters: the pool drops while the runtime is alive, and the
/// cluster outlives both.
struct Harness {
    repository: DieselUserRepository,
    runtime: Runtime,
    _cluster: TestCluster,
}

impl Harness {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn register(&self, username: &str) -> StoredCredentials {
        let record = record(username);
        self.block_on(self.repository.create(&record))
            .expect("create user");
        record
    }
}

fn setup() -> Result<Harness, String> {
    let cluster = test_cluster()?;
    let database_url = cluster.connection().database_url("postgres");
    let runtime = Runtime::new().map_err(|err| err.to_string())?;

    runtime
        .block_on(run_migrations(&database_url))
        .map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(database_url).with_max_size(2)))
        .map_err(|err| err.to_string())?;

    Ok(Harness {
        repository: DieselUserRepository::new(pool),
        runtime,
        _cluster: cluster,
    })
}

#[fixture]
fn harness() -> Option<Harness> {
    match setup() {
        Ok(harness) => Some(harness),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn record(username: &str) -> StoredCredentials {
    StoredCredentials {
        user: User::new(
            UserId::random(),
            Username::new(username).expect("valid username"),
        ),
        password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_owned(),
    }
}

fn series(id: &str) -> SeriesId {
    SeriesId::new(id).expect("valid series id")
}

fn ids(followed: &[Series]) -> Vec<&str> {
    followed.iter().map(|s| s.id().as_ref()).collect()
}

#[rstest]
fn creating_a_taken_username_reports_a_duplicate(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    harness.register("alice");

    let err = harness
        .block_on(harness.repository.create(&record("alice")))
        .expect_err("second insert must fail");

    assert_eq!(err, UserRepositoryError::duplicate_username("alice"));
}

#[rstest]
fn find_by_username_returns_stored_credentials(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let alice = harness.register("alice");

    let found = harness
        .block_on(harness.repository.find_by_username(alice.user.username()))
        .expect("lookup");
    let missing = harness
        .block_on(
            harness
                .repository
                .find_by_username(&Username::new("nobody").expect("valid username")),
        )
        .expect("lookup");

    assert_eq!(found, Some(alice));
    assert!(missing.is_none());
}

#[rstest]
fn followed_is_empty_without_follows(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let alice = harness.register("alice");

    let followed = harness
        .block_on(harness.repository.followed(alice.user.id()))
        .expect("list");

    assert!(followed.is_empty());
}

#[rstest]
fn following_twice_stores_one_row(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let alice = harness.register("alice");
    let user_id = alice.user.id();

    harness
        .block_on(harness.repository.follow(user_id, &series("123")))
        .expect("first follow");
    harness
        .block_on(harness.repository.follow(user_id, &series("123")))
        .expect("repeat follow is a no-op");

    let followed = harness
        .block_on(harness.repository.followed(user_id))
        .expect("list");
    assert_eq!(followed, vec![Series::untitled(series("123"))]);
}

#[rstest]
fn follows_list_oldest_first_per_user(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let alice = harness.register("alice");
    let bob = harness.register("bob");

    for (user, id) in [(&alice, "b"), (&alice, "a"), (&bob, "c")] {
        harness
            .block_on(harness.repository.follow(user.user.id(), &series(id)))
            .expect("follow");
    }

    let followed = harness
        .block_on(harness.repository.followed(alice.user.id()))
        .expect("list");
    assert_eq!(ids(&followed), ["b", "a"]);
}

#[rstest]
fn following_for_an_unknown_user_is_rejected(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let stranger = UserId::random();

    let err = harness
        .block_on(harness.repository.follow(&stranger, &series("123")))
        .expect_err("no users row");

    assert_eq!(err, UserRepositoryError::unknown_user(stranger.to_string()));
}

#[rstest]
fn account_service_reports_duplicate_registration(harness: Option<Harness>) {
    let Some(harness) = harness else { return };
    let hasher = PasswordHasher::new(HashCost::minimal()).expect("valid cost");
    let service = AccountService::new(Arc::new(harness.repository.clone()), hasher);
    let credentials = Credentials::try_from_parts("carol", "pw3").expect("valid credentials");

    let user = harness
        .block_on(service.register(&credentials))
        .expect("first register");
    let err = harness
        .block_on(service.register(&credentials))
        .expect_err("second register must fail");
    let logged_in = harness
        .block_on(service.login(&credentials))
        .expect("login");

    assert_eq!(err.code(), ErrorCode::DuplicateUsername);
    assert_eq!(logged_in, user);
}
