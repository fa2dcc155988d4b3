//! Bootstrap integration tests
//!
//! Tests marked `#[ignore]` need a running MongoDB that accepts the
//! credentials below. Override them with `MONGODB_TEST_USER`,
//! `MONGODB_TEST_PASS`, `MONGODB_TEST_HOST`, `MONGODB_TEST_PORT` and
//! `MONGODB_TEST_NAME`, then run `cargo test -- --ignored`.

use authentication_service::config::{ConfigError, DatabaseSettings};
use authentication_service::mongo::{
    ConnectionError, DatabaseConnection, MongoConnection, ShutdownError,
};
use authentication_service::repository::{MongoUserRepository, User, UserRepository};
use authentication_service::server::{AppState, ConnectionGuard};
use tokio_util::sync::CancellationToken;

fn test_env() -> Vec<(String, String)> {
    [
        ("USER", "u"),
        ("PASS", "p"),
        ("HOST", "localhost"),
        ("PORT", "27017"),
        ("NAME", "testdb"),
    ]
    .into_iter()
    .map(|(key, default)| {
        let value =
            std::env::var(format!("MONGODB_TEST_{key}")).unwrap_or_else(|_| default.to_string());
        (format!("DATABASE_{key}"), value)
    })
    .collect()
}

#[test]
fn test_descriptor_from_environment_variables() {
    let settings = DatabaseSettings::from_source([
        ("DATABASE_USER", "u"),
        ("DATABASE_PASS", "p"),
        ("DATABASE_HOST", "localhost"),
        ("DATABASE_PORT", "27017"),
        ("DATABASE_NAME", "testdb"),
    ])
    .unwrap();

    let descriptor = settings.descriptor();
    assert_eq!(
        descriptor.connection_uri(),
        "mongodb://u:p@localhost:27017/testdb"
    );
    assert_eq!(descriptor.database_name(), "testdb");
}

#[test]
fn test_bad_port_stops_before_connecting() {
    let result = DatabaseSettings::from_source([
        ("DATABASE_HOST", "localhost"),
        ("DATABASE_PORT", "27O17"),
    ]);
    assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
}

#[tokio::test]
#[ignore]
async fn test_open_ping_and_release() {
    let descriptor = DatabaseSettings::from_source(test_env())
        .unwrap()
        .descriptor();
    let ctx = CancellationToken::new();

    let connection = MongoConnection::open(&ctx, &descriptor).await.unwrap();
    connection.ping().await.unwrap();

    let state = AppState::new(&connection).unwrap();
    state.users.save(&User::default()).await.unwrap();

    let guard = ConnectionGuard::new(connection.clone());
    guard.release().await.unwrap();

    assert!(matches!(connection.ping().await, Err(ConnectionError::Closed)));
    assert!(matches!(
        connection.close().await,
        Err(ShutdownError::AlreadyClosed)
    ));
    assert!(MongoUserRepository::new(&connection).is_err());
}

#[tokio::test]
#[ignore]
async fn test_concurrent_pings_share_pool() {
    let descriptor = DatabaseSettings::from_source(test_env())
        .unwrap()
        .descriptor();
    let connection = MongoConnection::open(&CancellationToken::new(), &descriptor)
        .await
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let connection = connection.clone();
            tokio::spawn(async move { connection.ping().await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    connection.close().await.unwrap();
}
