#![allow(missing_docs)]

use axum::{Router, response::Response};
use axum_test::TestServer;
use rusqlite::Connection;
use serde::de::DeserializeOwned;

use crate::{
    AppState, PasswordHash, ValidatedPassword,
    auth::{User, create_user},
    db::initialize,
};

/// The password of every user created by [must_create_user].
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    connection
}

/// Create a user with a placeholder password hash, skipping the slow bcrypt step.
#[track_caller]
pub(crate) fn must_create_test_user(username: &str, connection: &Connection) -> User {
    create_user(
        username,
        None,
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}

#[track_caller]
pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let mut state =
        AppState::new(connection, "foobar", "Etc/UTC").expect("Could not create app state.");
    state.password_hash_cost = 4;

    state
}

/// Create a user whose password is [TEST_PASSWORD].
#[track_caller]
pub(crate) fn must_create_user(state: &AppState, username: &str) -> User {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        state.password_hash_cost,
    )
    .expect("Could not hash password");
    let connection = state.db_connection.lock().unwrap();

    create_user(username, None, password_hash, &connection).expect("Could not create test user")
}

#[track_caller]
pub(crate) fn server_with_state(app: Router<AppState>, state: AppState) -> TestServer {
    TestServer::new(app.with_state(state)).expect("Could not create test server.")
}

pub(crate) async fn parse_json_body<T: DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Could not parse response body as JSON")
}
