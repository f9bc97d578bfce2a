#![allow(dead_code)]
use std::sync::Arc;
use chrono::{DateTime, Utc};
use accounts::db::memory::InMemoryUserStore;
use accounts::model::user::{NewUser, User};
use accounts::services;
use accounts::utils::{config::Configuration, context::ServiceContext};

// The minimum cost bcrypt allows - keeps the tests quick.
pub const TEST_COST: u32 = 4;

pub const TEST_PASSWORD: &str = "pass1234";

///
/// A service context over an in-memory store. The store is shared so tests can inspect exactly
/// what was persisted.
///
pub struct TestContext {
    pub ctx: ServiceContext,
    pub store: Arc<InMemoryUserStore>,
}

pub fn test_context() -> TestContext {
    test_context_with_cost(TEST_COST)
}

///
/// As test_context but hashing at the cost given. The config isn't validated so a bad cost
/// reaches the hashing step.
///
pub fn test_context_with_cost(bcrypt_cost: u32) -> TestContext {
    let config = Configuration {
        db_name: "Accounts_Tests".to_string(),
        bcrypt_cost,
        ..Default::default()
    };

    let store = Arc::new(InMemoryUserStore::new());
    let ctx = ServiceContext::new(config, store.clone());

    TestContext { ctx, store }
}

pub fn new_user(email: &str, password: &str, password_confirm: &str) -> NewUser {
    NewUser {
        name: "Jonas".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        password_confirm: password_confirm.to_string(),
        ..Default::default()
    }
}

///
/// Sign up a user with the default test password.
///
pub async fn sign_up(ctx: &ServiceContext, email: &str) -> User {
    services::create_user(ctx, new_user(email, TEST_PASSWORD, TEST_PASSWORD))
        .await
        .expect("sign up failed")
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("test date wont parse")
        .with_timezone(&Utc)
}
