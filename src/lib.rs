pub mod db;
pub mod model;
pub mod services;
pub mod utils;

use dotenv::dotenv;
use std::sync::Arc;
use db::{mongo, user::MongoUserStore};
use utils::errors::AccountError;
use utils::context::ServiceContext;
use utils::config::{Configuration, self};
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, Registry, util::SubscriberInitExt};

const APP_NAME: &str = "Accounts";

///
/// Entry point for the binary: connect to MongoDB and bring the Users collection's indexes up to date.
///
pub async fn lib_main() -> Result<(), AccountError> {

    // Load any local dev settings as environment variables from a .env file.
    dotenv().ok();

    // Default log level to INFO if it's not specified.
    config::default_env("RUST_LOG", "INFO");

    // Load the service configuration into struct.
    let config = Configuration::from_env()?;

    init_tracing();

    tracing::info!("{}\n{}", BANNER, config.fmt_console()?);

    let ctx = connect(config).await?;

    tracing::info!("{} ready, passwords hashed with bcrypt cost {}", APP_NAME, ctx.config().bcrypt_cost);
    Ok(())
}

///
/// Build a service context backed by MongoDB, ensuring the schema is in sync with the code.
///
pub async fn connect(config: Configuration) -> Result<ServiceContext, AccountError> {
    config.validate()?;

    // Create a MongoDB client and connect to it before proceeding.
    let db = mongo::get_mongo_db(APP_NAME, &config).await?;

    // Ensure the unique indexes exist - email uniqueness relies on them.
    mongo::update_mongo(&db).await?;

    Ok(ServiceContext::new(config, Arc::new(MongoUserStore::new(db))))
}

///
/// Initialise tracing at the level given by the RUST_LOG env variable.
///
pub fn init_tracing() {
    if let Err(err) = Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env()) // Set the tracing level to match RUST_LOG env variable.
        .with(tracing_subscriber::fmt::layer().with_test_writer().with_ansi(true))
        .try_init() {
            tracing::info!("Tracing already initialised: {}", err.to_string()); // Allowed error here - tests call this fn repeatedly.
    }
}

const BANNER: &str = r#"
   ___                              __
  / _ | ___________  __ _____  ___ / /____
 / __ |/ __/ __/ _ \/ // / _ \/ _ / __(_-<
/_/ |_|\__/\__/\___/\_,_/_//_/\__/\__/___/
"#;
