use std::sync::Arc;

use chrono::Duration;
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::{
    model::{api::account::AccountCredentials, db::account::DEFAULT_OPERATOR_USERNAME},
    service::LedgerService,
    store::{MemoryStore, MongoStore, Store},
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    // secrets
    jwt_secret: String,
}

impl Config {
    pub fn new(auth_ttl: u32, jwt_secret: String) -> Self {
        Self {
            auth_ttl,
            jwt_secret,
        }
    }

    /// Valid lifetime of auth token cookies in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to encrypt JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Where the election is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Mongodb,
    /// Process memory only; everything is lost on shutdown.
    Memory,
}

fn default_operator_username() -> String {
    DEFAULT_OPERATOR_USERNAME.to_string()
}

/// Configuration for the election store.
#[derive(Deserialize)]
struct StoreConfig {
    // non-secrets
    storage: StorageKind,
    #[serde(default = "default_operator_username")]
    operator_username: String,
    // secrets
    db_uri: Option<String>,
    operator_password: String,
}

/// A fairing that loads the store config, connects to the chosen backend,
/// restores the election, and places a [`LedgerService`] into managed state.
///
/// On first launch this creates the election and an operator account with the
/// configured credentials.
pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Election store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StoreConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load store config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let store: Arc<dyn Store> = match config.storage {
            StorageKind::Memory => {
                warn!("Using in-memory storage, the election will not survive a restart");
                Arc::new(MemoryStore::new())
            }
            StorageKind::Mongodb => {
                let Some(db_uri) = config.db_uri else {
                    error!("`db_uri` must be set when using MongoDB storage");
                    return Err(rocket);
                };
                info!("Loaded database config, connecting...");
                let client = match MongoClient::with_uri_str(db_uri).await {
                    Ok(client) => client,
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                };
                let db = client.database(&get_database_name());
                match MongoStore::connect(&db).await {
                    Ok(store) => {
                        info!("...database connection online!");
                        Arc::new(store)
                    }
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                }
            }
        };

        let bootstrap = AccountCredentials {
            username: config.operator_username,
            password: config.operator_password,
        };
        let service = match LedgerService::open(store, bootstrap).await {
            Ok(service) => service,
            Err(e) => {
                error!("Failed to load the election: {e}");
                return Err(rocket);
            }
        };

        Ok(rocket.manage(service))
    }
}

/// Get the name of the database to use.
fn get_database_name() -> String {
    "uselection".to_string()
}
