#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{figment::Figment, Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::Config;

use config::{ConfigFairing, StoreFairing};
use logging::LoggerFairing;
use service::LedgerService;

/// Build the server, loading configuration and the election store on ignition.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(StoreFairing)
        .attach(LoggerFairing)
}

/// Build the server around an election that has already been opened.
pub fn rocket_for_service(figment: Figment, service: LedgerService) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(LoggerFairing)
        .manage(service)
}

/// A server over a fresh in-memory election, for tests.
#[cfg(test)]
pub(crate) async fn test_rocket() -> Rocket<Build> {
    use std::sync::Arc;

    use model::api::account::AccountCredentials;
    use store::MemoryStore;

    let figment = rocket::Config::figment()
        .merge(("auth_ttl", 3600))
        .merge(("jwt_secret", "test jwt secret"))
        .merge(("log_level", "off"));
    let store = Arc::new(MemoryStore::new());
    let service = LedgerService::open(store, AccountCredentials::operator())
        .await
        .unwrap();
    rocket_for_service(figment, service)
}
