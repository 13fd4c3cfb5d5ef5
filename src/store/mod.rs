//! Durable storage for the election and the accounts that may act on it.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::{
    error::Result,
    ledger::JurisdictionResult,
    model::{
        db::{
            account::{Account, NewAccount},
            election::ElectionRecord,
        },
        mongodb::Id,
    },
};

/// A backend holding the election state.
///
/// Implementations only store what they are given. Validation is the ledger's job,
/// and serialisation of writers is the service's.
#[rocket::async_trait]
pub trait Store: Send + Sync {
    /// The election record, or `None` if no election has been created yet.
    async fn load_election(&self) -> Result<Option<ElectionRecord>>;

    async fn create_election(&self, record: &ElectionRecord) -> Result<()>;

    /// Mark the election as ended.
    async fn set_ended(&self) -> Result<()>;

    async fn set_operator(&self, operator: Option<Id>) -> Result<()>;

    /// All accepted jurisdiction results, in no particular order.
    async fn load_results(&self) -> Result<Vec<JurisdictionResult>>;

    async fn insert_result(&self, result: &JurisdictionResult) -> Result<()>;

    async fn find_account(&self, id: Id) -> Result<Option<Account>>;

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>>;

    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Insert an account, failing if the username is taken.
    async fn insert_account(&self, account: &NewAccount) -> Result<Account>;
}
