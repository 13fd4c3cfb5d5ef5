use rocket::{http::Status, tokio::sync::Mutex};

use crate::{
    error::{Error, Result},
    ledger::{JurisdictionResult, LedgerError},
    model::{
        db::{
            account::{Account, NewAccount},
            election::ElectionRecord,
        },
        mongodb::Id,
    },
};

use super::Store;

#[derive(Default)]
struct MemoryState {
    election: Option<ElectionRecord>,
    results: Vec<JurisdictionResult>,
    accounts: Vec<Account>,
}

/// A store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn no_election() -> Error {
    Error::Status(
        Status::InternalServerError,
        "No election has been created".to_string(),
    )
}

#[rocket::async_trait]
impl Store for MemoryStore {
    async fn load_election(&self) -> Result<Option<ElectionRecord>> {
        Ok(self.state.lock().await.election.clone())
    }

    async fn create_election(&self, record: &ElectionRecord) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.election.is_some() {
            return Err(Error::Status(
                Status::Conflict,
                "An election already exists".to_string(),
            ));
        }
        state.election = Some(record.clone());
        Ok(())
    }

    async fn set_ended(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        let election = state.election.as_mut().ok_or_else(no_election)?;
        election.ended = true;
        Ok(())
    }

    async fn set_operator(&self, operator: Option<Id>) -> Result<()> {
        let mut state = self.state.lock().await;
        let election = state.election.as_mut().ok_or_else(no_election)?;
        election.operator = operator;
        Ok(())
    }

    async fn load_results(&self) -> Result<Vec<JurisdictionResult>> {
        Ok(self.state.lock().await.results.clone())
    }

    async fn insert_result(&self, result: &JurisdictionResult) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.results.iter().any(|r| r.name == result.name) {
            return Err(LedgerError::DuplicateJurisdiction(result.name.clone()).into());
        }
        state.results.push(result.clone());
        Ok(())
    }

    async fn find_account(&self, id: Id) -> Result<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.state.lock().await.accounts.clone())
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account> {
        let mut state = self.state.lock().await;
        if state.accounts.iter().any(|a| a.username == account.username) {
            return Err(Error::Status(
                Status::Conflict,
                format!("Username {} is taken", account.username),
            ));
        }
        let account = Account {
            id: Id::new(),
            account: account.clone(),
        };
        state.accounts.push(account.clone());
        Ok(account)
    }
}
