use std::sync::{Arc, RwLock};

use rocket::{http::Status, tokio::sync::Mutex};

use crate::{
    error::{Error, Result},
    ledger::{Authority, ElectionLedger, JurisdictionResult, Ownership},
    model::{
        api::account::AccountCredentials,
        db::{
            account::{Account, NewAccount},
            election::ElectionRecord,
        },
        mongodb::Id,
    },
    store::Store,
};

/// The long-lived home of the election.
///
/// Mutations are serialised by `writer`: each one works on a copy of the committed
/// ledger, persists, and only then publishes the copy. Readers take the committed
/// snapshot and never wait for a mutation in flight.
pub struct LedgerService {
    store: Arc<dyn Store>,
    writer: Mutex<()>,
    committed: RwLock<Arc<ElectionLedger>>,
}

impl LedgerService {
    /// Load the election from the store, creating it on first launch with the
    /// given credentials as its operator.
    pub async fn open(store: Arc<dyn Store>, bootstrap: AccountCredentials) -> Result<Self> {
        let record = match store.load_election().await? {
            Some(record) => record,
            None => {
                let operator = ensure_account_exists(store.as_ref(), bootstrap).await?;
                info!("Creating a new election run by {}", operator.username);
                let record = ElectionRecord::new(operator.id);
                store.create_election(&record).await?;
                record
            }
        };
        let results = store.load_results().await?;
        let ledger = ElectionLedger::restore(
            Ownership::restore(record.operator),
            results,
            record.ended,
        );
        info!(
            "Loaded election with {} results, leader is {}, ended: {}",
            ledger.tally().jurisdictions,
            ledger.current_leader(),
            ledger.election_ended()
        );

        Ok(Self {
            store,
            writer: Mutex::new(()),
            committed: RwLock::new(Arc::new(ledger)),
        })
    }

    /// The latest committed state of the election.
    pub fn snapshot(&self) -> Arc<ElectionLedger> {
        match self.committed.read() {
            Ok(ledger) => ledger.clone(),
            // Publishing is a single assignment, so a poisoned lock still holds a whole ledger.
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn publish(&self, ledger: ElectionLedger) {
        let ledger = Arc::new(ledger);
        match self.committed.write() {
            Ok(mut committed) => *committed = ledger,
            Err(poisoned) => *poisoned.into_inner() = ledger,
        }
    }

    /// Validate, persist and accept a jurisdiction result.
    pub async fn submit_result(&self, caller: Id, result: JurisdictionResult) -> Result<()> {
        let _writer = self.writer.lock().await;
        let mut staged = (*self.snapshot()).clone();
        staged.submit_result(&caller, result.clone())?;
        self.store.insert_result(&result).await.map_err(|e| {
            error!("Failed to store result for {}: {e}", result.name);
            e
        })?;
        info!(
            "Accepted {}: {} wins {} seats",
            result.name,
            result.winner(),
            result.seats
        );
        self.publish(staged);
        Ok(())
    }

    /// Close the election for good.
    pub async fn close(&self, caller: Id) -> Result<()> {
        let _writer = self.writer.lock().await;
        let mut staged = (*self.snapshot()).clone();
        let already_ended = staged.election_ended();
        staged.close(&caller)?;
        if already_ended {
            debug!("Election already closed");
            return Ok(());
        }
        self.store.set_ended().await?;
        info!("Election closed, final leader is {}", staged.current_leader());
        self.publish(staged);
        Ok(())
    }

    /// The account currently holding the operator role, if any.
    pub async fn operator(&self) -> Result<Option<Account>> {
        match self.snapshot().authority().operator() {
            Some(id) => self.store.find_account(id).await,
            None => Ok(None),
        }
    }

    /// Hand the operator role to the account with the given username.
    pub async fn transfer_operator(&self, caller: Id, username: &str) -> Result<()> {
        let _writer = self.writer.lock().await;
        let mut staged = (*self.snapshot()).clone();
        staged.authority().ensure_operator(&caller)?;
        let target = self
            .store
            .find_account_by_username(username)
            .await?
            .ok_or_else(|| Error::Status(Status::NotFound, format!("No account {username}")))?;
        staged.authority_mut().transfer(&caller, target.id)?;
        self.store.set_operator(Some(target.id)).await?;
        info!("Operator role transferred to {username}");
        self.publish(staged);
        Ok(())
    }

    /// Give up the operator role. Nobody can mutate the election afterwards.
    pub async fn renounce_operator(&self, caller: Id) -> Result<()> {
        let _writer = self.writer.lock().await;
        let mut staged = (*self.snapshot()).clone();
        staged.authority_mut().renounce(&caller)?;
        self.store.set_operator(None).await?;
        warn!("Operator role renounced, the election can no longer be changed");
        self.publish(staged);
        Ok(())
    }

    /// Create a new account. Only the operator may do this.
    pub async fn create_account(
        &self,
        caller: Id,
        credentials: AccountCredentials,
    ) -> Result<Account> {
        self.snapshot().authority().ensure_operator(&caller)?;
        if !credentials.is_acceptable() {
            return Err(Error::Status(
                Status::BadRequest,
                "Username must be non-empty and password at least 8 characters".to_string(),
            ));
        }
        let account = NewAccount::try_from(credentials)?;
        let account = self.store.insert_account(&account).await?;
        info!("Created account {}", account.username);
        Ok(account)
    }

    pub async fn find_account(&self, id: Id) -> Result<Option<Account>> {
        self.store.find_account(id).await
    }

    /// Find the account with the given username, if the password matches.
    pub async fn login(&self, credentials: &AccountCredentials) -> Result<Option<Account>> {
        let account = self
            .store
            .find_account_by_username(&credentials.username)
            .await?
            .filter(|account| account.verify_password(&credentials.password));
        Ok(account)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.store.list_accounts().await
    }
}

/// Get the account with the given username, creating it if it does not exist.
async fn ensure_account_exists(
    store: &dyn Store,
    credentials: AccountCredentials,
) -> Result<Account> {
    if let Some(account) = store.find_account_by_username(&credentials.username).await? {
        return Ok(account);
    }
    if !credentials.is_acceptable() {
        return Err(Error::Status(
            Status::InternalServerError,
            "Configured operator credentials are unacceptable".to_string(),
        ));
    }
    info!("Creating operator account {}", credentials.username);
    let account = NewAccount::try_from(credentials)?;
    store.insert_account(&account).await
}
