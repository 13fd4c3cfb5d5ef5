use mongodb::{bson::doc, Database};
use rocket::{futures::TryStreamExt, http::Status};

use crate::{
    error::{Error, Result},
    ledger::{JurisdictionResult, LedgerError},
    model::{
        db::{
            account::{Account, NewAccount},
            election::{ElectionRecord, ELECTION_RECORD_ID},
        },
        mongodb::{ensure_indexes_exist, is_duplicate_key_error, Coll, Id},
    },
};

use super::Store;

/// A store backed by a MongoDB database.
pub struct MongoStore {
    accounts: Coll<Account>,
    new_accounts: Coll<NewAccount>,
    results: Coll<JurisdictionResult>,
    election: Coll<ElectionRecord>,
}

impl MongoStore {
    /// Wrap the given database, creating any missing indexes.
    pub async fn connect(db: &Database) -> Result<Self> {
        ensure_indexes_exist(db).await?;
        Ok(Self {
            accounts: Coll::from_db(db),
            new_accounts: Coll::from_db(db),
            results: Coll::from_db(db),
            election: Coll::from_db(db),
        })
    }

    /// Update the election document, failing if it does not exist.
    async fn update_election(&self, update: mongodb::bson::Document) -> Result<()> {
        let result = self
            .election
            .update_one(doc! { "_id": ELECTION_RECORD_ID }, update, None)
            .await?;
        if result.matched_count == 0 {
            return Err(Error::Status(
                Status::InternalServerError,
                "No election has been created".to_string(),
            ));
        }
        Ok(())
    }
}

#[rocket::async_trait]
impl Store for MongoStore {
    async fn load_election(&self) -> Result<Option<ElectionRecord>> {
        let record = self
            .election
            .find_one(doc! { "_id": ELECTION_RECORD_ID }, None)
            .await?;
        Ok(record)
    }

    async fn create_election(&self, record: &ElectionRecord) -> Result<()> {
        match self.election.insert_one(record, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key_error(&e) => Err(Error::Status(
                Status::Conflict,
                "An election already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_ended(&self) -> Result<()> {
        self.update_election(doc! { "$set": { "ended": true } })
            .await
    }

    async fn set_operator(&self, operator: Option<Id>) -> Result<()> {
        self.update_election(doc! { "$set": { "operator": operator } })
            .await
    }

    async fn load_results(&self) -> Result<Vec<JurisdictionResult>> {
        let results = self.results.find(None, None).await?.try_collect().await?;
        Ok(results)
    }

    async fn insert_result(&self, result: &JurisdictionResult) -> Result<()> {
        match self.results.insert_one(result, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key_error(&e) => {
                Err(LedgerError::DuplicateJurisdiction(result.name.clone()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_account(&self, id: Id) -> Result<Option<Account>> {
        Ok(self.accounts.find_one(id.as_doc(), None).await?)
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        let with_username = doc! {
            "username": username,
        };
        Ok(self.accounts.find_one(with_username, None).await?)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.find(None, None).await?.try_collect().await?;
        Ok(accounts)
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account> {
        let inserted = match self.new_accounts.insert_one(account, None).await {
            Ok(inserted) => inserted,
            Err(e) if is_duplicate_key_error(&e) => {
                return Err(Error::Status(
                    Status::Conflict,
                    format!("Username {} is taken", account.username),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        let id: Id = inserted
            .inserted_id
            .as_object_id()
            .ok_or_else(|| {
                Error::Status(
                    Status::InternalServerError,
                    "Database returned a non-ObjectId account ID".to_string(),
                )
            })?
            .into();
        Ok(Account {
            id,
            account: account.clone(),
        })
    }
}
