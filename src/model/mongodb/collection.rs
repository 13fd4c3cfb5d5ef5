use std::ops::Deref;

use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};

use crate::{
    ledger::JurisdictionResult,
    model::db::{
        account::{Account, NewAccount},
        election::ElectionRecord,
    },
};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Account collections
const ACCOUNTS: &str = "accounts";
impl MongoCollection for Account {
    const NAME: &'static str = ACCOUNTS;
}
impl MongoCollection for NewAccount {
    const NAME: &'static str = ACCOUNTS;
}

// Jurisdiction results collection
const JURISDICTIONS: &str = "jurisdictions";
impl MongoCollection for JurisdictionResult {
    const NAME: &'static str = JURISDICTIONS;
}

// Election collection, holding a single document
const ELECTION: &str = "election";
impl MongoCollection for ElectionRecord {
    const NAME: &'static str = ELECTION;
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();

    // Account collection.
    let account_index = IndexModel::builder()
        .keys(doc! {"username": 1})
        .options(unique.clone())
        .build();
    Coll::<Account>::from_db(db)
        .create_index(account_index, None)
        .await?;

    // Jurisdiction collection.
    let jurisdiction_index = IndexModel::builder()
        .keys(doc! {"name": 1})
        .options(unique)
        .build();
    Coll::<JurisdictionResult>::from_db(db)
        .create_index(jurisdiction_index, None)
        .await?;

    Ok(())
}
