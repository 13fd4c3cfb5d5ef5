use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// Username of the account created on first launch, which starts out as the operator.
pub const DEFAULT_OPERATOR_USERNAME: &str = "operator";

/// Core account data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCore {
    pub username: String,
    pub password_hash: String,
}

impl AccountCore {
    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // A malformed hash can only come from a tampered database, so treat it as a mismatch.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap_or(false)
    }
}

/// An account without an ID.
pub type NewAccount = AccountCore;

/// An account from the database, with its unique ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub account: AccountCore,
}

impl Deref for Account {
    type Target = AccountCore;

    fn deref(&self) -> &Self::Target {
        &self.account
    }
}

impl DerefMut for Account {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.account
    }
}
