use argon2::Config;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::db::account::NewAccount;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw account credentials, received from a user. These are never stored directly,
/// since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct AccountCredentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<AccountCredentials> for NewAccount {
    type Error = argon2::Error;

    /// Convert [`AccountCredentials`] to a new account by hashing the password.
    fn try_from(cred: AccountCredentials) -> Result<Self, Self::Error> {
        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default())?;
        Ok(Self {
            username: cred.username,
            password_hash,
        })
    }
}

impl AccountCredentials {
    /// Is the username non-empty and the password long enough?
    pub fn is_acceptable(&self) -> bool {
        !self.username.is_empty() && self.password.len() >= MIN_PASSWORD_LENGTH
    }
}

/// A request to hand the operator role to another account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperatorTransfer {
    pub username: String,
}

#[cfg(test)]
mod examples {
    use super::*;

    impl AccountCredentials {
        pub fn operator() -> Self {
            Self {
                username: crate::model::db::account::DEFAULT_OPERATOR_USERNAME.into(),
                password: "operator-password".into(),
            }
        }

        pub fn example1() -> Self {
            Self {
                username: "alice112".into(),
                password: "tallyh0ward".into(),
            }
        }

        pub fn example2() -> Self {
            Self {
                username: "bobthecounter".into(),
                password: "totallysecurepassword".into(),
            }
        }

        pub fn empty() -> Self {
            Self {
                username: "".into(),
                password: "".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let credentials = AccountCredentials::example1();
        assert!(credentials.is_acceptable());
        let account = NewAccount::try_from(credentials.clone()).unwrap();
        assert_eq!(account.username, credentials.username);
        assert_ne!(account.password_hash, credentials.password);
        assert!(account.verify_password(&credentials.password));
        assert!(!account.verify_password("wrong password"));
    }

    #[test]
    fn unacceptable_credentials() {
        assert!(!AccountCredentials::empty().is_acceptable());
        let short = AccountCredentials {
            username: "carol".into(),
            password: "short".into(),
        };
        assert!(!short.is_acceptable());
    }
}
