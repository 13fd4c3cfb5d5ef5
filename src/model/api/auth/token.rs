use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use rocket::{
    http::{Cookie, SameSite, Status},
    outcome::{try_outcome, IntoOutcome},
    request::{FromRequest, Outcome},
    time::Duration,
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::Error,
    model::{db::account::Account, mongodb::Id},
    service::LedgerService,
};

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// An authentication token identifying the account making a request.
///
/// Holding a token proves who the caller is, not that they may mutate the ledger;
/// that is decided by the ledger's authority.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthToken {
    pub id: Id,
}

impl AuthToken {
    /// Create a new [`AuthToken`] for the given account.
    pub fn new(account: &Account) -> Self {
        Self { id: account.id }
    }

    #[allow(clippy::missing_panics_doc)]
    /// Serialize this token into a cookie.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings");

        Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Deserialize a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'static>, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the cookie and check the account still exists.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` and `LedgerService` are always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();
        let service = req.guard::<&State<LedgerService>>().await.unwrap();

        let cookie = try_outcome!(req.cookies().get(AUTH_TOKEN_COOKIE).into_outcome((
            Status::Unauthorized,
            Error::Status(Status::Unauthorized, "Not logged in".to_string()),
        )));

        let token =
            try_outcome!(Self::from_cookie(cookie, config).into_outcome(Status::Unauthorized));

        match service.find_account(token.id).await {
            Ok(Some(_)) => Outcome::Success(token),
            Ok(None) => Outcome::Failure((
                Status::Unauthorized,
                Error::Status(Status::Unauthorized, "Account no longer exists".to_string()),
            )),
            Err(e) => Outcome::Failure((Status::InternalServerError, e)),
        }
    }
}
