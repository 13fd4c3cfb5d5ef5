use argon2::Error as Argon2Error;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use mongodb::error::Error as DbError;
use rocket::{http::Status, response::Responder, serde::json::Json};
use serde::Serialize;
use thiserror::Error;

use crate::ledger::LedgerError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Argon2(#[from] Argon2Error),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    /// The HTTP status this error should produce.
    pub fn status(&self) -> Status {
        match self {
            Self::Ledger(err) => match err {
                LedgerError::Unauthorized => Status::Unauthorized,
                LedgerError::InvalidSeatCount
                | LedgerError::TiedResult
                | LedgerError::EmptyJurisdictionName => Status::BadRequest,
                LedgerError::DuplicateJurisdiction(_) | LedgerError::ElectionClosed => {
                    Status::Conflict
                }
            },
            Self::Db(_) => Status::InternalServerError,
            Self::Jwt(err) => match err.kind() {
                JwtErrorKind::ExpiredSignature | JwtErrorKind::ImmatureSignature => {
                    Status::Unauthorized
                }
                _ => Status::BadRequest,
            },
            Self::Argon2(_) => Status::BadRequest,
            Self::Status(status, _) => *status,
        }
    }

    /// A stable machine-readable name for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ledger(err) => err.code(),
            Self::Db(_) => "database",
            Self::Jwt(_) => "token",
            Self::Argon2(_) => "password",
            Self::Status(status, _) => match status.code {
                400 => "bad_request",
                401 => "unauthorized",
                404 => "not_found",
                409 => "conflict",
                _ => "internal",
            },
        }
    }
}

/// The JSON body sent with every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.class().is_server_error() {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        // Don't leak internal details to the client.
        let message = if status.class().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            error: self.code(),
            message,
        };
        (status, Json(body)).respond_to(req)
    }
}
