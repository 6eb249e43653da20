use argon2::password_hash::Error as ArError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use jsonwebtoken::errors::Error as JWError;
use serde::Serialize;
use surrealdb::Error as SError;

use thiserror::Error;
use tracing::error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Argon 2 Error: {0}")]
    Argon2Error(#[from] ArError),

    #[error("Json web token Error: {0}")]
    JwTError(#[from] JWError),

    #[error("SurrealDb Error: {0}")]
    SurrealError(#[from] SError),

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Axum Error: {0}")]
    AxumError(#[from] axum::Error),

    #[error("Validator Error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Json Rejection Error: {0}")]
    AxumJsonRejection(#[from] axum::extract::rejection::JsonRejection),

    #[error("`{0}` is not a record id")]
    InvalidRecordId(String),

    // ! Credential resolution
    #[error("No account with email `{0}`")]
    EmailNotFound(String),
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Account is not activated")]
    AccountInactive,
    #[error("Account is suspended")]
    AccountSuspended,
    #[error("Account is pending review")]
    AccountPending,

    // ! Invite ledger / flow
    #[error("A pending invite already exists for `{0}`")]
    DuplicatePending(String),
    #[error("Invite not found")]
    InviteNotFound,
    #[error("Invite already used")]
    InviteAlreadyUsed,
    #[error("Invite expired")]
    InviteExpired,
    #[error("Invite was issued for a different email")]
    EmailMismatch,
    #[error("User already belongs to another organization")]
    AlreadyInAnotherOrg,
    #[error("User with email `{0}` already exists!")]
    EmailExist(String),

    // ! Membership invariants
    #[error("Cannot remove the last admin of an organization")]
    LastAdmin,
    #[error("User is not an admin of this organization")]
    NotAnAdmin,
    #[error("User is not a recruiter of this organization")]
    NotARecruiter,

    #[error("Not Found")]
    NotFound,
    #[error("Internal Error")]
    Internal,

    // ! Session
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid authorization token")]
    InvalidToken,
    #[error("Invalid authorization scheme")]
    InvalidScheme,
    #[error("Token expired")]
    TokenExpired,
    #[error("Caller lacks the required capability")]
    Forbidden,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl Error {
    /// Stable machine-readable code. Callers branch on this, never on the
    /// message text.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Argon2Error(_)
            | Error::JwTError(_)
            | Error::SurrealError(_)
            | Error::IoError(_)
            | Error::AxumError(_)
            | Error::Internal => "INTERNAL",
            Error::ValidationError(_) | Error::AxumJsonRejection(_) | Error::InvalidRecordId(_) => {
                "VALIDATION"
            }
            Error::EmailNotFound(_) => "EMAIL_NOT_FOUND",
            Error::InvalidPassword => "INVALID_PASSWORD",
            Error::AccountInactive => "ACCOUNT_INACTIVE",
            Error::AccountSuspended => "ACCOUNT_SUSPENDED",
            Error::AccountPending => "ACCOUNT_PENDING",
            Error::DuplicatePending(_) => "DUPLICATE_PENDING",
            Error::InviteNotFound => "NOT_FOUND",
            Error::InviteAlreadyUsed => "ALREADY_USED",
            Error::InviteExpired => "EXPIRED",
            Error::EmailMismatch => "EMAIL_MISMATCH",
            Error::AlreadyInAnotherOrg => "ALREADY_IN_ANOTHER_ORG",
            Error::EmailExist(_) => "EMAIL_EXISTS",
            Error::LastAdmin => "LAST_ADMIN",
            Error::NotAnAdmin => "NOT_AN_ADMIN",
            Error::NotARecruiter => "NOT_A_RECRUITER",
            Error::NotFound => "NOT_FOUND",
            Error::MissingToken | Error::InvalidToken | Error::InvalidScheme | Error::TokenExpired => {
                "UNAUTHORIZED"
            }
            Error::Forbidden => "FORBIDDEN",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::Argon2Error(_)
            | Error::JwTError(_)
            | Error::SurrealError(_)
            | Error::IoError(_)
            | Error::AxumError(_)
            | Error::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Error::ValidationError(_)
            | Error::AxumJsonRejection(_)
            | Error::InvalidRecordId(_)
            | Error::EmailMismatch
            | Error::EmailExist(_) => StatusCode::BAD_REQUEST,
            Error::EmailNotFound(_) | Error::InvalidPassword => StatusCode::UNAUTHORIZED,
            Error::AccountInactive | Error::AccountSuspended | Error::AccountPending => {
                StatusCode::FORBIDDEN
            }
            Error::DuplicatePending(_)
            | Error::InviteAlreadyUsed
            | Error::AlreadyInAnotherOrg
            | Error::LastAdmin
            | Error::NotAnAdmin
            | Error::NotARecruiter => StatusCode::CONFLICT,
            Error::InviteExpired => StatusCode::GONE,
            Error::InviteNotFound | Error::NotFound => StatusCode::NOT_FOUND,
            Error::MissingToken | Error::InvalidToken | Error::InvalidScheme | Error::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Error::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let message = match &self {
            Error::Argon2Error(error) => {
                error!("Argon 2 Error:{:#?}", error);
                "Internal Error".to_string()
            }
            Error::JwTError(error) => {
                error!("JWT Error:{:#?}", error);
                "Internal Error".to_string()
            }
            Error::SurrealError(error) => {
                error!("Surreal Error:{:#?}", error);
                "Internal Error".to_string()
            }
            Error::IoError(error) => {
                error!("Io Error:{:#?}", error);
                "Internal Error".to_string()
            }
            Error::AxumError(error) => {
                error!("Axum Error:{:#?}", error);
                "Internal Error".to_string()
            }
            Error::ValidationError(error) => {
                format!("Input validation error: [{}]", error).replace('\n', ", ")
            }
            other => other.to_string(),
        };

        let status = self.status();
        let body = ErrorBody {
            code: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
