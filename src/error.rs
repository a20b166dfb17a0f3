use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not enough data for authentication")]
    NoDataForAuth,

    #[error("Authentication failed: unknown login")]
    IncorrectLogin,

    #[error("Authentication failed: wrong password")]
    IncorrectPassword,

    #[error("Authentication failed: unknown token")]
    IncorrectToken,

    #[error("No login given for the new account")]
    NoLoginForAccount,

    #[error("No password given for the new account")]
    NoPasswordForAccount,

    #[error("This login is already taken")]
    DuplicateLogin,

    #[error("Incorrect verification code")]
    IncorrectVerificationCode,

    #[error("Incorrect verification code, the flow must be restarted")]
    IncorrectVerificationCodeFatal,

    #[error("This phone is already registered")]
    AlreadyRegistered,

    #[error("This phone is not registered yet")]
    NotRegisteredYet,

    #[error("The email is already verified")]
    EmailIsVerified,

    #[error("New password and its confirmation do not match")]
    NewPasswordsMismatch,

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("Failed to dispatch notification: {0}")]
    SmsError(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// Stable error name surfaced to API clients in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::NoDataForAuth => "NoDataForAuth",
            AuthError::IncorrectLogin => "IncorrectLogin",
            AuthError::IncorrectPassword => "IncorrectPassword",
            AuthError::IncorrectToken => "IncorrectToken",
            AuthError::NoLoginForAccount => "NoLoginForAccount",
            AuthError::NoPasswordForAccount => "NoPasswordForAccount",
            AuthError::DuplicateLogin => "DuplicateLogin",
            AuthError::IncorrectVerificationCode => "IncorrectVerificationCode",
            AuthError::IncorrectVerificationCodeFatal => "IncorrectVerificationCodeFatal",
            AuthError::AlreadyRegistered => "AlreadyRegistered",
            AuthError::NotRegisteredYet => "NotRegisteredYet",
            AuthError::EmailIsVerified => "EmailIsVerified",
            AuthError::NewPasswordsMismatch => "NewPasswordsMismatch",
            AuthError::InvalidPhoneNumber(_) => "InvalidPhoneNumber",
            AuthError::SmsError(_) => "SmsError",
            AuthError::Store(_) => "Store",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AuthError::NoDataForAuth
            | AuthError::IncorrectLogin
            | AuthError::IncorrectPassword
            | AuthError::IncorrectToken => StatusCode::UNAUTHORIZED,
            AuthError::DuplicateLogin
            | AuthError::AlreadyRegistered
            | AuthError::EmailIsVerified => StatusCode::CONFLICT,
            AuthError::NotRegisteredYet => StatusCode::NOT_FOUND,
            AuthError::NoLoginForAccount
            | AuthError::NoPasswordForAccount
            | AuthError::IncorrectVerificationCode
            | AuthError::IncorrectVerificationCodeFatal
            | AuthError::NewPasswordsMismatch
            | AuthError::InvalidPhoneNumber(_) => StatusCode::BAD_REQUEST,
            AuthError::SmsError(_) => StatusCode::BAD_GATEWAY,
            AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn data(&self) -> serde_json::Value {
        match self {
            AuthError::InvalidPhoneNumber(number) => json!({ "number": number }),
            _ => json!({}),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "type": self.kind(),
            "message": self.to_string(),
            "data": self.data(),
        }));

        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return AuthError::DuplicateLogin;
            }
        }
        AuthError::Store(err.to_string())
    }
}
