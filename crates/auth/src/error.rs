use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    #[error("Token is malformed")]
    MalformedToken,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token lifetime pushes the expiry out of range")]
    ExpiryOutOfRange,

    #[error("Failed to serialize token: {0}")]
    Serialization(#[from] serde_json::Error),
}
