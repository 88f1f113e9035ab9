use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("No secrets or tokens found. Please check your configuration files.")]
    NoCredentials,

    #[error("Number of secrets and tokens must match ({secrets} secrets, {tokens} tokens).")]
    CredentialMismatch { secrets: usize, tokens: usize },

    #[error("Error reading harvest file: {0}")]
    Payload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", .0.message())]
    Request(#[from] TransportError),

    #[error("Invalid response structure: {0}")]
    InvalidResponse(String),
}

pub type HarvestResult<T> = Result<T, HarvestError>;
