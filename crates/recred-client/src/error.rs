//! Error taxonomy for the reset client.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure reaching either remote service.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The report service answered with a non-200 status.
    #[error("report service returned HTTP {status}")]
    ReportService { status: u16 },

    /// The report response envelope or payload could not be decoded.
    #[error("report payload invalid: {0}")]
    ReportPayload(String),

    /// The bulk endpoint rejected the batch as a whole.
    #[error("{message} (HTTP {status})")]
    Batch { status: u16, message: String },

    /// Requested password cannot satisfy the composition policy.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("password length {0} cannot hold all four required character classes (minimum 4)")]
    TooShort(usize),
}
