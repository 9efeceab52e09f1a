//! CLI error types and exit codes

use recred_client::ClientError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Authentication/authorization failure
/// - 3: Network error
/// - 4: Validation error
/// - 5: Server error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Could not run the lookup report (HTTP {status})")]
    ReportService { status: u16 },

    #[error("The report response could not be decoded: {0}")]
    ReportPayload(String),

    #[error("Bulk update rejected: {message} (HTTP {status})")]
    Batch { status: u16, message: String },

    #[error("Input error: {0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_) => 4,
            CliError::Network(_) | CliError::ConnectionFailed(_) => 3,
            CliError::ReportService { status } | CliError::Batch { status, .. } => {
                if *status == 401 || *status == 403 {
                    2
                } else if *status >= 500 {
                    5
                } else {
                    4
                }
            }
            CliError::ReportPayload(_) => 5,
            CliError::Input(_) | CliError::Io(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::ConnectionFailed(_) => Some("Check your network connection and try again."),
            CliError::ReportService { status } | CliError::Batch { status, .. }
                if *status == 401 || *status == 403 =>
            {
                Some("Verify the admin username and password, and the account's roles.")
            }
            CliError::ReportService { status: 404 } | CliError::Batch { status: 404, .. } => {
                Some("Check that the environment URL points at the right instance.")
            }
            _ => None,
        }
    }
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Transport(e) => {
                if e.is_connect() {
                    CliError::ConnectionFailed(e.to_string())
                } else if e.is_timeout() {
                    CliError::Network("Request timed out".to_string())
                } else {
                    CliError::Network(e.to_string())
                }
            }
            ClientError::ReportService { status } => CliError::ReportService { status },
            ClientError::ReportPayload(message) => CliError::ReportPayload(message),
            ClientError::Batch { status, message } => CliError::Batch { status, message },
            ClientError::Policy(e) => CliError::Validation(e.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("JSON error: {}", e))
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Input(format!("Prompt error: {}", e))
    }
}
