//! CLI error types.
//!
//! Errors fall into two tiers. Curated errors are expected outcomes of a
//! lookup (bad arguments, unknown user) and print a single fixed message.
//! Unrecoverable errors wrap a failure from the admin API or the encoder and
//! print the raw cause chain.

use std::process::ExitCode;

use thiserror::Error;

/// Exit status for curated failures.
pub const EXIT_CURATED: u8 = 1;

/// Exit status for unrecoverable failures.
pub const EXIT_UNRECOVERABLE: u8 = 2;

/// Failure talking to the admin API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport, TLS, or body decoding failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The configured server URL cannot be used as a base URL.
    #[error("invalid server URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },
}

/// How an error is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    /// One-line message, exit status 1.
    Curated,
    /// Raw cause chain, exit status 2.
    Unrecoverable,
}

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Realm or username missing from the command line.
    #[error("missing argument: realm or username not provided")]
    MissingArgument,

    /// Command line could not be parsed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The search returned no users.
    #[error("user not found")]
    UserNotFound,

    /// The matched user carries no attribute map.
    #[error("user has no attributes")]
    NoAttributes,

    /// Admin login failed.
    #[error("admin login failed")]
    Auth(#[source] ApiError),

    /// User search failed.
    #[error("user search failed")]
    Search(#[source] ApiError),

    /// Attribute map could not be encoded.
    #[error("failed to encode attributes")]
    Serialize(#[source] serde_json::Error),

    /// Writing the result failed.
    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Returns the tier this error belongs to.
    pub fn tier(&self) -> ErrorTier {
        match self {
            Self::MissingArgument
            | Self::InvalidArgument(_)
            | Self::UserNotFound
            | Self::NoAttributes => ErrorTier::Curated,
            Self::Auth(_) | Self::Search(_) | Self::Serialize(_) | Self::Io(_) => {
                ErrorTier::Unrecoverable
            }
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Returns the numeric exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self.tier() {
            ErrorTier::Curated => EXIT_CURATED,
            ErrorTier::Unrecoverable => EXIT_UNRECOVERABLE,
        }
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
