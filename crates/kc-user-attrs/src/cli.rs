//! CLI argument parsing.

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::{CliError, CliResult};

/// Print a Keycloak user's custom attributes as JSON.
///
/// Admin credentials are read from ADMIN_USERNAME, ADMIN_PASSWORD,
/// ADMIN_REALM and SERVER, or from a `.env` file in the working directory.
#[derive(Debug, Parser)]
#[command(name = "kc-user-attrs")]
#[command(author, version)]
pub struct Cli {
    /// REALM, then the USERNAME to look up (exact match, enabled accounts
    /// only). Values may start with '-'; anything after USERNAME is ignored.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// The user to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTarget {
    /// Realm name.
    pub realm: String,
    /// Username.
    pub username: String,
}

impl Cli {
    /// Parses `args`.
    ///
    /// The outer `Err` carries help and version requests, which clap prints
    /// and exits on its own. Every other parse failure becomes a curated
    /// [`CliError`].
    pub fn try_parse_args<I, T>(args: I) -> Result<CliResult<Self>, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(Ok(cli)),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Err(e)
            }
            Err(e) => Ok(Err(argument_error(&e))),
        }
    }

    /// Takes the first two positional arguments as realm and username.
    pub fn into_target(self) -> CliResult<LookupTarget> {
        let ignored = self.args.len().saturating_sub(2);
        let mut args = self.args.into_iter();

        match (args.next(), args.next()) {
            (Some(realm), Some(username)) => {
                if ignored > 0 {
                    tracing::debug!(ignored, "ignoring extra arguments");
                }
                Ok(LookupTarget { realm, username })
            }
            _ => Err(CliError::MissingArgument),
        }
    }
}

/// Reduces a clap error to a one-line curated error.
pub fn argument_error(err: &clap::Error) -> CliError {
    let rendered = err.to_string();
    let line = rendered
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("unrecognized arguments");
    let line = line.strip_prefix("error: ").unwrap_or(line);

    CliError::InvalidArgument(line.trim().to_string())
}
