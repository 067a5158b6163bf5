//! Output utilities.
//!
//! Results go to stdout, diagnostics to stderr, one line each.

use std::error::Error;
use std::io::Write;

use crate::error::{CliError, ErrorTier};

/// Writes `line` and a newline to stdout.
pub fn print_line(line: &str) -> crate::CliResult<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()?;
    Ok(())
}

/// Prints the diagnostic for `err` on stderr.
pub fn report(err: &CliError) {
    eprintln!("{}", diagnostic(err));
}

/// Formats the one-line diagnostic for `err`.
///
/// Unrecoverable errors carry their whole cause chain.
pub fn diagnostic(err: &CliError) -> String {
    match err.tier() {
        ErrorTier::Curated => err.to_string(),
        ErrorTier::Unrecoverable => format!("fatal: {}", error_chain(err)),
    }
}

/// Joins an error and its sources with `": "`.
pub fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    // Response bodies may span lines.
    message.replace(['\r', '\n'], " ")
}
