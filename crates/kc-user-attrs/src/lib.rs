//! # kc-user-attrs
//!
//! Prints the custom attributes of a Keycloak user as JSON.
//!
//! The tool logs in to the admin API with credentials from the environment,
//! searches the given realm for an enabled user with exactly the given
//! username, and writes that user's attribute map to stdout:
//!
//! ```text
//! $ kc-user-attrs acme alice
//! {"team":["infra"],"level":["3"]}
//! ```
//!
//! Exit status is 0 on success, 1 for curated failures (missing arguments,
//! unknown user, user without attributes) and 2 when the admin API or the
//! encoder fails.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::AdminConfig;
pub use error::{CliError, CliResult};
