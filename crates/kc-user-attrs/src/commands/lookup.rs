//! User attribute lookup.

use crate::cli::LookupTarget;
use crate::client::{AdminApi, ApiClient};
use crate::config::AdminConfig;
use crate::dto::GetUsersParams;
use crate::error::{CliError, CliResult};
use crate::output::print_line;

/// Looks up `target` and prints its attributes as one line of JSON.
pub async fn run_lookup(target: LookupTarget, config: &AdminConfig) -> CliResult<()> {
    let client = ApiClient::new(config).map_err(CliError::Auth)?;
    let json = lookup_attributes(&client, config, &target).await?;
    print_line(&json)
}

/// Logs in, finds the user and returns its attribute map encoded as JSON.
///
/// Login strictly precedes the search; if it fails, no search is sent.
pub async fn lookup_attributes<A>(
    api: &A,
    config: &AdminConfig,
    target: &LookupTarget,
) -> CliResult<String>
where
    A: AdminApi + ?Sized,
{
    let token = api
        .login_admin(
            &config.admin_username,
            &config.admin_password,
            &config.admin_realm,
        )
        .await
        .map_err(CliError::Auth)?;
    tracing::debug!(admin_realm = %config.admin_realm, "admin login succeeded");

    let params = GetUsersParams::exact_enabled(target.username.as_str());
    let users = api
        .get_users(&token, &target.realm, &params)
        .await
        .map_err(CliError::Search)?;
    tracing::debug!(
        realm = %target.realm,
        username = %target.username,
        matches = users.len(),
        "user search finished"
    );

    let user = users.into_iter().next().ok_or(CliError::UserNotFound)?;
    let attributes = user.attributes.ok_or(CliError::NoAttributes)?;

    serde_json::to_string(&attributes).map_err(CliError::Serialize)
}
