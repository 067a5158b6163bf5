//! Admin API wire types.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Custom user attributes: attribute name to list of values.
///
/// Key order follows the server response.
pub type AttributeMap = IndexMap<String, Vec<String>>;

/// Token endpoint response for the admin login.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    /// The bearer token.
    pub access_token: String,

    /// Token type (normally "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,

    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,

    /// Refresh token lifetime in seconds.
    #[serde(default)]
    pub refresh_expires_in: Option<i64>,

    /// Refresh token, unused.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Granted scope.
    #[serde(default)]
    pub scope: Option<String>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// User as returned by the admin user search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    /// User ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Whether the account is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Custom attributes. `None` when the field is missing or `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeMap>,
}

/// Query filters for the user search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetUsersParams {
    /// Username filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Only enabled (or disabled) accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Match the username exactly instead of by substring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<bool>,
    /// Maximum number of results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl GetUsersParams {
    /// Single enabled account whose username is exactly `username`.
    pub fn exact_enabled(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            enabled: Some(true),
            exact: Some(true),
            max: Some(1),
        }
    }
}
