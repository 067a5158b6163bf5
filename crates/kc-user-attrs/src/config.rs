//! Admin connection configuration.
//!
//! Values come from the process environment, after an optional `.env` file
//! in the working directory has been loaded. Variables that are already set
//! win over the file. Nothing is validated here: an unset credential is an
//! empty string and is rejected by the server at login.

use std::fmt;
use std::path::PathBuf;

/// Default realm-base path prefix (Keycloak 17+ layout).
pub const DEFAULT_REALMS_PATH: &str = "realms";

/// Default admin-realm-base path prefix (Keycloak 17+ layout).
pub const DEFAULT_ADMIN_REALMS_PATH: &str = "admin/realms";

/// Client used for the admin password grant.
pub const DEFAULT_ADMIN_CLIENT_ID: &str = "admin-cli";

/// Environment variable names.
pub mod vars {
    /// Admin username.
    pub const ADMIN_USERNAME: &str = "ADMIN_USERNAME";
    /// Admin password.
    pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
    /// Realm the admin logs into.
    pub const ADMIN_REALM: &str = "ADMIN_REALM";
    /// Server base URL.
    pub const SERVER: &str = "SERVER";
    /// Realm-base path prefix override.
    pub const REALMS_PATH: &str = "KC_AUTH_REALMS_PATH";
    /// Admin-realm-base path prefix override.
    pub const ADMIN_REALMS_PATH: &str = "KC_AUTH_ADMIN_REALMS_PATH";
    /// Admin client ID override.
    pub const ADMIN_CLIENT_ID: &str = "KC_ADMIN_CLIENT_ID";
}

/// Loads `.env` from the working directory, if there is one.
///
/// Returns the path of the loaded file. Variables already present in the
/// environment are not overwritten.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// URL path prefixes under the server base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    /// Prefix for realm endpoints, e.g. `realms`.
    pub realms: String,
    /// Prefix for admin endpoints, e.g. `admin/realms`.
    pub admin_realms: String,
}

impl PathLayout {
    /// Creates a layout, stripping surrounding slashes from both prefixes.
    pub fn new(realms: impl AsRef<str>, admin_realms: impl AsRef<str>) -> Self {
        Self {
            realms: realms.as_ref().trim_matches('/').to_string(),
            admin_realms: admin_realms.as_ref().trim_matches('/').to_string(),
        }
    }
}

impl Default for PathLayout {
    fn default() -> Self {
        Self::new(DEFAULT_REALMS_PATH, DEFAULT_ADMIN_REALMS_PATH)
    }
}

/// Admin connection configuration.
#[derive(Clone)]
pub struct AdminConfig {
    /// Admin username.
    pub admin_username: String,
    /// Admin password.
    pub admin_password: String,
    /// Realm the admin account lives in.
    pub admin_realm: String,
    /// Server base URL.
    pub server_url: String,
    /// Client ID used for the password grant.
    pub client_id: String,
    /// Path prefixes.
    pub paths: PathLayout,
}

impl AdminConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();
        let var_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            admin_username: var(vars::ADMIN_USERNAME),
            admin_password: var(vars::ADMIN_PASSWORD),
            admin_realm: var(vars::ADMIN_REALM),
            server_url: var(vars::SERVER),
            client_id: var_or(vars::ADMIN_CLIENT_ID, DEFAULT_ADMIN_CLIENT_ID),
            paths: PathLayout::new(
                var_or(vars::REALMS_PATH, DEFAULT_REALMS_PATH),
                var_or(vars::ADMIN_REALMS_PATH, DEFAULT_ADMIN_REALMS_PATH),
            ),
        }
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"********")
            .field("admin_realm", &self.admin_realm)
            .field("server_url", &self.server_url)
            .field("client_id", &self.client_id)
            .field("paths", &self.paths)
            .finish()
    }
}
