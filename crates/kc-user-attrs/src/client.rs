//! Admin API client.

use async_trait::async_trait;
use reqwest::{Request, Url};

use crate::config::{AdminConfig, PathLayout};
use crate::dto::{AccessToken, GetUsersParams, UserRepresentation};
use crate::error::ApiError;

/// Operations the lookup needs from the identity server.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Logs in as an administrator with the password grant.
    async fn login_admin(
        &self,
        username: &str,
        password: &str,
        realm: &str,
    ) -> Result<AccessToken, ApiError>;

    /// Searches users of `realm`.
    async fn get_users(
        &self,
        token: &AccessToken,
        realm: &str,
        params: &GetUsersParams,
    ) -> Result<Vec<UserRepresentation>, ApiError>;
}

/// HTTP client for the Keycloak admin REST API.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    paths: PathLayout,
}

impl ApiClient {
    /// Creates a client for the server in `config`.
    ///
    /// The base URL is only parsed when a request is built, so a malformed
    /// URL surfaces as a login failure.
    pub fn new(config: &AdminConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            base_url: config.server_url.clone(),
            client_id: config.client_id.clone(),
            paths: config.paths.clone(),
        })
    }

    /// Builds `{base}/{prefix}/{realm}/{tail..}` with each segment escaped.
    fn endpoint(&self, prefix: &str, realm: &str, tail: &[&str]) -> Result<Url, ApiError> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| invalid("cannot be used as a base URL".to_string()))?;
            segments.pop_if_empty();
            segments.extend(prefix.split('/').filter(|s| !s.is_empty()));
            segments.push(realm);
            segments.extend(tail);
        }
        Ok(url)
    }

    /// Builds the admin token request.
    pub fn login_request(
        &self,
        username: &str,
        password: &str,
        realm: &str,
    ) -> Result<Request, ApiError> {
        let url = self.endpoint(
            &self.paths.realms,
            realm,
            &["protocol", "openid-connect", "token"],
        )?;

        let form = [
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("username", username),
            ("password", password),
        ];

        Ok(self.client.post(url).form(&form).build()?)
    }

    /// Builds the user search request.
    pub fn search_request(
        &self,
        token: &AccessToken,
        realm: &str,
        params: &GetUsersParams,
    ) -> Result<Request, ApiError> {
        let url = self.endpoint(&self.paths.admin_realms, realm, &["users"])?;

        Ok(self
            .client
            .get(url)
            .bearer_auth(&token.access_token)
            .query(params)
            .build()?)
    }
}

#[async_trait]
impl AdminApi for ApiClient {
    async fn login_admin(
        &self,
        username: &str,
        password: &str,
        realm: &str,
    ) -> Result<AccessToken, ApiError> {
        let request = self.login_request(username, password, realm)?;
        tracing::debug!(url = %request.url(), "requesting admin token");

        let response = self.client.execute(request).await?;
        handle_response(response).await
    }

    async fn get_users(
        &self,
        token: &AccessToken,
        realm: &str,
        params: &GetUsersParams,
    ) -> Result<Vec<UserRepresentation>, ApiError> {
        let request = self.search_request(token, realm, params)?;
        tracing::debug!(url = %request.url(), "searching users");

        let response = self.client.execute(request).await?;
        handle_response(response).await
    }
}

/// Decodes a success body, or turns the status and body into an error.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        response.json().await.map_err(ApiError::Http)
    } else {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
