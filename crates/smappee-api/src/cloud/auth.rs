// Cloud API authentication
//
// OAuth2 password and refresh grants against the token endpoint. Both
// grants update the client's credential in place; a failed grant leaves
// it untouched.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::auth::{Credential, TokenResponse};
use crate::cloud::client::SmappeeClient;
use crate::error::Error;

impl SmappeeClient {
    /// Exchange a Smappee username and password for an access token,
    /// refresh token and expiry.
    ///
    /// `POST {token}` with `grant_type=password`
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<&Credential, Error> {
        let (client_id, client_secret) = self.client_identity()?;

        debug!(username, "requesting access token (password grant)");

        let grant = self
            .request_token(&[
                ("grant_type", "password"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.expose_secret()),
                ("username", username),
                ("password", password.expose_secret()),
            ])
            .await?;

        self.install(grant)
    }

    /// Use the stored refresh token to obtain a new access token.
    ///
    /// `POST {token}` with `grant_type=refresh_token`. Called automatically
    /// by every API method that finds the token expired; never retried.
    pub async fn refresh(&mut self) -> Result<&Credential, Error> {
        let refresh_token = self
            .credential()
            .refresh_token()
            .cloned()
            .ok_or_else(|| Error::Authentication {
                message: "no refresh token available -- authenticate first".into(),
            })?;
        let (client_id, client_secret) = self.client_identity()?;

        debug!("refreshing access token");

        let grant = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.expose_secret()),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.expose_secret()),
            ])
            .await?;

        self.install(grant)
    }

    fn client_identity(&self) -> Result<(String, SecretString), Error> {
        let credential = self.credential();
        match (credential.client_id(), credential.client_secret()) {
            (Some(id), Some(secret)) => Ok((id.to_owned(), secret.clone())),
            _ => Err(Error::Authentication {
                message: "client id and secret are required for token grants".into(),
            }),
        }
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, Error> {
        let resp = self
            .http()
            .post(self.endpoints().token.clone())
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("token request rejected (HTTP {status}): {body}"),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Authentication {
            message: format!("malformed token response: {e}"),
        })
    }

    fn install(&mut self, grant: TokenResponse) -> Result<&Credential, Error> {
        let issued_at = self.now();
        self.credential_mut().apply(grant, issued_at)?;
        debug!(expires_at = ?self.credential().expires_at(), "access token acquired");
        Ok(self.credential())
    }
}
