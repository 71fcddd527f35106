// Token lifecycle state for the cloud API.
//
// The credential is plain data: the token grant flows live in
// `cloud::auth`, which mutates this state in place.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::Error;

// ── Clock ───────────────────────────────────────────────────────────

/// Source of "now" for token expiry checks.
///
/// The client asks the clock on every dispatched request, so tests can
/// move time forward without sleeping.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ── Token grant payload ─────────────────────────────────────────────

/// Successful answer of the OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token, in seconds from issue.
    pub expires_in: i64,
}

// ── Credential ──────────────────────────────────────────────────────

/// Client identity plus the current token state.
///
/// Created empty (client id and secret only), populated by the first
/// password grant and refreshed in place afterwards. A credential built
/// with [`Credential::from_access_token`] has no expiry and no refresh
/// token: it is never considered valid and never refreshed.
#[derive(Debug, Clone)]
pub struct Credential {
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    token_expiration_time: Option<DateTime<Utc>>,
}

impl Credential {
    /// Credential for the full OAuth2 flow.
    pub fn new(client_id: impl Into<String>, client_secret: SecretString) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret),
            access_token: None,
            refresh_token: None,
            token_expiration_time: None,
        }
    }

    /// Credential carrying only an externally obtained access token.
    pub fn from_access_token(access_token: SecretString) -> Self {
        Self {
            client_id: None,
            client_secret: None,
            access_token: Some(access_token),
            refresh_token: None,
            token_expiration_time: None,
        }
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub(crate) fn client_secret(&self) -> Option<&SecretString> {
        self.client_secret.as_ref()
    }

    pub fn access_token(&self) -> Option<&SecretString> {
        self.access_token.as_ref()
    }

    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    /// When the current access token stops being valid.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token_expiration_time
    }

    /// `true` when a refresh grant can be attempted.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Validity against the wall clock.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// `true` iff an access token is set and `now` is strictly before expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.token_expiration_time) {
            (Some(_), Some(expires_at)) => now < expires_at,
            _ => false,
        }
    }

    /// Install a fresh token grant issued at `issued_at`.
    ///
    /// Fails without touching the current state if `expires_in` is out of range.
    pub(crate) fn apply(
        &mut self,
        grant: TokenResponse,
        issued_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let expires_at = TimeDelta::try_seconds(grant.expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| Error::Authentication {
                message: format!("token lifetime out of range: {}s", grant.expires_in),
            })?;

        self.access_token = Some(SecretString::from(grant.access_token));
        self.refresh_token = Some(SecretString::from(grant.refresh_token));
        self.token_expiration_time = Some(expires_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use secrecy::ExposeSecret;

    use super::*;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid date")
    }

    fn grant(expires_in: i64) -> TokenResponse {
        TokenResponse {
            access_token: "A1".into(),
            refresh_token: "R1".into(),
            expires_in,
        }
    }

    #[test]
    fn empty_credential_is_invalid() {
        let cred = Credential::new("c", SecretString::from("s"));
        assert!(!cred.is_valid_at(issued()));
        assert!(!cred.can_refresh());
        assert_eq!(cred.client_id(), Some("c"));
    }

    #[test]
    fn valid_until_exact_expiry() {
        let mut cred = Credential::new("c", SecretString::from("s"));
        cred.apply(grant(3600), issued()).expect("apply grant");

        let expiry = issued() + TimeDelta::seconds(3600);
        assert_eq!(cred.expires_at(), Some(expiry));
        assert!(cred.is_valid_at(issued()));
        assert!(cred.is_valid_at(expiry - TimeDelta::milliseconds(1)));
        assert!(!cred.is_valid_at(expiry));
        assert!(!cred.is_valid_at(expiry + TimeDelta::seconds(1)));
    }

    #[test]
    fn past_expiry_is_never_valid() {
        let mut cred = Credential::new("c", SecretString::from("s"));
        cred.apply(grant(-10), issued()).expect("apply grant");
        assert!(!cred.is_valid_at(issued()));
        assert!(!cred.is_valid());
    }

    #[test]
    fn apply_replaces_tokens() {
        let mut cred = Credential::new("c", SecretString::from("s"));
        cred.apply(grant(60), issued()).expect("apply grant");
        cred.apply(
            TokenResponse {
                access_token: "A2".into(),
                refresh_token: "R2".into(),
                expires_in: 60,
            },
            issued(),
        )
        .expect("apply grant");

        assert_eq!(cred.access_token().map(|t| t.expose_secret()), Some("A2"));
        assert_eq!(cred.refresh_token().map(|t| t.expose_secret()), Some("R2"));
    }

    #[test]
    fn out_of_range_lifetime_leaves_state_untouched() {
        let mut cred = Credential::new("c", SecretString::from("s"));
        cred.apply(grant(60), issued()).expect("apply grant");
        let before = cred.expires_at();

        let result = cred.apply(grant(i64::MAX), issued());
        assert!(matches!(result, Err(Error::Authentication { .. })));
        assert_eq!(cred.expires_at(), before);
        assert_eq!(cred.access_token().map(|t| t.expose_secret()), Some("A1"));
    }

    #[test]
    fn access_token_only_never_valid_nor_refreshable() {
        let cred = Credential::from_access_token(SecretString::from("tok"));
        assert!(!cred.is_valid_at(issued()));
        assert!(!cred.can_refresh());
        assert!(cred.client_id().is_none());
    }
}
