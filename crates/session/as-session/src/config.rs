//! Session configuration.

use as_error::{AsError, Result, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A static access key / secret key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCredentials {
    /// Access key id
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Session token for temporary credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl StaticCredentials {
    /// Create a credential pair.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Set a session token.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Checks that neither key is blank.
    pub fn validate(&self) -> Result<()> {
        if self.access_key.trim().is_empty() {
            return Err(SessionError::InvalidCredentials("access key is empty".to_string()).into());
        }
        if self.secret_key.trim().is_empty() {
            return Err(SessionError::InvalidCredentials("secret key is empty".to_string()).into());
        }
        Ok(())
    }
}

// Secrets never reach log output.
impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// Configuration for building SDK clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Explicit credentials. Uses the SDK default chain if not set.
    pub credentials: Option<StaticCredentials>,

    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// AWS profile name
    pub profile: Option<String>,
}

impl SessionConfig {
    /// Create an empty configuration (SDK defaults for everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the process environment.
    ///
    /// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`,
    /// `AWS_REGION`, `AWS_ENDPOINT_URL` and `AWS_PROFILE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Fails if only one of the access key and secret key is present.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let credentials = match (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key), Some(secret_key)) => {
                let mut creds = StaticCredentials::new(access_key, secret_key);
                creds.session_token = get("AWS_SESSION_TOKEN");
                Some(creds)
            }
            (None, None) => None,
            _ => {
                return Err(AsError::Config(
                    "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together".to_string(),
                ));
            }
        };

        Ok(Self {
            credentials,
            region: get("AWS_REGION"),
            endpoint: get("AWS_ENDPOINT_URL"),
            profile: get("AWS_PROFILE"),
        })
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(StaticCredentials::new(access_key, secret_key));
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Checks explicit credentials, if any.
    pub fn validate(&self) -> Result<()> {
        match &self.credentials {
            Some(creds) => creds.validate(),
            None => Ok(()),
        }
    }
}
