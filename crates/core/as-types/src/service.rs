//! Remote service identifiers.

use as_error::{AsError, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A remote service a client handle can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Object store
    S3,

    /// Message queue
    Sqs,
}

impl ServiceKind {
    /// The SDK service name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::S3 => "s3",
            ServiceKind::Sqs => "sqs",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = AsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(ServiceKind::S3),
            "sqs" => Ok(ServiceKind::Sqs),
            _ => Err(SessionError::UnknownService(s.to_string()).into()),
        }
    }
}
