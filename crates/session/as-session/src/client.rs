//! SDK client creation.

use as_error::Result;
use as_types::ServiceKind;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::{debug, error};

use crate::config::SessionConfig;

/// Name reported by the static credentials provider.
const CREDENTIALS_PROVIDER_NAME: &str = "as-session";

/// An authenticated client bound to one service.
#[derive(Debug, Clone)]
pub enum ServiceClient {
    /// Object store client
    S3(aws_sdk_s3::Client),

    /// Message queue client
    Sqs(aws_sdk_sqs::Client),
}

impl ServiceClient {
    /// The service this client is bound to.
    pub fn kind(&self) -> ServiceKind {
        match self {
            ServiceClient::S3(_) => ServiceKind::S3,
            ServiceClient::Sqs(_) => ServiceKind::Sqs,
        }
    }

    /// The S3 client, if this handle is bound to S3.
    pub fn into_s3(self) -> Option<aws_sdk_s3::Client> {
        match self {
            ServiceClient::S3(client) => Some(client),
            ServiceClient::Sqs(_) => None,
        }
    }

    /// The SQS client, if this handle is bound to SQS.
    pub fn into_sqs(self) -> Option<aws_sdk_sqs::Client> {
        match self {
            ServiceClient::Sqs(client) => Some(client),
            ServiceClient::S3(_) => None,
        }
    }
}

/// Load the shared SDK configuration.
///
/// Explicit credentials are validated first; a blank key fails here rather
/// than on the first remote call.
pub async fn load_sdk_config(config: &SessionConfig) -> Result<SdkConfig> {
    config.validate()?;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let Some(creds) = &config.credentials {
        let credentials = aws_sdk_s3::config::Credentials::new(
            &creds.access_key,
            &creds.secret_key,
            creds.session_token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        loader = loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let sdk_config = loader.load().await;
    debug!(
        region = ?sdk_config.region(),
        endpoint = ?config.endpoint,
        "Loaded SDK configuration"
    );
    Ok(sdk_config)
}

/// Build an S3 client from a loaded SDK configuration.
///
/// Path-style addressing is forced when a custom endpoint is configured.
pub fn build_s3_client(sdk_config: &SdkConfig, config: &SessionConfig) -> aws_sdk_s3::Client {
    let builder = aws_sdk_s3::config::Builder::from(sdk_config);

    let s3_config = if config.endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    aws_sdk_s3::Client::from_conf(s3_config)
}

/// Build an SQS client from a loaded SDK configuration.
pub fn build_sqs_client(sdk_config: &SdkConfig) -> aws_sdk_sqs::Client {
    aws_sdk_sqs::Client::new(sdk_config)
}

/// Create a fresh client for the named service (`"s3"` or `"sqs"`).
///
/// Every call loads its own SDK configuration. Use
/// [`ClientRegistry`](crate::ClientRegistry) to share clients between calls.
pub async fn create_client(config: &SessionConfig, service_name: &str) -> Result<ServiceClient> {
    let result = try_create_client(config, service_name).await;

    if let Err(e) = &result {
        error!(service = service_name, error = %e, "Error creating client");
    }
    result
}

async fn try_create_client(config: &SessionConfig, service_name: &str) -> Result<ServiceClient> {
    let kind: ServiceKind = service_name.parse()?;
    let sdk_config = load_sdk_config(config).await?;

    Ok(match kind {
        ServiceKind::S3 => ServiceClient::S3(build_s3_client(&sdk_config, config)),
        ServiceKind::Sqs => ServiceClient::Sqs(build_sqs_client(&sdk_config)),
    })
}
