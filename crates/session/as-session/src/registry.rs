//! Shared, lazily-initialized clients.

use as_error::{AsError, Result, SessionError};
use as_types::ServiceKind;
use aws_config::SdkConfig;
use std::sync::OnceLock;
use tokio::sync::OnceCell;
use tracing::{debug, error};

use crate::client::{ServiceClient, build_s3_client, build_sqs_client, load_sdk_config};
use crate::config::SessionConfig;

static GLOBAL_REGISTRY: OnceLock<ClientRegistry> = OnceLock::new();

/// Read-only registry of SDK clients keyed by service.
///
/// The SDK configuration and each client are built on first use behind a
/// single initialization barrier, then shared. Concurrent first callers wait
/// for the same initialization; a failed initialization is not cached and the
/// next caller tries again.
///
/// SDK clients are reference counted, so the accessors hand out cheap clones.
#[derive(Debug)]
pub struct ClientRegistry {
    config: SessionConfig,
    sdk_config: OnceCell<SdkConfig>,
    s3: OnceCell<aws_sdk_s3::Client>,
    sqs: OnceCell<aws_sdk_sqs::Client>,
}

impl ClientRegistry {
    /// Create an empty registry. Nothing is loaded until a client is requested.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sdk_config: OnceCell::new(),
            s3: OnceCell::new(),
            sqs: OnceCell::new(),
        }
    }

    /// Install the process-wide registry.
    ///
    /// Fails with [`SessionError::AlreadyInitialized`] if one is installed.
    pub fn install_global(config: SessionConfig) -> Result<&'static ClientRegistry> {
        let mut installed = false;
        let registry = GLOBAL_REGISTRY.get_or_init(|| {
            installed = true;
            ClientRegistry::new(config)
        });

        if installed {
            Ok(registry)
        } else {
            Err(SessionError::AlreadyInitialized.into())
        }
    }

    /// The process-wide registry.
    pub fn global() -> Result<&'static ClientRegistry> {
        GLOBAL_REGISTRY
            .get()
            .ok_or_else(|| SessionError::NotInitialized.into())
    }

    /// The configuration clients are built from.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns true if the client for `kind` has been built.
    pub fn is_initialized(&self, kind: ServiceKind) -> bool {
        match kind {
            ServiceKind::S3 => self.s3.initialized(),
            ServiceKind::Sqs => self.sqs.initialized(),
        }
    }

    /// The shared S3 client.
    pub async fn s3(&self) -> Result<aws_sdk_s3::Client> {
        let client = self
            .s3
            .get_or_try_init(|| async {
                let sdk_config = self.sdk_config().await?;
                debug!(service = %ServiceKind::S3, "Building client");
                Ok::<_, AsError>(build_s3_client(sdk_config, &self.config))
            })
            .await
            .inspect_err(|e| error!(service = %ServiceKind::S3, error = %e, "Error creating client"))?;
        Ok(client.clone())
    }

    /// The shared SQS client.
    pub async fn sqs(&self) -> Result<aws_sdk_sqs::Client> {
        let client = self
            .sqs
            .get_or_try_init(|| async {
                let sdk_config = self.sdk_config().await?;
                debug!(service = %ServiceKind::Sqs, "Building client");
                Ok::<_, AsError>(build_sqs_client(sdk_config))
            })
            .await
            .inspect_err(|e| error!(service = %ServiceKind::Sqs, error = %e, "Error creating client"))?;
        Ok(client.clone())
    }

    /// The shared client for a named service (`"s3"` or `"sqs"`).
    pub async fn client(&self, service_name: &str) -> Result<ServiceClient> {
        let kind: ServiceKind = service_name
            .parse()
            .inspect_err(|e| error!(service = service_name, error = %e, "Error creating client"))?;
        self.client_for(kind).await
    }

    /// The shared client for a service.
    pub async fn client_for(&self, kind: ServiceKind) -> Result<ServiceClient> {
        match kind {
            ServiceKind::S3 => self.s3().await.map(ServiceClient::S3),
            ServiceKind::Sqs => self.sqs().await.map(ServiceClient::Sqs),
        }
    }

    async fn sdk_config(&self) -> Result<&SdkConfig> {
        self.sdk_config
            .get_or_try_init(|| load_sdk_config(&self.config))
            .await
    }
}
