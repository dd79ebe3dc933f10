//! Session handling for aws-services.
//!
//! This crate turns static credentials into SDK clients:
//! - [`SessionConfig`] / [`StaticCredentials`] - what to authenticate with
//! - [`create_client`] - build a client for a named service
//! - [`ClientRegistry`] - lazily built, shared clients keyed by service
//!
//! # Example
//!
//! ```ignore
//! use as_session::{ClientRegistry, SessionConfig};
//!
//! let config = SessionConfig::new()
//!     .with_credentials("AKIA...", "secret")
//!     .with_region("eu-west-1");
//!
//! let registry = ClientRegistry::new(config);
//! let s3 = registry.s3().await?;
//! let sqs = registry.sqs().await?;
//! ```

mod client;
mod config;
mod registry;

pub use client::{ServiceClient, build_s3_client, build_sqs_client, create_client, load_sdk_config};
pub use config::{SessionConfig, StaticCredentials};
pub use registry::ClientRegistry;
