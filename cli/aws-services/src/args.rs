//! CLI argument definitions for as-cli.

use as_cli_common::LogLevel;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// S3 and SQS helper commands.
///
/// Listing and message output is JSON Lines on stdout (one JSON object per
/// line). Logs are written to stderr.
///
/// ## Examples
///
/// List JSON files under a prefix:
///   as-cli list my-bucket --prefix logs/2024 --suffix .json
///
/// Against LocalStack:
///   as-cli --endpoint http://localhost:4566 send jobs '{"id": 1}'
///
/// Fan out one body:
///   as-cli broadcast '{"id": 1}' -q "$QUEUE_A" -q "$QUEUE_B"
#[derive(Parser, Debug)]
#[command(name = "as-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Log level
    #[arg(long, value_enum, global = true, default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Custom endpoint URL (for LocalStack)
    #[arg(long, global = true, env = "AWS_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// AWS access key ID
    #[arg(long, global = true, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, global = true, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one object and write its body to stdout or a file
    Get {
        /// Bucket name
        bucket: String,

        /// Object key
        key: String,

        /// Folder prepended to the key as "<subfolder>/<key>"
        #[arg(long)]
        subfolder: Option<String>,

        /// Write the body to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List objects as JSON Lines
    List {
        /// Bucket name
        bucket: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List object keys, one per line
    Keys {
        /// Bucket name
        bucket: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Send a message to a queue by name
    Send {
        /// Queue name
        queue_name: String,

        /// Message body
        body: String,
    },

    /// Send the same message to several queue URLs
    Broadcast {
        /// Message body
        body: String,

        /// Queue URL (can be specified multiple times)
        #[arg(short = 'q', long = "queue-url", required = true)]
        queue_urls: Vec<String>,
    },

    /// Receive at most one message without deleting it
    Receive {
        /// Queue URL
        queue_url: String,

        #[command(flatten)]
        receive: ReceiveArgs,
    },

    /// Delete a received message by its receipt handle
    Ack {
        /// Queue URL
        queue_url: String,

        /// Receipt handle from a previous receive
        receipt_handle: String,
    },

    /// Receive at most one message and delete it unless --at-least-once
    Take {
        /// Queue URL
        queue_url: String,

        #[command(flatten)]
        receive: ReceiveArgs,

        /// Leave the message on the queue; acknowledge it later with `ack`
        #[arg(long)]
        at_least_once: bool,
    },
}

/// Key filter options.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Key prefix (can be specified multiple times; any may match)
    #[arg(short, long = "prefix")]
    pub prefixes: Vec<String>,

    /// Key suffix (can be specified multiple times; any may match)
    #[arg(short, long = "suffix")]
    pub suffixes: Vec<String>,
}

/// Receive call options.
#[derive(Args, Debug, Clone, Copy)]
pub struct ReceiveArgs {
    /// Seconds the message stays hidden from other receivers
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(i32).range(0..=43200))]
    pub visibility_timeout: i32,

    /// Seconds to wait for a message (0 = short poll)
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(i32).range(0..=20))]
    pub wait_time: i32,
}
