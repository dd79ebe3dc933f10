//! Main execution logic for as-cli.

use anyhow::{Context, Result, bail};
use as_s3::{KeyFilter, ObjectAccessor};
use as_session::{ClientRegistry, SessionConfig};
use as_sqs::{DeliveryMode, QueueAccessor};
use as_types::ReceiveOptions;
use futures::{StreamExt, pin_mut};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{info_span, warn};

use crate::args::{Cli, Command, FilterArgs, ReceiveArgs, SessionArgs};

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything succeeded
    Success,
    /// A broadcast reached only some queues
    Partial { delivered: usize, failed: usize },
}

/// One line of `broadcast` output.
#[derive(Debug, Serialize)]
struct BroadcastLine<'a> {
    queue_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the command with the provided arguments.
pub async fn execute(args: Cli) -> Result<Outcome> {
    let config = session_config(&args.session)?;
    config.validate()?;
    let registry = ClientRegistry::new(config);

    match args.command {
        Command::Get {
            bucket,
            key,
            subfolder,
            output,
        } => {
            let span = info_span!("get", bucket = %bucket);
            let accessor = ObjectAccessor::from_registry(&registry).await?.with_span(span);
            let object = accessor
                .get_object(&bucket, subfolder.as_deref(), &key)
                .await?;

            match output {
                Some(path) => std::fs::write(&path, &object.body)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&object.body)?;
                    stdout.flush()?;
                }
            }
        }

        Command::List { bucket, filter } => {
            let span = info_span!("list", bucket = %bucket);
            let accessor = ObjectAccessor::from_registry(&registry).await?.with_span(span);
            let stream = accessor.list_objects(&bucket, key_filter(filter));
            pin_mut!(stream);

            let mut stdout = io::stdout().lock();
            while let Some(object) = stream.next().await {
                write_json_line(&mut stdout, &object?)?;
            }
        }

        Command::Keys { bucket, filter } => {
            let span = info_span!("keys", bucket = %bucket);
            let accessor = ObjectAccessor::from_registry(&registry).await?.with_span(span);
            let stream = accessor.list_keys(&bucket, key_filter(filter));
            pin_mut!(stream);

            let mut stdout = io::stdout().lock();
            while let Some(key) = stream.next().await {
                writeln!(stdout, "{}", key?)?;
            }
        }

        Command::Send { queue_name, body } => {
            let span = info_span!("send", queue = %queue_name);
            let accessor = QueueAccessor::from_registry(&registry).await?.with_span(span);
            let sent = accessor.send_message(&queue_name, &body).await?;
            write_json_line(&mut io::stdout().lock(), &sent)?;
        }

        Command::Broadcast { body, queue_urls } => {
            let span = info_span!("broadcast", queues = queue_urls.len());
            let accessor = QueueAccessor::from_registry(&registry).await?.with_span(span);
            let report = accessor.send_message_to_queues(&queue_urls, &body).await;

            let mut stdout = io::stdout().lock();
            for sent in &report.delivered {
                write_json_line(
                    &mut stdout,
                    &BroadcastLine {
                        queue_url: &sent.queue_url,
                        message_id: Some(&sent.message_id),
                        error: None,
                    },
                )?;
            }
            for failure in &report.failed {
                write_json_line(
                    &mut stdout,
                    &BroadcastLine {
                        queue_url: &failure.queue_url,
                        message_id: None,
                        error: Some(failure.error.to_string()),
                    },
                )?;
            }

            if !report.is_complete() {
                return Ok(Outcome::Partial {
                    delivered: report.delivered_count(),
                    failed: report.failed_count(),
                });
            }
        }

        Command::Receive { queue_url, receive } => {
            let span = info_span!("receive", queue_url = %queue_url);
            let accessor = QueueAccessor::from_registry(&registry)
                .await?
                .with_receive_options(receive_options(receive))
                .with_span(span);

            if let Some(message) = accessor.receive_message(&queue_url).await? {
                write_json_line(&mut io::stdout().lock(), &message)?;
            }
        }

        Command::Ack {
            queue_url,
            receipt_handle,
        } => {
            let span = info_span!("ack", queue_url = %queue_url);
            let accessor = QueueAccessor::from_registry(&registry).await?.with_span(span);
            accessor.acknowledge(&queue_url, &receipt_handle).await?;
        }

        Command::Take {
            queue_url,
            receive,
            at_least_once,
        } => {
            let delivery = if at_least_once {
                if receive.visibility_timeout == 0 {
                    warn!("--at-least-once with a zero visibility timeout leaves the message visible");
                }
                DeliveryMode::AtLeastOnce
            } else {
                DeliveryMode::AtMostOnce
            };

            let span = info_span!("take", queue_url = %queue_url, ?delivery);
            let accessor = QueueAccessor::from_registry(&registry)
                .await?
                .with_receive_options(receive_options(receive))
                .with_delivery_mode(delivery)
                .with_span(span);

            if let Some(message) = accessor.take_message(&queue_url).await? {
                write_json_line(&mut io::stdout().lock(), &message)?;
            }
        }
    }

    Ok(Outcome::Success)
}

/// Build the session configuration from CLI arguments.
///
/// The access key and secret key must be given together.
fn session_config(args: &SessionArgs) -> Result<SessionConfig> {
    let mut config = SessionConfig::new().with_region(&args.region);

    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint);
    }

    match (&args.access_key, &args.secret_key) {
        (Some(access_key), Some(secret_key)) => {
            config = config.with_credentials(access_key, secret_key);
        }
        (None, None) => {}
        _ => bail!("--access-key and --secret-key must be set together"),
    }

    if let Some(profile) = &args.profile {
        config = config.with_profile(profile);
    }

    Ok(config)
}

fn key_filter(args: FilterArgs) -> KeyFilter {
    KeyFilter::all()
        .with_prefixes(args.prefixes)
        .with_suffixes(args.suffixes)
}

fn receive_options(args: ReceiveArgs) -> ReceiveOptions {
    ReceiveOptions::new()
        .with_visibility_timeout(args.visibility_timeout)
        .with_wait_time(args.wait_time)
}

fn write_json_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
