//! Error types and classification for aws-services.
//!
//! This crate provides:
//! - [`AsError`] - Top-level error enum returned by every operation
//! - Domain-specific errors ([`SessionError`], [`StorageError`], [`QueueError`])
//! - [`ErrorCategory`] so callers can tell "not found" apart from transient
//!   and permanent failures

use thiserror::Error;

/// Top-level error type for aws-services.
#[derive(Error, Debug)]
pub enum AsError {
    /// Session and client construction errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Object store errors (get, list)
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Queue errors (resolve, send, receive, ack)
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Session and client construction errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The requested service name is not one this crate can build a client for
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// Static credentials are present but unusable
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The process-wide client registry was installed twice
    #[error("Client registry already initialized")]
    AlreadyInitialized,

    /// The process-wide client registry was read before being installed
    #[error("Client registry not initialized")]
    NotInitialized,
}

/// Object store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The key does not exist in the bucket
    #[error("Object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The bucket does not exist
    #[error("Bucket not found: {0}")]
    NoSuchBucket(String),

    /// The get-object call failed
    #[error("Get object failed: {0}")]
    Get(String),

    /// Reading the object body failed
    #[error("Reading object body failed: {0}")]
    Body(String),

    /// A list-objects page request failed
    #[error("List objects failed: {0}")]
    List(String),

    /// The service refused the request (access, credentials, validation)
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Queue errors.
#[derive(Error, Debug)]
pub enum QueueError {
    /// No queue exists with the given name
    #[error("Queue does not exist: {0}")]
    QueueDoesNotExist(String),

    /// Resolving the queue URL failed
    #[error("Resolve queue URL failed: {0}")]
    ResolveUrl(String),

    /// Sending a message failed
    #[error("Send failed: {0}")]
    Send(String),

    /// Receiving messages failed
    #[error("Receive failed: {0}")]
    Receive(String),

    /// Deleting (acknowledging) a message failed
    #[error("Ack failed: {0}")]
    Ack(String),

    /// The service refused the request (access, credentials, validation,
    /// invalid receipt handle)
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Error classification.
///
/// Used by callers to decide between "treat as empty", "try again later" and
/// "fix the input".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The addressed resource (object, bucket, queue) does not exist
    NotFound,

    /// Network or service-side failure, may succeed on a later attempt
    ///
    /// Examples: connection reset, throttling, 5xx
    Transient,

    /// Will fail again with the same input
    ///
    /// Examples: unknown service name, empty credentials, bad receipt handle
    Permanent,
}

impl AsError {
    /// Classifies this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AsError::Session(_) => ErrorCategory::Permanent,
            AsError::Storage(e) => classify_storage_error(e),
            AsError::Queue(e) => classify_queue_error(e),
            AsError::Config(_) => ErrorCategory::Permanent,
            AsError::Other(_) => ErrorCategory::Transient,
        }
    }

    /// Returns true if the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

fn classify_storage_error(error: &StorageError) -> ErrorCategory {
    match error {
        StorageError::NotFound { .. } => ErrorCategory::NotFound,
        StorageError::NoSuchBucket(_) => ErrorCategory::NotFound,
        StorageError::Get(_) => ErrorCategory::Transient,
        StorageError::Body(_) => ErrorCategory::Transient,
        StorageError::List(_) => ErrorCategory::Transient,
        StorageError::Rejected(_) => ErrorCategory::Permanent,
    }
}

fn classify_queue_error(error: &QueueError) -> ErrorCategory {
    match error {
        QueueError::QueueDoesNotExist(_) => ErrorCategory::NotFound,
        QueueError::ResolveUrl(_) => ErrorCategory::Transient,
        QueueError::Send(_) => ErrorCategory::Transient,
        QueueError::Receive(_) => ErrorCategory::Transient,
        QueueError::Ack(_) => ErrorCategory::Transient,
        QueueError::Rejected(_) => ErrorCategory::Permanent,
    }
}

/// What a failed service call means for the caller, decided from the
/// service's error code and HTTP status.
///
/// Backends use this to pick the error variant they return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFailure {
    /// The bucket, key or queue does not exist
    NotFound,

    /// The service refused the request; repeating it will not help
    Rejected,

    /// Anything else (transport, throttling, 5xx)
    Other,
}

/// Error codes meaning the addressed resource does not exist.
const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchKey",
    "NoSuchBucket",
    "NotFound",
    "AWS.SimpleQueueService.NonExistentQueue",
    "QueueDoesNotExist",
];

/// Error codes worth retrying even though they come with a 4xx status.
const RETRYABLE_CODES: &[&str] = &[
    "RequestTimeout",
    "RequestTimeTooSkewed",
    "SlowDown",
    "Throttling",
    "ThrottlingException",
    "RequestThrottled",
    "RequestLimitExceeded",
];

/// Error codes for requests the service refuses as sent.
const REJECTED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "InvalidAccessKeyId",
    "InvalidClientTokenId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidBucketName",
    "InvalidArgument",
    "InvalidParameterValue",
    "MissingParameter",
    "InvalidAddress",
    "ReceiptHandleIsInvalid",
    "AWS.SimpleQueueService.InvalidReceiptHandle",
];

/// Classifies a failed service call by its error code, falling back to the
/// HTTP status when the code is missing or unknown.
///
/// Only the structured code and status are consulted, never rendered
/// messages, which embed bucket, key and queue names.
pub fn classify_service_failure(code: Option<&str>, status: Option<u16>) -> ServiceFailure {
    if let Some(code) = code {
        if NOT_FOUND_CODES.contains(&code) {
            return ServiceFailure::NotFound;
        }
        if RETRYABLE_CODES.contains(&code) {
            return ServiceFailure::Other;
        }
        if REJECTED_CODES.contains(&code) {
            return ServiceFailure::Rejected;
        }
    }

    match status {
        Some(404) => ServiceFailure::NotFound,
        Some(400) | Some(401) | Some(403) => ServiceFailure::Rejected,
        _ => ServiceFailure::Other,
    }
}

/// Result type alias using AsError.
pub type Result<T> = std::result::Result<T, AsError>;
