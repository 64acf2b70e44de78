use std::fmt;

use aws_sdk_sqs::config::http::HttpResponse;
use aws_sdk_sqs::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Result type alias for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The facade operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Send,
    Receive,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Send => "send",
            Operation::Receive => "receive",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Error types for queue adapter operations.
///
/// An empty queue is not an error: [`crate::queue::QueueClient::next`]
/// reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum QueueError {
    /// An attribute value was not a string.
    ///
    /// Only flat string-to-string attribute maps can be sent. Numbers,
    /// booleans, nulls, arrays and nested objects are rejected when the
    /// attribute map is built instead of being coerced.
    #[error("attribute `{name}` must be a string, found {found}")]
    InvalidAttribute { name: String, found: &'static str },

    /// The attributes as a whole were not a key/value object.
    #[error("attributes must be an object, found {found}")]
    InvalidAttributes { found: &'static str },

    /// The remote call failed or could not be issued.
    ///
    /// The underlying [`ServiceError`] is kept as the error source so the
    /// service error code and HTTP status stay available to the caller.
    #[error("failed to {operation} SQS message")]
    Transport {
        operation: Operation,
        #[source]
        source: ServiceError,
    },

    /// The service answered but left out a field the adapter needs.
    #[error("SQS {operation} response is missing `{field}`")]
    MalformedResponse {
        operation: Operation,
        field: &'static str,
    },
}

impl QueueError {
    pub(crate) fn transport(operation: Operation, source: ServiceError) -> Self {
        QueueError::Transport { operation, source }
    }

    /// The operation that failed, if the error came from a remote call.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            QueueError::Transport { operation, .. }
            | QueueError::MalformedResponse { operation, .. } => Some(*operation),
            QueueError::InvalidAttribute { .. } | QueueError::InvalidAttributes { .. } => None,
        }
    }

    /// The service error code, such as `ReceiptHandleIsInvalid`.
    pub fn code(&self) -> Option<&str> {
        match self {
            QueueError::Transport { source, .. } => source.code(),
            _ => None,
        }
    }

    /// Checks if this error represents an upstream (5xx) failure.
    pub fn is_server_error(&self) -> bool {
        match self {
            QueueError::Transport { source, .. } => source.is_server_error(),
            _ => false,
        }
    }
}

/// Failure reported by a [`crate::queue::QueueService`] implementation.
///
/// Wraps the original error as its source and keeps the machine-readable
/// parts of it (error code, HTTP status) alongside.
#[derive(Debug, Error)]
#[error("{}", .code.as_deref().unwrap_or("queue service request failed"))]
pub struct ServiceError {
    code: Option<String>,
    status: Option<u16>,
    #[source]
    source: BoxError,
}

impl ServiceError {
    /// Creates a `ServiceError` from any error without a known code.
    pub fn new(source: impl Into<BoxError>) -> Self {
        ServiceError {
            code: None,
            status: None,
            source: source.into(),
        }
    }

    /// Attaches a service error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attaches the HTTP status of the failed response.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_some_and(|status| status >= 500)
    }
}

impl<E> From<SdkError<E, HttpResponse>> for ServiceError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    fn from(err: SdkError<E, HttpResponse>) -> Self {
        let code = err.code().map(str::to_string);
        let status = err.raw_response().map(|raw| raw.status().as_u16());

        ServiceError {
            code,
            status,
            source: Box::new(err),
        }
    }
}
