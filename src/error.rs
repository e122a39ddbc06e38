use thiserror::Error;

/// Structured error context for diagnosing a failure without re-running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g. "GEMINI_API_KEY",
    /// "candidates[0].content.parts")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g. the endpoint URL, expected shape)
    pub details: Option<String>,
    /// Source of the error (e.g. "client_builder", "deck_loader")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse failure taxonomy used by callers and by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid configuration; fatal at construction.
    Configuration,
    /// Caller supplied input that can never succeed (blank prompt, bad draw size).
    InvalidInput,
    /// Network error, timeout, non-2xx status or empty body.
    TransientCallFailure,
    /// The body arrived but does not have the expected envelope shape.
    MalformedResponse,
    /// Cancelled while waiting between attempts.
    CancelledOperation,
}

/// Unified error type for the tarot reader.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid input: {message}{}", format_context(.context))]
    InvalidInput {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("Remote error: HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Remote returned an empty body (HTTP {status})")]
    EmptyBody { status: u16 },

    #[error("Malformed response: {message} (field: {field})")]
    MalformedResponse { field: String, message: String },

    #[error("Operation cancelled: {message}")]
    Cancelled { message: String },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new invalid-input error with structured context
    pub fn invalid_input_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InvalidInput {
            message: msg.into(),
            context,
        }
    }

    pub fn malformed(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::MalformedResponse {
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Error::Cancelled {
            message: msg.into(),
        }
    }

    /// Map this error onto the failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::Transport(_) | Error::Remote { .. } | Error::EmptyBody { .. } => {
                ErrorKind::TransientCallFailure
            }
            Error::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Error::Cancelled { .. } => ErrorKind::CancelledOperation,
        }
    }

    /// Whether another attempt against the same endpoint could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(crate::transport::TransportError::ClientClosed) => false,
            _ => matches!(
                self.kind(),
                ErrorKind::TransientCallFailure | ErrorKind::MalformedResponse
            ),
        }
    }

    /// HTTP status attached to this error, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } | Error::EmptyBody { status } => Some(*status),
            Error::Transport(crate::transport::TransportError::Http(e)) => {
                e.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::InvalidInput { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}
