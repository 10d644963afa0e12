// PDFShift client errors and response classification

use serde_json::Value;

/// Message for a missing or rejected API key
pub const INVALID_API_KEY_MESSAGE: &str = "Please indicate a valid API Key.";
/// Message for an exhausted account
pub const NO_CREDITS_MESSAGE: &str = "No remaining credits left.";
/// Message for a throttled request
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please slow down and try again later.";
/// Message for any unexpected status code
pub const SERVER_ERROR_MESSAGE: &str = "A fatal error occurred.";
/// Message for a body that is not JSON
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from the server.";
/// Message for saving before any successful conversion
pub const NO_DATA_MESSAGE: &str = "A fatal error occurred while trying to save the file to disk.";

/// Broad category of a [`PdfShiftError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCredential,
    InvalidRequest,
    NoCredits,
    RateLimited,
    ServerFailure,
    GenericFailure,
    PreconditionFailure,
    Transport,
    Io,
    Serialization,
}

/// Client errors
///
/// The first seven variants are produced by the client itself and always
/// carry a status code. The remaining ones wrap failures of the transport,
/// the filesystem, or JSON encoding.
#[derive(Debug, thiserror::Error)]
pub enum PdfShiftError {
    /// 401: the API key was refused
    #[error("{}", INVALID_API_KEY_MESSAGE)]
    InvalidCredential { body: Value },

    /// 400: the service rejected the request options
    #[error("{message}")]
    InvalidRequest { message: String, body: Value },

    /// 403: the account has no conversion credits left
    #[error("{}", NO_CREDITS_MESSAGE)]
    NoCredits { body: Value },

    /// 429: too many requests
    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited { body: Value },

    /// Any other non-200 status
    #[error("{}", SERVER_ERROR_MESSAGE)]
    Server { status: u16, body: Value },

    /// The response body could not be parsed as JSON
    #[error("{}", INVALID_RESPONSE_MESSAGE)]
    InvalidResponse { status: u16 },

    /// Local check failed before any request was made
    #[error("{message}")]
    Precondition { message: String, code: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PdfShiftError {
    /// No API key was configured
    pub fn missing_api_key() -> Self {
        PdfShiftError::Precondition {
            message: INVALID_API_KEY_MESSAGE.to_string(),
            code: 401,
        }
    }

    /// `save` was called before any successful conversion
    pub fn no_data() -> Self {
        PdfShiftError::Precondition {
            message: NO_DATA_MESSAGE.to_string(),
            code: 500,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PdfShiftError::InvalidCredential { .. } => ErrorKind::InvalidCredential,
            PdfShiftError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            PdfShiftError::NoCredits { .. } => ErrorKind::NoCredits,
            PdfShiftError::RateLimited { .. } => ErrorKind::RateLimited,
            PdfShiftError::Server { .. } => ErrorKind::ServerFailure,
            PdfShiftError::InvalidResponse { .. } => ErrorKind::GenericFailure,
            PdfShiftError::Precondition { .. } => ErrorKind::PreconditionFailure,
            PdfShiftError::Network(_) => ErrorKind::Transport,
            PdfShiftError::Io(_) => ErrorKind::Io,
            PdfShiftError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Numeric code associated with the error.
    ///
    /// Malformed responses report 500 regardless of the HTTP status, as do
    /// local fatal errors. Transport errors report the HTTP status when
    /// reqwest knows one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PdfShiftError::InvalidCredential { .. } => Some(401),
            PdfShiftError::InvalidRequest { .. } => Some(400),
            PdfShiftError::NoCredits { .. } => Some(403),
            PdfShiftError::RateLimited { .. } => Some(429),
            PdfShiftError::Server { status, .. } => Some(*status),
            PdfShiftError::InvalidResponse { .. } => Some(500),
            PdfShiftError::Precondition { code, .. } => Some(*code),
            PdfShiftError::Network(e) => e.status().map(|s| s.as_u16()),
            PdfShiftError::Io(_) | PdfShiftError::Serialization(_) => None,
        }
    }

    /// HTTP status of the response the error was built from.
    ///
    /// Unlike [`PdfShiftError::status_code`], a malformed response reports the
    /// status the server actually sent. `None` for errors raised locally.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            PdfShiftError::InvalidResponse { status } => Some(*status),
            PdfShiftError::Precondition { .. } => None,
            other => other.status_code(),
        }
    }

    /// Parsed response body the error was built from
    pub fn body(&self) -> Option<&Value> {
        match self {
            PdfShiftError::InvalidCredential { body }
            | PdfShiftError::InvalidRequest { body, .. }
            | PdfShiftError::NoCredits { body }
            | PdfShiftError::RateLimited { body }
            | PdfShiftError::Server { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Map a non-200 response to its error.
///
/// `raw` is the undecoded body; anything that is not a JSON value (or is JSON
/// `null`) becomes [`PdfShiftError::InvalidResponse`].
pub fn classify(status: u16, raw: &[u8]) -> PdfShiftError {
    let body = match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Null) | Err(_) => return PdfShiftError::InvalidResponse { status },
        Ok(body) => body,
    };

    match status {
        400 => PdfShiftError::InvalidRequest {
            message: invalid_request_message(&body),
            body,
        },
        401 => PdfShiftError::InvalidCredential { body },
        403 => PdfShiftError::NoCredits { body },
        429 => PdfShiftError::RateLimited { body },
        _ => PdfShiftError::Server { status, body },
    }
}

// Preference: `message`, then a string `error`, then the first entry of
// `errors` as "<field> : <first message>".
fn invalid_request_message(body: &Value) -> String {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        if !message.is_empty() {
            return message.to_string();
        }
    }

    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return error.to_string();
    }

    // A list of errors is keyed by position.
    let first = match body.get("errors") {
        Some(Value::Object(errors)) => errors
            .iter()
            .next()
            .map(|(field, messages)| (field.clone(), messages)),
        Some(Value::Array(errors)) => errors.first().map(|messages| ("0".to_string(), messages)),
        _ => None,
    };

    match first {
        Some((field, messages)) => {
            let detail = match messages {
                Value::Array(list) => list.first().map(describe).unwrap_or_default(),
                other => describe(other),
            };
            format!("{} : {}", field, detail)
        }
        None => "Invalid request.".to_string(),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
