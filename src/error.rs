use reqwest::StatusCode;

/// Shown whenever the backend rejects the session token.
pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized(Option<String>),

    #[error("Not found")]
    NotFound(Option<String>),

    #[error("Bad request: {}", .0.as_deref().unwrap_or("invalid request"))]
    BadRequest(Option<String>),

    #[error("Request failed with status code {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("No session token")]
    NoSession,

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Notification wording for one user-facing action.
#[derive(Debug, Clone, Copy)]
pub struct FailureText {
    /// Completes "Error ...: <reason>", e.g. "fetching feed".
    pub action: &'static str,
    pub not_found: Option<&'static str>,
    /// Fallback when a 400 carries no message of its own.
    pub bad_request: Option<&'static str>,
}

impl FailureText {
    pub const fn new(action: &'static str) -> Self {
        Self {
            action,
            not_found: None,
            bad_request: None,
        }
    }

    pub const fn not_found(mut self, text: &'static str) -> Self {
        self.not_found = Some(text);
        self
    }

    pub const fn bad_request(mut self, text: &'static str) -> Self {
        self.bad_request = Some(text);
        self
    }
}

impl AppError {
    /// Classify a non-success response.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::BAD_REQUEST => AppError::BadRequest(message),
            _ => AppError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }

    /// Message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Unauthorized(message)
            | AppError::NotFound(message)
            | AppError::BadRequest(message)
            | AppError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Notification text for a failed action.
    pub fn user_message(&self, text: &FailureText) -> String {
        match (self, text.not_found, text.bad_request) {
            (AppError::Unauthorized(_), _, _) => SESSION_EXPIRED.to_string(),
            (AppError::NotFound(_), Some(missing), _) => missing.to_string(),
            (AppError::BadRequest(message), _, Some(fallback)) => message
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
            (other, _, _) => {
                let reason = other
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string());
                format!("Error {}: {}", text.action, reason)
            }
        }
    }
}
