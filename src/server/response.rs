use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Legacy numeric status reported for a successful command
pub const SUCCESS: i32 = 0;

/// Failure kinds a command can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    /// Malformed request, including a missing required parameter
    InvalidArgument,
    InvalidSessionId,
    SessionNotCreated,
    NoSuchElement,
    NoSuchFrame,
    NoSuchWindow,
    StaleElementReference,
    /// The command did not complete before its deadline
    Timeout,
    UnknownCommand,
    /// Anything not classified above
    UnknownError,
}

impl ErrorStatus {
    /// Legacy numeric wire code
    pub fn code(self) -> i32 {
        match self {
            Self::InvalidArgument => 400,
            Self::InvalidSessionId => 6,
            Self::SessionNotCreated => 33,
            Self::NoSuchElement => 7,
            Self::NoSuchFrame => 8,
            Self::NoSuchWindow => 23,
            Self::StaleElementReference => 10,
            Self::Timeout => 21,
            Self::UnknownCommand => 9,
            Self::UnknownError => 13,
        }
    }

    /// W3C error string
    pub fn error_code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid argument",
            Self::InvalidSessionId => "invalid session id",
            Self::SessionNotCreated => "session not created",
            Self::NoSuchElement => "no such element",
            Self::NoSuchFrame => "no such frame",
            Self::NoSuchWindow => "no such window",
            Self::StaleElementReference => "stale element reference",
            Self::Timeout => "timeout",
            Self::UnknownCommand => "unknown command",
            Self::UnknownError => "unknown error",
        }
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::InvalidSessionId
            | Self::NoSuchElement
            | Self::NoSuchFrame
            | Self::NoSuchWindow
            | Self::StaleElementReference
            | Self::UnknownCommand => StatusCode::NOT_FOUND,
            Self::SessionNotCreated | Self::Timeout | Self::UnknownError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// W3C WebDriver success response
#[derive(Debug, Clone, Serialize)]
pub struct WebDriverResponse {
    pub value: Value,
}

impl WebDriverResponse {
    pub fn success<T: Serialize>(value: T) -> Self {
        Self {
            value: serde_json::to_value(value).unwrap_or(Value::Null),
        }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }

    pub fn code(&self) -> i32 {
        SUCCESS
    }
}

impl IntoResponse for WebDriverResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [("Content-Type", "application/json; charset=utf-8")],
            Json(self),
        )
            .into_response()
    }
}

/// W3C WebDriver error response
#[derive(Debug, Clone)]
pub struct WebDriverErrorResponse {
    pub status: ErrorStatus,
    pub message: String,
    pub stacktrace: Option<String>,
}

impl WebDriverErrorResponse {
    pub fn new(status: ErrorStatus, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            stacktrace: None,
        }
    }

    /// Legacy numeric wire code of this failure
    pub fn code(&self) -> i32 {
        self.status.code()
    }

    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            ErrorStatus::InvalidArgument,
            &format!("Missing parameter: {name}"),
        )
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::new(ErrorStatus::InvalidArgument, message)
    }

    pub fn invalid_session_id(session_id: &str) -> Self {
        Self::new(
            ErrorStatus::InvalidSessionId,
            &format!("Session {session_id} not found"),
        )
    }

    pub fn session_not_created(message: &str) -> Self {
        Self::new(ErrorStatus::SessionNotCreated, message)
    }

    pub fn no_such_element() -> Self {
        Self::new(ErrorStatus::NoSuchElement, "Unable to locate element")
    }

    pub fn no_such_frame() -> Self {
        Self::new(ErrorStatus::NoSuchFrame, "No frame found")
    }

    pub fn no_such_window() -> Self {
        Self::new(ErrorStatus::NoSuchWindow, "Unable to get browser")
    }

    pub fn stale_element_reference() -> Self {
        Self::new(
            ErrorStatus::StaleElementReference,
            "Element is no longer attached to the DOM",
        )
    }

    pub fn timeout(message: &str) -> Self {
        Self::new(ErrorStatus::Timeout, message)
    }

    pub fn unknown_command(name: &str) -> Self {
        Self::new(
            ErrorStatus::UnknownCommand,
            &format!("Unknown command: {name}"),
        )
    }

    pub fn unknown_error(message: &str) -> Self {
        Self::new(ErrorStatus::UnknownError, message)
    }
}

impl fmt::Display for WebDriverErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status.error_code(), self.message)
    }
}

impl IntoResponse for WebDriverErrorResponse {
    fn into_response(self) -> Response {
        let body = json!({
            "value": {
                "error": self.status.error_code(),
                "message": self.message,
                "stacktrace": self.stacktrace.unwrap_or_default()
            }
        });

        (
            self.status.http_status(),
            [("Content-Type", "application/json; charset=utf-8")],
            Json(body),
        )
            .into_response()
    }
}

/// Result type for WebDriver commands
pub type WebDriverResult = Result<WebDriverResponse, WebDriverErrorResponse>;
