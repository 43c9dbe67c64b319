//! Error types for REST calls.
//!
//! # Design
//! `RestError` is the application-level failure: the server answered with a
//! status of 400 or above. It keeps everything known about the exchange so
//! its `Display` form can be logged as-is, while the accessors let callers
//! branch on the status or body without parsing text.
//!
//! `CallError` is what a call returns. Transport failures are kept in their
//! own variant with the transport's error type untouched.

use std::fmt;

use crate::codec::CodecError;
use crate::enhancer::BoxError;
use crate::http::HttpMethod;

const NO_HTTP_METHOD: &str = "[-NO-HTTP-METHOD-AVAILABLE-]";
const NO_REQUEST_URL: &str = "[-NO-REQUEST-URL-AVAILABLE-]";
const NO_REQUEST_BODY: &str = "[-NO-REQUEST-BODY-AVAILABLE-]";
const NO_RESPONSE_BODY: &str = "[-NO-RESPONSE-BODY-AVAILABLE-]";

/// The server answered with an error status.
#[derive(Debug)]
pub struct RestError {
    message: String,
    http_method: Option<HttpMethod>,
    request_url: Option<String>,
    request_body: Option<String>,
    status: u16,
    response_body: Option<String>,
    source: Option<BoxError>,
}

impl RestError {
    pub fn new(message: impl Into<String>, status: u16, response_body: Option<String>) -> Self {
        Self {
            message: message.into(),
            http_method: None,
            request_url: None,
            request_body: None,
            status,
            response_body,
            source: None,
        }
    }

    pub fn with_request_url(self, request_url: impl Into<String>) -> Self {
        Self {
            request_url: Some(request_url.into()),
            ..self
        }
    }

    pub fn with_http_method(self, http_method: HttpMethod) -> Self {
        Self {
            http_method: Some(http_method),
            ..self
        }
    }

    /// Attaches a text snapshot of what was sent.
    pub fn with_request_body(self, request_body: Option<String>) -> Self {
        Self {
            request_body,
            ..self
        }
    }

    pub fn with_source(self, source: impl Into<BoxError>) -> Self {
        Self {
            source: Some(source.into()),
            ..self
        }
    }

    /// The message without the request/response details.
    pub fn original_message(&self) -> &str {
        &self.message
    }

    pub fn http_method(&self) -> Option<HttpMethod> {
        self.http_method
    }

    pub fn request_url(&self) -> Option<&str> {
        self.request_url.as_deref()
    }

    pub fn request_body(&self) -> Option<&str> {
        self.request_body.as_deref()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn response_body(&self) -> Option<&str> {
        self.response_body.as_deref()
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        match self.http_method {
            Some(method) => writeln!(f, "HTTP METHOD: {method}")?,
            None => writeln!(f, "HTTP METHOD: {NO_HTTP_METHOD}")?,
        }
        writeln!(
            f,
            "REQUEST URL: {}",
            self.request_url.as_deref().unwrap_or(NO_REQUEST_URL)
        )?;
        writeln!(f, "REQUEST BODY:")?;
        writeln!(
            f,
            "{}",
            self.request_body.as_deref().unwrap_or(NO_REQUEST_BODY)
        )?;
        writeln!(f, "STATUS CODE: {}", self.status)?;
        writeln!(f, "RESPONSE BODY:")?;
        write!(
            f,
            "{}",
            self.response_body.as_deref().unwrap_or(NO_RESPONSE_BODY)
        )
    }
}

impl std::error::Error for RestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

/// Everything that can end a call early.
#[derive(Debug, thiserror::Error)]
pub enum CallError<E>
where
    E: std::error::Error + 'static,
{
    /// The request enhancer failed; nothing was sent.
    #[error("request enhancer failed")]
    Enhance(#[source] BoxError),

    /// The request body could not be encoded; nothing was sent.
    #[error("failed to encode request body")]
    Encode(#[source] CodecError),

    #[error(transparent)]
    Transport(E),

    #[error(transparent)]
    Rest(#[from] RestError),

    /// The response body did not decode into the requested type.
    #[error("failed to decode response body")]
    Decode(#[source] CodecError),
}

impl<E> CallError<E>
where
    E: std::error::Error + 'static,
{
    pub fn as_rest_error(&self) -> Option<&RestError> {
        match self {
            CallError::Rest(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn display_with_full_context() {
        let err = RestError::new("Error sending request!", 418, Some("teapot".to_string()))
            .with_http_method(HttpMethod::Post)
            .with_request_url("http://h/brew")
            .with_request_body(Some(r#"{"kind":"coffee"}"#.to_string()));

        assert_eq!(
            err.to_string(),
            "Error sending request!\n\
             HTTP METHOD: POST\n\
             REQUEST URL: http://h/brew\n\
             REQUEST BODY:\n\
             {\"kind\":\"coffee\"}\n\
             STATUS CODE: 418\n\
             RESPONSE BODY:\n\
             teapot"
        );
    }

    #[test]
    fn display_uses_sentinels_for_missing_fields() {
        let err = RestError::new("boom", 500, None);
        let text = err.to_string();
        assert!(text.starts_with("boom\n"));
        assert!(text.contains("HTTP METHOD: [-NO-HTTP-METHOD-AVAILABLE-]"));
        assert!(text.contains("REQUEST URL: [-NO-REQUEST-URL-AVAILABLE-]"));
        assert!(text.contains("REQUEST BODY:\n[-NO-REQUEST-BODY-AVAILABLE-]"));
        assert!(text.contains("STATUS CODE: 500"));
        assert!(text.ends_with("RESPONSE BODY:\n[-NO-RESPONSE-BODY-AVAILABLE-]"));
    }

    #[test]
    fn original_message_is_kept_apart() {
        let err = RestError::new("short", 404, None).with_request_url("http://h/x");
        assert_eq!(err.original_message(), "short");
        assert_eq!(err.request_url(), Some("http://h/x"));
        assert_eq!(err.status(), 404);
        assert!(err.response_body().is_none());
        assert!(err.http_method().is_none());
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("reset");
        let err = RestError::new("failed", 502, None).with_source(io);
        assert_eq!(err.source().unwrap().to_string(), "reset");
        assert!(RestError::new("failed", 502, None).source().is_none());
    }

    #[test]
    fn call_error_passes_rest_error_display_through() {
        let err: CallError<std::io::Error> =
            RestError::new("Error sending request!", 418, Some("teapot".to_string())).into();
        assert_eq!(err.as_rest_error().map(RestError::status), Some(418));
        assert!(err.to_string().contains("STATUS CODE: 418"));
    }

    #[test]
    fn transport_errors_are_not_wrapped() {
        let err: CallError<std::io::Error> =
            CallError::Transport(std::io::Error::other("connection refused"));
        assert_eq!(err.to_string(), "connection refused");
        assert!(err.as_rest_error().is_none());
    }
}
