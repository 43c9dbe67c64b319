//! Wire-level HTTP types and the transport seam.
//!
//! # Design
//! The core never opens a socket itself. It assembles an `HttpRequest` as
//! plain data and hands it to whatever `Transport` the caller injected. The
//! transport answers with a `TransportResponse` whose body is an async byte
//! stream; dropping the response or the stream releases everything the
//! transport acquired for it.

use std::fmt;
use std::future::Future;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};

use crate::body::ContentProvider;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data, ready for a `Transport`.
///
/// `headers` are sent as given. When `body` declares a media type and no
/// `content-type` header is present, transports should send the media type
/// as the content type.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<ContentProvider>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Streaming response body. Dropping it releases the underlying connection.
pub type BodyStream<E> = BoxStream<'static, Result<Bytes, E>>;

/// Lower-layer HTTP client the dispatcher sends through.
pub trait Transport: Send + Sync {
    /// Error for connection, TLS or stream failures. Surfaced to callers as-is.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Response handle produced by a successful send.
    type Response: TransportResponse<Error = Self::Error>;

    /// Sends `request` and resolves once the response status is known.
    ///
    /// Dropping the returned future must cancel the send and release
    /// anything acquired so far.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;

    /// Releases pooled resources. The default does nothing.
    fn close(&self) {}
}

/// A response whose headers have arrived but whose body may still be in flight.
pub trait TransportResponse: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    fn status(&self) -> u16;

    /// Consumes the response, handing ownership of it to the body stream.
    fn into_body(self) -> BodyStream<Self::Error>;
}

/// A fully buffered response.
///
/// Useful for in-memory transports and for hosts that perform the I/O
/// themselves and only need the status classification and decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl TransportResponse for HttpResponse {
    type Error = std::io::Error;

    fn status(&self) -> u16 {
        self.status
    }

    fn into_body(self) -> BodyStream<Self::Error> {
        if self.body.is_empty() {
            return stream::empty().boxed();
        }
        stream::once(async move { Ok(self.body) }).boxed()
    }
}
