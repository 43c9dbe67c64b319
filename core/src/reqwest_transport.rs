//! `Transport` backed by `reqwest`.
//!
//! # Design
//! Request headers are forwarded unchanged. If the body declares a media
//! type and the request carries no `content-type` header, the media type is
//! sent as `content-type`; an explicit header always wins. Buffered bodies go
//! out as a single `Bytes` with a known length, streaming bodies are wrapped
//! with `Body::wrap_stream` and sent chunked. The response body is exposed
//! as `bytes_stream`, which owns the response until it is dropped.

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Method};

use crate::http::{BodyStream, HttpMethod, HttpRequest, Transport, TransportResponse};

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Trace => Method::TRACE,
        }
    }
}

impl Transport for reqwest::Client {
    type Error = reqwest::Error;
    type Response = reqwest::Response;

    /// Converts the request into a `reqwest::Request` and executes it.
    ///
    /// The body's media type becomes the `content-type` header unless the
    /// request already sets one.
    async fn send(&self, request: HttpRequest) -> Result<Self::Response, Self::Error> {
        let content_type = match (&request.body, request.header(CONTENT_TYPE.as_str())) {
            (Some(body), None) => body.media_type().map(str::to_owned),
            _ => None,
        };

        let mut builder = self.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = match body.as_bytes() {
                Some(bytes) => builder.body(bytes.clone()),
                None => builder.body(Body::wrap_stream(body.into_stream())),
            };
        }

        builder.send().await
    }
}

impl TransportResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn status(&self) -> u16 {
        reqwest::Response::status(self).as_u16()
    }

    fn into_body(self) -> BodyStream<Self::Error> {
        self.bytes_stream().boxed()
    }
}
