//! Asynchronous REST call helper on top of an injected HTTP transport.
//!
//! # Overview
//! A call is described by an immutable `RestRequest` (method, base path,
//! path template, path/query parameters, headers, optional body). The
//! `RestClient` runs an optional `RequestEnhancer` on it, assembles the URL,
//! encodes the body, sends it through its `Transport`, and then either
//! decodes the JSON response or fails with a `RestError` carrying the status
//! and the error body.
//!
//! # Design
//! - The transport and the JSON codec are injected; the client holds no
//!   other state.
//! - Calls are plain futures: lazy until polled, cancelled by dropping.
//! - With the default `reqwest` feature, `reqwest::Client` is a ready-made
//!   `Transport`.

pub mod body;
pub mod client;
pub mod codec;
pub mod enhancer;
pub mod error;
pub mod http;
pub mod request;
#[cfg(feature = "reqwest")]
mod reqwest_transport;

pub use body::{encode_body, ContentProvider, RequestBody, APPLICATION_JSON};
pub use client::RestClient;
pub use codec::{CodecError, JsonBody, JsonCodec, SerdeJsonCodec};
pub use enhancer::{BoxError, RequestEnhancer, StaticHeaders};
pub use error::{CallError, RestError};
pub use http::{BodyStream, HttpMethod, HttpRequest, HttpResponse, Transport, TransportResponse};
pub use request::{to_query_values, RestRequest, RestRequestBuilder};
