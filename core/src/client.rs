//! Call dispatcher: enhance, build, send, classify, decode.
//!
//! # Design
//! `RestClient` holds only the injected transport and JSON codec and carries
//! no state between calls, so one instance can serve any number of
//! concurrent calls. Every call method is an `async fn`: nothing happens
//! until the returned future is polled, and dropping it at any point cancels
//! the call and releases whatever the transport handed out so far. The
//! response body stream owns the response, so every exit path, including a
//! failed decode, releases both.

use bytes::BytesMut;
use futures::{StreamExt, TryStreamExt};
use log::{debug, trace};
use serde::de::DeserializeOwned;

use crate::body::encode_body;
use crate::codec::{JsonCodec, SerdeJsonCodec};
use crate::enhancer::{enhance, RequestEnhancer};
use crate::error::{CallError, RestError};
use crate::http::{BodyStream, HttpRequest, Transport, TransportResponse};
use crate::request::RestRequest;

/// Lowest status treated as an application error.
const HTTP_LOWEST_ERROR_CODE: u16 = 400;

const ERROR_MESSAGE: &str = "Error sending request!";

/// Sends `RestRequest`s through a transport and interprets the responses.
#[derive(Debug, Clone)]
pub struct RestClient<T, C = SerdeJsonCodec> {
    transport: T,
    codec: C,
}

impl<T: Transport> RestClient<T> {
    pub fn with_default_codec(transport: T) -> Self {
        Self::new(transport, SerdeJsonCodec::new())
    }
}

impl<T, C> RestClient<T, C>
where
    T: Transport,
    C: JsonCodec,
{
    pub fn new(transport: T, codec: C) -> Self {
        Self { transport, codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Releases the transport's resources.
    pub fn close(&self) {
        self.transport.close();
    }

    /// Performs the call and discards the response body.
    ///
    /// Resolves once the status has been checked and the body fully read.
    pub async fn call(
        &self,
        request: RestRequest,
        enhancer: Option<&dyn RequestEnhancer>,
    ) -> Result<(), CallError<T::Error>> {
        let response = self.send_and_check(request, enhancer).await?;
        let mut body = response.into_body();
        while let Some(chunk) = body.next().await {
            chunk.map_err(CallError::Transport)?;
        }
        Ok(())
    }

    /// Performs the call and decodes the response body as JSON into `R`.
    pub async fn call_json<R>(
        &self,
        request: RestRequest,
        enhancer: Option<&dyn RequestEnhancer>,
    ) -> Result<R, CallError<T::Error>>
    where
        R: DeserializeOwned,
    {
        let response = self.send_and_check(request, enhancer).await?;
        let text = read_string(response.into_body())
            .await
            .map_err(CallError::Transport)?;
        self.codec.from_json(&text).map_err(CallError::Decode)
    }

    async fn send_and_check(
        &self,
        request: RestRequest,
        enhancer: Option<&dyn RequestEnhancer>,
    ) -> Result<T::Response, CallError<T::Error>> {
        if enhancer.is_some() {
            debug!("Enhancing request");
        }
        let request = enhance(request, enhancer)
            .await
            .map_err(CallError::Enhance)?;

        let url = request.build_url();
        let body = encode_body(&self.codec, request.request_body()).map_err(CallError::Encode)?;
        let request_body = body.as_ref().and_then(|body| body.snapshot());
        let method = request.method();
        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        debug!("Sending {method} {url}");
        let response = self
            .transport
            .send(HttpRequest {
                method,
                url: url.clone(),
                headers,
                body,
            })
            .await
            .map_err(CallError::Transport)?;

        let status = response.status();
        debug!("Received status {status} for {method} {url}");
        if status < HTTP_LOWEST_ERROR_CODE {
            return Ok(response);
        }

        let content = read_string(response.into_body())
            .await
            .map_err(CallError::Transport)?;
        debug!("{method} {url} failed with status {status}");
        let response_body = if content.is_empty() {
            None
        } else {
            Some(content)
        };
        Err(RestError::new(ERROR_MESSAGE, status, response_body)
            .with_http_method(method)
            .with_request_url(url)
            .with_request_body(request_body)
            .into())
    }
}

/// Drains a body stream and decodes it as UTF-8, replacing invalid sequences.
async fn read_string<E: Send + 'static>(body: BodyStream<E>) -> Result<String, E> {
    let buffer = body
        .try_fold(BytesMut::new(), |mut buffer, chunk| async move {
            buffer.extend_from_slice(&chunk);
            Ok(buffer)
        })
        .await?;
    trace!("Read {} bytes of response body", buffer.len());
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
