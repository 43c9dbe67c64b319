//! Pre-send hook that may rewrite a request, e.g. to add auth headers.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt};

use crate::request::RestRequest;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Asynchronously turns a request into the one that is actually sent.
///
/// The dispatcher awaits the returned future before building the URL. An
/// error aborts the call before anything reaches the transport.
pub trait RequestEnhancer: Send + Sync {
    fn enhance(&self, request: RestRequest) -> BoxFuture<'_, Result<RestRequest, BoxError>>;
}

impl<F, Fut> RequestEnhancer for F
where
    F: Fn(RestRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RestRequest, BoxError>> + Send + 'static,
{
    fn enhance(&self, request: RestRequest) -> BoxFuture<'_, Result<RestRequest, BoxError>> {
        self(request).boxed()
    }
}

/// Adds a fixed set of headers, overriding existing ones whose name matches
/// ignoring case.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: Vec<(String, String)>,
}

impl StaticHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl RequestEnhancer for StaticHeaders {
    fn enhance(&self, request: RestRequest) -> BoxFuture<'_, Result<RestRequest, BoxError>> {
        let builder = self
            .headers
            .iter()
            .fold(request.to_builder(), |builder, (name, value)| {
                builder.header(name.clone(), value.clone())
            });
        futures::future::ready(Ok(builder.build())).boxed()
    }
}

/// Resolves the enhancer, or hands the request back unchanged when there is none.
pub(crate) async fn enhance(
    request: RestRequest,
    enhancer: Option<&dyn RequestEnhancer>,
) -> Result<RestRequest, BoxError> {
    match enhancer {
        Some(enhancer) => enhancer.enhance(request).await,
        None => Ok(request),
    }
}
