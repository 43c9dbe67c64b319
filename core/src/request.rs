//! The request descriptor and URL assembly.
//!
//! # Design
//! `RestRequest` is an immutable value: every field is private and exposed
//! through read-only accessors, and the only way to change one is to go back
//! through a builder (`RestRequest::to_builder`) and build a new value. The
//! maps are `BTreeMap`s so URL assembly iterates them in a fixed order and
//! produces the same string every time.
//!
//! URL assembly follows a few deliberate rules:
//! - a single `/` is inserted between base and path only when neither side
//!   already provides one; a double `//` is never collapsed,
//! - path parameters are substituted literally and are not percent-encoded,
//! - unknown `{placeholders}` stay in the URL verbatim,
//! - query parameters are form-encoded and appended with `&` if the URL
//!   already contains a `?`.

use std::collections::BTreeMap;
use std::fmt::Display;

use url::form_urlencoded::byte_serialize;

use crate::body::{ContentProvider, RequestBody};
use crate::codec::JsonBody;
use crate::http::HttpMethod;

/// Describes one REST call: where it goes, what it carries.
#[derive(Debug, Clone, Default)]
pub struct RestRequest {
    method: HttpMethod,
    base_path: Option<String>,
    path: Option<String>,
    path_params: BTreeMap<String, String>,
    query_params: BTreeMap<String, Vec<String>>,
    headers: BTreeMap<String, String>,
    request_body: Option<RequestBody>,
}

impl RestRequest {
    pub fn builder() -> RestRequestBuilder {
        RestRequestBuilder::default()
    }

    /// Starts a builder pre-filled with this request's values.
    pub fn to_builder(&self) -> RestRequestBuilder {
        RestRequestBuilder {
            request: self.clone(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn path_params(&self) -> &BTreeMap<String, String> {
        &self.path_params
    }

    pub fn query_params(&self) -> &BTreeMap<String, Vec<String>> {
        &self.query_params
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn request_body(&self) -> Option<&RequestBody> {
        self.request_body.as_ref()
    }

    /// The path with every `{name}` replaced by its path parameter.
    pub fn path_with_params(&self) -> String {
        let mut path = self.path.clone().unwrap_or_default();
        for (name, value) in &self.path_params {
            path = path.replace(&format!("{{{name}}}"), value);
        }
        path
    }

    /// Builds the absolute URL this request targets.
    pub fn build_url(&self) -> String {
        let base = self.base_path.as_deref().unwrap_or("");
        let path = self.path_with_params();

        let mut url = String::with_capacity(base.len() + path.len() + 1);
        url.push_str(base);
        if !path.is_empty() && !path.starts_with('/') && !base.ends_with('/') {
            url.push('/');
        }
        url.push_str(&path);

        let mut separator = if url.contains('?') { '&' } else { '?' };
        for (name, values) in &self.query_params {
            for value in values {
                url.push(separator);
                separator = '&';
                url.extend(byte_serialize(name.as_bytes()));
                url.push('=');
                url.extend(byte_serialize(value.as_bytes()));
            }
        }
        url
    }
}

#[derive(Debug, Clone, Default)]
pub struct RestRequestBuilder {
    request: RestRequest,
}

impl RestRequestBuilder {
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.request.method = method;
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.request.base_path = Some(base_path.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.request.path = Some(path.into());
        self
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.path_params.insert(name.into(), value.into());
        self
    }

    /// Replaces all path parameters.
    pub fn path_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request.path_params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Appends one value to the query parameter `name`.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request
            .query_params
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Replaces all query parameters.
    pub fn query_params<K, I>(mut self, params: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.request.query_params = params
            .into_iter()
            .map(|(k, values)| (k.into(), values.into_iter().map(Into::into).collect()))
            .collect();
        self
    }

    /// Sets a header, replacing any existing one whose name matches ignoring
    /// ASCII case. The new spelling of the name is kept.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.request
            .headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.request.headers.insert(name, value.into());
        self
    }

    /// Replaces all headers. Names differing only in case collapse to the last one.
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.request.headers.clear();
        headers
            .into_iter()
            .fold(self, |builder, (name, value)| builder.header(name, value))
    }

    pub fn request_body(mut self, body: Option<RequestBody>) -> Self {
        self.request.request_body = body;
        self
    }

    /// Sends `content` as-is.
    pub fn raw_body(self, content: ContentProvider) -> Self {
        self.request_body(Some(RequestBody::Raw(content)))
    }

    /// Sends `value` encoded as JSON.
    pub fn json_body<T: JsonBody + 'static>(self, value: T) -> Self {
        self.request_body(Some(RequestBody::json(value)))
    }

    pub fn build(self) -> RestRequest {
        self.request
    }
}

/// Renders each value with `Display`, for use as query parameter values.
pub fn to_query_values<I>(values: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Display,
{
    values.into_iter().map(|value| value.to_string()).collect()
}
