//! Request bodies and the decision of how they go on the wire.
//!
//! A descriptor carries either a `ContentProvider` (raw bytes that already
//! know their media type) or an arbitrary serializable value. Raw content is
//! passed through untouched; everything else is JSON-encoded by the injected
//! codec.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use log::trace;

use crate::codec::{CodecError, JsonBody, JsonCodec};

pub const APPLICATION_JSON: &str = "application/json";

type ByteStream = BoxStream<'static, io::Result<Bytes>>;

#[derive(Clone)]
enum Content {
    Bytes(Bytes),
    // One-shot: the first `into_stream` takes it, later ones get an error.
    Stream(Arc<Mutex<Option<ByteStream>>>),
}

/// A raw async byte producer with its own media type.
#[derive(Clone)]
pub struct ContentProvider {
    content: Content,
    media_type: Option<String>,
}

impl ContentProvider {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            content: Content::Bytes(bytes.into()),
            media_type: None,
        }
    }

    pub fn from_stream<S>(stream: S) -> Self
    where
        S: futures::Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self {
            content: Content::Stream(Arc::new(Mutex::new(Some(stream.boxed())))),
            media_type: None,
        }
    }

    pub fn with_media_type(self, media_type: impl Into<String>) -> Self {
        Self {
            media_type: Some(media_type.into()),
            ..self
        }
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// The buffered bytes, or `None` for streaming content.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.content {
            Content::Bytes(bytes) => Some(bytes),
            Content::Stream(_) => None,
        }
    }

    /// The content as text, when it can be read without consuming it.
    pub fn snapshot(&self) -> Option<String> {
        self.as_bytes()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn into_stream(self) -> ByteStream {
        match self.content {
            Content::Bytes(bytes) => stream::once(async move { Ok(bytes) }).boxed(),
            Content::Stream(shared) => {
                let taken = shared
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                match taken {
                    Some(stream) => stream,
                    None => stream::once(async {
                        Err(io::Error::other("content stream was already consumed"))
                    })
                    .boxed(),
                }
            }
        }
    }

    pub async fn read_all(self) -> io::Result<Bytes> {
        if let Content::Bytes(bytes) = &self.content {
            return Ok(bytes.clone());
        }
        let buffer = self
            .into_stream()
            .try_fold(BytesMut::new(), |mut buffer, chunk| async move {
                buffer.extend_from_slice(&chunk);
                Ok(buffer)
            })
            .await?;
        Ok(buffer.freeze())
    }
}

impl fmt::Debug for ContentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ContentProvider");
        match &self.content {
            Content::Bytes(bytes) => debug.field("len", &bytes.len()),
            Content::Stream(_) => debug.field("stream", &".."),
        };
        debug.field("media_type", &self.media_type).finish()
    }
}

/// The body a descriptor carries before encoding.
#[derive(Clone, Debug)]
pub enum RequestBody {
    /// Sent as-is; the provider's media type governs.
    Raw(ContentProvider),
    /// Encoded with the client's JSON codec and sent as `application/json`.
    Json(Arc<dyn JsonBody>),
}

impl RequestBody {
    pub fn json<T: JsonBody + 'static>(value: T) -> Self {
        RequestBody::Json(Arc::new(value))
    }
}

impl From<ContentProvider> for RequestBody {
    fn from(content: ContentProvider) -> Self {
        RequestBody::Raw(content)
    }
}

/// Turns an optional descriptor body into the optional wire body.
///
/// Raw content passes through unchanged. Any other value is encoded to UTF-8
/// JSON with media type `application/json`.
pub fn encode_body<C: JsonCodec>(
    codec: &C,
    body: Option<&RequestBody>,
) -> Result<Option<ContentProvider>, CodecError> {
    match body {
        None => Ok(None),
        Some(RequestBody::Raw(content)) => Ok(Some(content.clone())),
        Some(RequestBody::Json(value)) => {
            let json = codec.to_json(value.as_ref())?;
            trace!("Encoded request body as {} bytes of JSON", json.len());
            Ok(Some(
                ContentProvider::from_bytes(json).with_media_type(APPLICATION_JSON),
            ))
        }
    }
}
