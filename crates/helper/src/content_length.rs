//! Sets the `Content-Length` header on responses that lack one.
//!
//! The header is only added when the body reports an exact size through
//! [`http_body::Body::size_hint`]; streaming bodies of unknown length, and responses that already
//! carry the header, are handed back untouched.

use crate::decorator::Decorator;
use crate::handler::{HandlerResult, RequestHandler};
use crate::ReqBody;
use async_trait::async_trait;
use http::header::CONTENT_LENGTH;
use http::{HeaderValue, Request, Response};
use http_body::Body as HttpBody;
use tracing::trace;

/// Adds `Content-Length` to `response` when it is missing and the body size is known.
pub fn with_content_length<B: HttpBody>(mut response: Response<B>) -> Response<B> {
    if response.headers().contains_key(CONTENT_LENGTH) {
        trace!("content-length already present, response left as is");
        return response;
    }

    let Some(length) = response.body().size_hint().exact() else {
        trace!("body size unknown, content-length not set");
        return response;
    };

    trace!(length, "setting content-length");
    response.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(length));
    response
}

/// A decorator that wraps a handler into a [`ContentLengthResponseHandler`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentLengthDecorator;

/// A request handler that completes the responses of the wrapped handler with a `Content-Length`
/// header, see [`with_content_length`].
#[derive(Debug)]
pub struct ContentLengthResponseHandler<H> {
    handler: H,
}

impl<H: RequestHandler> Decorator<H> for ContentLengthDecorator {
    type Out = ContentLengthResponseHandler<H>;

    fn decorate(&self, raw: H) -> Self::Out {
        ContentLengthResponseHandler { handler: raw }
    }
}

#[async_trait]
impl<H: RequestHandler> RequestHandler for ContentLengthResponseHandler<H> {
    async fn invoke(&self, req: Request<ReqBody>) -> HandlerResult {
        let resp = self.handler.invoke(req).await?;
        Ok(with_content_length(resp))
    }
}
