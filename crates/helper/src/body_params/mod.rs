//! Request body parsing keyed on the `Content-Type` header.
//!
//! [`BodyParamsDecorator`] wraps a handler into a [`BodyParamsHandler`], which hands each request to
//! the first registered [`BodyParamsStrategy`] that matches its content type, then forwards the
//! parsed request to the wrapped handler. Requests whose method carries no body (`GET`, `HEAD`,
//! `OPTIONS` by default) are forwarded as is.
//!
//! # Example
//!
//! ```
//! use http::{Request, Response};
//! use micro_helper::body_params::{BodyParamsDecorator, JsonStrategy};
//! use micro_helper::decorator::Decorator;
//! use micro_helper::{handler_fn, ReqBody, RequestAttributes, ResponseBody};
//!
//! let decorator = BodyParamsDecorator::builder().clear_strategies().add_strategy(JsonStrategy).build();
//!
//! let handler = decorator.decorate(handler_fn(|req: Request<ReqBody>| async move {
//!     let parsed = req.parsed_body().and_then(|body| body.value()).map(ToString::to_string);
//!     Ok(Response::new(ResponseBody::from(parsed.unwrap_or_default())))
//! }));
//! # let _ = handler;
//! ```

mod form_url_encoded_strategy;
mod json_strategy;

pub use form_url_encoded_strategy::FormUrlEncodedStrategy;
pub use json_strategy::JsonStrategy;

use crate::decorator::Decorator;
use crate::error::BodyParamsError;
use crate::handler::{HandlerResult, RequestHandler};
use crate::ReqBody;
use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::request::Parts;
use http::{Method, Request};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Parses request bodies of the content types it matches.
#[async_trait]
pub trait BodyParamsStrategy: Send + Sync {
    /// Whether this strategy handles `content_type`, the raw `Content-Type` header value.
    fn matches(&self, content_type: &str) -> bool;

    /// Reads and decodes the request body, returning the request with the decoded attributes set.
    async fn parse(&self, req: Request<ReqBody>) -> Result<Request<ReqBody>, BodyParamsError>;
}

/// Reads the request body once, returning the request head with the buffered bytes.
pub(crate) async fn read_body(req: Request<ReqBody>) -> Result<(Parts, Bytes), BodyParamsError> {
    let (parts, body) = req.into_parts();
    let bytes = body.read_to_bytes().await.map_err(BodyParamsError::read_body)?;
    Ok((parts, bytes))
}

fn content_type<B>(req: &Request<B>) -> &str {
    req.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()).unwrap_or_default()
}

type Strategies = Arc<Vec<Box<dyn BodyParamsStrategy>>>;

/// A decorator that wraps a handler into a [`BodyParamsHandler`].
#[derive(Clone)]
pub struct BodyParamsDecorator {
    strategies: Strategies,
    non_body_methods: Arc<Vec<Method>>,
}

impl BodyParamsDecorator {
    /// Starts from the default configuration, see [`BodyParamsDecoratorBuilder`].
    pub fn builder() -> BodyParamsDecoratorBuilder {
        BodyParamsDecoratorBuilder::new()
    }
}

impl Default for BodyParamsDecorator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for BodyParamsDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyParamsDecorator")
            .field("strategies", &self.strategies.len())
            .field("non_body_methods", &self.non_body_methods)
            .finish()
    }
}

impl<H: RequestHandler> Decorator<H> for BodyParamsDecorator {
    type Out = BodyParamsHandler<H>;

    fn decorate(&self, raw: H) -> Self::Out {
        BodyParamsHandler {
            handler: raw,
            strategies: Arc::clone(&self.strategies),
            non_body_methods: Arc::clone(&self.non_body_methods),
        }
    }
}

/// Configures a [`BodyParamsDecorator`].
///
/// Starts with [`FormUrlEncodedStrategy`] and [`JsonStrategy`] registered, in that order, and with
/// `GET`, `HEAD` and `OPTIONS` as the methods that carry no body.
pub struct BodyParamsDecoratorBuilder {
    strategies: Vec<Box<dyn BodyParamsStrategy>>,
    non_body_methods: Vec<Method>,
}

impl BodyParamsDecoratorBuilder {
    fn new() -> Self {
        Self {
            strategies: vec![Box::new(FormUrlEncodedStrategy), Box::new(JsonStrategy)],
            non_body_methods: vec![Method::GET, Method::HEAD, Method::OPTIONS],
        }
    }

    /// Registers a strategy after the ones already present; the first match wins.
    #[must_use]
    pub fn add_strategy<S: BodyParamsStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Removes every registered strategy, including the defaults.
    #[must_use]
    pub fn clear_strategies(mut self) -> Self {
        self.strategies.clear();
        self
    }

    /// Replaces the methods whose requests are forwarded without parsing.
    #[must_use]
    pub fn non_body_methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
        self.non_body_methods = methods.into_iter().collect();
        self
    }

    pub fn build(self) -> BodyParamsDecorator {
        BodyParamsDecorator { strategies: Arc::new(self.strategies), non_body_methods: Arc::new(self.non_body_methods) }
    }
}

impl fmt::Debug for BodyParamsDecoratorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyParamsDecoratorBuilder")
            .field("strategies", &self.strategies.len())
            .field("non_body_methods", &self.non_body_methods)
            .finish()
    }
}

/// A request handler that parses the request body before invoking the wrapped handler.
///
/// A parse failure is returned as the handler error, a boxed [`BodyParamsError`], and the wrapped
/// handler is not invoked.
pub struct BodyParamsHandler<H> {
    handler: H,
    strategies: Strategies,
    non_body_methods: Arc<Vec<Method>>,
}

impl<H> fmt::Debug for BodyParamsHandler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyParamsHandler").field("strategies", &self.strategies.len()).finish_non_exhaustive()
    }
}

#[async_trait]
impl<H: RequestHandler> RequestHandler for BodyParamsHandler<H> {
    async fn invoke(&self, req: Request<ReqBody>) -> HandlerResult {
        if self.non_body_methods.contains(req.method()) {
            trace!(method = %req.method(), "method carries no body, skip body parsing");
            return self.handler.invoke(req).await;
        }

        let strategy = {
            let content_type = content_type(&req);
            let strategy = self.strategies.iter().find(|strategy| strategy.matches(content_type));
            if strategy.is_none() {
                trace!(content_type, "no body params strategy matched");
            }
            strategy
        };

        let Some(strategy) = strategy else {
            return self.handler.invoke(req).await;
        };

        debug!(method = %req.method(), uri = %req.uri(), "parsing request body");
        let req = strategy.parse(req).await.inspect_err(|e| warn!(cause = %e, "failed to parse request body"))?;
        self.handler.invoke(req).await
    }
}
