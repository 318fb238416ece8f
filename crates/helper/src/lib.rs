//! Request and response helpers for the micro web framework.
//!
//! - [`body_params`]: parses request bodies according to their `Content-Type`, attaching the
//!   [`RawBody`] and [`ParsedBody`] attributes to the request
//! - [`content_length`]: fills in a missing `Content-Length` response header when the body size is known
//!
//! Both are [`decorator::Decorator`]s over a [`RequestHandler`], so they compose into a pipeline:
//!
//! ```
//! use http::{Request, Response};
//! use micro_helper::body_params::BodyParamsDecorator;
//! use micro_helper::content_length::ContentLengthDecorator;
//! use micro_helper::decorator::{Decorator, DecoratorExt};
//! use micro_helper::{handler_fn, ReqBody, RequestHandler, ResponseBody};
//!
//! let decorators = BodyParamsDecorator::default().and_then(ContentLengthDecorator);
//! let handler = decorators.decorate(handler_fn(|_req: Request<ReqBody>| async {
//!     Ok(Response::new(ResponseBody::from("hello")))
//! }));
//!
//! fn assert_handler<H: RequestHandler>(_handler: &H) {}
//! assert_handler(&handler);
//! ```

mod body;
mod handler;

pub mod body_params;
pub mod content_length;
pub mod decorator;
pub mod error;
pub mod request;

pub use body::BoxError;
pub use body::ReqBody;
pub use body::ResponseBody;
pub use error::BodyParamsError;
pub use error::MalformedRequestBody;
pub use handler::handler_fn;
pub use handler::FnHandler;
pub use handler::HandlerResult;
pub use handler::RequestHandler;
pub use request::ParsedBody;
pub use request::RawBody;
pub use request::RequestAttributes;
