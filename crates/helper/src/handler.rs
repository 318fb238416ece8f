use crate::body::{BoxError, ReqBody, ResponseBody};
use async_trait::async_trait;
use http::{Request, Response};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub type HandlerResult = Result<Response<ResponseBody>, BoxError>;

/// The next step of a request pipeline: turns a request into a response.
///
/// Middleware are themselves `RequestHandler`s wrapping another one, see [`crate::decorator::Decorator`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: Request<ReqBody>) -> HandlerResult;
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Box<H> {
    async fn invoke(&self, req: Request<ReqBody>) -> HandlerResult {
        (**self).invoke(req).await
    }
}

#[async_trait]
impl<H: RequestHandler + ?Sized> RequestHandler for Arc<H> {
    async fn invoke(&self, req: Request<ReqBody>) -> HandlerResult {
        (**self).invoke(req).await
    }
}

/// a handler backed by an async fn or closure
pub struct FnHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Request<ReqBody>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(Request<ReqBody>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    async fn invoke(&self, req: Request<ReqBody>) -> HandlerResult {
        (self.f)(req).await
    }
}

#[cfg(test)]
mod tests {
    use crate::body::{ReqBody, ResponseBody};
    use crate::handler::{MockRequestHandler, RequestHandler, handler_fn};
    use http::{Request, Response, StatusCode};
    use std::sync::Arc;

    fn assert_is_handler<T: RequestHandler>(_handler: &T) {
        // no op
    }

    #[tokio::test]
    async fn fn_handler_invokes_closure() {
        let handler = handler_fn(|req: Request<ReqBody>| async move {
            let path = req.uri().path().to_string();
            Ok(Response::new(ResponseBody::from(path)))
        });
        assert_is_handler(&handler);

        let req = Request::builder().uri("/users").body(ReqBody::empty()).unwrap();
        let resp = handler.invoke(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn boxed_and_shared_handlers_delegate() {
        let mut mock = MockRequestHandler::new();
        mock.expect_invoke().times(2).returning(|_| Ok(Response::new(ResponseBody::empty())));

        let shared: Arc<dyn RequestHandler> = Arc::new(mock);
        let boxed: Box<dyn RequestHandler> = Box::new(Arc::clone(&shared));

        shared.invoke(Request::new(ReqBody::empty())).await.unwrap();
        boxed.invoke(Request::new(ReqBody::empty())).await.unwrap();
    }
}
