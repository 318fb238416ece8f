//! Middleware composition.
//!
//! A [`Decorator`] turns a handler into another handler that wraps it, e.g.
//! [`crate::content_length::ContentLengthDecorator`] turns `H` into `ContentLengthResponseHandler<H>`.
//! Decorators stack with [`DecoratorExt::and_then`]; the decorator applied last ends up outermost
//! and sees the request first.

mod decorator_composer;
mod identity;

pub use decorator_composer::DecoratorComposer;
pub use identity::IdentityDecorator;

pub trait Decorator<In> {
    type Out;

    fn decorate(&self, raw: In) -> Self::Out;
}

pub trait DecoratorExt<In>: Decorator<In> {
    /// applies `self` first, then `decorator` to the result
    fn and_then<D>(self, decorator: D) -> DecoratorComposer<Self, D, In>
    where
        Self: Sized,
    {
        DecoratorComposer::new(self, decorator)
    }

    /// applies `decorator` first, then `self` to the result
    fn compose<D>(self, decorator: D) -> DecoratorComposer<D, Self, In>
    where
        Self: Sized,
    {
        DecoratorComposer::new(decorator, self)
    }
}

impl<T: Decorator<In> + ?Sized, In> DecoratorExt<In> for T {}
