use crate::decorator::{Decorator, IdentityDecorator};
use std::fmt;
use std::marker::PhantomData;

/// Applies `decorator_1`, then `decorator_2` to its output.
///
/// `In` is the handler type being decorated; carrying it lets a chain built with
/// [`crate::decorator::DecoratorExt::and_then`] be inferred from the handler passed to `decorate`.
pub struct DecoratorComposer<D1, D2, In> {
    decorator_1: D1,
    decorator_2: D2,
    _phantom: PhantomData<fn(In)>,
}

impl<D1, D2, In> DecoratorComposer<D1, D2, In> {
    pub fn new(decorator_1: D1, decorator_2: D2) -> Self {
        Self { decorator_1, decorator_2, _phantom: PhantomData }
    }
}

impl<In> Default for DecoratorComposer<IdentityDecorator, IdentityDecorator, In> {
    fn default() -> Self {
        Self::new(IdentityDecorator, IdentityDecorator)
    }
}

impl<D1: fmt::Debug, D2: fmt::Debug, In> fmt::Debug for DecoratorComposer<D1, D2, In> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorComposer")
            .field("decorator_1", &self.decorator_1)
            .field("decorator_2", &self.decorator_2)
            .finish()
    }
}

impl<In, D1, D2> Decorator<In> for DecoratorComposer<D1, D2, In>
where
    D1: Decorator<In>,
    D2: Decorator<D1::Out>,
{
    type Out = D2::Out;

    fn decorate(&self, raw: In) -> Self::Out {
        let output_1 = self.decorator_1.decorate(raw);
        self.decorator_2.decorate(output_1)
    }
}
