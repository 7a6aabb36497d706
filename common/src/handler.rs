//! [`Handler`] abstractions.

use std::{future::Future, rc::Rc, sync::Arc};

/// Executable handler.
///
/// Commands, queries, tasks and infrastructure operations are all expressed
/// as [`Handler`]s of some operation type.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

impl<H, Args> Handler<Args> for &H
where
    H: Handler<Args> + ?Sized,
{
    type Ok = H::Ok;
    type Err = H::Err;

    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>> {
        (**self).execute(args)
    }
}

impl<H, Args> Handler<Args> for Rc<H>
where
    H: Handler<Args> + ?Sized,
{
    type Ok = H::Ok;
    type Err = H::Err;

    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>> {
        (**self).execute(args)
    }
}

impl<H, Args> Handler<Args> for Arc<H>
where
    H: Handler<Args> + ?Sized,
{
    type Ok = H::Ok;
    type Err = H::Err;

    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>> {
        (**self).execute(args)
    }
}
