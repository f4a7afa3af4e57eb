use std::sync::Arc;
use actix_web::HttpRequest;

pub mod not_found;
pub mod redirect;
pub mod writer;

pub use not_found::NotFound;
pub use redirect::{map_handler, PathRedirector};
pub use writer::ResponseWriter;

/// Something that can answer a request by writing into a [`ResponseWriter`].
///
/// Handlers are shared across server workers, so they must be `Send + Sync`
/// and are expected to hold only read-only state once built.
pub trait Handler: Send + Sync {
    fn serve(&self, req: &HttpRequest, w: &mut ResponseWriter);
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, req: &HttpRequest, w: &mut ResponseWriter) {
        (**self).serve(req, w)
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn serve(&self, req: &HttpRequest, w: &mut ResponseWriter) {
        (**self).serve(req, w)
    }
}

/// Adapts a closure into a [`Handler`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&HttpRequest, &mut ResponseWriter) + Send + Sync,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&HttpRequest, &mut ResponseWriter) + Send + Sync,
{
    fn serve(&self, req: &HttpRequest, w: &mut ResponseWriter) {
        (self.f)(req, w)
    }
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}
