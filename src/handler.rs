use crate::{request::Request, response::Response};

/// Something that can answer a request routed to it.
///
/// Handlers run synchronously: everything served here is already in memory.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: &Request, res: &mut Response);
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response) + Send + Sync + 'static,
{
    fn call(&self, req: &Request, res: &mut Response) {
        (self)(req, res)
    }
}
