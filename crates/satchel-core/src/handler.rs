//! Handler traits and the binding entry point.
//!
//! [`Handler`] is implemented for plain functions of two shapes:
//!
//! - `fn(RequestContext<'_>, P) -> R`
//! - `fn(P) -> R`
//!
//! where `P: Props` and `R: HandlerOutput`. The `Args` parameter is a marker
//! that keeps the two blanket impls apart. Functions with any other
//! parameter list do not implement [`Handler`] and fail to compile.
//!
//! [`generate_handler`] analyses a handler once and returns a
//! [`PropsHandler`], which serves requests through the [`Endpoint`] trait.

use crate::{
    dispatch, hydrate, reject, BindConfig, BindingError, BindingPlan, HandlerOutput, Props,
    RequestContext, RequestId, ResponseSink,
};
use bytes::Bytes;
use satchel_extract::ExtractionContext;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug_span, warn};

/// A function that takes props and produces a [`HandlerOutput`].
pub trait Handler<Args>: Send + Sync + 'static {
    /// The props type the handler declares.
    type Props: Props;

    /// The return type of the handler.
    type Output: HandlerOutput;

    /// Invokes the handler.
    fn call(&self, ctx: RequestContext<'_>, props: Self::Props) -> Self::Output;

    /// Returns `true` if the handler declares a [`RequestContext`] parameter.
    fn takes_context() -> bool;
}

/// Marker for handlers shaped `fn(RequestContext<'_>, P) -> R`.
pub struct WithContext<P>(PhantomData<fn() -> P>);

/// Marker for handlers shaped `fn(P) -> R`.
pub struct PropsOnly<P>(PhantomData<fn() -> P>);

impl<F, P, R> Handler<WithContext<P>> for F
where
    F: for<'a> Fn(RequestContext<'a>, P) -> R + Send + Sync + 'static,
    P: Props,
    R: HandlerOutput,
{
    type Props = P;
    type Output = R;

    fn call(&self, ctx: RequestContext<'_>, props: P) -> R {
        self(ctx, props)
    }

    fn takes_context() -> bool {
        true
    }
}

impl<F, P, R> Handler<PropsOnly<P>> for F
where
    F: Fn(P) -> R + Send + Sync + 'static,
    P: Props,
    R: HandlerOutput,
{
    type Props = P;
    type Output = R;

    fn call(&self, _ctx: RequestContext<'_>, props: P) -> R {
        self(props)
    }

    fn takes_context() -> bool {
        false
    }
}

/// A request handler in the two-argument hosting shape.
///
/// Any hosting collaborator that can hand over a response sink and a request
/// can serve an `Endpoint`. Closures of that shape implement it directly.
pub trait Endpoint: Send + Sync + 'static {
    /// Serves one request, writing the response into `sink`.
    fn serve(&self, sink: &mut dyn ResponseSink, request: &http::Request<Bytes>);
}

impl<F> Endpoint for F
where
    F: Fn(&mut dyn ResponseSink, &http::Request<Bytes>) + Send + Sync + 'static,
{
    fn serve(&self, sink: &mut dyn ResponseSink, request: &http::Request<Bytes>) {
        self(sink, request);
    }
}

/// A handler bound to its plan, ready to serve requests.
///
/// Cloning is cheap: clones share the plan.
pub struct PropsHandler<H, Args>
where
    H: Handler<Args>,
{
    plan: Arc<BindingPlan<H, Args>>,
    config: BindConfig,
}

impl<H, Args> PropsHandler<H, Args>
where
    H: Handler<Args>,
{
    /// Replaces the binding configuration.
    #[must_use]
    pub fn with_config(mut self, config: BindConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the plan.
    #[must_use]
    pub fn plan(&self) -> &BindingPlan<H, Args> {
        &self.plan
    }

    /// Returns the binding configuration.
    #[must_use]
    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Serves one request from an already built extraction context.
    pub fn serve_context(&self, sink: &mut dyn ResponseSink, request: &ExtractionContext) {
        let request_id = RequestId::new();
        let span = debug_span!(
            "satchel.request",
            request_id = %request_id,
            plan = %self.plan,
            method = %request.method(),
            path = request.path(),
        );
        let _guard = span.enter();

        let props = match hydrate(&self.plan, request) {
            Ok(props) => props,
            Err(err) => {
                warn!(
                    field = err.field(),
                    error_code = err.error_code(),
                    error = %err,
                    "rejecting request: props hydration failed"
                );
                if let Err(io_err) = reject(sink, &err, &self.config) {
                    warn!(error = %io_err, "failed to write rejection response");
                }
                return;
            }
        };

        if let Err(err) = dispatch(&self.plan, props, request_id, request, sink) {
            warn!(error = %err, "failed to write response");
        }
    }
}

impl<H, Args> Clone for PropsHandler<H, Args>
where
    H: Handler<Args>,
{
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
            config: self.config.clone(),
        }
    }
}

impl<H, Args> fmt::Debug for PropsHandler<H, Args>
where
    H: Handler<Args>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropsHandler")
            .field("plan", &self.plan)
            .field("config", &self.config)
            .finish()
    }
}

impl<H, Args> Endpoint for PropsHandler<H, Args>
where
    H: Handler<Args>,
    Args: 'static,
{
    fn serve(&self, sink: &mut dyn ResponseSink, request: &http::Request<Bytes>) {
        let ctx = ExtractionContext::from_request(request);
        self.serve_context(sink, &ctx);
    }
}

/// Analyses `handler` and returns an endpoint serving it.
///
/// All validation happens here: unsupported field types, fields without a
/// source and unusable return shapes are reported before any request is
/// served.
///
/// # Example
///
/// ```
/// use satchel_core::{generate_handler, BasicResponder, RequestContext};
///
/// fn ping(_ctx: RequestContext<'_>, _props: ()) -> BasicResponder {
///     satchel_core::ok().with_body("pong")
/// }
///
/// let endpoint = generate_handler(ping).unwrap();
/// assert_eq!(endpoint.plan().to_string(), "() -> structured-response");
/// ```
pub fn generate_handler<H, Args>(handler: H) -> Result<PropsHandler<H, Args>, BindingError>
where
    H: Handler<Args>,
{
    let plan = BindingPlan::build(handler)?;
    Ok(PropsHandler {
        plan: Arc::new(plan),
        config: BindConfig::default(),
    })
}

/// Like [`generate_handler`], but panics on an invalid handler.
///
/// Meant for registration at process start-up, where a handler that cannot
/// be bound is a programming error.
///
/// # Panics
///
/// Panics with the [`BindingError`] message if the handler cannot be bound.
pub fn bind<H, Args>(handler: H) -> PropsHandler<H, Args>
where
    H: Handler<Args>,
{
    match generate_handler(handler) {
        Ok(endpoint) => endpoint,
        Err(err) => panic!("cannot bind handler: {err}"),
    }
}
