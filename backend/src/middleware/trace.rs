//! Per-request trace ids and access logging.
//!
//! [`Trace`] opens a [`TraceId`] scope around each request so services and
//! error constructors can read it, copies the id into the `trace-id` response
//! header and logs one access line when the response is ready. Server errors
//! are logged at `warn`, everything else at `info`.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::{Method, StatusCode};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory installing a per-request [`TraceId`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use rbac_api::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceService { inner: service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceService<S> {
    inner: S,
}

/// What the access log needs once the handler has finished.
struct AccessLine {
    trace_id: TraceId,
    method: Method,
    path: String,
    started: Instant,
}

impl AccessLine {
    fn start(trace_id: TraceId, req: &ServiceRequest) -> Self {
        Self {
            trace_id,
            method: req.method().clone(),
            path: req.path().to_owned(),
            started: Instant::now(),
        }
    }

    fn finish(self, status: StatusCode) {
        let Self {
            trace_id,
            method,
            path,
            started,
        } = self;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let code = status.as_u16();
        if status.is_server_error() {
            warn!(%trace_id, %method, %path, status = code, elapsed_ms, "request failed");
        } else {
            info!(%trace_id, %method, %path, status = code, elapsed_ms, "request completed");
        }
    }
}

fn stamp_header<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    // A hyphenated UUID is always a valid header value.
    if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
        res.headers_mut()
            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
    }
}

impl<S, B> Service<ServiceRequest> for TraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let access = AccessLine::start(trace_id, &req);
        let handled = self.inner.call(req);

        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = handled.await?;
            stamp_header(&mut res, trace_id);
            access.finish(res.status());
            Ok(res)
        }))
    }
}
