//! W3C trace context propagation
//!
//! Both services run [`propagate`] as their outermost middleware. It joins
//! the caller's trace when a valid `traceparent` header arrives, or starts a
//! new one otherwise. The resulting context is kept in task-local storage for
//! the lifetime of the request so outbound calls can [`inject`] a child
//! context and spans on both hops land in the same trace.
//!
//! Tokio task-locals are not inherited by spawned tasks; wrap spawned work in
//! [`TraceContext::scope`] if it needs the active context.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use rand::Rng;
use thiserror::Error;
use tracing::Instrument;

/// Header carrying the trace context, lowercase as required by `HeaderName::from_static`
pub const TRACEPARENT: &str = "traceparent";

const VERSION: u8 = 0;
const FLAG_SAMPLED: u8 = 0x01;

tokio::task_local! {
    static CURRENT: TraceContext;
}

/// Errors from parsing a `traceparent` header value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceParentError {
    #[error("expected 4 dash-separated fields")]
    FieldCount,

    #[error("invalid {0} field")]
    InvalidField(&'static str),

    #[error("unsupported version ff")]
    ForbiddenVersion,

    #[error("all-zero {0} is not allowed")]
    ZeroId(&'static str),
}

/// Trace identity for one hop: the shared trace id plus this hop's span id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    trace_id: u128,
    span_id: u64,
    flags: u8,
}

impl TraceContext {
    /// Start a new sampled trace
    pub fn new_root() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            trace_id: rng.gen_range(1..=u128::MAX),
            span_id: rng.gen_range(1..=u64::MAX),
            flags: FLAG_SAMPLED,
        }
    }

    /// Same trace, fresh span id
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id,
            span_id: rand::thread_rng().gen_range(1..=u64::MAX),
            flags: self.flags,
        }
    }

    /// Trace id as 32 lowercase hex digits
    pub fn trace_id(&self) -> String {
        format!("{:032x}", self.trace_id)
    }

    /// Span id as 16 lowercase hex digits
    pub fn span_id(&self) -> String {
        format!("{:016x}", self.span_id)
    }

    pub fn is_sampled(&self) -> bool {
        self.flags & FLAG_SAMPLED != 0
    }

    /// The context of the request currently being handled, if any
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|ctx| *ctx).ok()
    }

    /// Run `fut` with this context as [`TraceContext::current`]
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, fut).await
    }
}

impl fmt::Display for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}-{:032x}-{:016x}-{:02x}",
            VERSION, self.trace_id, self.span_id, self.flags
        )
    }
}

fn parse_hex_field<T>(
    value: &str,
    width: usize,
    name: &'static str,
    parse: fn(&str, u32) -> Result<T, std::num::ParseIntError>,
) -> Result<T, TraceParentError> {
    let is_lower_hex = value
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if value.len() != width || !is_lower_hex {
        return Err(TraceParentError::InvalidField(name));
    }
    parse(value, 16).map_err(|_| TraceParentError::InvalidField(name))
}

impl FromStr for TraceContext {
    type Err = TraceParentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split('-').collect();
        let [version, trace_id, span_id, flags, rest @ ..] = fields.as_slice() else {
            return Err(TraceParentError::FieldCount);
        };

        let version = parse_hex_field(version, 2, "version", u8::from_str_radix)?;
        if version == 0xff {
            return Err(TraceParentError::ForbiddenVersion);
        }
        // Later versions may append fields; only the first four are read
        if version == VERSION && !rest.is_empty() {
            return Err(TraceParentError::FieldCount);
        }
        let trace_id = parse_hex_field(trace_id, 32, "trace-id", u128::from_str_radix)?;
        if trace_id == 0 {
            return Err(TraceParentError::ZeroId("trace-id"));
        }
        let span_id = parse_hex_field(span_id, 16, "parent-id", u64::from_str_radix)?;
        if span_id == 0 {
            return Err(TraceParentError::ZeroId("parent-id"));
        }
        let flags = parse_hex_field(flags, 2, "trace-flags", u8::from_str_radix)?;

        Ok(Self {
            trace_id,
            span_id,
            flags,
        })
    }
}

/// Trace propagation middleware
///
/// Opens a `request` span tagged with the trace and span ids, runs the rest
/// of the stack inside the request's [`TraceContext`] scope, and echoes the
/// hop's `traceparent` on the response.
pub async fn propagate(request: Request, next: Next) -> Response {
    let inbound = request
        .headers()
        .get(TRACEPARENT)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| match value.parse::<TraceContext>() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                tracing::debug!(error = %e, header = value, "Ignoring malformed traceparent");
                None
            }
        });

    let context = inbound.map_or_else(TraceContext::new_root, |parent| parent.child());
    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        trace_id = %context.trace_id(),
        span_id = %context.span_id(),
    );

    let mut response = context.scope(next.run(request)).instrument(span).await;

    match HeaderValue::from_str(&context.to_string()) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACEPARENT), value);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode traceparent header");
        }
    }

    response
}

/// Attach a child `traceparent` to an outbound request.
///
/// Outside a request scope a fresh root context is used so the callee still
/// receives a well-formed header.
pub fn inject(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    let context = TraceContext::current().map_or_else(TraceContext::new_root, |ctx| ctx.child());
    request.header(TRACEPARENT, context.to_string())
}
