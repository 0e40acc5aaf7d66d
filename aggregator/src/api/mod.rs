pub mod aggregate;
pub mod health;

use crate::errors::AggregatorError;
use crate::outcome::Mode;
use http::Method;
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use std::time::Duration;

pub type ResponseBody = BoxBody<Bytes, AggregatorError>;

/// Endpoints served by the aggregator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Health,
    Ready,
    Aggregate(Mode),
}

impl Route {
    /// Matches a request line against the known endpoints. Only `GET` is served.
    pub fn find(method: &Method, path: &str) -> Option<Route> {
        if method != Method::GET {
            return None;
        }

        match path {
            "/health" => Some(Route::Health),
            "/ready" => Some(Route::Ready),
            "/api/sum" => Some(Route::Aggregate(Mode::Sum)),
            "/api/play" => Some(Route::Aggregate(Mode::Play)),
            _ => None,
        }
    }

    /// Endpoint tag used for metrics and logs.
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Route::Health => "/health",
            Route::Ready => "/ready",
            Route::Aggregate(Mode::Sum) => "/api/sum",
            Route::Aggregate(Mode::Play) => "/api/play",
        }
    }
}

/// Renders an elapsed duration the way it appears in response bodies, e.g. `"12ms"`.
pub fn format_duration(elapsed: Duration) -> String {
    format!("{}ms", elapsed.as_millis())
}
