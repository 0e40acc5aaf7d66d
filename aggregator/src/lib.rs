pub mod api;
pub mod config;
pub mod errors;
pub mod executor;
pub mod metrics_defs;
pub mod outcome;
pub mod reading;
pub mod upstream;

#[cfg(test)]
mod testutils;

use crate::api::aggregate::handle_aggregate;
use crate::api::health::handle_health;
use crate::api::{ResponseBody, Route};
use crate::errors::AggregatorError;
use crate::executor::Executor;
use crate::metrics_defs::{REQUEST_DURATION, REQUESTS_INFLIGHT};
use crate::reading::Source;
use http::StatusCode;
use hyper::body::Incoming;
use hyper::service::Service;
use hyper::{Request, Response};
use shared::http::{make_error_response, run_http_service};
use shared::{gauge, histogram};
use std::pin::Pin;
use std::sync::Arc;
use tokio::time::Instant;

pub async fn run(config: config::Config) -> Result<(), AggregatorError> {
    for source in Source::ALL {
        tracing::info!(
            source = %source,
            url = %config.upstreams.get(source),
            "Upstream configured"
        );
    }
    if config.upstream_timeout_secs.is_none() {
        tracing::warn!("No upstream timeout configured, requests wait on upstreams indefinitely");
    }

    let service = AggregatorService::new(&config);
    tracing::info!(service = %config.service_name, "Starting aggregator");
    run_http_service(&config.listener.host, config.listener.port, service).await
}

/// Serves the health and aggregate endpoints.
#[derive(Clone)]
pub struct AggregatorService {
    service_name: Arc<str>,
    executor: Executor,
}

impl AggregatorService {
    pub fn new(config: &config::Config) -> Self {
        Self::with_executor(config.service_name.as_str(), Executor::from_config(config))
    }

    pub fn with_executor(service_name: impl Into<Arc<str>>, executor: Executor) -> Self {
        Self {
            service_name: service_name.into(),
            executor,
        }
    }

    pub async fn handle<B>(
        &self,
        req: Request<B>,
    ) -> Result<Response<ResponseBody>, AggregatorError> {
        let Some(route) = Route::find(req.method(), req.uri().path()) else {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                "No route matched"
            );
            return Ok(make_error_response(StatusCode::NOT_FOUND));
        };

        let start = Instant::now();
        let inflight = InflightGuard::new();

        let result = match route {
            Route::Health | Route::Ready => handle_health(&self.service_name),
            Route::Aggregate(mode) => {
                tracing::info!(endpoint = route.endpoint(), "Received request");
                handle_aggregate(&self.executor, mode).await
            }
        };

        drop(inflight);
        let status = match &result {
            Ok(response) => response.status(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        histogram!(
            REQUEST_DURATION,
            "endpoint" => route.endpoint(),
            "status" => status.as_str().to_owned()
        )
        .record(start.elapsed().as_secs_f64());

        result
    }
}

/// Holds one slot of the in-flight gauge. Releasing it on drop keeps the gauge
/// accurate when hyper cancels a request whose client went away.
struct InflightGuard;

impl InflightGuard {
    fn new() -> Self {
        gauge!(REQUESTS_INFLIGHT).increment(1.0);
        InflightGuard
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        gauge!(REQUESTS_INFLIGHT).decrement(1.0);
    }
}

impl Service<Request<Incoming>> for AggregatorService {
    type Response = Response<ResponseBody>;
    type Error = AggregatorError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { service.handle(req).await })
    }
}
