//! Fan-out of one aggregate request to the three upstreams.

use crate::config::Config;
use crate::errors::{AggregatorError, Result};
use crate::metrics_defs::{UPSTREAM_FAILURES, UPSTREAM_REQUEST_DURATION};
use crate::reading::{Readings, Source};
use crate::upstream::{HttpUpstream, RandomSource};
use shared::{counter, histogram};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Queries every upstream concurrently and joins the results all-or-nothing.
#[derive(Clone)]
pub struct Executor {
    upstreams: Arc<[Arc<dyn RandomSource>]>,
}

impl Executor {
    pub fn new(upstreams: Vec<Arc<dyn RandomSource>>) -> Self {
        Self {
            upstreams: upstreams.into(),
        }
    }

    /// One HTTP upstream per source, all sharing a single connection pool.
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();
        let timeout = config.upstream_timeout();

        let upstreams = Source::ALL
            .into_iter()
            .map(|source| {
                let upstream = HttpUpstream::new(
                    client.clone(),
                    source,
                    config.upstreams.get(source),
                    timeout,
                );
                Arc::new(upstream) as Arc<dyn RandomSource>
            })
            .collect();

        Self::new(upstreams)
    }

    /// Fetches a reading from every upstream.
    ///
    /// All requests are dispatched before any is awaited. The first failure
    /// aborts the requests still in flight and is returned as is; no partial
    /// result is ever produced.
    pub async fn gather(&self) -> Result<Readings> {
        let mut join_set = JoinSet::new();

        for upstream in self.upstreams.iter() {
            let upstream = upstream.clone();
            join_set.spawn(async move {
                let start = Instant::now();
                let result = upstream.fetch().await;
                histogram!(UPSTREAM_REQUEST_DURATION, "source" => upstream.source().as_str())
                    .record(start.elapsed().as_secs_f64());
                (upstream.source(), result)
            });
        }

        let mut readings = Vec::with_capacity(self.upstreams.len());

        while let Some(join_result) = join_set.join_next().await {
            match join_result {
                Ok((_, Ok(reading))) => {
                    tracing::debug!(
                        source = %reading.source,
                        value = %reading.value,
                        "Received reading"
                    );
                    readings.push(reading);
                }
                Ok((source, Err(e))) => {
                    counter!(UPSTREAM_FAILURES, "source" => source.as_str()).increment(1);
                    tracing::debug!(
                        source = %source,
                        aborted = join_set.len(),
                        "Upstream failed, aborting remaining requests"
                    );
                    join_set.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("Task panicked: {e}");
                    join_set.abort_all();
                    return Err(AggregatorError::TaskFailed(e.to_string()));
                }
            }
        }

        Readings::from_readings(readings).ok_or(AggregatorError::IncompleteReadings)
    }
}
