//! The `/api/sum` and `/api/play` endpoints.

use super::{ResponseBody, format_duration};
use crate::errors::Result;
use crate::executor::Executor;
use crate::outcome::{Mode, Outcome, Winner};
use crate::reading::Number;
use chrono::{SecondsFormat, Utc};
use http::StatusCode;
use hyper::Response;
use serde::Serialize;
use shared::http::make_json_response;
use tokio::time::Instant;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AggregateResponse {
    sum: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<Winner>,
    rock_number: Number,
    paper_number: Number,
    scissor_number: Number,
    duration: String,
    timestamp: String,
}

impl AggregateResponse {
    fn new(outcome: &Outcome, duration: String) -> Self {
        AggregateResponse {
            sum: outcome.sum,
            winner: outcome.winner,
            rock_number: outcome.readings.rock,
            paper_number: outcome.readings.paper,
            scissor_number: outcome.readings.scissor,
            duration,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    duration: String,
}

/// Gathers one reading from each upstream and reduces them according to `mode`.
///
/// Upstream failures are not errors of this function: they are rendered as a
/// 500 response carrying the failure message.
pub async fn handle_aggregate(executor: &Executor, mode: Mode) -> Result<Response<ResponseBody>> {
    let start = Instant::now();
    tracing::info!(?mode, "Calling rock, paper, and scissor services");

    match executor.gather().await {
        Ok(readings) => {
            tracing::info!(
                rock = %readings.rock,
                paper = %readings.paper,
                scissor = %readings.scissor,
                "Received readings"
            );

            let outcome = Outcome::compute(readings, mode);
            let duration = format_duration(start.elapsed());
            match outcome.winner {
                Some(winner) => {
                    tracing::info!(sum = %outcome.sum, %winner, %duration, "Calculated result")
                }
                None => tracing::info!(sum = %outcome.sum, %duration, "Calculated sum"),
            }

            let body = AggregateResponse::new(&outcome, duration);
            Ok(make_json_response(StatusCode::OK, &body)?)
        }
        Err(e) => {
            let duration = format_duration(start.elapsed());
            tracing::error!(
                error = %e,
                source = ?e.source_name(),
                %duration,
                "Error occurred"
            );

            let body = ErrorResponse {
                error: mode.failure_label(),
                message: e.to_string(),
                duration,
            };
            Ok(make_json_response(StatusCode::INTERNAL_SERVER_ERROR, &body)?)
        }
    }
}
