use super::ResponseBody;
use crate::errors::Result;
use http::StatusCode;
use hyper::Response;
use serde::Serialize;
use shared::http::make_json_response;

#[derive(Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    service: &'a str,
}

/// Liveness and readiness both report ok unconditionally. Neither consults
/// the upstreams.
pub fn handle_health(service_name: &str) -> Result<Response<ResponseBody>> {
    let body = HealthResponse {
        status: "ok",
        service: service_name,
    };
    Ok(make_json_response(StatusCode::OK, &body)?)
}
