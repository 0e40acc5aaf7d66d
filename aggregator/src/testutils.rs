use crate::metrics_defs::REQUESTS_INFLIGHT;
use http::StatusCode;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

/// Start a mock upstream that answers every request with `status` and `body`.
pub async fn start_mock_upstream(status: StatusCode, body: &'static str) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            let io = TokioIo::new(stream);

            tokio::spawn(async move {
                let service = service_fn(move |_req: Request<hyper::body::Incoming>| async move {
                    let body = Full::new(Bytes::from_static(body.as_bytes()));
                    let mut response = Response::new(body);
                    *response.status_mut() = status;
                    Ok::<_, Infallible>(response)
                });

                let _ = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                    .serve_connection(io, service)
                    .await;
            });
        }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()
}

/// Start a mock upstream returning `{"number": <number>}`.
pub async fn start_number_upstream(number: i64) -> Url {
    let body: &'static str = Box::leak(format!(r#"{{"number": {number}}}"#).into_boxed_str());
    start_mock_upstream(StatusCode::OK, body).await
}

/// Start an upstream that accepts connections but never responds.
pub async fn start_hanging_upstream() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            held.push(stream);
        }
    });

    Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()
}

/// Recorder that tracks the in-flight request gauge and discards everything else.
#[derive(Default)]
pub struct InflightRecorder {
    inflight: Arc<AtomicU64>,
}

impl InflightRecorder {
    pub fn inflight(&self) -> f64 {
        f64::from_bits(self.inflight.load(Ordering::SeqCst))
    }
}

impl Recorder for InflightRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, _key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::noop()
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        if key.name() == REQUESTS_INFLIGHT.name {
            Gauge::from_arc(self.inflight.clone())
        } else {
            Gauge::noop()
        }
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}
