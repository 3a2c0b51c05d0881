//! Request execution with tracing instrumentation.
//!
//! [`execute`] performs exactly one HTTP exchange and folds every outcome,
//! including timeouts, cancellation and malformed bodies, into an
//! [`ApiResponse`]. It never returns an error to its caller.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{Span, debug, instrument, warn};

use crate::client::options::CancellationHandle;
use crate::error::RequestError;
use crate::method::RestMethod;
use crate::response::{ApiResponse, BodyFormat, decode, error_message};

/// A fully resolved request: URL joined, headers merged, body serialized.
#[derive(Debug)]
pub(crate) struct PreparedRequest {
    pub method: RestMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
    pub cancellation: Option<CancellationHandle>,
}

/// Status and parsed body of a completed exchange.
struct RawResponse {
    status: StatusCode,
    body: Value,
}

impl RawResponse {
    fn into_envelope<T: DeserializeOwned>(self) -> ApiResponse<T> {
        let status = self.status.as_u16();
        if !self.status.is_success() {
            return ApiResponse::failure(RequestError::Http {
                status,
                message: error_message(&self.body, status),
            });
        }
        match decode(self.body, status) {
            Ok(data) => ApiResponse::success(status, data),
            Err(err) => ApiResponse::failure(err),
        }
    }
}

/// Executes a prepared request against the given HTTP client.
///
/// One timer bounds the whole exchange (send and body read). It is dropped
/// together with the exchange future on every exit path, so no timer
/// outlives the request.
#[instrument(
    name = "api_request",
    skip(http, request),
    fields(
        http.method = %request.method,
        http.url = %request.url,
        http.status_code = tracing::field::Empty,
        otel.kind = "client",
        otel.status_code = tracing::field::Empty,
    )
)]
pub(crate) async fn execute<T>(http: &reqwest::Client, request: PreparedRequest) -> ApiResponse<T>
where
    T: DeserializeOwned,
{
    let limit = request.timeout;
    let cancellation = request.cancellation.clone();
    let exchange = tokio::time::timeout(limit, send(http, request));

    let outcome = match cancellation {
        Some(handle) => tokio::select! {
            result = exchange => flatten_timeout(result, limit),
            () = handle.cancelled() => Err(RequestError::Cancelled),
        },
        None => flatten_timeout(exchange.await, limit),
    };

    let response = match outcome {
        Ok(raw) => raw.into_envelope(),
        Err(err) => ApiResponse::failure(err),
    };
    record_outcome(&response);
    response
}

async fn send(
    http: &reqwest::Client,
    request: PreparedRequest,
) -> Result<RawResponse, RequestError> {
    let mut builder = http
        .request(request.method.to_reqwest(), &request.url)
        .headers(request.headers);

    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = builder.send().await?;
    let status = response.status();
    let format = BodyFormat::from_headers(response.headers());
    let bytes = response.bytes().await?;
    let body = format.parse(&bytes)?;

    Ok(RawResponse { status, body })
}

fn flatten_timeout(
    result: Result<Result<RawResponse, RequestError>, tokio::time::error::Elapsed>,
    limit: Duration,
) -> Result<RawResponse, RequestError> {
    match result {
        Ok(exchanged) => exchanged,
        Err(_elapsed) => Err(RequestError::Timeout {
            duration_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

fn record_outcome<T>(response: &ApiResponse<T>) {
    let span = Span::current();
    let status = response.status();
    if status != 0 {
        span.record("http.status_code", status);
    }

    match response.request_error() {
        None => {
            span.record("otel.status_code", "OK");
            debug!(status, "request succeeded");
        }
        Some(RequestError::Http { .. }) => {
            let otel_status = if status >= 500 { "ERROR" } else { "UNSET" };
            span.record("otel.status_code", otel_status);
            debug!(status, "server returned an error status");
        }
        Some(err @ RequestError::Decode { .. }) => {
            span.record("otel.status_code", "ERROR");
            warn!(status, error = %err, "response body could not be decoded");
        }
        Some(err) => {
            span.record("otel.status_code", "ERROR");
            warn!(error = %err, "request failed before a response was received");
        }
    }
}
