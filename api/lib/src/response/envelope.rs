//! The uniform success/error/status envelope.

use serde::{Serialize, Serializer};

use crate::error::RequestError;

/// Result of a single API call.
///
/// Exactly one of [`data`](Self::data) and [`error`](Self::error) is
/// populated. The status is the HTTP status when one was received and `0`
/// for transport failures (timeout, cancellation, network, unparseable
/// body). A 2xx body that does not fit `T` keeps its status.
///
/// Serializing an envelope produces `{"data": ..., "status": 200}` or
/// `{"error": "...", "status": 404}`.
///
/// ## Examples
///
/// ```rust
/// use xplat_api::{ApiResponse, RequestError};
///
/// let ok: ApiResponse<u32> = ApiResponse::success(200, 7);
/// assert_eq!(ok.data(), Some(&7));
/// assert!(ok.error().is_none());
///
/// let failed: ApiResponse<u32> = ApiResponse::failure(RequestError::Timeout { duration_ms: 10 });
/// assert_eq!(failed.status(), 0);
/// assert_eq!(failed.error().as_deref(), Some("Request timeout"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    status: u16,
    outcome: Result<T, RequestError>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful envelope.
    pub fn success(status: u16, data: T) -> Self {
        Self {
            status,
            outcome: Ok(data),
        }
    }

    /// Creates a failed envelope; the status is derived from the error.
    pub fn failure(error: RequestError) -> Self {
        Self {
            status: error.status(),
            outcome: Err(error),
        }
    }

    /// HTTP status, or `0` when no response was obtained.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` if the call produced data.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The decoded payload of a successful call.
    pub fn data(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    /// The error message of a failed call.
    pub fn error(&self) -> Option<String> {
        self.outcome.as_ref().err().map(ToString::to_string)
    }

    /// The structured failure of a failed call.
    pub fn request_error(&self) -> Option<&RequestError> {
        self.outcome.as_ref().err()
    }

    /// Borrows the outcome as a `Result`.
    pub fn as_result(&self) -> Result<&T, &RequestError> {
        self.outcome.as_ref()
    }

    /// Consumes the envelope, yielding the payload if there is one.
    pub fn into_data(self) -> Option<T> {
        self.outcome.ok()
    }

    /// Consumes the envelope into a `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<T, RequestError> {
        self.outcome
    }

    /// Maps the payload, keeping status and error untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            outcome: self.outcome.map(f),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    status: u16,
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Envelope {
            data: self.data(),
            error: self.error(),
            status: self.status,
        }
        .serialize(serializer)
    }
}
