//! Response handling.
//!
//! [`ApiResponse`] is the envelope every network call resolves to, and
//! [`BodyFormat`] decides how a raw response body is read based on its
//! `Content-Type`.

mod envelope;
mod format;

pub use envelope::ApiResponse;
pub use format::BodyFormat;

pub(crate) use format::{decode, error_message};
