//! HTTP verbs supported by the client.

use strum::{Display, EnumIter, EnumString};

/// HTTP methods exposed by [`ApiClient`](crate::ApiClient).
///
/// ## Examples
///
/// ```rust
/// use xplat_api::RestMethod;
///
/// let method = RestMethod::Get;
/// assert!(!method.has_body());
///
/// let parsed: RestMethod = "PATCH".parse().unwrap();
/// assert_eq!(parsed, RestMethod::Patch);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    Get,
    /// Sends a JSON body.
    Post,
    /// Sends a JSON body.
    Put,
    /// Sends a JSON body.
    Patch,
    Delete,
}

impl RestMethod {
    /// Returns `true` if a JSON body is sent with this method.
    ///
    /// Only POST, PUT, and PATCH carry request bodies; a body handed to any
    /// other verb is ignored.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// The `reqwest` method used on the wire.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}
