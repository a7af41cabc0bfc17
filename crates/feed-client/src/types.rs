//! HTTP response data transfer objects
//!
//! These types carry just enough of a raw HTTP exchange for the sync engine
//! to classify it. They are intentionally free of octocrab types.

/// Raw response to a conditional GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,

    /// Value of the `Last-Modified` response header, if any
    pub last_modified: Option<String>,

    /// Response body (empty when the server sent none)
    pub body: String,
}

impl RawResponse {
    /// Create a response with a status and body and no `Last-Modified` header
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            last_modified: None,
            body: body.into(),
        }
    }

    /// Attach a `Last-Modified` header value
    pub fn with_last_modified(mut self, value: impl Into<String>) -> Self {
        self.last_modified = Some(value.into());
        self
    }

    /// Classify the status code
    pub fn status_class(&self) -> StatusClass {
        StatusClass::from_status(self.status)
    }
}

/// Status code class of an HTTP response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 1xx
    Informational,
    /// 2xx
    Success,
    /// 3xx, including 304 Not Modified
    Redirection,
    /// 4xx
    ClientError,
    /// 5xx and anything out of range
    ServerError,
}

impl StatusClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            100..=199 => StatusClass::Informational,
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirection,
            400..=499 => StatusClass::ClientError,
            _ => StatusClass::ServerError,
        }
    }

    /// Whether a freshness marker on a response of this class may be trusted
    pub fn carries_freshness(&self) -> bool {
        matches!(self, StatusClass::Success | StatusClass::Redirection)
    }
}
