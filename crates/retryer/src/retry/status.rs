//! HTTP status seam for [`Retry::http_next`](super::Retry::http_next).

use crate::error::ServerError;

/// Anything that carries an HTTP status code.
///
/// The controller only reads the code; it never builds or mutates a
/// response. Implemented for raw `u16` codes and the `http` crate's
/// [`StatusCode`](http::StatusCode) and [`Response`](http::Response); other
/// client libraries can implement it for their own response type.
///
/// # Examples
///
/// ```rust
/// use retryer::retry::HttpStatus;
///
/// struct Reply {
///     code: u16,
/// }
///
/// impl HttpStatus for Reply {
///     fn status_code(&self) -> u16 {
///         self.code
///     }
/// }
///
/// assert!(Reply { code: 502 }.is_server_error());
/// assert!(!Reply { code: 404 }.is_server_error());
/// ```
pub trait HttpStatus {
    /// Numeric status code of the response.
    fn status_code(&self) -> u16;

    /// Whether the status signals a server-side failure (>= 500).
    fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl HttpStatus for u16 {
    fn status_code(&self) -> u16 {
        *self
    }
}

impl HttpStatus for http::StatusCode {
    fn status_code(&self) -> u16 {
        self.as_u16()
    }
}

impl<B> HttpStatus for http::Response<B> {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }
}

/// Reduce an HTTP outcome to a synthetic failure, if it needs one.
///
/// Returns `Some` only when the caller saw no error and the response status
/// is 5xx. In every other case the caller's own error (or its absence)
/// already decides the outcome.
pub(crate) fn server_failure(
    response: Option<&dyn HttpStatus>,
    has_error: bool,
) -> Option<ServerError> {
    if has_error {
        return None;
    }
    response
        .filter(|res| res.is_server_error())
        .map(|res| ServerError {
            status: res.status_code(),
        })
}
