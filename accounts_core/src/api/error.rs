use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Transport-level problems: the request never produced a usable HTTP
/// response. Server-side validation failures are not errors; they come back
/// as `ApiResponse::Failure`.
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the base URL was invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// We couldn't reach the server or read its response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server said it succeeded but sent a body we couldn't read.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
