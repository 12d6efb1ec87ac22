//! `GET user/details/`, authenticated with the session token. The server
//! answers `200` with the account or `401` if the token is missing or stale.

/// Where the details endpoint lives, relative to the base URL.
pub const PATH: &str = "user/details/";
