//! `PATCH user/update/` with any subset of the form, authenticated with the
//! session token. The server answers `200` with the updated account.

/// Where the update endpoint lives, relative to the base URL.
pub const PATH: &str = "user/update/";
