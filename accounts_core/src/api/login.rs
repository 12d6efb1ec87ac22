//! `POST user/login/` with email and password. The server answers `200` with
//! `{"token": "..."}` or `401` with `{"error": "Invalid credentials"}`.

/// Where the login endpoint lives, relative to the base URL.
pub const PATH: &str = "user/login/";

/// The key of the token in a successful login response.
pub const TOKEN_FIELD: &str = "token";
