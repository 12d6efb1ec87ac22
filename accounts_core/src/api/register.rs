//! `POST user/register/` with the full form. The server answers `201 Created`
//! with the new account (minus the password) or `400` with field errors.

/// Where the register endpoint lives, relative to the base URL.
pub const PATH: &str = "user/register/";
