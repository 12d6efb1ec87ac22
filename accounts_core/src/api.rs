/// Things that can go wrong while talking to the server
pub mod error;
pub use error::Error;

/// The classified result of every call
pub mod response;
pub use response::{ApiResponse, FieldErrors};

/// Client for the account API
pub mod client;
pub use client::Client;

/// Create an account
pub mod register;

/// Exchange credentials for a token
pub mod login;

/// Change an existing account
pub mod update;

/// Fetch the logged-in account
pub mod details;
