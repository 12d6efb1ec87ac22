//! The parts of the account front end that don't care how they're drawn:
//! field filtering, form data, the API client and the session store.

/// Keystroke filtering by field type
pub mod field;
pub use field::{FieldType, FieldValue, Problem};

/// Form data and which fields a form shows
pub mod form;
pub use form::{FieldKey, FormData, FormMode, Invalid};

/// Talk to the account API.
pub mod api;

/// Where the auth token is kept between runs
pub mod session;
pub use session::Session;
