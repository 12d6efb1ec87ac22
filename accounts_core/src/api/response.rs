use super::error::Error;
use reqwest::StatusCode;
use serde_json::{Map, Value};

/// The outcome of any call to the account API. The client sorts every
/// response into one of these once, so callers match on the variant instead
/// of poking at the shape of the body.
#[derive(Debug)]
pub enum ApiResponse {
    /// The server answered with a 2xx status.
    Success {
        /// The exact status (pages care about 200 vs 201.)
        status: StatusCode,

        /// The response body. Empty if the server didn't send one.
        data: Map<String, Value>,
    },

    /// The server answered, but not with a 2xx status.
    Failure {
        /// The status the server sent.
        status: StatusCode,

        /// Per-field messages, in the order the server sent them. Empty if
        /// the body wasn't a JSON object.
        errors: Vec<FieldErrors>,
    },

    /// We never got a usable answer.
    Transport(Error),
}

/// The messages the server attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    /// The field name as the server sent it (may be a non-field key like
    /// `error` or `non_field_errors`.)
    pub field: String,

    /// One or more human-readable messages.
    pub messages: Vec<String>,
}

impl ApiResponse {
    /// Classify a status and raw body.
    pub fn classify(status: StatusCode, body: &[u8]) -> Self {
        if status.is_success() {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Self::Success {
                    status,
                    data: Map::new(),
                };
            }

            match serde_json::from_slice::<Value>(body) {
                Ok(Value::Object(data)) => Self::Success { status, data },
                Ok(other) => {
                    tracing::debug!(?status, kind = json_kind(&other), "success body was not an object");
                    Self::Success {
                        status,
                        data: Map::new(),
                    }
                }
                Err(err) => Self::Transport(Error::Json(err)),
            }
        } else {
            let errors = match serde_json::from_slice::<Value>(body) {
                Ok(Value::Object(fields)) => fields
                    .into_iter()
                    .map(|(field, value)| FieldErrors {
                        field,
                        messages: messages(value),
                    })
                    .collect(),
                _ => Vec::new(),
            };

            Self::Failure { status, errors }
        }
    }

    /// The HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    /// The body of a successful response.
    pub fn data(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    /// The message to show the user: the first message of the first field
    /// the server complained about. `None` if there is nothing to show,
    /// including for successes and transport problems.
    pub fn first_error(&self) -> Option<&str> {
        match self {
            Self::Failure { errors, .. } => errors
                .first()
                .and_then(|field| field.messages.first())
                .map(String::as_str),
            Self::Success { .. } | Self::Transport(_) => None,
        }
    }
}

impl From<Error> for ApiResponse {
    fn from(err: Error) -> Self {
        Self::Transport(err)
    }
}

/// Error values are either a single message or a list of them.
fn messages(value: Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message],
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(message) => message,
                other => other.to_string(),
            })
            .collect(),
        other => vec![other.to_string()],
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn success_keeps_status_and_data() {
        let resp = ApiResponse::classify(StatusCode::OK, br#"{"token":"abc"}"#);

        assert_eq!(resp.status(), Some(StatusCode::OK));
        assert_eq!(
            resp.data().and_then(|data| data.get("token")),
            Some(&Value::String("abc".to_string()))
        );
        assert_eq!(resp.first_error(), None);
    }

    #[test]
    fn empty_success_body_is_an_empty_object() {
        let resp = ApiResponse::classify(StatusCode::CREATED, b"");

        assert_eq!(resp.data().map(Map::len), Some(0));
    }

    #[test]
    fn unreadable_success_body_is_a_transport_problem() {
        let resp = ApiResponse::classify(StatusCode::OK, b"<html>");

        assert!(matches!(resp, ApiResponse::Transport(Error::Json(_))));
    }

    #[test]
    fn failure_with_message_lists() {
        let resp = ApiResponse::classify(
            StatusCode::BAD_REQUEST,
            br#"{"email":["required","invalid"],"phone":["taken"]}"#,
        );

        assert_eq!(resp.first_error(), Some("required"));
    }

    #[test]
    fn failure_with_a_single_message() {
        let resp = ApiResponse::classify(
            StatusCode::UNAUTHORIZED,
            br#"{"error":"Invalid credentials"}"#,
        );

        assert_eq!(resp.first_error(), Some("Invalid credentials"));
    }

    #[test]
    fn failure_keeps_server_field_order() {
        let resp = ApiResponse::classify(
            StatusCode::BAD_REQUEST,
            br#"{"password":["too short"],"email":["required"]}"#,
        );

        assert_eq!(resp.first_error(), Some("too short"));
    }

    #[test]
    fn failure_with_empty_object_has_nothing_to_show() {
        let resp = ApiResponse::classify(StatusCode::BAD_REQUEST, b"{}");

        assert_eq!(resp.first_error(), None);
    }

    #[test]
    fn failure_with_non_json_body_has_nothing_to_show() {
        let resp = ApiResponse::classify(StatusCode::INTERNAL_SERVER_ERROR, b"Server Error");

        match resp {
            ApiResponse::Failure { status, errors } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert!(errors.is_empty());
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[test]
    fn non_string_messages_are_stringified() {
        let resp = ApiResponse::classify(StatusCode::BAD_REQUEST, br#"{"code":[42]}"#);

        assert_eq!(resp.first_error(), Some("42"));
    }
}
