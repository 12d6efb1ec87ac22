mod common;

use accounts_core::api::ApiResponse;
use accounts_core::{FieldKey, FieldValue, FormData, FormMode};
use common::mock_server::AccountsMock;
use reqwest::StatusCode;
use serde_json::json;

fn credentials() -> FormData {
    let mut form = FormData::blank(FormMode::Login);
    form.set(FieldKey::Email, FieldValue::Text("ann@example.com".into()));
    form.set(FieldKey::Password, FieldValue::Text("hunter2".into()));
    form
}

#[test_log::test(tokio::test)]
async fn test_login_valid() {
    let mock = AccountsMock::start().await;
    mock.respond("POST", "user/login/", 200, json!({"token": "abc"}))
        .await;

    let resp = mock
        .client()
        .login(&reqwest::Client::new(), &credentials())
        .await;

    assert_eq!(resp.status(), Some(StatusCode::OK));
    assert_eq!(
        resp.data().and_then(|data| data.get("token")),
        Some(&json!("abc"))
    );
    assert_eq!(
        mock.only_request_body().await,
        json!({"email": "ann@example.com", "password": "hunter2"})
    );
}

#[test_log::test(tokio::test)]
async fn test_login_invalid_credentials() {
    let mock = AccountsMock::start().await;
    mock.respond(
        "POST",
        "user/login/",
        401,
        json!({"error": "Invalid credentials"}),
    )
    .await;

    let resp = mock
        .client()
        .login(&reqwest::Client::new(), &credentials())
        .await;

    assert!(matches!(
        resp,
        ApiResponse::Failure {
            status: StatusCode::UNAUTHORIZED,
            ..
        }
    ));
    assert_eq!(resp.first_error(), Some("Invalid credentials"));
}
