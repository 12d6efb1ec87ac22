mod common;

use accounts_core::{FieldKey, FieldValue, FormData, FormMode};
use common::mock_server::AccountsMock;
use reqwest::StatusCode;
use serde_json::json;

#[test_log::test(tokio::test)]
async fn test_update_sends_token_and_form() {
    let mock = AccountsMock::start().await;
    mock.respond("PATCH", "user/update/", 200, json!({"first_name": "Bea"}))
        .await;

    let mut form = FormData::blank(FormMode::Registration);
    form.set(FieldKey::FirstName, FieldValue::Text("Bea".into()));

    let resp = mock
        .client()
        .update(&reqwest::Client::new(), &form, "abc")
        .await;

    assert_eq!(resp.status(), Some(StatusCode::OK));

    let requests = mock.server.received_requests().await.unwrap();
    assert_eq!(
        requests[0]
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok()),
        Some("Token abc")
    );
    assert_eq!(mock.only_request_body().await["first_name"], json!("Bea"));
}
