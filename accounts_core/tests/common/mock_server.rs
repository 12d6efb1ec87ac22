use accounts_core::api::Client;
use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A stand-in for the account API, mounted under `/api/`.
pub struct AccountsMock {
    pub server: MockServer,
}

impl AccountsMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Answer `verb /api/<endpoint>` with `status` and a JSON body. Only
    /// requests asking for JSON match.
    pub async fn respond(&self, verb: &str, endpoint: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(format!("/api/{endpoint}")))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub fn client(&self) -> Client {
        Client::new(&format!("{}/api", self.server.uri())).unwrap()
    }

    #[allow(dead_code)]
    /// The JSON body of the only request the server received.
    pub async fn only_request_body(&self) -> Value {
        let requests = self.server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        serde_json::from_slice(&requests[0].body).unwrap()
    }
}
