use super::error::{self, Error};
use super::response::ApiResponse;
use super::{details, login, register, update};
use crate::form::FormData;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use url::Url;

/// Client for the account API. Cheap to clone; the HTTP connection pool is
/// passed in per call so the whole app can share one.
#[derive(Debug, Clone)]
pub struct Client {
    /// Every endpoint path is joined onto this. Always ends in `/`.
    base: Url,
}

impl Client {
    /// Construct a new client for the API at `base_url`, e.g.
    /// `https://accounts.example.com/api/`. A missing trailing slash is
    /// added, so the last path segment is kept when joining endpoints.
    ///
    /// ## Errors
    ///
    /// Fails if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> error::Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Create a new account.
    pub async fn register(&self, http: &reqwest::Client, form: &FormData) -> ApiResponse {
        match self.endpoint(register::PATH) {
            Ok(url) => Self::handle_response("register", http.post(url).json(form)).await,
            Err(err) => err.into(),
        }
    }

    /// Log in, getting a token back in the `token` field of the data.
    pub async fn login(&self, http: &reqwest::Client, form: &FormData) -> ApiResponse {
        match self.endpoint(login::PATH) {
            Ok(url) => Self::handle_response("login", http.post(url).json(form)).await,
            Err(err) => err.into(),
        }
    }

    /// Change the account the token belongs to.
    pub async fn update(
        &self,
        http: &reqwest::Client,
        form: &FormData,
        token: &str,
    ) -> ApiResponse {
        match self.endpoint(update::PATH) {
            Ok(url) => {
                Self::handle_response(
                    "update",
                    Self::authenticated(http.patch(url), token).json(form),
                )
                .await
            }
            Err(err) => err.into(),
        }
    }

    /// Get the account the token belongs to. An empty token is still sent
    /// (and rejected by the server.)
    pub async fn details(&self, http: &reqwest::Client, token: &str) -> ApiResponse {
        match self.endpoint(details::PATH) {
            Ok(url) => {
                Self::handle_response("details", Self::authenticated(http.get(url), token)).await
            }
            Err(err) => err.into(),
        }
    }

    fn endpoint(&self, path: &str) -> error::Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn authenticated(req: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        req.header(AUTHORIZATION, format!("Token {token}"))
    }

    /// Send a request and sort whatever comes back into an `ApiResponse`.
    /// Nothing here returns early with an error: transport problems are
    /// values too.
    async fn handle_response(operation: &str, req: reqwest::RequestBuilder) -> ApiResponse {
        let resp = match req.header(ACCEPT, "application/json").send().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(operation, ?err, "request failed");
                return Error::Http(err).into();
            }
        };

        let status = resp.status();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(operation, ?status, ?err, "could not read response body");
                return Error::Http(err).into();
            }
        };

        tracing::info!(operation, status = status.as_u16(), "got response");

        ApiResponse::classify(status, &body)
    }
}
