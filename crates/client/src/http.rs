//! [`Transport`] implementation over `reqwest`.

use async_trait::async_trait;
use operations::{AdsMediaError, ApiKey, ApiRequest, HttpMethod, RawResponse, Transport};
use reqwest::header::{HeaderValue, ACCEPT};
use tracing::debug;

use crate::config::{ConfigError, EndpointConfig};

const USER_AGENT: &str = concat!("adsmedia-rs/", env!("CARGO_PKG_VERSION"));

/// Sends each mapped request as exactly one HTTP call.
///
/// Connection reuse is whatever `reqwest::Client` does on its own; there is no
/// retry and no timeout unless one is configured.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(endpoint: &EndpointConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = endpoint.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            base_url: endpoint.base_url.clone(),
        })
    }

    fn url(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.base_url, request.path)
    }
}

fn method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        api_key: &ApiKey,
        request: &ApiRequest,
    ) -> operations::Result<RawResponse> {
        let mut builder = self
            .http
            .request(method(request.method), self.url(request))
            .bearer_auth(api_key.expose())
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            // `json` also sets `Content-Type: application/json`.
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AdsMediaError::transport(describe(&e)))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| AdsMediaError::transport(describe(&e)))?;

        debug!(status, bytes = body.len(), "HTTP exchange complete");
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}
