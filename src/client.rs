use std::env;
use std::time::{Duration, Instant};

use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUESTS, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS};
use crate::types::{
    ChatReply, ChatRequest, ChatResponse, Envelope, ErrorEnvelope, ModelCatalog, ModelState,
    ModelsResponse, SelectModelRequest, SelectModelResponse,
};

/// Address of the backend when neither a flag nor `MEDICHAT_URL` names one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the chat backend's `/chat` and `/models` endpoints.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl ChatClient {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the MEDICHAT_URL
    /// environment variable; it defaults to the local development server.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("MEDICHAT_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = parse_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a query to `POST /chat` and return the answer.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint("chat")?;
        tracing::debug!(%url, query_len = request.query.len(), "sending chat request");
        let response: ChatResponse = self.execute(self.client.post(url).json(request)).await?;
        Ok(ChatReply::new(response.response))
    }

    /// Fetch the available models and the current selection from `GET /models`.
    pub async fn list_models(&self) -> Result<ModelCatalog> {
        let url = self.endpoint("models")?;
        tracing::debug!(%url, "fetching model catalog");
        let response: ModelsResponse = self.execute(self.client.get(url)).await?;
        Ok(ModelCatalog::from(response))
    }

    /// Ask the backend to switch models via `POST /models`.
    ///
    /// Returns the server's authoritative selection after the change.
    pub async fn select_model(&self, request: &SelectModelRequest) -> Result<ModelState> {
        let url = self.endpoint("models")?;
        tracing::debug!(%url, model = %request.llm_model, "selecting model");
        let response: SelectModelResponse =
            self.execute(self.client.post(url).json(request)).await?;
        Ok(response.state.unwrap_or_default())
    }

    async fn execute<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + Envelope,
    {
        CLIENT_REQUESTS.click();
        let started = Instant::now();
        let result = self.execute_inner(request).await;
        CLIENT_REQUEST_DURATION.add(started.elapsed().as_secs_f64());
        if result.is_err() {
            CLIENT_REQUEST_ERRORS.click();
        }
        result
    }

    async fn execute_inner<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + Envelope,
    {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
        })?;

        decode_envelope(status, &body)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::validation(
            format!("{base_url} cannot be used as a base URL"),
            Some("url".to_string()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Turn a status code and body into a successful envelope or a classified error.
///
/// Non-2xx responses carrying a JSON envelope are server-reported failures;
/// any other non-2xx response is an API error. A 2xx body that does not parse
/// is a serialization error, and `"success": false` is a server-reported failure.
pub(crate) fn decode_envelope<T>(status: u16, body: &str) -> Result<T>
where
    T: DeserializeOwned + Envelope,
{
    if !(200..300).contains(&status) {
        return Err(match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Error::server(
                Some(status),
                envelope
                    .error
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            ),
            Err(_) => Error::api(status, body.trim().to_string()),
        });
    }

    let envelope: T = serde_json::from_str(body).map_err(|e| {
        Error::serialization(
            format!("Failed to parse response: {}", e),
            Some(Box::new(e)),
        )
    })?;

    if !envelope.success() {
        return Err(Error::server(
            Some(status),
            envelope.error().unwrap_or("request failed").to_string(),
        ));
    }

    Ok(envelope)
}
