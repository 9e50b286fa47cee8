//! Postcode lookup port and its reqwest adapter for the postcodes.io JSON API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const DEFAULT_USER_AGENT: &str = "touchpoint-routing/0.1";

/// The parts of a postcode record the resolution chain needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcodeResult {
    pub postcode: String,
    pub outcode: String,
    pub incode: String,
    pub admin_district_code: String,
}

/// Outbound postcode service used by the location resolvers.
#[async_trait]
pub trait PostcodeClient: Send + Sync {
    /// `Ok(None)` when the service does not know the postcode.
    async fn lookup(&self, postcode: &str) -> Result<Option<PostcodeResult>, PostcodeClientError>;
    async fn autocomplete(
        &self,
        outward_code: &str,
        limit: usize,
    ) -> Result<Vec<String>, PostcodeClientError>;
    async fn validate(&self, postcode: &str) -> Result<bool, PostcodeClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PostcodeClientError {
    #[error("postcode service returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("postcode service returned no result from {endpoint}")]
    EmptyResponse { endpoint: String },
    #[error("postcode service request failed")]
    Transport(#[source] reqwest::Error),
    #[error("postcode service payload could not be decoded: {0}")]
    Decode(String),
    #[error("postcode service base URL cannot carry a path: {0}")]
    Endpoint(String),
}

/// HTTP client for a postcodes.io compatible service.
pub struct PostcodesIoClient {
    client: Client,
    base_url: Url,
}

impl PostcodesIoClient {
    /// Builds a client whose every call is bounded by `timeout`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, PostcodeClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PostcodeClientError::Endpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &str,
    ) -> Result<Reply<T>, PostcodeClientError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(PostcodeClientError::Transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Reply::NotFound);
        }

        let body = response
            .bytes()
            .await
            .map_err(PostcodeClientError::Transport)?;
        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            return Err(PostcodeClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body)
            .map_err(|err| PostcodeClientError::Decode(format!("{endpoint}: {err}")))?;
        Ok(match envelope.result {
            Some(result) => Reply::Found(result),
            None => Reply::Empty,
        })
    }
}

#[async_trait]
impl PostcodeClient for PostcodesIoClient {
    async fn lookup(&self, postcode: &str) -> Result<Option<PostcodeResult>, PostcodeClientError> {
        let url = self.endpoint(&["postcodes", postcode.trim()])?;
        match self.fetch::<PostcodeDto>(url, "lookup").await? {
            Reply::Found(dto) => Ok(Some(dto.into())),
            Reply::NotFound => Ok(None),
            Reply::Empty => Err(PostcodeClientError::EmptyResponse {
                endpoint: "lookup".to_string(),
            }),
        }
    }

    async fn autocomplete(
        &self,
        outward_code: &str,
        limit: usize,
    ) -> Result<Vec<String>, PostcodeClientError> {
        let mut url = self.endpoint(&["postcodes", outward_code.trim(), "autocomplete"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.max(1).to_string());
        match self.fetch::<Vec<String>>(url, "autocomplete").await? {
            Reply::Found(candidates) => Ok(candidates),
            Reply::NotFound | Reply::Empty => Ok(Vec::new()),
        }
    }

    async fn validate(&self, postcode: &str) -> Result<bool, PostcodeClientError> {
        let url = self.endpoint(&["postcodes", postcode.trim(), "validate"])?;
        match self.fetch::<bool>(url, "validate").await? {
            Reply::Found(valid) => Ok(valid),
            Reply::NotFound => Ok(false),
            Reply::Empty => Err(PostcodeClientError::EmptyResponse {
                endpoint: "validate".to_string(),
            }),
        }
    }
}

enum Reply<T> {
    Found(T),
    NotFound,
    Empty,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostcodeDto {
    postcode: String,
    outcode: String,
    incode: String,
    #[serde(default)]
    codes: CodesDto,
}

#[derive(Debug, Default, Deserialize)]
struct CodesDto {
    #[serde(default)]
    admin_district: Option<String>,
}

impl From<PostcodeDto> for PostcodeResult {
    fn from(dto: PostcodeDto) -> Self {
        Self {
            postcode: dto.postcode,
            outcode: dto.outcode,
            incode: dto.incode,
            admin_district_code: dto.codes.admin_district.unwrap_or_default(),
        }
    }
}
