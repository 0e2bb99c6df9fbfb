use std::time::Duration;

use grabber_core::{filename_from_url, Classification};
use reqwest::header::CONTENT_TYPE;

use crate::config::DEFAULT_USER_AGENT;
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Bounds connecting and each read, not the whole transfer.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Client shared by the fetcher and every site handler.
pub fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .connect_timeout(settings.request_timeout)
        .read_timeout(settings.request_timeout)
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

/// A successful response whose body has not been read yet.
#[derive(Debug)]
pub struct ImageResponse {
    response: reqwest::Response,
    content_type: String,
}

impl ImageResponse {
    pub fn final_url(&self) -> &str {
        self.response.url().as_str()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn filename(&self) -> String {
        filename_from_url(self.final_url())
    }

    pub fn into_response(self) -> reqwest::Response {
        self.response
    }
}

#[derive(Debug)]
pub enum ProbeOutcome {
    Image(ImageResponse),
    NotImage { content_type: Option<String> },
    Failed(FetchError),
}

impl ProbeOutcome {
    pub fn classification(&self) -> Classification {
        match self {
            ProbeOutcome::Image(_) => Classification::VerifiedImage,
            ProbeOutcome::NotImage { .. } => Classification::RejectedNotImage,
            ProbeOutcome::Failed(_) => Classification::RejectedNetworkError,
        }
    }
}

/// Issues the streaming GET for URLs no site handler claims.
#[derive(Debug, Clone)]
pub struct GenericFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl GenericFetcher {
    pub fn new(client: reqwest::Client, settings: FetchSettings) -> Self {
        Self { client, settings }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Request `url` and inspect only the status line and headers. An image
    /// response is returned still open so the body is read exactly once.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let parsed = match reqwest::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(err) => {
                return ProbeOutcome::Failed(FetchError::new(
                    FailureKind::InvalidUrl,
                    err.to_string(),
                ))
            }
        };

        let request = self.client.get(parsed).send();
        let response = match tokio::time::timeout(self.settings.request_timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return ProbeOutcome::Failed(map_reqwest_error(err)),
            Err(_) => {
                return ProbeOutcome::Failed(FetchError::new(
                    FailureKind::Timeout,
                    format!("no response within {:?}", self.settings.request_timeout),
                ))
            }
        };

        let status = response.status();
        if !status.is_success() {
            return ProbeOutcome::Failed(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        match content_type {
            Some(content_type) if is_image_content_type(&content_type) => {
                ProbeOutcome::Image(ImageResponse {
                    response,
                    content_type,
                })
            }
            content_type => ProbeOutcome::NotImage { content_type },
        }
    }
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if let Some(status) = err.status() {
        return FetchError::new(FailureKind::HttpStatus(status.as_u16()), err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
