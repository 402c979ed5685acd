// src/client.rs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    config::Config,
    models::{
        response::{SubmitResponseRequest, SurveyResponse},
        survey::{CreateSurveyRequest, Survey, SurveySummary},
    },
};

/// Failure talking to the survey service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("base url cannot carry path segments: {0}")]
    UnsupportedBaseUrl(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with {0}")]
    Status(StatusCode),
}

/// The network boundary used by the form controllers.
///
/// Implemented over HTTP by [`HttpTransport`]; tests substitute an
/// in-memory double.
#[async_trait]
pub trait SurveyTransport: Send + Sync {
    async fn list_surveys(&self) -> Result<Vec<SurveySummary>, TransportError>;

    async fn get_survey(&self, id: &str) -> Result<Survey, TransportError>;

    /// Publishes a draft and returns the stored survey with its assigned id.
    async fn create_survey(&self, payload: &CreateSurveyRequest)
    -> Result<Survey, TransportError>;

    async fn submit_response(
        &self,
        survey_id: &str,
        payload: &SubmitResponseRequest,
    ) -> Result<SurveyResponse, TransportError>;
}

/// `reqwest`-backed client for the survey API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Uses a preconfigured client, e.g. one with a request timeout.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::UnsupportedBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Targets `API_URL` from the configuration.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(&config.api_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::UnsupportedBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Lists the stored responses of a survey, oldest first.
    pub async fn list_responses(
        &self,
        survey_id: &str,
    ) -> Result<Vec<SurveyResponse>, TransportError> {
        let url = self.endpoint(&["surveys", survey_id, "responses"])?;
        tracing::debug!("GET {}", url);
        decode(self.client.get(url).send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} responded with {}", response.url(), status);
        return Err(TransportError::Status(status));
    }
    Ok(response.json::<T>().await?)
}

#[async_trait]
impl SurveyTransport for HttpTransport {
    async fn list_surveys(&self) -> Result<Vec<SurveySummary>, TransportError> {
        let url = self.endpoint(&["surveys"])?;
        tracing::debug!("GET {}", url);
        decode(self.client.get(url).send().await?).await
    }

    async fn get_survey(&self, id: &str) -> Result<Survey, TransportError> {
        let url = self.endpoint(&["surveys", id])?;
        tracing::debug!("GET {}", url);
        decode(self.client.get(url).send().await?).await
    }

    async fn create_survey(
        &self,
        payload: &CreateSurveyRequest,
    ) -> Result<Survey, TransportError> {
        let url = self.endpoint(&["surveys"])?;
        tracing::debug!("POST {}", url);
        decode(self.client.post(url).json(payload).send().await?).await
    }

    async fn submit_response(
        &self,
        survey_id: &str,
        payload: &SubmitResponseRequest,
    ) -> Result<SurveyResponse, TransportError> {
        let url = self.endpoint(&["surveys", survey_id, "responses"])?;
        tracing::debug!("POST {}", url);
        decode(self.client.post(url).json(payload).send().await?).await
    }
}
