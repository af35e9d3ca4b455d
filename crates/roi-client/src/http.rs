//! reqwest-backed [`SimulatorApi`]

use crate::api::{HealthStatus, ReportFile, SimulatorApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use roi_core::{
    NewScenario, ReportRequest, ScenarioDetail, ScenarioDetailBody, ScenarioId, ScenarioList,
    ScenarioSummary, SimulationRequest, SimulationResponse, SimulationResult,
};
use serde::de::DeserializeOwned;

/// HTTP client for the simulation service
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpSimulatorApi {
    client: Client,
    base_url: String,
}

impl HttpSimulatorApi {
    /// Build a client from configuration
    ///
    /// # Errors
    /// - `ApiError::Config` if the base URL is empty or the TLS backend fails
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::Config("base_url must not be empty".to_string()));
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Service root this client talks to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Send and turn non-success statuses into `ApiError::Status`
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        tracing::debug!("request {}", path);
        let response = builder.send().await.map_err(|e| {
            tracing::debug!("request {} failed: {}", path, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = ApiError::from_status_body(status.as_u16(), &body);
        tracing::debug!("request {} rejected: {}", path, err);
        Err(err)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SimulatorApi for HttpSimulatorApi {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, ApiError> {
        let path = "/api/simulate";
        let response = self
            .send(self.request(Method::POST, path).json(request), path)
            .await?;
        let body: SimulationResponse = Self::json(response).await?;
        Ok(body.results)
    }

    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, ApiError> {
        let path = "/api/scenarios";
        let response = self.send(self.request(Method::GET, path), path).await?;
        let body: ScenarioList = Self::json(response).await?;
        Ok(body.scenarios)
    }

    async fn save_scenario(&self, scenario: &NewScenario) -> Result<(), ApiError> {
        let path = "/api/scenarios";
        self.send(self.request(Method::POST, path).json(scenario), path)
            .await?;
        Ok(())
    }

    async fn get_scenario(&self, id: ScenarioId) -> Result<ScenarioDetail, ApiError> {
        let path = format!("/api/scenarios/{id}");
        let response = self.send(self.request(Method::GET, &path), &path).await?;
        let body: ScenarioDetailBody = Self::json(response).await?;
        Ok(body.into_detail())
    }

    async fn delete_scenario(&self, id: ScenarioId) -> Result<(), ApiError> {
        let path = format!("/api/scenarios/{id}");
        self.send(self.request(Method::DELETE, &path), &path)
            .await?;
        Ok(())
    }

    async fn generate_report(&self, request: &ReportRequest) -> Result<ReportFile, ApiError> {
        let path = "/api/report/generate";
        let response = self
            .send(self.request(Method::POST, path).json(request), path)
            .await?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_disposition = header(CONTENT_DISPOSITION);
        let content_type = header(CONTENT_TYPE);
        let bytes = response.bytes().await?.to_vec();

        Ok(ReportFile {
            content_disposition,
            content_type,
            bytes,
        })
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let path = "/api/health";
        let response = self.send(self.request(Method::GET, path), path).await?;
        Self::json(response).await
    }
}
