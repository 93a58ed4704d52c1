use std::sync::Arc;
use std::time::Duration;

use crawlwatch_core::{AnalysisResult, JobId, PageQuery, StartedJob, UrlId, UrlItem};
use engine_logging::{engine_debug, engine_trace};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::session::SessionProvider;
use crate::{GatewayError, JobState, UrlPage};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Request/response operations offered by the crawl service.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Exchanges credentials for a session token and stores it.
    async fn login(&self, username: &str, password: &str) -> Result<String, GatewayError>;
    async fn list_urls(&self, query: &PageQuery) -> Result<UrlPage, GatewayError>;
    async fn create_url(&self, url: &str) -> Result<UrlItem, GatewayError>;
    async fn start_jobs(&self, url_ids: &[UrlId]) -> Result<Vec<StartedJob>, GatewayError>;
    async fn stop_jobs(&self, url_ids: &[UrlId]) -> Result<(), GatewayError>;
    async fn job_status(&self, job_id: JobId) -> Result<JobState, GatewayError>;
    /// `GatewayError::NotFound` means no result has been stored yet.
    async fn get_result(&self, url_id: UrlId) -> Result<AnalysisResult, GatewayError>;
    async fn health(&self) -> Result<(), GatewayError>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateUrlRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct UrlIdsRequest<'a> {
    url_ids: &'a [UrlId],
}

pub struct ReqwestGateway {
    base_url: String,
    client: reqwest::Client,
    session: Arc<dyn SessionProvider>,
}

impl ReqwestGateway {
    pub fn new(
        settings: GatewaySettings,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, GatewayError> {
        let parsed = url::Url::parse(&settings.base_url)
            .map_err(|err| GatewayError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidUrl(settings.base_url));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, GatewayError> {
        let raw = format!("{}{}", self.base_url, path);
        url::Url::parse(&raw).map_err(|err| GatewayError::InvalidUrl(format!("{raw}: {err}")))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn json_body<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<RequestBuilder, GatewayError> {
        let bytes = serde_json::to_vec(body).map_err(|err| GatewayError::Decode(err.to_string()))?;
        Ok(builder.header(CONTENT_TYPE, "application/json").body(bytes))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<String, GatewayError> {
        let response = builder.send().await?;
        let status = response.status();
        engine_trace!("{} {}", status.as_u16(), response.url());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GatewayError::Unauthorized),
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound),
            status if !status.is_success() => Err(GatewayError::HttpStatus(status.as_u16())),
            _ => Ok(response.text().await?),
        }
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let body = self.execute(builder).await?;
        serde_json::from_str(&body).map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Gateway for ReqwestGateway {
    async fn login(&self, username: &str, password: &str) -> Result<String, GatewayError> {
        let builder = self.client.post(self.endpoint("/api/v1/auth/login")?);
        let builder = Self::json_body(builder, &LoginRequest { username, password })?;
        let response: TokenResponse = self.execute_json(builder).await?;
        self.session.set(&response.token);
        engine_debug!("Logged in as {}", username);
        Ok(response.token)
    }

    async fn list_urls(&self, query: &PageQuery) -> Result<UrlPage, GatewayError> {
        let mut url = self.endpoint("/api/v1/urls")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page.to_string())
                .append_pair("limit", &query.limit.to_string());
            if let Some(field) = query.sort_field {
                pairs
                    .append_pair("sort_by", field.as_query())
                    .append_pair("order", query.sort_order.as_query());
            }
        }
        self.execute_json(self.authorized(self.client.get(url))).await
    }

    async fn create_url(&self, url: &str) -> Result<UrlItem, GatewayError> {
        let builder = self.authorized(self.client.post(self.endpoint("/api/v1/urls")?));
        let builder = Self::json_body(builder, &CreateUrlRequest { url })?;
        let envelope: Envelope<UrlItem> = self.execute_json(builder).await?;
        Ok(envelope.data)
    }

    async fn start_jobs(&self, url_ids: &[UrlId]) -> Result<Vec<StartedJob>, GatewayError> {
        let builder = self.authorized(self.client.post(self.endpoint("/api/v1/jobs/start")?));
        let builder = Self::json_body(builder, &UrlIdsRequest { url_ids })?;
        let envelope: Envelope<Vec<StartedJob>> = self.execute_json(builder).await?;
        Ok(envelope.data)
    }

    async fn stop_jobs(&self, url_ids: &[UrlId]) -> Result<(), GatewayError> {
        let builder = self.authorized(self.client.post(self.endpoint("/api/v1/jobs/stop")?));
        let builder = Self::json_body(builder, &UrlIdsRequest { url_ids })?;
        self.execute(builder).await.map(|_| ())
    }

    async fn job_status(&self, job_id: JobId) -> Result<JobState, GatewayError> {
        let url = self.endpoint(&format!("/api/v1/jobs/{job_id}/status"))?;
        let envelope: Envelope<JobState> =
            self.execute_json(self.authorized(self.client.get(url))).await?;
        Ok(envelope.data)
    }

    async fn get_result(&self, url_id: UrlId) -> Result<AnalysisResult, GatewayError> {
        let url = self.endpoint(&format!("/api/v1/results/{url_id}"))?;
        let envelope: Envelope<AnalysisResult> =
            self.execute_json(self.authorized(self.client.get(url))).await?;
        Ok(envelope.data)
    }

    async fn health(&self) -> Result<(), GatewayError> {
        let url = self.endpoint("/health")?;
        self.execute(self.client.get(url)).await.map(|_| ())
    }
}
