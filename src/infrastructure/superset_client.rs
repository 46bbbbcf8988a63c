// Superset REST adapter for the dashboard ports
use crate::application::dashboard_client::{DashboardClient, DashboardConnector};
use crate::domain::error::AsideError;
use crate::domain::query::{ChartDataRequest, Datasource, QueryDescriptor, ResultFormat};
use crate::infrastructure::config::{DashboardCredentials, DashboardSettings};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, REFERER};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    provider: &'static str,
    refresh: bool,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CsrfResponse {
    result: String,
}

#[derive(Debug, Clone)]
pub struct SupersetConnector {
    settings: DashboardSettings,
}

impl SupersetConnector {
    pub fn new(settings: DashboardSettings) -> Self {
        Self { settings }
    }

    fn build_http_client(&self) -> Result<reqwest::Client, AsideError> {
        reqwest::Client::builder()
            .timeout(self.settings.timeout())
            .cookie_store(true)
            .build()
            .map_err(|e| AsideError::Configuration(format!("http client: {e}")))
    }
}

#[async_trait]
impl DashboardConnector for SupersetConnector {
    async fn connect(&self) -> Result<Box<dyn DashboardClient>, AsideError> {
        let credentials = self.settings.credentials()?;
        let http = self.build_http_client()?;
        let session = SupersetSession::login(http, credentials).await?;
        Ok(Box::new(session))
    }

    fn host(&self) -> &str {
        self.settings.host()
    }
}

/// Authenticated session: bearer token plus CSRF token for writes
pub struct SupersetSession {
    http: reqwest::Client,
    host: String,
    access_token: String,
    csrf_token: String,
}

impl SupersetSession {
    async fn login(
        http: reqwest::Client,
        credentials: DashboardCredentials,
    ) -> Result<Self, AsideError> {
        let url = format!("{}/api/v1/security/login", credentials.host);
        let response = http
            .post(&url)
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
                provider: "db",
                refresh: true,
            })
            .send()
            .await?;
        let login: LoginResponse = Self::parse(response, "login").await?;

        let mut session = Self {
            http,
            host: credentials.host,
            access_token: login.access_token,
            csrf_token: String::new(),
        };

        let url = format!("{}/api/v1/security/csrf_token/", session.host);
        let response = session
            .http
            .get(&url)
            .headers(session.auth_headers()?)
            .send()
            .await?;
        let csrf: CsrfResponse = Self::parse(response, "csrf token").await?;
        session.csrf_token = csrf.result;

        tracing::debug!(host = %session.host, "dashboard session established");
        Ok(session)
    }

    fn auth_headers(&self) -> Result<HeaderMap, AsideError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|_| AsideError::MalformedResponse("access token is not a header value".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn write_headers(&self) -> Result<HeaderMap, AsideError> {
        let mut headers = self.auth_headers()?;
        let csrf = HeaderValue::from_str(&self.csrf_token)
            .map_err(|_| AsideError::MalformedResponse("csrf token is not a header value".to_string()))?;
        headers.insert("X-CSRFToken", csrf);
        if let Ok(referer) = HeaderValue::from_str(&self.host) {
            headers.insert(REFERER, referer);
        }
        Ok(headers)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, AsideError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AsideError::Connection(format!(
                "{what} failed with status {status}: {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AsideError::MalformedResponse(format!("{what}: {e}")))
    }
}

#[async_trait]
impl DashboardClient for SupersetSession {
    async fn fetch_chart(&self, chart_id: u32, force: bool) -> Result<Value, AsideError> {
        let url = format!("{}/api/v1/chart/{}/data", self.host, chart_id);
        tracing::debug!(chart_id, force, "fetching chart data");

        let response = self
            .http
            .get(&url)
            .query(&[("force", force)])
            .headers(self.auth_headers()?)
            .send()
            .await?;

        Self::parse(response, "chart data").await
    }

    async fn run_queries(
        &self,
        datasource: &Datasource,
        queries: &[QueryDescriptor],
        force: bool,
        result_format: ResultFormat,
    ) -> Result<Value, AsideError> {
        let url = format!("{}/api/v1/chart/data", self.host);
        tracing::debug!(datasource_id = datasource.id, queries = queries.len(), "running chart queries");

        let response = self
            .http
            .post(&url)
            .headers(self.write_headers()?)
            .json(&ChartDataRequest::new(datasource, queries, force, result_format))
            .send()
            .await?;

        Self::parse(response, "chart query").await
    }
}
