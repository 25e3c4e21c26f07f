use crate::config::toml_config::{EnvironmentConfig, OrderEntryConfig};
use crate::domain::document::SalesOrderDocument;
use crate::domain::model::{Credentials, SubmissionResponse};
use crate::domain::ports::OrderSubmitter;
use crate::utils::error::{OrderEntryError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
pub const SUCCESS_STATUS: &str = "SUCCESS";

/// Outcome of a one-shot probe of the ERP server root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityStatus {
    Online,
    Reachable,
    AuthIssue,
    ServerError,
    Timeout,
    Offline,
}

impl ConnectivityStatus {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            200 => Self::Online,
            401 | 403 => Self::AuthIssue,
            code if code >= 500 => Self::ServerError,
            _ => Self::Reachable,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Online | Self::Reachable | Self::AuthIssue)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Reachable => "Reachable",
            Self::AuthIssue => "Auth Issue",
            Self::ServerError => "Server Error",
            Self::Timeout => "Timeout",
            Self::Offline => "Offline",
        }
    }
}

impl std::fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Client for the Orchestrator `EnterSalesOrders` endpoint.
pub struct JdeClient {
    client: Client,
    endpoint: Url,
    environment: EnvironmentConfig,
    extra_headers: BTreeMap<String, String>,
    timeout: Duration,
}

impl JdeClient {
    pub fn new(config: &OrderEntryConfig) -> Result<Self> {
        let endpoint = validate_url("endpoint.url", config.endpoint_url())?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            environment: config.environment.clone(),
            extra_headers: config.endpoint.headers.clone().unwrap_or_default(),
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Server root of the endpoint (scheme, host and port only).
    pub fn base_url(&self) -> Url {
        let mut base = self.endpoint.clone();
        base.set_path("/");
        base.set_query(None);
        base.set_fragment(None);
        base
    }

    fn with_headers(&self, mut request: RequestBuilder) -> RequestBuilder {
        request = request
            .header("X-JDE-Environment", &self.environment.name)
            .header("X-JDE-Device", &self.environment.device)
            .header("X-JDE-Role", &self.environment.role);

        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        request
    }

    fn classify_send_error(&self, err: reqwest::Error, timeout: Duration) -> OrderEntryError {
        if err.is_timeout() {
            return OrderEntryError::TimeoutError {
                seconds: timeout.as_secs(),
            };
        }
        if err.is_builder() {
            return OrderEntryError::ConfigError {
                message: format!("Could not build request: {}", err),
            };
        }

        let mut message = format!("cannot reach {}", self.base_url());
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        OrderEntryError::TransportError { message }
    }

    /// Classify the server's answer to an authenticated request against its root.
    pub async fn probe(&self, credentials: Option<&Credentials>) -> ConnectivityStatus {
        let mut request = self.client.get(self.base_url()).timeout(PROBE_TIMEOUT);
        if let Some(credentials) = credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        match request.send().await {
            Ok(response) => {
                let status = ConnectivityStatus::from_status(response.status());
                tracing::debug!("📡 Probe {} answered {}", self.base_url(), response.status());
                status
            }
            Err(e) if e.is_timeout() => ConnectivityStatus::Timeout,
            Err(e) => {
                tracing::debug!("📡 Probe {} failed: {}", self.base_url(), e);
                ConnectivityStatus::Offline
            }
        }
    }
}

#[async_trait]
impl OrderSubmitter for JdeClient {
    async fn check_reachable(&self) -> Result<()> {
        tracing::info!("🔌 Checking network connectivity to {}", self.base_url());
        self.client
            .head(self.base_url())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| self.classify_send_error(e, PROBE_TIMEOUT))
    }

    async fn submit(
        &self,
        document: &SalesOrderDocument,
        credentials: &Credentials,
    ) -> Result<SubmissionResponse> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&credentials.username, Some(&credentials.password))
            .timeout(self.timeout)
            .json(document);

        tracing::debug!("📡 Posting order document to {}", self.endpoint);
        let response = self
            .with_headers(request)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e, self.timeout))?;

        let status = response.status();
        tracing::debug!("📡 Order endpoint responded {}", status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(OrderEntryError::AuthError {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            return Err(OrderEntryError::RemoteProcessingError {
                status: status.as_u16(),
                detail,
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                OrderEntryError::TimeoutError {
                    seconds: self.timeout.as_secs(),
                }
            } else {
                OrderEntryError::RemoteProcessingError {
                    status: status.as_u16(),
                    detail: format!("response is not valid JSON: {}", e),
                }
            }
        })?;

        let orchestrator_status = body
            .get("jde__status")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();

        if orchestrator_status != SUCCESS_STATUS {
            let shown = if orchestrator_status.is_empty() {
                "Unknown error"
            } else {
                orchestrator_status.as_str()
            };
            return Err(OrderEntryError::RemoteProcessingError {
                status: status.as_u16(),
                detail: format!("JDE Processing Error: {}", shown),
            });
        }

        Ok(SubmissionResponse {
            http_status: status.as_u16(),
            orchestrator_status,
            body,
        })
    }
}
