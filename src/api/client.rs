use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::api::envelope::{decode_envelope, Page, PageQuery};
use crate::api::error::ApiError;
use crate::config::{build_auth_header, ApiConfig};
use crate::session::Session;

/// HTTP client for the backend REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .timeout(Duration::from_secs(u64::from(config.request_timeout_seconds)))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        // Url::join drops the last segment unless the base ends with '/'.
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Same connection pool, different caller.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            session,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET returning the envelope's data, which must be present.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;
        self.send(Method::GET, self.http.get(url), path)
            .await?
            .ok_or_else(|| ApiError::MissingData {
                path: path.to_string(),
            })
    }

    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &PageQuery,
    ) -> Result<Page<T>, ApiError> {
        self.get(path, &query.to_pairs()).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        self.send(Method::POST, self.http.post(url).json(body), path)
            .await?
            .ok_or_else(|| ApiError::MissingData {
                path: path.to_string(),
            })
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        self.send(Method::PUT, self.http.put(url).json(body), path)
            .await?
            .ok_or_else(|| ApiError::MissingData {
                path: path.to_string(),
            })
    }

    /// Write without a response body of interest (acknowledgements).
    pub async fn put_empty(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path, &[])?;
        self.send::<serde_json::Value>(Method::PUT, self.http.put(url), path)
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path, &[])?;
        self.send::<serde_json::Value>(Method::DELETE, self.http.delete(url), path)
            .await
            .map(|_| ())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        let mut builder = builder
            .header("x-request-id", &request_id)
            .header("accept", "application/json");
        if let Some((name, value)) = build_auth_header(self.session.token()) {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(request_id = %request_id, %method, path, error = %e, "API request failed");
            transport_error(path, e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| transport_error(path, e))?;

        tracing::debug!(
            request_id = %request_id,
            %method,
            path,
            status,
            latency_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "API request"
        );

        decode_envelope(status, &body, path)
    }
}

fn transport_error(path: &str, source: reqwest::Error) -> ApiError {
    if source.is_timeout() {
        ApiError::Timeout {
            path: path.to_string(),
        }
    } else {
        ApiError::Transport {
            path: path.to_string(),
            source,
        }
    }
}
