//! Typed client for the `/api/widgets` endpoints.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::ClientError;
use crate::api::dto::{
    CreateWidgetARequest, CreateWidgetBRequest, ErrorResponse, PaginatedResponse,
    UpdateWidgetARequest, UpdateWidgetBRequest, WidgetAResponse, WidgetBResponse,
};
use crate::api::routes::API_PREFIX;
use crate::error::ValidationFieldError;

/// Accepts both `{"data": T}` and a bare `T`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Raw(T),
    Wrapped { data: T },
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Raw(value) | Envelope::Wrapped { data: value } => value,
        }
    }
}

/// Decodes a successful response body.
pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice::<Envelope<T>>(bytes).map(Envelope::into_inner)
}

fn error_from_body(status: reqwest::StatusCode, bytes: &[u8]) -> ClientError {
    if let Ok(body) = serde_json::from_slice::<ErrorResponse>(bytes) {
        let errors = body
            .details
            .as_ref()
            .and_then(|d| d.get("errors"))
            .and_then(|e| serde_json::from_value::<Vec<ValidationFieldError>>(e.clone()).ok())
            .unwrap_or_default();

        return ClientError::Api {
            status: status.as_u16(),
            code: Some(body.code),
            message: body.message,
            errors,
        };
    }

    // FastAPI-style `{"detail": "..."}`
    let detail = serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from));

    ClientError::Api {
        status: status.as_u16(),
        code: None,
        message: detail.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        }),
        errors: Vec::new(),
    }
}

/// Talks to one widgets API server. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct WidgetClient {
    http: reqwest::Client,
    base: Url,
}

impl WidgetClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let root = base_url.trim_end_matches('/');
        let base = Url::parse(&format!("{root}{API_PREFIX}/")).map_err(|e| {
            ClientError::InvalidUrl {
                url: base_url.to_string(),
                message: e.to_string(),
            }
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                message: "expected http:// or https://".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(concat!("widgets-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport {
                url: base.to_string(),
                source: e,
            })?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(|e| ClientError::InvalidUrl {
            url: format!("{}{path}", self.base),
            message: e.to_string(),
        })
    }

    fn paged_url(&self, path: &str, page: u32, limit: u32) -> Result<Url, ClientError> {
        let mut url = self.url(path)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<Vec<u8>, ClientError> {
        let response = request.send().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        if !status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "API returned an error");
            return Err(error_from_body(status, &bytes));
        }

        Ok(bytes.to_vec())
    }

    async fn call<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let bytes = self.execute(request, &url).await?;
        decode_body(&bytes).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        self.call::<T, ()>(Method::GET, url, None).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.url(path)?;
        self.execute(self.http.delete(url.clone()), &url).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // WidgetA
    // ------------------------------------------------------------------

    pub async fn list_widget_a(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedResponse<WidgetAResponse>, ClientError> {
        self.get(self.paged_url("widget-a", page, limit)?).await
    }

    pub async fn get_widget_a(&self, id: i32) -> Result<WidgetAResponse, ClientError> {
        self.get(self.url(&format!("widget-a/{id}"))?).await
    }

    pub async fn create_widget_a(
        &self,
        request: &CreateWidgetARequest,
    ) -> Result<WidgetAResponse, ClientError> {
        request.validate()?;
        self.call(Method::POST, self.url("widget-a")?, Some(request))
            .await
    }

    pub async fn update_widget_a(
        &self,
        id: i32,
        request: &UpdateWidgetARequest,
    ) -> Result<WidgetAResponse, ClientError> {
        request.validate()?;
        self.call(Method::PUT, self.url(&format!("widget-a/{id}"))?, Some(request))
            .await
    }

    pub async fn delete_widget_a(&self, id: i32) -> Result<(), ClientError> {
        self.delete(&format!("widget-a/{id}")).await
    }

    // ------------------------------------------------------------------
    // WidgetB
    // ------------------------------------------------------------------

    pub async fn list_widget_b(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedResponse<WidgetBResponse>, ClientError> {
        self.get(self.paged_url("widget-b", page, limit)?).await
    }

    /// WidgetBs attached to one WidgetA; 404 when the WidgetA is unknown.
    pub async fn list_widget_b_for(
        &self,
        widget_a_id: i32,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedResponse<WidgetBResponse>, ClientError> {
        let path = format!("widget-a/{widget_a_id}/widget-b");
        self.get(self.paged_url(&path, page, limit)?).await
    }

    pub async fn get_widget_b(&self, id: i32) -> Result<WidgetBResponse, ClientError> {
        self.get(self.url(&format!("widget-b/{id}"))?).await
    }

    pub async fn create_widget_b(
        &self,
        request: &CreateWidgetBRequest,
    ) -> Result<WidgetBResponse, ClientError> {
        request.validate()?;
        self.call(Method::POST, self.url("widget-b")?, Some(request))
            .await
    }

    pub async fn update_widget_b(
        &self,
        id: i32,
        request: &UpdateWidgetBRequest,
    ) -> Result<WidgetBResponse, ClientError> {
        request.validate()?;
        self.call(Method::PUT, self.url(&format!("widget-b/{id}"))?, Some(request))
            .await
    }

    pub async fn delete_widget_b(&self, id: i32) -> Result<(), ClientError> {
        self.delete(&format!("widget-b/{id}")).await
    }
}
