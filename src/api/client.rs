use crate::api::models::PaginatedResponse;
use crate::error::ApiError;
use crate::utils::error_helpers::{convert_json_error, convert_request_error};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const PAGINATED_ENDPOINT: &str = "/listings/paginated";
const USER_AGENT: &str = concat!("leadgrid/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ListingsClient {
    client: Client,
    pub base_url: String,
    pub api_key: Option<String>,
    timeout_secs: u64,
}

impl ListingsClient {
    // Create base client with default settings
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: "client_init".to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(ListingsClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            timeout_secs,
        })
    }

    pub fn with_api_key(base_url: String, api_key: String) -> Result<Self, ApiError> {
        let mut client = ListingsClient::new(base_url)?;
        client.api_key = Some(api_key);
        Ok(client)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key).bearer_auth(api_key);
        }

        request
    }

    /// `GET /listings/paginated` with already-serialized query parameters.
    ///
    /// A 2xx body carrying a non-empty `error` field is reported as
    /// [`ApiError::Remote`].
    pub async fn fetch_paginated(
        &self,
        params: &[(String, String)],
    ) -> Result<PaginatedResponse, ApiError> {
        debug!("GET {} {:?}", PAGINATED_ENDPOINT, params);

        let response = self
            .build_request(Method::GET, PAGINATED_ENDPOINT)
            .query(params)
            .send()
            .await
            .map_err(|e| convert_request_error(e, PAGINATED_ENDPOINT, self.timeout_secs))?;

        let body: PaginatedResponse = self.handle_response(response, PAGINATED_ENDPOINT).await?;

        match body.error.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => Err(ApiError::Remote {
                endpoint: PAGINATED_ENDPOINT.to_string(),
                message: message.to_string(),
            }),
            _ => Ok(body),
        }
    }

    pub async fn handle_response<T>(&self, response: Response, endpoint: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|e| convert_request_error(e, endpoint, self.timeout_secs))?;
            serde_json::from_str::<T>(&text).map_err(|e| convert_json_error(e, endpoint))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            match status.as_u16() {
                401 | 403 => Err(ApiError::Unauthorized {
                    status: status.as_u16(),
                    endpoint: endpoint.to_string(),
                    server_message: error_text,
                }),
                408 | 504 => Err(ApiError::Timeout {
                    timeout_secs: self.timeout_secs,
                    endpoint: endpoint.to_string(),
                }),
                _ => Err(ApiError::Http {
                    status: status.as_u16(),
                    endpoint: endpoint.to_string(),
                    message: error_text,
                }),
            }
        }
    }
}
