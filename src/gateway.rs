//! RemoteGateway — uniform HTTP access to the nutrition backend.
//!
//! Every network touch in the crate goes through the [`Gateway`] trait:
//! a health probe, multipart photo uploads, and JSON calls. The pipeline
//! components are generic over the trait so tests can stand in a mock
//! backend without a running server.

use reqwest::multipart;
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

use crate::config::{endpoints, GatewayConfig};
use crate::models::photo::CapturedPhoto;

/// Failures crossing the HTTP boundary.
///
/// `Transport` means no usable response ever arrived; `Http` means the
/// backend answered with a non-2xx status. Both are per-unit failures for
/// the batch pipeline — neither aborts a run on its own.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("backend rejected request with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("could not read photo at {path}")]
    PhotoRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("response body was not valid JSON: {0}")]
    InvalidBody(String),

    #[error("could not build request: {0}")]
    Request(String),
}

/// Transport seam for the backend.
///
/// Implemented by [`RemoteGateway`] for real traffic and by in-memory
/// mocks in tests.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// True if the backend answers the health endpoint with a 2xx.
    /// Never errors — any failure reads as "down".
    async fn health(&self) -> bool;

    /// Upload one photo as multipart field `file` plus optional scalar
    /// fields, returning the parsed JSON body.
    async fn submit_file(
        &self,
        endpoint: &str,
        photo: &CapturedPhoto,
        extra_fields: &[(&str, String)],
    ) -> Result<Value, GatewayError>;

    /// JSON call (POST/PUT/DELETE) returning the parsed body.
    /// DELETE calls pass `None` for the payload.
    async fn submit_json(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&Value>,
    ) -> Result<Value, GatewayError>;

    /// JSON GET.
    async fn get_json(&self, endpoint: &str) -> Result<Value, GatewayError> {
        self.submit_json(Method::GET, endpoint, None).await
    }
}

/// reqwest-backed gateway.
pub struct RemoteGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl RemoteGateway {
    pub fn new(config: GatewayConfig) -> Self {
        let http = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self { config, http }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Transport(format!(
                "request timed out after {}s",
                self.config.request_timeout.as_secs()
            ))
        } else if e.is_connect() {
            GatewayError::Transport(format!("could not connect to {}", self.config.base_url))
        } else {
            GatewayError::Transport(e.to_string())
        }
    }

    async fn finish(&self, response: reqwest::Response) -> Result<Value, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidBody(e.to_string()))
    }
}

impl Gateway for RemoteGateway {
    async fn health(&self) -> bool {
        let url = self.config.url_for(endpoints::HEALTH);
        match self
            .http
            .get(&url)
            .timeout(self.config.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }

    async fn submit_file(
        &self,
        endpoint: &str,
        photo: &CapturedPhoto,
        extra_fields: &[(&str, String)],
    ) -> Result<Value, GatewayError> {
        let bytes = tokio::fs::read(&photo.uri)
            .await
            .map_err(|source| GatewayError::PhotoRead {
                path: photo.uri.clone(),
                source,
            })?;

        let part = multipart::Part::bytes(bytes)
            .file_name(photo.upload_filename())
            .mime_str("image/jpeg")
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        let mut form = multipart::Form::new().part("file", part);
        for (name, value) in extra_fields {
            form = form.text(name.to_string(), value.clone());
        }

        let url = self.config.url_for(endpoint);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        self.finish(response).await
    }

    async fn submit_json(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        let url = self.config.url_for(endpoint);
        let mut request = self
            .http
            .request(method, &url)
            .timeout(self.config.request_timeout);
        if let Some(body) = payload {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        self.finish(response).await
    }
}

/// In-memory gateway for unit tests across the crate.
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    #[derive(Debug)]
    pub struct UploadCall {
        pub endpoint: String,
        pub photo_index: usize,
        pub extra_fields: Vec<(String, String)>,
    }

    #[derive(Debug)]
    pub struct JsonCall {
        pub method: Method,
        pub endpoint: String,
        pub payload: Option<Value>,
    }

    /// Scripted gateway: pops queued responses in call order and records
    /// every call for assertions.
    pub struct MockGateway {
        pub healthy: bool,
        uploads: RefCell<VecDeque<Result<Value, GatewayError>>>,
        json: RefCell<VecDeque<Result<Value, GatewayError>>>,
        pub upload_calls: RefCell<Vec<UploadCall>>,
        pub json_calls: RefCell<Vec<JsonCall>>,
    }

    impl MockGateway {
        pub fn healthy() -> Self {
            Self {
                healthy: true,
                uploads: RefCell::new(VecDeque::new()),
                json: RefCell::new(VecDeque::new()),
                upload_calls: RefCell::new(Vec::new()),
                json_calls: RefCell::new(Vec::new()),
            }
        }

        pub fn down() -> Self {
            Self {
                healthy: false,
                ..Self::healthy()
            }
        }

        pub fn queue_upload(&self, result: Result<Value, GatewayError>) {
            self.uploads.borrow_mut().push_back(result);
        }

        pub fn queue_json(&self, result: Result<Value, GatewayError>) {
            self.json.borrow_mut().push_back(result);
        }

        pub fn upload_count(&self) -> usize {
            self.upload_calls.borrow().len()
        }

        pub fn json_count(&self) -> usize {
            self.json_calls.borrow().len()
        }
    }

    impl Gateway for MockGateway {
        async fn health(&self) -> bool {
            self.healthy
        }

        async fn submit_file(
            &self,
            endpoint: &str,
            photo: &CapturedPhoto,
            extra_fields: &[(&str, String)],
        ) -> Result<Value, GatewayError> {
            self.upload_calls.borrow_mut().push(UploadCall {
                endpoint: endpoint.to_string(),
                photo_index: photo.local_index,
                extra_fields: extra_fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            });
            self.uploads
                .borrow_mut()
                .pop_front()
                .expect("unexpected submit_file call")
        }

        async fn submit_json(
            &self,
            method: Method,
            endpoint: &str,
            payload: Option<&Value>,
        ) -> Result<Value, GatewayError> {
            self.json_calls.borrow_mut().push(JsonCall {
                method,
                endpoint: endpoint.to_string(),
                payload: payload.cloned(),
            });
            self.json
                .borrow_mut()
                .pop_front()
                .expect("unexpected submit_json call")
        }
    }
}
