// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Azure Resource Manager transport.
//!
//! [`ArmClient`] issues single-attempt REST calls against
//! `{endpoint}/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/...`.
//! Nothing in this module retries: a failed call surfaces as a [`BackendError`] carrying the
//! operation, the resource, the HTTP status and the ARM error code.
//!
//! Two ARM conventions are handled transparently:
//! - list responses are drained through `nextLink` ([`pagination`])
//! - long-running `PUT`/`DELETE` calls are polled to completion ([`lro`])

pub mod credential;
pub mod ids;
pub mod lro;
pub mod network;
pub mod pagination;
pub mod types;

use crate::config::CloudConfig;
use crate::constants::NETWORK_PROVIDER;
use crate::errors::BackendError;
use crate::http_errors::map_http_error_to_reason;
use credential::TokenCredential;
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use types::ErrorResponse;
use url::Url;

/// Shared ARM REST client. Cheap to clone.
#[derive(Clone)]
pub struct ArmClient {
    http: HttpClient,
    endpoint: Url,
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
    poll_interval: Duration,
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("subscription_id", &self.subscription_id)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl ArmClient {
    /// Build a client for the subscription and endpoint in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if the endpoint does not parse and
    /// [`BackendError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(
        config: &CloudConfig,
        credential: Arc<dyn TokenCredential>,
    ) -> Result<Self, BackendError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| BackendError::InvalidUrl {
            url: config.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl {
                url: config.endpoint.clone(),
                reason: "endpoint cannot be used as a base URL".to_string(),
            });
        }

        let http = HttpClient::builder()
            .build()
            .map_err(|e| BackendError::Transport {
                operation: "Connect",
                resource: config.endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint,
            subscription_id: config.subscription_id.clone(),
            credential,
            poll_interval: config.poll_interval(),
        })
    }

    /// Subscription every request is scoped to.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Fetch a token from the configured credential.
    ///
    /// # Errors
    ///
    /// Propagates the credential's error.
    pub async fn token(&self) -> Result<String, BackendError> {
        self.credential.token().await
    }

    /// URL of a `Microsoft.Network` resource inside `resource_group`.
    ///
    /// `segments` are appended verbatim (and percent-encoded), e.g.
    /// `["dnsZones", "example.com", "A", "www"]`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if the endpoint cannot carry a path.
    pub fn resource_url(
        &self,
        resource_group: &str,
        segments: &[&str],
        api_version: &str,
    ) -> Result<Url, BackendError> {
        let mut url = self.endpoint.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| BackendError::InvalidUrl {
                    url: self.endpoint.to_string(),
                    reason: "endpoint cannot be used as a base URL".to_string(),
                })?;
            path.pop_if_empty();
            path.extend([
                "subscriptions",
                self.subscription_id.as_str(),
                "resourceGroups",
                resource_group,
                "providers",
                NETWORK_PROVIDER,
            ]);
            path.extend(segments);
        }
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    /// `GET` a single JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Api`] for non-2xx responses, [`BackendError::Transport`] when no
    /// response arrives and [`BackendError::Decode`] when the body is not the expected JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        resource: &str,
        url: Url,
    ) -> Result<T, BackendError> {
        let response = self
            .send::<()>(operation, resource, Method::GET, url, None)
            .await?;
        if !response.status().is_success() {
            return Err(self.error_from_response(operation, resource, response).await);
        }
        Self::decode(operation, resource, response).await
    }

    /// `PUT` a resource and wait for any long-running operation it starts.
    ///
    /// Returns the resource as echoed in the initial response, or as read back with a `GET`
    /// when ARM accepted the request without a body.
    ///
    /// # Errors
    ///
    /// Same as [`ArmClient::get_json`], plus [`BackendError::OperationFailed`] when the
    /// long-running operation does not succeed.
    pub async fn put_json<B, T>(
        &self,
        operation: &'static str,
        resource: &str,
        url: Url,
        body: &B,
    ) -> Result<T, BackendError>
    where
        B: Serialize + std::fmt::Debug + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .send(operation, resource, Method::PUT, url.clone(), Some(body))
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.error_from_response(operation, resource, response).await);
        }

        let poll = lro::PollTarget::from_response(&response);
        let text = Self::body_text(operation, resource, response).await?;
        self.wait_for_completion(operation, resource, status, poll)
            .await?;

        // 202 Accepted carries no resource; read it back once the operation is done
        if status == StatusCode::ACCEPTED || text.trim().is_empty() {
            debug!(
                operation = operation,
                resource = %resource,
                status = %status,
                "PUT answered without a resource body, reading it back"
            );
            return self.get_json(operation, resource, url).await;
        }
        Self::parse(operation, resource, &text)
    }

    /// `DELETE` a resource and wait for any long-running operation it starts.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when ARM answers `204 No Content` (nothing to
    /// delete), otherwise the same errors as [`ArmClient::put_json`].
    pub async fn delete(
        &self,
        operation: &'static str,
        resource: &str,
        url: Url,
    ) -> Result<(), BackendError> {
        let response = self
            .send::<()>(operation, resource, Method::DELETE, url, None)
            .await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            debug!(resource = %resource, "Delete answered 204, resource does not exist");
            return Err(BackendError::NotFound {
                operation,
                resource: resource.to_string(),
            });
        }
        if !status.is_success() {
            return Err(self.error_from_response(operation, resource, response).await);
        }

        let poll = lro::PollTarget::from_response(&response);
        self.wait_for_completion(operation, resource, status, poll)
            .await
    }

    /// Execute one request with a bearer token attached.
    async fn send<B: Serialize + std::fmt::Debug + Sync>(
        &self,
        operation: &'static str,
        resource: &str,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response, BackendError> {
        let token = self.credential.token().await?;

        debug!(
            operation = operation,
            method = %method,
            url = %url,
            body = ?body,
            "ARM request"
        );

        let mut request = self.http.request(method.clone(), url.clone()).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(
                operation = operation,
                method = %method,
                url = %url,
                error = %e,
                "ARM request could not be sent"
            );
            BackendError::Transport {
                operation,
                resource: resource.to_string(),
                reason: e.to_string(),
            }
        })?;

        debug!(
            operation = operation,
            method = %method,
            url = %url,
            status = %response.status(),
            "ARM response"
        );
        Ok(response)
    }

    /// Turn a non-success response into [`BackendError::Api`].
    ///
    /// The ARM error envelope supplies code and message when present; otherwise the status
    /// code is mapped to a generic reason.
    async fn error_from_response(
        &self,
        operation: &'static str,
        resource: &str,
        response: Response,
    ) -> BackendError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let (reason, fallback) = map_http_error_to_reason(status);

        let detail = serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .and_then(|envelope| envelope.error);
        let (code, message) = match detail {
            Some(detail) => (
                detail.code.unwrap_or_else(|| reason.to_string()),
                detail.message.unwrap_or(fallback),
            ),
            None if text.trim().is_empty() => (reason.to_string(), fallback),
            None => (reason.to_string(), text),
        };

        error!(
            operation = operation,
            resource = %resource,
            status = status,
            code = %code,
            error = %message,
            "ARM request failed"
        );

        BackendError::Api {
            operation,
            resource: resource.to_string(),
            status,
            code,
            message,
        }
    }

    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        resource: &str,
        response: Response,
    ) -> Result<T, BackendError> {
        let text = Self::body_text(operation, resource, response).await?;
        Self::parse(operation, resource, &text)
    }

    async fn body_text(
        operation: &'static str,
        resource: &str,
        response: Response,
    ) -> Result<String, BackendError> {
        response.text().await.map_err(|e| BackendError::Transport {
            operation,
            resource: resource.to_string(),
            reason: e.to_string(),
        })
    }

    fn parse<T: DeserializeOwned>(
        operation: &'static str,
        resource: &str,
        text: &str,
    ) -> Result<T, BackendError> {
        serde_json::from_str(text).map_err(|e| BackendError::Decode {
            operation,
            resource: resource.to_string(),
            reason: e.to_string(),
        })
    }
}
