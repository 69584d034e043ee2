// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Long-running operation polling.
//!
//! ARM acknowledges slow `PUT`/`DELETE` calls with a status URL instead of a final answer:
//! - `Azure-AsyncOperation`: poll until the body's `status` is terminal
//! - `Location` (only on `202 Accepted`): poll until the answer is no longer `202`
//!
//! Polls honor `Retry-After` and otherwise wait the configured poll interval. A poll is a
//! status read, not a retry of the original request.

use super::types::OperationStatus;
use super::ArmClient;
use crate::constants::{HEADER_ASYNC_OPERATION, HEADER_RETRY_AFTER};
use crate::errors::BackendError;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{Method, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Where (if anywhere) completion of an accepted request is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTarget {
    /// The request completed synchronously
    Done,
    /// Poll an `Azure-AsyncOperation` status document
    AsyncOperation {
        url: String,
        retry_after: Option<Duration>,
    },
    /// Poll a `Location` URL until it stops answering `202`
    Location {
        url: String,
        retry_after: Option<Duration>,
    },
}

impl PollTarget {
    /// Inspect the headers of the initial response.
    #[must_use]
    pub fn from_response(response: &Response) -> Self {
        Self::from_parts(response.status(), response.headers())
    }

    #[must_use]
    pub fn from_parts(status: StatusCode, headers: &HeaderMap) -> Self {
        let retry_after = retry_after(headers);
        if let Some(url) = header_str(headers, HEADER_ASYNC_OPERATION) {
            return PollTarget::AsyncOperation { url, retry_after };
        }
        if status == StatusCode::ACCEPTED {
            if let Some(url) = headers
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
            {
                return PollTarget::Location { url, retry_after };
            }
        }
        PollTarget::Done
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `Retry-After` in whole seconds; HTTP dates are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    header_str(headers, HEADER_RETRY_AFTER)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn parse_poll_url(raw: &str) -> Result<Url, BackendError> {
    Url::parse(raw).map_err(|e| BackendError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

impl ArmClient {
    /// Block until the operation described by `poll` reaches a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::OperationFailed`] for a `Failed` or `Canceled` operation and
    /// the usual request errors when a status read fails.
    pub(crate) async fn wait_for_completion(
        &self,
        operation: &'static str,
        resource: &str,
        initial_status: StatusCode,
        poll: PollTarget,
    ) -> Result<(), BackendError> {
        match poll {
            PollTarget::Done => Ok(()),
            PollTarget::AsyncOperation { url, retry_after } => {
                debug!(
                    operation = operation,
                    resource = %resource,
                    status = %initial_status,
                    "Waiting for Azure-AsyncOperation"
                );
                self.poll_async_operation(operation, resource, &url, retry_after)
                    .await
            }
            PollTarget::Location { url, retry_after } => {
                debug!(
                    operation = operation,
                    resource = %resource,
                    "Waiting for Location"
                );
                self.poll_location(operation, resource, &url, retry_after)
                    .await
            }
        }
    }

    async fn poll_async_operation(
        &self,
        operation: &'static str,
        resource: &str,
        raw_url: &str,
        mut delay: Option<Duration>,
    ) -> Result<(), BackendError> {
        let url = parse_poll_url(raw_url)?;
        let mut polls = 0u32;

        loop {
            tokio::time::sleep(delay.unwrap_or(self.poll_interval)).await;
            polls += 1;

            let response = self
                .send::<()>(operation, resource, Method::GET, url.clone(), None)
                .await?;
            if !response.status().is_success() {
                return Err(self.error_from_response(operation, resource, response).await);
            }
            delay = retry_after(response.headers());
            let status: OperationStatus = Self::decode(operation, resource, response).await?;

            debug!(
                operation = operation,
                resource = %resource,
                poll = polls,
                status = %status.status,
                "Polled long-running operation"
            );

            match status.status.as_str() {
                "Succeeded" => return Ok(()),
                "Failed" | "Canceled" => {
                    return Err(BackendError::OperationFailed {
                        operation,
                        resource: resource.to_string(),
                        status: status.status,
                    })
                }
                _ => {}
            }
        }
    }

    async fn poll_location(
        &self,
        operation: &'static str,
        resource: &str,
        raw_url: &str,
        mut delay: Option<Duration>,
    ) -> Result<(), BackendError> {
        let url = parse_poll_url(raw_url)?;

        loop {
            tokio::time::sleep(delay.unwrap_or(self.poll_interval)).await;

            let response = self
                .send::<()>(operation, resource, Method::GET, url.clone(), None)
                .await?;
            let status = response.status();
            if status == StatusCode::ACCEPTED {
                delay = retry_after(response.headers());
                continue;
            }
            if status.is_success() {
                return Ok(());
            }
            return Err(self.error_from_response(operation, resource, response).await);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_async_operation_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HEADER_ASYNC_OPERATION,
            HeaderValue::from_static("https://arm/operations/1"),
        );
        headers.insert(LOCATION, HeaderValue::from_static("https://arm/results/1"));
        headers.insert(HEADER_RETRY_AFTER, HeaderValue::from_static("3"));

        assert_eq!(
            PollTarget::from_parts(StatusCode::ACCEPTED, &headers),
            PollTarget::AsyncOperation {
                url: "https://arm/operations/1".to_string(),
                retry_after: Some(Duration::from_secs(3)),
            }
        );
    }

    #[test]
    fn test_location_only_on_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("https://arm/results/1"));

        assert_eq!(
            PollTarget::from_parts(StatusCode::OK, &headers),
            PollTarget::Done
        );
        assert_eq!(
            PollTarget::from_parts(StatusCode::ACCEPTED, &headers),
            PollTarget::Location {
                url: "https://arm/results/1".to_string(),
                retry_after: None,
            }
        );
    }

    #[test]
    fn test_no_headers_is_done() {
        assert_eq!(
            PollTarget::from_parts(StatusCode::CREATED, &HeaderMap::new()),
            PollTarget::Done
        );
    }
}
