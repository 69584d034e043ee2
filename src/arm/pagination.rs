// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pagination helpers for ARM list operations.
//!
//! ARM list responses carry at most one page of `value` plus an absolute `nextLink` to the
//! following page. Callers always want the whole collection, so pages are drained here.

use super::types::Page;
use super::ArmClient;
use crate::errors::BackendError;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

impl ArmClient {
    /// List every item of a collection, following `nextLink` until it is absent.
    ///
    /// # Errors
    ///
    /// Returns the first failing page request; items of earlier pages are discarded.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        resource: &str,
        first_page: Url,
    ) -> Result<Vec<T>, BackendError> {
        let mut all_items = Vec::new();
        let mut page_count = 0;
        let mut url = first_page;

        loop {
            page_count += 1;
            let page: Page<T> = self.get_json(operation, resource, url).await?;

            let item_count = page.value.len();
            all_items.extend(page.value);

            debug!(
                resource = %resource,
                page = page_count,
                items_in_page = item_count,
                total_items = all_items.len(),
                "Fetched page from Azure Resource Manager"
            );

            match page.next_link.filter(|link| !link.is_empty()) {
                Some(link) => {
                    url = Url::parse(&link).map_err(|e| BackendError::InvalidUrl {
                        url: link.clone(),
                        reason: e.to_string(),
                    })?;
                }
                None => break,
            }
        }

        Ok(all_items)
    }
}
