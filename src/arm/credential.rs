// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bearer token sources for Azure Resource Manager requests.
//!
//! Acquiring tokens (managed identity, service principals, CLI login) is left to the caller;
//! this crate only needs something that can hand out a token before each request.

use crate::errors::BackendError;
use async_trait::async_trait;

/// Supplies the bearer token attached to every ARM request.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Return a currently valid access token for `https://management.azure.com/`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Credential`] when no token can be produced.
    async fn token(&self) -> Result<String, BackendError>;
}

/// A token obtained out of band (e.g. `az account get-access-token`).
#[derive(Clone)]
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn token(&self) -> Result<String, BackendError> {
        if self.token.trim().is_empty() {
            return Err(BackendError::Credential {
                reason: "access token is empty".to_string(),
            });
        }
        Ok(self.token.clone())
    }
}
