//! Blocking HTTP client for the prompt hub backend

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Prompt, PromptDraft, PromptFilter};
use crate::config::ApiConfig;
use crate::playground::{PlaygroundRequest, PlaygroundResponse};

const LIST_PROMPTS: &str = "Failed to fetch prompts";
const GET_PROMPT: &str = "Failed to fetch prompt";
const CREATE_PROMPT: &str = "Failed to create prompt";
const UPDATE_PROMPT: &str = "Failed to update prompt";
const DELETE_PROMPT: &str = "Failed to delete prompt";
const LIST_MODELS: &str = "Failed to fetch available models";
const SEED: &str = "Failed to seed database";
const TEST_PLAYGROUND: &str = "Failed to test prompt";
const BUILD_CLIENT: &str = "Failed to build HTTP client";

/// Errors returned by backend calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status
    #[error("{operation} (HTTP {status})")]
    Status { operation: &'static str, status: u16 },

    /// The request could not be sent or the body could not be decoded
    #[error("{operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Human-readable label of the failed operation
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Status { operation, .. } | Self::Transport { operation, .. } => operation,
        }
    }

    fn transport(operation: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Transport { operation, source }
    }
}

/// Operations offered by the backend
pub trait PromptApi {
    fn list_prompts(&self, filter: &PromptFilter) -> Result<Vec<Prompt>, ApiError>;
    fn get_prompt(&self, id: i64) -> Result<Prompt, ApiError>;
    fn create_prompt(&self, draft: &PromptDraft) -> Result<Prompt, ApiError>;
    fn update_prompt(&self, id: i64, draft: &PromptDraft) -> Result<Prompt, ApiError>;
    fn delete_prompt(&self, id: i64) -> Result<(), ApiError>;
    /// Raw model listing, see [`crate::models::ModelCatalog::from_response`]
    fn available_models(&self) -> Result<Value, ApiError>;
    fn seed(&self) -> Result<(), ApiError>;
    fn test_playground(&self, request: &PlaygroundRequest)
        -> Result<PlaygroundResponse, ApiError>;
}

/// [`PromptApi`] over HTTP
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::transport(BUILD_CLIENT))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn execute(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let request = builder.build().map_err(ApiError::transport(operation))?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self
            .http
            .execute(request)
            .map_err(ApiError::transport(operation))?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, operation, "backend request failed");
            return Err(ApiError::Status {
                operation,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        self.execute(operation, builder)?
            .json()
            .map_err(ApiError::transport(operation))
    }
}

impl PromptApi for ApiClient {
    fn list_prompts(&self, filter: &PromptFilter) -> Result<Vec<Prompt>, ApiError> {
        let builder = self
            .http
            .get(self.url("/api/v1/prompts"))
            .query(&filter.query_pairs());
        self.json(LIST_PROMPTS, builder)
    }

    fn get_prompt(&self, id: i64) -> Result<Prompt, ApiError> {
        let builder = self.http.get(self.url(&format!("/api/v1/prompts/{}", id)));
        self.json(GET_PROMPT, builder)
    }

    fn create_prompt(&self, draft: &PromptDraft) -> Result<Prompt, ApiError> {
        let builder = self.http.post(self.url("/api/v1/prompts")).json(draft);
        self.json(CREATE_PROMPT, builder)
    }

    fn update_prompt(&self, id: i64, draft: &PromptDraft) -> Result<Prompt, ApiError> {
        let builder = self
            .http
            .put(self.url(&format!("/api/v1/prompts/{}", id)))
            .json(draft);
        self.json(UPDATE_PROMPT, builder)
    }

    fn delete_prompt(&self, id: i64) -> Result<(), ApiError> {
        let builder = self
            .http
            .delete(self.url(&format!("/api/v1/prompts/{}", id)));
        self.execute(DELETE_PROMPT, builder).map(|_| ())
    }

    fn available_models(&self) -> Result<Value, ApiError> {
        let builder = self.http.get(self.url("/api/v1/prompts/models"));
        self.json(LIST_MODELS, builder)
    }

    fn seed(&self) -> Result<(), ApiError> {
        let builder = self.http.post(self.url("/api/v1/prompts/seed"));
        self.execute(SEED, builder).map(|_| ())
    }

    fn test_playground(
        &self,
        request: &PlaygroundRequest,
    ) -> Result<PlaygroundResponse, ApiError> {
        let builder = self
            .http
            .post(self.url("/api/v1/playground/test"))
            .json(request);
        self.json(TEST_PLAYGROUND, builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ConsoleConfig::default().with_base_url("http://localhost:8000/");
        let client = ApiClient::new(&config.api).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/api/v1/prompts"), "http://localhost:8000/api/v1/prompts");
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            operation: DELETE_PROMPT,
            status: 404,
        };
        assert_eq!(err.to_string(), "Failed to delete prompt (HTTP 404)");
        assert_eq!(err.operation(), "Failed to delete prompt");
    }
}
