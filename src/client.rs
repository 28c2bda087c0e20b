//! REST client for the backend service API
//!
//! CRUD over service configurations, CDS invocation, and FHIR search. Calls
//! are single-shot: no retries or backoff, matching the interactive callers
//! this client serves. Failures are categorized by HTTP status so the caller
//! can map them to user-facing messages.

use crate::fhir::SearchQuery;
use crate::hooks::model::{CdsRequest, CdsResponse, ServiceConfig};
use serde::Deserialize;
use thiserror::Error;

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the backend API, categorized by status code
#[derive(Error, Debug)]
pub enum ApiError {
    /// 404
    #[error("not found: {resource}")]
    NotFound {
        /// Path or id that was requested
        resource: String,
    },

    /// 409
    #[error("conflict: {message}")]
    Conflict {
        /// Server-provided conflict description
        message: String,
    },

    /// 400
    #[error("validation rejected: {message}")]
    Validation {
        /// Server-provided validation message
        message: String,
    },

    /// 5xx
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided message, possibly empty
        message: String,
    },

    /// Any other non-success status
    #[error("unexpected status {status}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
    },

    /// Connection or protocol failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct DiscoveryResponse {
    services: Vec<ServiceConfig>,
}

/// Client for the CDS service backend and a FHIR server
#[derive(Debug, Clone)]
pub struct CdsClient {
    http: reqwest::Client,
    base_url: String,
    fhir_base_url: String,
}

impl CdsClient {
    /// Create a client for a backend base URL and a FHIR base URL
    pub fn new(base_url: impl Into<String>, fhir_base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: trim_trailing_slash(base_url.into()),
            fhir_base_url: trim_trailing_slash(fhir_base_url.into()),
        }
    }

    /// Create a client with a preconfigured `reqwest::Client`
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        fhir_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: trim_trailing_slash(base_url.into()),
            fhir_base_url: trim_trailing_slash(fhir_base_url.into()),
        }
    }

    /// List all service configurations (CDS discovery document)
    pub async fn list_services(&self) -> ApiResult<Vec<ServiceConfig>> {
        let url = format!("{}/cds-services", self.base_url);
        log::debug!("GET {url}");
        let response = check(self.http.get(&url).send().await?).await?;
        Ok(response.json::<DiscoveryResponse>().await?.services)
    }

    /// Fetch one service configuration
    pub async fn get_service(&self, id: &str) -> ApiResult<ServiceConfig> {
        let url = format!("{}/cds-services/{id}", self.base_url);
        log::debug!("GET {url}");
        let response = check(self.http.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Create a service configuration
    pub async fn create_service(&self, config: &ServiceConfig) -> ApiResult<ServiceConfig> {
        let url = format!("{}/cds-services", self.base_url);
        log::debug!("POST {url}");
        let response = check(self.http.post(&url).json(config).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Replace a service configuration
    pub async fn update_service(&self, config: &ServiceConfig) -> ApiResult<ServiceConfig> {
        let url = format!("{}/cds-services/{}", self.base_url, config.service_id);
        log::debug!("PUT {url}");
        let response = check(self.http.put(&url).json(config).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Delete a service configuration
    pub async fn delete_service(&self, id: &str) -> ApiResult<()> {
        let url = format!("{}/cds-services/{id}", self.base_url);
        log::debug!("DELETE {url}");
        check(self.http.delete(&url).send().await?).await?;
        Ok(())
    }

    /// Invoke a CDS service with a hook request, returning its cards
    pub async fn invoke(&self, id: &str, request: &CdsRequest) -> ApiResult<CdsResponse> {
        let url = format!("{}/cds-services/{id}", self.base_url);
        log::debug!("POST {url} (hook {})", request.hook);
        let response = check(self.http.post(&url).json(request).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Run a FHIR search and return the raw bundle
    pub async fn fhir_search(&self, query: &SearchQuery) -> ApiResult<serde_json::Value> {
        let url = format!("{}{}", self.fhir_base_url, query.to_query_string());
        log::debug!("GET {url}");
        let response = check(self.http.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Map non-success statuses to error categories
async fn check(response: reqwest::Response) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let resource = response.url().path().to_string();
    let message = response.text().await.unwrap_or_default();
    log::warn!("request to {resource} failed with status {status}");
    Err(match status.as_u16() {
        404 => ApiError::NotFound { resource },
        409 => ApiError::Conflict { message },
        400 => ApiError::Validation { message },
        code if (500..=599).contains(&code) => ApiError::Server {
            status: code,
            message,
        },
        code => ApiError::UnexpectedStatus { status: code },
    })
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_urls_are_normalized() {
        let client = CdsClient::new("http://localhost:8080/", "http://localhost:8080/fhir///");
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(client.fhir_base_url, "http://localhost:8080/fhir");
    }

    #[test]
    fn test_error_messages_name_the_category() {
        let not_found = ApiError::NotFound {
            resource: "/cds-services/x".to_string(),
        };
        assert!(not_found.to_string().contains("not found"));

        let server = ApiError::Server {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(server.to_string().contains("503"));
    }
}
