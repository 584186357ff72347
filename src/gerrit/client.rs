//! HTTP client for the Gerrit REST API.
//!
//! `GerritClient` owns a `reqwest::Client` authenticated with the operator's
//! HTTP password. Each method performs exactly one request; retries are layered
//! on top by the interpreter.

use std::fmt;

use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::GerritConfig;
use crate::credentials::Credentials;
use crate::types::{ChangeDetail, ChangeRef, ChangeSummary, RelatedChange, RevisionNumber};

use super::error::GerritApiError;
use super::retry::RetryConfig;
use super::wire::{ChangeInfo, RelatedChangesInfo, ReviewInput, strip_xssi};

/// An authenticated client for one Gerrit instance.
#[derive(Clone)]
pub struct GerritClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    retry: RetryConfig,
}

impl GerritClient {
    /// Builds a client for `config.url`.
    ///
    /// Fails if the URL is not an absolute http(s) URL or the TLS backend
    /// cannot be initialized. No request is made.
    pub fn new(config: &GerritConfig, credentials: Credentials) -> Result<Self, GerritApiError> {
        let base_url = Url::parse(config.url.trim_end_matches('/')).map_err(|e| {
            GerritApiError::permanent_without_source(format!(
                "invalid Gerrit URL {:?}: {}",
                config.url, e
            ))
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(GerritApiError::permanent_without_source(format!(
                "Gerrit URL {:?} must be an http(s) URL",
                config.url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("gerrit-recheck/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GerritApiError::from_reqwest("build HTTP client", e))?;

        Ok(Self {
            http,
            base_url,
            credentials,
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    /// `GET /a/changes/{change}`
    pub async fn get_change(&self, change: &ChangeRef) -> Result<ChangeSummary, GerritApiError> {
        let operation = format!("get change {}", change);
        let url = self.endpoint(&["changes", change.as_str()])?;
        let info: ChangeInfo = self
            .request_json(&operation, self.http.get(url).query(&[("o", "CURRENT_REVISION")]))
            .await?;
        info.into_summary()
            .map_err(|e| GerritApiError::decode(&operation, e))
    }

    /// `GET /a/changes/{change}/revisions/{revision}/related`
    pub async fn get_related_changes(
        &self,
        change: &ChangeRef,
        revision: RevisionNumber,
    ) -> Result<Vec<RelatedChange>, GerritApiError> {
        let operation = format!("get related changes of {} revision {}", change, revision);
        let revision = revision.to_string();
        let url = self.endpoint(&["changes", change.as_str(), "revisions", &revision, "related"])?;
        let info: RelatedChangesInfo = self.request_json(&operation, self.http.get(url)).await?;
        Ok(info.into_related())
    }

    /// `GET /a/changes/{change}/detail`
    pub async fn get_change_detail(
        &self,
        change: &ChangeRef,
    ) -> Result<ChangeDetail, GerritApiError> {
        let operation = format!("get change detail {}", change);
        let url = self.endpoint(&["changes", change.as_str(), "detail"])?;
        let info: ChangeInfo = self.request_json(&operation, self.http.get(url)).await?;
        info.into_detail()
            .map_err(|e| GerritApiError::decode(&operation, e))
    }

    /// `POST /a/changes/{change}/revisions/current/review`
    pub async fn post_review(
        &self,
        change: &ChangeRef,
        message: &str,
    ) -> Result<(), GerritApiError> {
        let operation = format!("post review on {}", change);
        let url = self.endpoint(&["changes", change.as_str(), "revisions", "current", "review"])?;
        let request = self.http.post(url).json(&ReviewInput { message });
        self.send(&operation, request).await.map(|_| ())
    }

    /// Builds an authenticated endpoint URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GerritApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GerritApiError::permanent_without_source("Gerrit URL cannot be a base"))?
            .pop_if_empty()
            .push("a")
            .extend(segments);
        Ok(url)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, GerritApiError> {
        let body = self.send(operation, request).await?;
        serde_json::from_str(strip_xssi(&body)).map_err(|e| GerritApiError::decode(operation, e))
    }

    /// Sends a request and returns the body of a successful response.
    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<String, GerritApiError> {
        let request = request.basic_auth(
            &self.credentials.username,
            Some(self.credentials.password()),
        );
        trace!(operation, "Sending Gerrit request");

        let response = request
            .send()
            .await
            .map_err(|e| GerritApiError::from_reqwest(operation, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GerritApiError::from_reqwest(operation, e))?;

        if !status.is_success() {
            debug!(operation, status = status.as_u16(), "Gerrit request failed");
            return Err(GerritApiError::from_status(operation, status.as_u16(), &body));
        }
        Ok(body)
    }
}

impl fmt::Debug for GerritClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GerritClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.credentials.username)
            .finish_non_exhaustive()
    }
}
