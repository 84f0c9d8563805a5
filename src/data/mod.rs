//! REST data provider following the "simple REST" convention.
//!
//! - list: `GET /{resource}?_start=&_end=&_sort=&_order=`, total from the
//!   `x-total-count` header (falls back to the page length)
//! - one: `GET /{resource}/{id}`
//! - update: `PATCH /{resource}/{id}` with the JSON changes as body

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::APP_USER_AGENT;

pub const DEFAULT_API_URL: &str = "https://api.fake-rest.refine.dev";
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
const TOTAL_COUNT_HEADER: &str = "x-total-count";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum DataError {
    #[error("API URL cannot be a base: {0}")]
    InvalidBase(Url),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
}

impl DataError {
    /// Upstream status, if the API answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorter {
    pub field: String,
    pub order: SortOrder,
}

/// Page window and ordering for a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub current: u64,
    pub page_size: u64,
    pub sorter: Option<Sorter>,
}

impl ListParams {
    /// Offset-based window, clamping `current` and `page_size` to at least 1.
    /// Offsets saturate at `u64::MAX`.
    #[must_use]
    pub fn window(&self) -> (u64, u64) {
        let current = self.current.max(1);
        let page_size = self.page_size.max(1);
        (
            (current - 1).saturating_mul(page_size),
            current.saturating_mul(page_size),
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let (start, end) = self.window();
        let mut query = vec![("_start", start.to_string()), ("_end", end.to_string())];
        if let Some(sorter) = &self.sorter {
            query.push(("_sort", sorter.field.clone()));
            query.push(("_order", sorter.order.as_str().to_string()));
        }
        query
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sorter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListResponse {
    pub data: Vec<Value>,
    pub total: u64,
}

#[derive(Debug, Clone)]
pub struct RestDataProvider {
    client: Client,
    api_url: Url,
}

impl RestDataProvider {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or `api_url` cannot
    /// carry path segments.
    pub fn new(api_url: Url) -> anyhow::Result<Self> {
        if api_url.cannot_be_a_base() {
            return Err(DataError::InvalidBase(api_url).into());
        }
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, api_url })
    }

    #[must_use]
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// URL of a resource collection, or of one record when `id` is given.
    ///
    /// # Errors
    /// [`DataError::InvalidBase`] if the API URL cannot take path segments.
    pub fn resource_url(&self, resource: &str, id: Option<&str>) -> Result<Url, DataError> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| DataError::InvalidBase(self.api_url.clone()))?;
            segments.pop_if_empty().push(resource);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// # Errors
    /// Returns a [`DataError`] if the request fails or the API answers with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn get_list(
        &self,
        resource: &str,
        params: &ListParams,
    ) -> Result<ListResponse, DataError> {
        let url = self.resource_url(resource, None)?;
        let response = self
            .send(self.client.get(url.clone()).query(&params.query()), &url)
            .await?;

        let total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let data: Vec<Value> = response.json().await.map_err(|source| DataError::Request {
            url: url.to_string(),
            source,
        })?;
        let total = total.unwrap_or(data.len() as u64);

        debug!("Fetched {} of {} {}", data.len(), total, resource);

        Ok(ListResponse { data, total })
    }

    /// # Errors
    /// Returns a [`DataError`] if the request fails or the record is missing.
    #[instrument(skip(self))]
    pub async fn get_one(&self, resource: &str, id: &str) -> Result<Value, DataError> {
        let url = self.resource_url(resource, Some(id))?;
        let response = self.send(self.client.get(url.clone()), &url).await?;
        json_body(response, &url).await
    }

    /// # Errors
    /// Returns a [`DataError`] if the request fails or the API rejects the
    /// update.
    #[instrument(skip(self, variables))]
    pub async fn update(
        &self,
        resource: &str,
        id: &str,
        variables: &Value,
    ) -> Result<Value, DataError> {
        let url = self.resource_url(resource, Some(id))?;
        let response = self
            .send(self.client.patch(url.clone()).json(variables), &url)
            .await?;
        json_body(response, &url).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> Result<reqwest::Response, DataError> {
        let response = request.send().await.map_err(|source| DataError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }
}

async fn json_body(response: reqwest::Response, url: &Url) -> Result<Value, DataError> {
    response.json().await.map_err(|source| DataError::Request {
        url: url.to_string(),
        source,
    })
}
