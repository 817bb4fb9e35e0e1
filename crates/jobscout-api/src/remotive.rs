use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{Category, Job, JobFilters, JobsEnvelope};

pub const REMOTIVE_API_BASE: &str = "https://remotive.com/api/remote-jobs";

const USER_AGENT: &str = concat!("JobScout/", env!("CARGO_PKG_VERSION"));

// Error bodies can be whole HTML pages; keep messages readable
const MAX_ERROR_BODY: usize = 200;

#[derive(Error, Debug)]
pub enum RemotiveError {
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Job not found: {0}")]
    NotFound(u64),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl RemotiveError {
    /// Everything except a missing job counts as a failed fetch
    pub fn is_network(&self) -> bool {
        !matches!(self, RemotiveError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, RemotiveError>;

/// Client for the public Remotive job board API.
///
/// No retries, no caching: every call is one fresh GET.
#[derive(Debug, Clone)]
pub struct RemotiveClient {
    client: reqwest::Client,
    base_url: String,
}

impl RemotiveClient {
    pub fn new() -> Result<Self> {
        Self::with_options(REMOTIVE_API_BASE, None)
    }

    /// Point the client somewhere else (mirrors, mock servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    pub fn with_options(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// List jobs matching the given filters
    pub async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>> {
        let jobs: Vec<Job> = self.get_jobs_envelope(&self.base_url, &filters.query_pairs()).await?;
        debug!("Fetched {} jobs (filters: {:?})", jobs.len(), filters);
        Ok(jobs)
    }

    /// List every job category
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let url = format!("{}/categories", self.base_url);
        let categories: Vec<Category> = self.get_jobs_envelope(&url, &[]).await?;
        debug!("Fetched {} categories", categories.len());
        Ok(categories)
    }

    /// Resolve a single job.
    ///
    /// The API has no single-item endpoint, so this downloads the whole
    /// unfiltered listing and scans it.
    pub async fn get_job_by_id(&self, id: u64) -> Result<Job> {
        let jobs = self.list_jobs(&JobFilters::default()).await?;
        find_job(jobs, id).ok_or(RemotiveError::NotFound(id))
    }

    async fn get_jobs_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>> {
        debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(RemotiveError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let envelope: JobsEnvelope<T> = serde_json::from_str(&text)?;
        Ok(envelope.jobs)
    }
}

/// Linear scan for a job by id
pub fn find_job(jobs: impl IntoIterator<Item = Job>, id: u64) -> Option<Job> {
    jobs.into_iter().find(|job| job.id == id)
}
