use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jobscout_api::{find_job, Category, Job, JobFilters, RemotiveClient};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Where job listings come from.
///
/// `RemotiveClient` is the real thing; tests swap in mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait JobSource: Send + Sync {
    async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
}

#[async_trait::async_trait]
impl JobSource for RemotiveClient {
    async fn list_jobs(&self, filters: &JobFilters) -> Result<Vec<Job>> {
        Ok(RemotiveClient::list_jobs(self, filters).await?)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(RemotiveClient::list_categories(self).await?)
    }
}

/// How a single job is resolved for the detail view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLookup {
    /// Download the full listing and scan it every time
    #[default]
    Refetch,
    /// Answer from the last unfiltered listing, refetch only on a miss
    Indexed,
}

/// Job access for the screens.
///
/// Wraps a [`JobSource`]. Under [`DetailLookup::Indexed`] it also remembers
/// the most recent unfiltered listing, keyed by id.
pub struct JobCatalog {
    source: Arc<dyn JobSource>,
    lookup: DetailLookup,
    index: Mutex<HashMap<u64, Job>>,
}

impl JobCatalog {
    pub fn new(source: Arc<dyn JobSource>, lookup: DetailLookup) -> Self {
        Self {
            source,
            lookup,
            index: Mutex::new(HashMap::new()),
        }
    }

    pub async fn jobs(&self, filters: &JobFilters) -> Result<Vec<Job>> {
        let jobs = self.source.list_jobs(filters).await?;
        if self.lookup == DetailLookup::Indexed && filters.is_empty() {
            self.remember(&jobs);
        }
        Ok(jobs)
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.source.list_categories().await
    }

    /// Resolve one job by id.
    ///
    /// There is no single-item endpoint, so a miss means downloading the
    /// whole listing. An id missing from that listing is `NotFound`.
    pub async fn job(&self, id: u64) -> Result<Job> {
        if self.lookup == DetailLookup::Indexed {
            if let Some(job) = self.indexed(id) {
                debug!("Job {} served from index", id);
                return Ok(job);
            }
        }

        let jobs = self.jobs(&JobFilters::default()).await?;
        find_job(jobs, id).ok_or(Error::NotFound(id))
    }

    /// Jobs whose id is in `ids`, in listing order.
    ///
    /// Empty `ids` returns immediately without touching the network.
    /// Favorites no longer listed upstream are left out.
    pub async fn favorite_jobs(&self, ids: &[u64]) -> Result<Vec<Job>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let all = self.jobs(&JobFilters::default()).await?;
        let favorites: Vec<Job> = all.into_iter().filter(|job| ids.contains(&job.id)).collect();

        let missing = ids.len().saturating_sub(favorites.len());
        if missing > 0 {
            info!("{} of {} favorites are no longer listed", missing, ids.len());
        }
        Ok(favorites)
    }

    fn remember(&self, jobs: &[Job]) {
        let mut index = self.index.lock().unwrap_or_else(|e| e.into_inner());
        index.clear();
        index.extend(jobs.iter().map(|job| (job.id, job.clone())));
        debug!("Indexed {} jobs", index.len());
    }

    fn indexed(&self, id: u64) -> Option<Job> {
        let index = self.index.lock().unwrap_or_else(|e| e.into_inner());
        index.get(&id).cloned()
    }
}
