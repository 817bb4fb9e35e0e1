// Remotive API client
pub mod models;
pub mod remotive;

pub use models::{Category, Job, JobFilters, JobType};
pub use remotive::{find_job, RemotiveClient, RemotiveError, REMOTIVE_API_BASE};
