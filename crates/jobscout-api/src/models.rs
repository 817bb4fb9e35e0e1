use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A remote job posting as returned by Remotive.
///
/// Upstream records are not uniform: besides `id`, any field may be missing
/// or `null`, and either reads as empty instead of failing the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub company_name: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub candidate_required_location: String,
    #[serde(default, deserialize_with = "null_default")]
    pub publication_date: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Job {
    /// Calendar day the posting went up, if the upstream timestamp parses.
    ///
    /// Remotive usually sends naive timestamps (`2024-03-05T11:40:02`) but
    /// RFC 3339 strings show up too.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let raw = self.publication_date.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }

        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|dt| dt.date())
            .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    }

    /// Date for list rows; falls back to the raw upstream string
    pub fn display_date(&self) -> String {
        match self.published_on() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => self.publication_date.clone(),
        }
    }

    /// Salary text, or `None` when upstream sent nothing useful
    pub fn salary_text(&self) -> Option<&str> {
        self.salary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Job category (Software Development, Design, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

/// Employment type as understood by the `job_type` query parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JobType {
    FullTime,
    Contract,
    PartTime,
    Freelance,
    Internship,
    #[default]
    Other,
}

impl JobType {
    /// Types a user can filter by, in picker order
    pub const FILTERABLE: [JobType; 5] = [
        JobType::FullTime,
        JobType::Contract,
        JobType::PartTime,
        JobType::Freelance,
        JobType::Internship,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::Contract => "contract",
            JobType::PartTime => "part_time",
            JobType::Freelance => "freelance",
            JobType::Internship => "internship",
            JobType::Other => "other",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full Time",
            JobType::Contract => "Contract",
            JobType::PartTime => "Part Time",
            JobType::Freelance => "Freelance",
            JobType::Internship => "Internship",
            JobType::Other => "Other",
        }
    }
}

// Lenient on the way in: an unknown or null upstream type is `Other`
impl<'de> Deserialize<'de> for JobType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .and_then(|value| value.parse().ok())
            .unwrap_or(JobType::Other))
    }
}

impl Serialize for JobType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::str::FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full_time" => Ok(JobType::FullTime),
            "contract" => Ok(JobType::Contract),
            "part_time" => Ok(JobType::PartTime),
            "freelance" => Ok(JobType::Freelance),
            "internship" => Ok(JobType::Internship),
            "other" => Ok(JobType::Other),
            other => Err(format!("unknown job type: {}", other)),
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Optional filters for the listing endpoint. Every field is independent;
/// `None` or blank means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<JobType>,
}

impl JobFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn job_type(mut self, job_type: JobType) -> Self {
        self.job_type = Some(job_type);
        self
    }

    /// Query string pairs, skipping anything blank
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(search) = non_blank(&self.search) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(category) = non_blank(&self.category) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(job_type) = self.job_type {
            pairs.push(("job_type", job_type.as_str().to_string()));
        }

        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Both Remotive endpoints wrap their arrays in `{ "jobs": [...] }`
#[derive(Debug, Deserialize)]
pub(crate) struct JobsEnvelope<T> {
    pub jobs: Vec<T>,
}
