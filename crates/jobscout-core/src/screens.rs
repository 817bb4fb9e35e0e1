// Screen state, independent of how it gets drawn
use jobscout_api::{Category, Job, JobFilters, JobType};
use tracing::warn;

use crate::{Error, Result};

pub const JOBS_ERROR: &str = "Something went wrong while loading jobs";
pub const DETAIL_ERROR: &str = "Could not load this job";
pub const NOT_FOUND_MESSAGE: &str = "This job is no longer listed";
pub const FAVORITES_ERROR: &str = "Could not load your saved jobs";

/// loading -> failed | loaded (empty or not)
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// Loaded, but nothing matched
    pub fn is_empty_result(&self) -> bool {
        matches!(self, LoadState::Loaded(items) if items.is_empty())
    }

    /// Loaded items, or nothing while loading/failed
    pub fn items(&self) -> &[T] {
        match self {
            LoadState::Loaded(items) => items,
            _ => &[],
        }
    }
}

/// Search box, category and type pickers, and the result list
#[derive(Debug, Clone)]
pub struct JobsScreen {
    pub search_input: String,
    pub category: Option<String>,
    pub job_type: Option<JobType>,
    pub categories: Vec<Category>,
    pub jobs: LoadState<Vec<Job>>,
    /// Reloading while the previous list stays on screen
    pub refreshing: bool,
    pub selected: usize,
}

impl JobsScreen {
    pub fn new() -> Self {
        Self {
            search_input: String::new(),
            category: None,
            job_type: None,
            categories: Vec::new(),
            jobs: LoadState::Loading,
            refreshing: false,
            selected: 0,
        }
    }

    pub fn filters(&self) -> JobFilters {
        JobFilters {
            search: Some(self.search_input.clone()),
            category: self.category.clone(),
            job_type: self.job_type,
        }
    }

    /// A reload keeps a non-empty list visible; anything else shows loading
    pub fn begin_load(&mut self) {
        if self.jobs.items().is_empty() {
            self.jobs = LoadState::Loading;
            self.refreshing = false;
        } else {
            self.refreshing = true;
        }
    }

    pub fn finish_load(&mut self, result: Result<Vec<Job>>) {
        self.refreshing = false;
        self.selected = 0;
        self.jobs = match result {
            Ok(jobs) => LoadState::Loaded(jobs),
            Err(e) => {
                warn!("Loading jobs failed: {}", e);
                LoadState::Failed(JOBS_ERROR.to_string())
            }
        };
    }

    /// Category failures only leave the picker empty
    pub fn set_categories(&mut self, result: Result<Vec<Category>>) {
        match result {
            Ok(categories) => self.categories = categories,
            Err(e) => warn!("Loading categories failed: {}", e),
        }
    }

    /// All -> each category -> All
    pub fn next_category(&mut self) {
        let current = self
            .category
            .as_ref()
            .and_then(|name| self.categories.iter().position(|c| &c.name == name));

        self.category = match current {
            None => self.categories.first().map(|c| c.name.clone()),
            Some(i) => self.categories.get(i + 1).map(|c| c.name.clone()),
        };
    }

    /// All -> each filterable type -> All
    pub fn next_job_type(&mut self) {
        let types = JobType::FILTERABLE;
        self.job_type = match self.job_type {
            None => Some(types[0]),
            Some(current) => types
                .iter()
                .position(|t| *t == current)
                .and_then(|i| types.get(i + 1).copied()),
        };
    }

    pub fn select_next(&mut self) {
        self.selected = step_forward(self.selected, self.jobs.items().len());
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.jobs.items().get(self.selected)
    }
}

impl Default for JobsScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// One job, resolved by id
#[derive(Debug, Clone)]
pub struct DetailScreen {
    pub job_id: u64,
    pub job: LoadState<Job>,
    pub scroll: u16,
}

impl DetailScreen {
    pub fn new(job_id: u64) -> Self {
        Self {
            job_id,
            job: LoadState::Loading,
            scroll: 0,
        }
    }

    pub fn begin_load(&mut self) {
        self.job = LoadState::Loading;
        self.scroll = 0;
    }

    pub fn finish_load(&mut self, result: Result<Job>) {
        self.job = match result {
            Ok(job) => LoadState::Loaded(job),
            Err(Error::NotFound(id)) => {
                warn!("Job {} is not in the current listing", id);
                LoadState::Failed(NOT_FOUND_MESSAGE.to_string())
            }
            Err(e) => {
                warn!("Loading job {} failed: {}", self.job_id, e);
                LoadState::Failed(DETAIL_ERROR.to_string())
            }
        };
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

/// Saved jobs
#[derive(Debug, Clone)]
pub struct FavoritesScreen {
    pub jobs: LoadState<Vec<Job>>,
    pub selected: usize,
}

impl FavoritesScreen {
    pub fn new() -> Self {
        Self {
            jobs: LoadState::Loaded(Vec::new()),
            selected: 0,
        }
    }

    /// Returns whether a fetch is needed. No favorites means empty, no fetch.
    pub fn begin_load(&mut self, favorite_ids: &[u64]) -> bool {
        if favorite_ids.is_empty() {
            self.jobs = LoadState::Loaded(Vec::new());
            self.selected = 0;
            return false;
        }

        if self.jobs.items().is_empty() {
            self.jobs = LoadState::Loading;
        }
        true
    }

    /// Apply a fetch result, keeping only what is still a favorite
    pub fn finish_load(&mut self, result: Result<Vec<Job>>, favorite_ids: &[u64]) {
        self.jobs = match result {
            Ok(jobs) => LoadState::Loaded(
                jobs.into_iter()
                    .filter(|job| favorite_ids.contains(&job.id))
                    .collect(),
            ),
            Err(e) => {
                warn!("Loading favorites failed: {}", e);
                LoadState::Failed(FAVORITES_ERROR.to_string())
            }
        };
        self.clamp_selection();
    }

    /// Drop a row right away after unfavoriting
    pub fn remove(&mut self, job_id: u64) {
        if let LoadState::Loaded(jobs) = &mut self.jobs {
            jobs.retain(|job| job.id != job_id);
        }
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        self.selected = step_forward(self.selected, self.jobs.items().len());
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.jobs.items().get(self.selected)
    }

    fn clamp_selection(&mut self) {
        let len = self.jobs.items().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

impl Default for FavoritesScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn step_forward(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (selected + 1).min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: u64) -> Job {
        Job {
            id,
            title: format!("Job {}", id),
            company_name: "Acme".into(),
            company_logo: None,
            candidate_required_location: "Europe".into(),
            publication_date: "2024-05-01".into(),
            job_type: JobType::Contract,
            description: String::new(),
            url: String::new(),
            category: None,
            salary: None,
            tags: Vec::new(),
        }
    }

    fn category(id: u64, name: &str) -> Category {
        Category {
            id,
            name: name.into(),
        }
    }

    #[test]
    fn test_jobs_screen_states() {
        let mut screen = JobsScreen::new();
        assert!(screen.jobs.is_loading());

        screen.finish_load(Ok(vec![]));
        assert!(screen.jobs.is_empty_result());

        screen.begin_load();
        assert!(screen.jobs.is_loading());
        screen.finish_load(Err(Error::NetworkError("down".into())));
        assert_eq!(screen.jobs.error(), Some(JOBS_ERROR));

        // Retry from the error state
        screen.begin_load();
        assert!(screen.jobs.is_loading());
        screen.finish_load(Ok(vec![job(1), job(2)]));
        assert_eq!(screen.jobs.items().len(), 2);
    }

    #[test]
    fn test_refresh_keeps_list_visible() {
        let mut screen = JobsScreen::new();
        screen.finish_load(Ok(vec![job(1)]));

        screen.begin_load();
        assert!(screen.refreshing);
        assert_eq!(screen.jobs.items().len(), 1);

        screen.finish_load(Ok(vec![job(3), job(4)]));
        assert!(!screen.refreshing);
        assert_eq!(screen.selected_job().map(|j| j.id), Some(3));
    }

    #[test]
    fn test_filters_follow_pickers() {
        let mut screen = JobsScreen::new();
        screen.set_categories(Ok(vec![category(1, "Design"), category(2, "Writing")]));
        screen.search_input = "rust".into();

        screen.next_category();
        assert_eq!(screen.category.as_deref(), Some("Design"));
        screen.next_category();
        assert_eq!(screen.category.as_deref(), Some("Writing"));
        screen.next_category();
        assert_eq!(screen.category, None);

        screen.next_job_type();
        assert_eq!(screen.job_type, Some(JobType::FullTime));

        let filters = screen.filters();
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("search", "rust".to_string()),
                ("job_type", "full_time".to_string())
            ]
        );
    }

    #[test]
    fn test_job_type_cycle_wraps_to_all() {
        let mut screen = JobsScreen::new();
        for _ in 0..JobType::FILTERABLE.len() {
            screen.next_job_type();
        }
        assert_eq!(screen.job_type, Some(JobType::Internship));
        screen.next_job_type();
        assert_eq!(screen.job_type, None);
    }

    #[test]
    fn test_category_failure_leaves_picker_empty() {
        let mut screen = JobsScreen::new();
        screen.set_categories(Err(Error::NetworkError("nope".into())));
        assert!(screen.categories.is_empty());
        assert!(screen.jobs.is_loading());

        screen.next_category();
        assert_eq!(screen.category, None);
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut screen = JobsScreen::new();
        screen.select_next();
        assert_eq!(screen.selected, 0);

        screen.finish_load(Ok(vec![job(1), job(2)]));
        screen.select_next();
        screen.select_next();
        assert_eq!(screen.selected, 1);
        screen.select_previous();
        screen.select_previous();
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn test_detail_distinguishes_not_found() {
        let mut detail = DetailScreen::new(42);
        detail.finish_load(Err(Error::NotFound(42)));
        assert_eq!(detail.job.error(), Some(NOT_FOUND_MESSAGE));

        detail.begin_load();
        detail.finish_load(Err(Error::NetworkError("timeout".into())));
        assert_eq!(detail.job.error(), Some(DETAIL_ERROR));

        detail.begin_load();
        detail.finish_load(Ok(job(42)));
        assert_eq!(detail.job.loaded().map(|j| j.id), Some(42));
    }

    #[test]
    fn test_favorites_without_ids_skip_fetch() {
        let mut favorites = FavoritesScreen::new();
        assert!(!favorites.begin_load(&[]));
        assert!(favorites.jobs.is_empty_result());

        assert!(favorites.begin_load(&[1]));
        assert!(favorites.jobs.is_loading());
    }

    #[test]
    fn test_favorites_filter_and_remove() {
        let mut favorites = FavoritesScreen::new();
        favorites.begin_load(&[1, 3]);
        favorites.finish_load(Ok(vec![job(1), job(2), job(3)]), &[1, 3]);

        let ids: Vec<u64> = favorites.jobs.items().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 3]);

        favorites.select_next();
        favorites.remove(3);
        assert_eq!(favorites.selected, 0);
        assert_eq!(favorites.selected_job().map(|j| j.id), Some(1));
    }

    #[test]
    fn test_favorites_error_is_reported() {
        let mut favorites = FavoritesScreen::new();
        favorites.begin_load(&[1]);
        favorites.finish_load(Err(Error::NetworkError("down".into())), &[1]);
        assert_eq!(favorites.jobs.error(), Some(FAVORITES_ERROR));
    }
}
