// TUI application state and event handling
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use jobscout_api::{Category, Job, JobFilters};
use jobscout_core::{
    DetailScreen, FavoritesScreen, FavoritesStore, JobsScreen, ScopeHandle, ScreenScope,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Jobs,
    Favorites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail, // job detail on top of the current tab's list
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating
    Searching, // Typing in the search box
}

/// Side effects the runner performs on behalf of the app
#[derive(Debug)]
pub enum Command {
    LoadJobs { filters: JobFilters, scope: ScopeHandle },
    LoadCategories,
    LoadJob { id: u64, scope: ScopeHandle },
    LoadFavorites { ids: Vec<u64>, scope: ScopeHandle },
    OpenUrl(String),
}

/// Finished fetches coming back from spawned tasks
#[derive(Debug)]
pub enum AppEvent {
    JobsLoaded {
        generation: u64,
        result: jobscout_core::Result<Vec<Job>>,
    },
    CategoriesLoaded(jobscout_core::Result<Vec<Category>>),
    JobLoaded {
        generation: u64,
        result: jobscout_core::Result<Job>,
    },
    FavoritesLoaded {
        generation: u64,
        result: jobscout_core::Result<Vec<Job>>,
    },
}

pub struct App {
    pub should_quit: bool,
    pub tab: Tab,
    pub view: View,
    pub input_mode: InputMode,
    pub jobs: JobsScreen,
    pub saved: FavoritesScreen,
    pub detail: Option<DetailScreen>,
    pub favorites: FavoritesStore,
    pub status_message: Option<String>,
    jobs_scope: ScreenScope,
    saved_scope: ScreenScope,
    detail_scope: ScreenScope,
    // Favorites changed since the saved list was last loaded
    saved_stale: bool,
}

impl App {
    pub fn new(favorites: FavoritesStore) -> Self {
        Self {
            should_quit: false,
            tab: Tab::Jobs,
            view: View::List,
            input_mode: InputMode::Normal,
            jobs: JobsScreen::new(),
            saved: FavoritesScreen::new(),
            detail: None,
            favorites,
            status_message: None,
            jobs_scope: ScreenScope::new(),
            saved_scope: ScreenScope::new(),
            detail_scope: ScreenScope::new(),
            saved_stale: true,
        }
    }

    /// Initial fetches for the jobs screen
    pub fn start(&mut self) -> Vec<Command> {
        vec![Command::LoadCategories, self.load_jobs()]
    }

    pub fn quit(&mut self) {
        self.jobs_scope.cancel();
        self.saved_scope.cancel();
        self.detail_scope.cancel();
        self.should_quit = true;
    }

    pub fn is_favorite(&self, job_id: u64) -> bool {
        self.favorites.is_favorite(job_id)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return Vec::new();
        }

        match self.input_mode {
            InputMode::Searching => self.handle_search_key(key),
            InputMode::Normal => match self.view {
                View::List => self.handle_list_key(key),
                View::Detail => self.handle_detail_key(key),
            },
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                vec![self.load_jobs()]
            }
            KeyCode::Char(c) => {
                self.jobs.search_input.push(c);
                Vec::new()
            }
            KeyCode::Backspace => {
                self.jobs.search_input.pop();
                Vec::new()
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                Vec::new()
            }
            KeyCode::Tab => {
                let next = match self.tab {
                    Tab::Jobs => Tab::Favorites,
                    Tab::Favorites => Tab::Jobs,
                };
                self.select_tab(next)
            }
            KeyCode::Char('1') => self.select_tab(Tab::Jobs),
            KeyCode::Char('2') => self.select_tab(Tab::Favorites),
            KeyCode::Char('j') | KeyCode::Down => {
                match self.tab {
                    Tab::Jobs => self.jobs.select_next(),
                    Tab::Favorites => self.saved.select_next(),
                }
                Vec::new()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                match self.tab {
                    Tab::Jobs => self.jobs.select_previous(),
                    Tab::Favorites => self.saved.select_previous(),
                }
                Vec::new()
            }
            KeyCode::Enter => self.open_detail(),
            KeyCode::Char('f') => {
                self.toggle_favorite();
                Vec::new()
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('/') if self.tab == Tab::Jobs => {
                self.input_mode = InputMode::Searching;
                Vec::new()
            }
            KeyCode::Char('c') if self.tab == Tab::Jobs => {
                self.jobs.next_category();
                vec![self.load_jobs()]
            }
            KeyCode::Char('t') if self.tab == Tab::Jobs => {
                self.jobs.next_job_type();
                vec![self.load_jobs()]
            }
            KeyCode::Char('x') if self.tab == Tab::Jobs => {
                self.jobs.search_input.clear();
                self.jobs.category = None;
                self.jobs.job_type = None;
                vec![self.load_jobs()]
            }
            _ => Vec::new(),
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
                self.close_detail()
            }
            KeyCode::Tab => {
                let next = match self.tab {
                    Tab::Jobs => Tab::Favorites,
                    Tab::Favorites => Tab::Jobs,
                };
                self.select_tab(next)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.scroll_down();
                }
                Vec::new()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.scroll_up();
                }
                Vec::new()
            }
            KeyCode::Char('f') => {
                self.toggle_favorite();
                Vec::new()
            }
            KeyCode::Char('o') | KeyCode::Enter => self
                .detail
                .as_ref()
                .and_then(|d| d.job.loaded())
                .map(|job| vec![Command::OpenUrl(job.url.clone())])
                .unwrap_or_default(),
            KeyCode::Char('r') => self.refresh(),
            _ => Vec::new(),
        }
    }

    pub fn select_tab(&mut self, tab: Tab) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.view == View::Detail {
            self.detail_scope.cancel();
            self.detail = None;
            self.view = View::List;
        }

        self.input_mode = InputMode::Normal;
        self.tab = tab;

        if tab == Tab::Favorites && self.saved_stale {
            commands.extend(self.load_saved());
        }
        commands
    }

    pub fn open_detail(&mut self) -> Vec<Command> {
        let selected = match self.tab {
            Tab::Jobs => self.jobs.selected_job(),
            Tab::Favorites => self.saved.selected_job(),
        };
        let Some(id) = selected.map(|job| job.id) else {
            return Vec::new();
        };

        let mut detail = DetailScreen::new(id);
        detail.begin_load();
        self.detail = Some(detail);
        self.view = View::Detail;

        vec![Command::LoadJob {
            id,
            scope: self.detail_scope.renew(),
        }]
    }

    pub fn close_detail(&mut self) -> Vec<Command> {
        self.detail_scope.cancel();
        self.detail = None;
        self.view = View::List;

        if self.tab == Tab::Favorites && self.saved_stale {
            self.load_saved()
        } else {
            Vec::new()
        }
    }

    /// Toggle the job under the cursor (or the one on the detail screen)
    pub fn toggle_favorite(&mut self) {
        let target = match (self.view, self.tab) {
            (View::Detail, _) => self.detail.as_ref().map(|d| d.job_id),
            (View::List, Tab::Jobs) => self.jobs.selected_job().map(|j| j.id),
            (View::List, Tab::Favorites) => self.saved.selected_job().map(|j| j.id),
        };
        let Some(id) = target else {
            return;
        };

        let now_favorite = self.favorites.toggle(id);
        self.status_message = Some(if now_favorite {
            format!("Saved job #{}", id)
        } else {
            format!("Removed job #{} from favorites", id)
        });

        if self.view == View::List && self.tab == Tab::Favorites && !now_favorite {
            // The visible list already matches the new favorite set
            self.saved.remove(id);
        } else {
            self.saved_stale = true;
        }
    }

    pub fn refresh(&mut self) -> Vec<Command> {
        match (self.view, self.tab) {
            (View::List, Tab::Jobs) => vec![self.load_jobs()],
            (View::List, Tab::Favorites) => self.load_saved(),
            (View::Detail, _) => {
                let Some(detail) = self.detail.as_mut() else {
                    return Vec::new();
                };
                detail.begin_load();
                vec![Command::LoadJob {
                    id: detail.job_id,
                    scope: self.detail_scope.renew(),
                }]
            }
        }
    }

    /// Fold a finished fetch into screen state, unless its screen moved on
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::JobsLoaded { generation, result } => {
                if self.jobs_scope.is_current(generation) {
                    self.jobs.finish_load(result);
                } else {
                    debug!("Dropping stale jobs result (generation {})", generation);
                }
            }
            AppEvent::CategoriesLoaded(result) => self.jobs.set_categories(result),
            AppEvent::JobLoaded { generation, result } => {
                match self.detail.as_mut() {
                    Some(detail) if self.detail_scope.is_current(generation) => {
                        detail.finish_load(result)
                    }
                    _ => debug!("Dropping stale job result (generation {})", generation),
                }
            }
            AppEvent::FavoritesLoaded { generation, result } => {
                if self.saved_scope.is_current(generation) {
                    self.saved.finish_load(result, self.favorites.ids());
                } else {
                    debug!("Dropping stale favorites result (generation {})", generation);
                }
            }
        }
    }

    fn load_jobs(&mut self) -> Command {
        self.jobs.begin_load();
        Command::LoadJobs {
            filters: self.jobs.filters(),
            scope: self.jobs_scope.renew(),
        }
    }

    fn load_saved(&mut self) -> Vec<Command> {
        self.saved_stale = false;
        if self.saved.begin_load(self.favorites.ids()) {
            vec![Command::LoadFavorites {
                ids: self.favorites.ids().to_vec(),
                scope: self.saved_scope.renew(),
            }]
        } else {
            self.saved_scope.cancel();
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobscout_api::JobType;
    use jobscout_core::Error;
    use jobscout_storage::KvStore;

    fn app() -> App {
        App::new(FavoritesStore::load(KvStore::in_memory().unwrap()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, c: char) -> Vec<Command> {
        app.handle_key(key(KeyCode::Char(c)))
    }

    fn job(id: u64) -> Job {
        Job {
            id,
            title: format!("Job {}", id),
            company_name: "Acme".into(),
            company_logo: None,
            candidate_required_location: "Worldwide".into(),
            publication_date: "2024-05-01T09:00:00".into(),
            job_type: JobType::FullTime,
            description: "<p>Hi</p>".into(),
            url: format!("https://remotive.com/remote-jobs/{}", id),
            category: None,
            salary: None,
            tags: Vec::new(),
        }
    }

    fn jobs_generation(commands: &[Command]) -> u64 {
        commands
            .iter()
            .find_map(|c| match c {
                Command::LoadJobs { scope, .. } => Some(scope.generation()),
                _ => None,
            })
            .expect("a LoadJobs command")
    }

    fn loaded_app(ids: &[u64]) -> App {
        let mut app = app();
        let commands = app.start();
        let generation = jobs_generation(&commands);
        app.apply(AppEvent::JobsLoaded {
            generation,
            result: Ok(ids.iter().map(|id| job(*id)).collect()),
        });
        app
    }

    #[test]
    fn test_start_loads_categories_and_jobs() {
        let mut app = app();
        let commands = app.start();

        assert!(matches!(commands[0], Command::LoadCategories));
        assert!(matches!(
            &commands[1],
            Command::LoadJobs { filters, .. } if filters.is_empty()
        ));
        assert!(app.jobs.jobs.is_loading());
    }

    #[test]
    fn test_stale_jobs_result_is_dropped() {
        let mut app = app();
        let first = jobs_generation(&app.start());
        let second = jobs_generation(&press(&mut app, 't'));
        assert_ne!(first, second);

        app.apply(AppEvent::JobsLoaded {
            generation: first,
            result: Ok(vec![job(1)]),
        });
        assert!(app.jobs.jobs.is_loading());

        app.apply(AppEvent::JobsLoaded {
            generation: second,
            result: Ok(vec![job(2)]),
        });
        assert_eq!(app.jobs.selected_job().map(|j| j.id), Some(2));
    }

    #[test]
    fn test_search_submits_filtered_load() {
        let mut app = loaded_app(&[1]);

        press(&mut app, '/');
        assert_eq!(app.input_mode, InputMode::Searching);
        for c in "rust".chars() {
            press(&mut app, c);
        }
        let commands = app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        match &commands[0] {
            Command::LoadJobs { filters, .. } => {
                assert_eq!(filters.search.as_deref(), Some("rust"))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_error_then_retry() {
        let mut app = app();
        let generation = jobs_generation(&app.start());
        app.apply(AppEvent::JobsLoaded {
            generation,
            result: Err(Error::NetworkError("503".into())),
        });
        assert!(app.jobs.jobs.error().is_some());

        let retry = press(&mut app, 'r');
        assert!(matches!(retry[0], Command::LoadJobs { .. }));
        assert!(app.jobs.jobs.is_loading());
    }

    #[test]
    fn test_open_detail_and_back_cancels_fetch() {
        let mut app = loaded_app(&[7, 8]);
        app.handle_key(key(KeyCode::Down));

        let commands = app.handle_key(key(KeyCode::Enter));
        let scope = match &commands[0] {
            Command::LoadJob { id, scope } => {
                assert_eq!(*id, 8);
                scope.clone()
            }
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(app.view, View::Detail);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view, View::List);
        assert!(scope.is_cancelled());

        // A result arriving after leaving is ignored
        app.apply(AppEvent::JobLoaded {
            generation: scope.generation(),
            result: Ok(job(8)),
        });
        assert!(app.detail.is_none());
    }

    #[test]
    fn test_detail_not_found_and_open_url() {
        let mut app = loaded_app(&[7]);
        let commands = app.handle_key(key(KeyCode::Enter));
        let generation = match &commands[0] {
            Command::LoadJob { scope, .. } => scope.generation(),
            other => panic!("unexpected command {:?}", other),
        };

        // Nothing to open until the job is loaded
        assert!(press(&mut app, 'o').is_empty());

        app.apply(AppEvent::JobLoaded {
            generation,
            result: Err(Error::NotFound(7)),
        });
        assert_eq!(
            app.detail.as_ref().and_then(|d| d.job.error()),
            Some(jobscout_core::screens::NOT_FOUND_MESSAGE)
        );

        let generation = match &press(&mut app, 'r')[0] {
            Command::LoadJob { scope, .. } => scope.generation(),
            other => panic!("unexpected command {:?}", other),
        };
        app.apply(AppEvent::JobLoaded {
            generation,
            result: Ok(job(7)),
        });

        let open = press(&mut app, 'o');
        assert!(matches!(&open[0], Command::OpenUrl(url) if url.ends_with("/7")));
    }

    #[test]
    fn test_empty_favorites_tab_needs_no_fetch() {
        let mut app = app();
        let commands = app.select_tab(Tab::Favorites);

        assert!(commands.is_empty());
        assert!(app.saved.jobs.is_empty_result());
    }

    #[test]
    fn test_favorite_from_list_shows_on_favorites_tab() {
        let mut app = loaded_app(&[1, 2, 3]);
        app.handle_key(key(KeyCode::Down));
        press(&mut app, 'f');
        assert!(app.is_favorite(2));

        let commands = press(&mut app, '2');
        let generation = match &commands[0] {
            Command::LoadFavorites { ids, scope } => {
                assert_eq!(ids, &vec![2]);
                scope.generation()
            }
            other => panic!("unexpected command {:?}", other),
        };

        app.apply(AppEvent::FavoritesLoaded {
            generation,
            result: Ok(vec![job(1), job(2), job(3)]),
        });
        let ids: Vec<u64> = app.saved.jobs.items().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2]);

        // Coming back without changes does not refetch
        press(&mut app, '1');
        assert!(press(&mut app, '2').is_empty());
    }

    #[test]
    fn test_unfavorite_on_favorites_tab_removes_row() {
        let mut app = loaded_app(&[4]);
        press(&mut app, 'f');

        let commands = press(&mut app, '2');
        let generation = match &commands[0] {
            Command::LoadFavorites { scope, .. } => scope.generation(),
            other => panic!("unexpected command {:?}", other),
        };
        app.apply(AppEvent::FavoritesLoaded {
            generation,
            result: Ok(vec![job(4)]),
        });

        press(&mut app, 'f');
        assert!(!app.is_favorite(4));
        assert!(app.saved.jobs.is_empty_result());
    }

    #[test]
    fn test_ctrl_c_quits_even_while_searching() {
        let mut app = app();
        press(&mut app, '/');
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
