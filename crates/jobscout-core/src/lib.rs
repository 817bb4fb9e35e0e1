// Core logic: favorites, job lookup, screen state and config
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod scope;
pub mod screens;

pub use catalog::{DetailLookup, JobCatalog, JobSource};
pub use config::Config;
pub use error::Error;
pub use favorites::{FavoritesStore, KeyValueStorage, FAVORITES_KEY};
pub use scope::{ScopeHandle, ScreenScope};
pub use screens::{DetailScreen, FavoritesScreen, JobsScreen, LoadState};

pub type Result<T> = std::result::Result<T, Error>;
