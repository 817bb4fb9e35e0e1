use jobscout_storage::KvStore;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Storage key holding the favorites snapshot
pub const FAVORITES_KEY: &str = "favorite-jobs";

/// Minimal string key-value interface the favorites store persists through
pub trait KeyValueStorage: Send {
    fn get_item(&self, key: &str) -> crate::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> crate::Result<()>;
}

impl KeyValueStorage for KvStore {
    fn get_item(&self, key: &str) -> crate::Result<Option<String>> {
        Ok(self.get(key)?)
    }

    fn set_item(&self, key: &str, value: &str) -> crate::Result<()> {
        Ok(self.set(key, value)?)
    }
}

/// What we accept when reading the snapshot back: a bare array, or the
/// `{"state":{"favoriteIds":[..]},"version":0}` envelope the mobile app wrote.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFavorites {
    Ids(Vec<u64>),
    Envelope { state: PersistedState },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    favorite_ids: Vec<u64>,
}

/// Favorite job ids, kept in memory and mirrored to storage.
///
/// Order is insertion order and ids are never duplicated. Every toggle
/// writes the full list back.
pub struct FavoritesStore {
    ids: Vec<u64>,
    storage: Box<dyn KeyValueStorage>,
}

impl FavoritesStore {
    /// Read the stored snapshot. Missing or unreadable data starts empty.
    pub fn load(storage: impl KeyValueStorage + 'static) -> Self {
        let ids = match storage.get_item(FAVORITES_KEY) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => {
                debug!("No stored favorites, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!("Could not read favorites, starting empty: {}", e);
                Vec::new()
            }
        };

        info!("Loaded {} favorite jobs", ids.len());
        Self {
            ids,
            storage: Box::new(storage),
        }
    }

    /// Flip membership of `job_id`; returns whether it is now a favorite.
    ///
    /// A failed write is logged and the in-memory change stands.
    pub fn toggle(&mut self, job_id: u64) -> bool {
        let now_favorite = match self.ids.iter().position(|id| *id == job_id) {
            Some(pos) => {
                self.ids.remove(pos);
                false
            }
            None => {
                self.ids.push(job_id);
                true
            }
        };

        if let Err(e) = self.persist() {
            warn!("Failed to persist favorites after toggling {}: {}", job_id, e);
        }

        now_favorite
    }

    pub fn is_favorite(&self, job_id: u64) -> bool {
        self.ids.contains(&job_id)
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) -> crate::Result<()> {
        let snapshot = serde_json::to_string(&self.ids)?;
        self.storage.set_item(FAVORITES_KEY, &snapshot)
    }
}

fn decode(raw: &str) -> Vec<u64> {
    let ids = match serde_json::from_str::<StoredFavorites>(raw) {
        Ok(StoredFavorites::Ids(ids)) => ids,
        Ok(StoredFavorites::Envelope { state }) => state.favorite_ids,
        Err(e) => {
            warn!("Stored favorites are unreadable, starting empty: {}", e);
            return Vec::new();
        }
    };

    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
