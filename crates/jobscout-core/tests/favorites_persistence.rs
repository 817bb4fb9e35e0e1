use jobscout_core::{FavoritesStore, FAVORITES_KEY};
use jobscout_storage::KvStore;

#[test]
fn favorites_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("storage.db");

    {
        let mut store = FavoritesStore::load(KvStore::open(&db).unwrap());
        store.toggle(42);
        store.toggle(7);
        store.toggle(13);
        store.toggle(7);
    }

    let reloaded = FavoritesStore::load(KvStore::open(&db).unwrap());
    assert_eq!(reloaded.ids(), &[42, 13]);
    assert!(reloaded.is_favorite(13));
    assert!(!reloaded.is_favorite(7));
}

#[test]
fn snapshot_is_a_json_array_under_one_key() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("storage.db");

    {
        let mut store = FavoritesStore::load(KvStore::open(&db).unwrap());
        store.toggle(1);
        store.toggle(2);
    }

    let raw = KvStore::open(&db).unwrap().get(FAVORITES_KEY).unwrap();
    assert_eq!(raw.as_deref(), Some("[1,2]"));
}

#[test]
fn clearing_every_favorite_persists_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("storage.db");

    {
        let mut store = FavoritesStore::load(KvStore::open(&db).unwrap());
        store.toggle(5);
        store.toggle(5);
    }

    let reloaded = FavoritesStore::load(KvStore::open(&db).unwrap());
    assert!(reloaded.is_empty());
}

#[test]
fn corrupted_snapshot_falls_back_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("storage.db");

    KvStore::open(&db)
        .unwrap()
        .set(FAVORITES_KEY, "[1, \"two\"")
        .unwrap();

    let mut store = FavoritesStore::load(KvStore::open(&db).unwrap());
    assert!(store.is_empty());

    // And the next write replaces the bad value
    store.toggle(9);
    drop(store);
    let reloaded = FavoritesStore::load(KvStore::open(&db).unwrap());
    assert_eq!(reloaded.ids(), &[9]);
}
