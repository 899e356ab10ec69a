//! Board persistence: one snapshot entry per board key.
//!
//! Every committed mutation rewrites the whole snapshot. Loading never fails:
//! an absent, unreadable or corrupted entry yields an empty board.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::snapshot::BoardSnapshot;
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Reads and writes a board's snapshot in a key-value store.
pub struct BoardPersistence<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> BoardPersistence<S> {
    /// Persist under the storage key derived from `config`.
    pub fn new(store: S, config: &BoardConfig) -> Self {
        Self {
            store,
            key: config.storage_key(),
        }
    }

    /// The storage key this board is saved under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the saved board, or an empty one.
    ///
    /// `default_token_px` applies when there is nothing to load.
    pub fn load(&self, default_token_px: f64) -> Board {
        match self.store.get(&self.key) {
            Ok(Some(json)) => {
                let board = Board::from_snapshot(BoardSnapshot::decode(&json));
                log::info!("Loaded {} tokens from {}", board.len(), self.key);
                board
            }
            Ok(None) => Board::with_default_token_px(default_token_px),
            Err(e) => {
                log::warn!("Could not read saved board {}: {}", self.key, e);
                Board::with_default_token_px(default_token_px)
            }
        }
    }

    /// Write the full snapshot.
    pub fn save(&self, board: &Board) -> StorageResult<()> {
        let json = board
            .to_snapshot()
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(&self.key, &json)
    }

    /// Delete the saved entry.
    pub fn forget(&self) -> StorageResult<()> {
        self.store.remove(&self.key)
    }

    /// Get a reference to the storage backend.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::tools::ToolRegistry;

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io("quota".to_string()))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let config = BoardConfig::for_board("house1");
        let persistence = BoardPersistence::new(&store, &config);

        let registry = ToolRegistry::new().with_tool("engine", "/img/engine.png");
        let mut board = Board::new();
        board.create("engine", 20.0, 30.0, &registry).unwrap();
        board.create("engine", 40.0, 60.0, &registry).unwrap();
        persistence.save(&board).unwrap();

        assert!(store.get("fg.board.state.v1.house1").unwrap().is_some());

        let loaded = persistence.load(52.0);
        assert_eq!(loaded.tokens(), board.tokens());
        assert_eq!(loaded.next_id(), 3);
    }

    #[test]
    fn test_boards_are_scoped_by_key() {
        let store = MemoryStore::new();
        let registry = ToolRegistry::new().with_tool("engine", "/img/engine.png");

        let one = BoardPersistence::new(&store, &BoardConfig::for_board("one"));
        let two = BoardPersistence::new(&store, &BoardConfig::for_board("two"));

        let mut board = Board::new();
        board.create("engine", 20.0, 30.0, &registry).unwrap();
        one.save(&board).unwrap();

        assert_eq!(one.load(52.0).len(), 1);
        assert!(two.load(52.0).is_empty());
    }

    #[test]
    fn test_corrupted_entry_loads_empty() {
        let store = MemoryStore::new();
        let config = BoardConfig::default();
        store.set(&config.storage_key(), "{corrupted").unwrap();

        let board = BoardPersistence::new(&store, &config).load(52.0);
        assert!(board.is_empty());
        assert_eq!(board.next_id(), 1);
    }

    #[test]
    fn test_read_failure_loads_empty() {
        let board = BoardPersistence::new(FailingStore, &BoardConfig::default()).load(80.0);
        assert!(board.is_empty());
        assert_eq!(board.next_id(), 1);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let persistence = BoardPersistence::new(FailingStore, &BoardConfig::default());
        assert!(matches!(persistence.save(&Board::new()), Err(StorageError::Io(_))));
    }

    #[test]
    fn test_absent_entry_uses_configured_default_size() {
        let board = BoardPersistence::new(MemoryStore::new(), &BoardConfig::default()).load(70.0);
        assert!((board.default_token_px() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_forget() {
        let store = MemoryStore::new();
        let persistence = BoardPersistence::new(&store, &BoardConfig::default());
        persistence.save(&Board::new()).unwrap();
        persistence.forget().unwrap();
        assert_eq!(store.get(persistence.key()).unwrap(), None);
    }
}
