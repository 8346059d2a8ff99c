use crate::domain::ports::CartStorage;
use crate::error::Result;
use rocksdb::{DB, Options};
use std::path::Path;
use std::sync::Arc;

/// A persistent key-value store implementation using RocksDB.
///
/// The cart lives under a single key, so the default column family is enough.
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbStorage {
    db: Arc<DB>,
}

impl RocksDbStorage {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl CartStorage for RocksDbStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.put(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.delete(key.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rocksdb_set_get_remove() {
        let dir = tempdir().unwrap();
        let storage = RocksDbStorage::open(dir.path()).expect("Failed to open RocksDB");

        assert!(storage.get("cart-items").unwrap().is_none());
        storage.set("cart-items", "[]").unwrap();
        assert_eq!(storage.get("cart-items").unwrap().as_deref(), Some("[]"));
        storage.remove("cart-items").unwrap();
        assert!(storage.get("cart-items").unwrap().is_none());
    }

    #[test]
    fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let storage = RocksDbStorage::open(dir.path()).unwrap();
            storage.set("cart-items", "[{\"id\":\"c1\"}]").unwrap();
        }
        let storage = RocksDbStorage::open(dir.path()).unwrap();
        assert_eq!(
            storage.get("cart-items").unwrap().as_deref(),
            Some("[{\"id\":\"c1\"}]")
        );
    }
}
