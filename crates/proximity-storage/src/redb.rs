//! ReDB storage backend

use crate::error::{StorageError, StorageResult};
use crate::traits::CircleStore;
use async_trait::async_trait;
use proximity_core::{AuthorId, CircleResult, RunSummary, SocialGraph};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;

type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

// Table definitions
const CIRCLES: TableDefinition<&str, &[u8]> = TableDefinition::new("circles");
const SUMMARIES: TableDefinition<&str, &[u8]> = TableDefinition::new("summaries");
const GRAPHS: TableDefinition<&str, &[u8]> = TableDefinition::new("graphs");

/// ReDB storage backend
///
/// Single-file alternative to [`crate::JsonFileStore`]; values are the
/// same JSON documents.
pub struct RedbStore {
    db: Mutex<Database>,
}

impl RedbStore {
    /// Open or create a ReDB database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(CIRCLES)?;
            write_txn.open_table(SUMMARIES)?;
            write_txn.open_table(GRAPHS)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Mutex::new(db) })
    }

    fn make_circle_key(seeker: &AuthorId, level: u32) -> String {
        format!("{}:{}", seeker, level)
    }

    fn put<T: Serialize + ?Sized>(
        &self,
        table_def: JsonTable,
        key: &str,
        value: &T,
    ) -> StorageResult<()> {
        let value = serde_json::to_vec(value)?;

        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_def)?;
            table.insert(key, value.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    fn get<T: DeserializeOwned>(
        &self,
        table_def: JsonTable,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(table_def)?;

        if let Some(value) = table.get(key)? {
            Ok(Some(serde_json::from_slice(value.value())?))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl CircleStore for RedbStore {
    async fn save_circle(&self, seeker: &AuthorId, circle: &CircleResult) -> StorageResult<()> {
        let key = Self::make_circle_key(seeker, circle.level());
        self.put(CIRCLES, &key, circle)?;
        tracing::info!("Circle {} for {} stored in redb", circle.level(), seeker);
        Ok(())
    }

    async fn load_circle(
        &self,
        seeker: &AuthorId,
        level: u32,
    ) -> StorageResult<Option<CircleResult>> {
        self.get(CIRCLES, &Self::make_circle_key(seeker, level))
    }

    async fn list_levels(&self, seeker: &AuthorId) -> StorageResult<Vec<u32>> {
        let prefix = format!("{}:", seeker);

        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(CIRCLES)?;

        let mut levels = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            if let Some(level) = key
                .value()
                .strip_prefix(&prefix)
                .and_then(|l| l.parse::<u32>().ok())
            {
                levels.push(level);
            }
        }

        levels.sort_unstable();
        Ok(levels)
    }

    async fn save_summary(&self, summary: &RunSummary) -> StorageResult<()> {
        self.put(SUMMARIES, summary.seeker.as_str(), summary)
    }

    async fn load_summary(&self, seeker: &AuthorId) -> StorageResult<Option<RunSummary>> {
        self.get(SUMMARIES, seeker.as_str())
    }

    async fn save_graph(&self, seeker: &AuthorId, graph: &SocialGraph) -> StorageResult<()> {
        self.put(GRAPHS, seeker.as_str(), graph)?;
        tracing::debug!(
            "Saved graph for {} ({} nodes, {} edges)",
            seeker,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(())
    }

    async fn load_graph(&self, seeker: &AuthorId) -> StorageResult<Option<SocialGraph>> {
        self.get(GRAPHS, seeker.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proximity_core::{Author, Paper};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_redb_store() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.redb");
        let store = RedbStore::open(&db_path).unwrap();
        let seeker: AuthorId = "S".into();

        let seeker_record =
            Author::new("S").with_paper(Paper::new("P1").with_authors(["S", "A", "B"]));
        let first = CircleResult::from_seeker(&seeker_record);
        store.save_circle(&seeker, &first).await.unwrap();
        store
            .save_circle(&seeker, &CircleResult::expanded(2, vec!["D".into()]))
            .await
            .unwrap();
        store
            .save_circle(&"S2".into(), &CircleResult::empty_first())
            .await
            .unwrap();

        assert_eq!(store.list_levels(&seeker).await.unwrap(), vec![1, 2]);
        assert_eq!(store.load_circle(&seeker, 1).await.unwrap(), Some(first.clone()));

        let mut graph = SocialGraph::new();
        graph.merge_circle(&seeker, &first);
        store.save_graph(&seeker, &graph).await.unwrap();
        assert_eq!(store.load_graph(&seeker).await.unwrap(), Some(graph));
        assert!(store.load_summary(&seeker).await.unwrap().is_none());
    }

    #[test]
    fn test_open_reports_database_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened as a database file
        let result = RedbStore::open(dir.path());
        assert!(matches!(result, Err(StorageError::RedbDatabase(_))));
    }
}
