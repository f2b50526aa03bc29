//! JSON file storage backend
//!
//! One human-readable file per seeker and circle level:
//! `seeker_{id}_circle_{level}.json`, plus `seeker_{id}_summary.json` and
//! `seeker_{id}_graph.json`.

use crate::error::StorageResult;
use crate::traits::{sanitize_key, CircleStore};
use async_trait::async_trait;
use proximity_core::{AuthorId, CircleResult, RunSummary, SocialGraph};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directory of pretty-printed JSON files
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn circle_path(&self, seeker: &AuthorId, level: u32) -> PathBuf {
        self.dir
            .join(format!("seeker_{}_circle_{}.json", sanitize_key(seeker), level))
    }

    pub fn summary_path(&self, seeker: &AuthorId) -> PathBuf {
        self.dir
            .join(format!("seeker_{}_summary.json", sanitize_key(seeker)))
    }

    pub fn graph_path(&self, seeker: &AuthorId) -> PathBuf {
        self.dir
            .join(format!("seeker_{}_graph.json", sanitize_key(seeker)))
    }

    /// Write via a temp file and rename so a crash never leaves a partial file
    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> StorageResult<()> {
        let content = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, path).await?;

        tracing::debug!("Wrote {} bytes to {:?}", content.len(), path);
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> StorageResult<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(content) => Ok(Some(serde_json::from_slice(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CircleStore for JsonFileStore {
    async fn save_circle(&self, seeker: &AuthorId, circle: &CircleResult) -> StorageResult<()> {
        let path = self.circle_path(seeker, circle.level());
        self.write_json(&path, circle).await?;
        tracing::info!("Circle {} for {} stored at {:?}", circle.level(), seeker, path);
        Ok(())
    }

    async fn load_circle(
        &self,
        seeker: &AuthorId,
        level: u32,
    ) -> StorageResult<Option<CircleResult>> {
        self.read_json(&self.circle_path(seeker, level)).await
    }

    async fn list_levels(&self, seeker: &AuthorId) -> StorageResult<Vec<u32>> {
        let prefix = format!("seeker_{}_circle_", sanitize_key(seeker));
        let mut levels = Vec::new();

        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let level = name
                .to_str()
                .and_then(|n| n.strip_prefix(&prefix))
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|n| n.parse::<u32>().ok());
            if let Some(level) = level {
                levels.push(level);
            }
        }

        levels.sort_unstable();
        Ok(levels)
    }

    async fn save_summary(&self, summary: &RunSummary) -> StorageResult<()> {
        self.write_json(&self.summary_path(&summary.seeker), summary)
            .await
    }

    async fn load_summary(&self, seeker: &AuthorId) -> StorageResult<Option<RunSummary>> {
        self.read_json(&self.summary_path(seeker)).await
    }

    async fn save_graph(&self, seeker: &AuthorId, graph: &SocialGraph) -> StorageResult<()> {
        self.write_json(&self.graph_path(seeker), graph).await
    }

    async fn load_graph(&self, seeker: &AuthorId) -> StorageResult<Option<SocialGraph>> {
        self.read_json(&self.graph_path(seeker)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proximity_core::{Author, CircleStats, Paper};
    use tempfile::tempdir;

    fn first_circle() -> CircleResult {
        let seeker = Author::new("S")
            .with_paper(Paper::new("P1").with_authors(["S", "A", "B"]))
            .with_paper(Paper::new("P2").with_authors(["S", "B", "C"]));
        CircleResult::from_seeker(&seeker)
    }

    #[tokio::test]
    async fn test_circle_files() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let seeker: AuthorId = "2112355103".into();

        store.save_circle(&seeker, &first_circle()).await.unwrap();
        store
            .save_circle(&seeker, &CircleResult::expanded(2, vec!["D".into(), "E".into()]))
            .await
            .unwrap();

        let path = dir.path().join("seeker_2112355103_circle_1.json");
        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["P1"], serde_json::json!(["A", "B"]));

        let level2 = std::fs::read_to_string(dir.path().join("seeker_2112355103_circle_2.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&level2).unwrap();
        assert_eq!(value["Level-2"], serde_json::json!(["D", "E"]));

        assert_eq!(store.list_levels(&seeker).await.unwrap(), vec![1, 2]);
        assert_eq!(
            store.load_circle(&seeker, 1).await.unwrap(),
            Some(first_circle())
        );
        assert!(store.load_circle(&seeker, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_keeps_other_levels() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let seeker: AuthorId = "S".into();

        store.save_circle(&seeker, &first_circle()).await.unwrap();
        store
            .save_circle(&seeker, &CircleResult::expanded(2, vec!["D".into()]))
            .await
            .unwrap();
        store
            .save_circle(&seeker, &CircleResult::expanded(2, vec!["E".into()]))
            .await
            .unwrap();

        let level2 = store.load_circle(&seeker, 2).await.unwrap().unwrap();
        assert!(level2.contains(&"E".into()));
        assert!(!level2.contains(&"D".into()));
        assert_eq!(store.load_circle(&seeker, 1).await.unwrap(), Some(first_circle()));
        assert!(!dir.path().join("seeker_S_circle_2.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_summary_and_graph() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested")).unwrap();
        let seeker: AuthorId = "S".into();

        assert!(store.load_summary(&seeker).await.unwrap().is_none());

        let mut summary = RunSummary::start(seeker.clone());
        summary.record(CircleStats::new(1));
        summary.finish();
        store.save_summary(&summary).await.unwrap();

        let loaded = store.load_summary(&seeker).await.unwrap().unwrap();
        assert_eq!(loaded.run_id, summary.run_id);
        assert!(loaded.is_empty_run());

        let mut graph = SocialGraph::new();
        graph.merge_circle(&seeker, &first_circle());
        store.save_graph(&seeker, &graph).await.unwrap();
        assert_eq!(store.load_graph(&seeker).await.unwrap(), Some(graph));
    }

    #[tokio::test]
    async fn test_similar_ids_get_separate_files() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let dotted: AuthorId = "a.b".into();
        let underscored: AuthorId = "a_b".into();

        store
            .save_circle(&dotted, &CircleResult::expanded(2, vec!["D".into()]))
            .await
            .unwrap();
        store
            .save_circle(&underscored, &CircleResult::expanded(2, vec!["E".into()]))
            .await
            .unwrap();

        let level2 = store.load_circle(&dotted, 2).await.unwrap().unwrap();
        assert!(level2.contains(&"D".into()));
        assert!(!level2.contains(&"E".into()));
        assert!(dir.path().join("seeker_a_2eb_circle_2.json").exists());
        assert!(dir.path().join("seeker_a_5fb_circle_2.json").exists());
    }
}
