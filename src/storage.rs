use std::path::{Path, PathBuf};

use std::io::Write;
use thiserror::Error;

use crate::types::IdeaData;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Template file missing: {0}")]
    TemplateMissing(PathBuf),
}

/// Storage seam for the idea collection. The file-backed implementation is
/// used in production; tests substitute [`MemoryStore`].
pub trait IdeaStore: Send {
    fn load(&mut self) -> impl Future<Output = Result<IdeaData, StorageError>> + Send;
    fn save(&mut self, data: &IdeaData) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// JSON-file-backed store. The first `load` copies the template dataset into
/// place when the data file does not exist yet.
pub struct FileStore {
    data_path: PathBuf,
    template_path: PathBuf,
}

impl FileStore {
    pub fn new(data_path: PathBuf, template_path: PathBuf) -> Self {
        Self {
            data_path,
            template_path,
        }
    }

    /// Default data location under the user's home directory.
    pub fn default_data_path() -> PathBuf {
        let home = dirs::home_dir().expect("couldn't find home dir");
        home.join(".pick-a-date").join("date-ideas.json")
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Copy the template dataset over the data file. `overwrite` is only set
    /// by the explicit `seed --force` CLI path.
    pub fn seed_from_template(&self, overwrite: bool) -> Result<bool, StorageError> {
        if self.data_path.exists() && !overwrite {
            return Ok(false);
        }
        if !self.template_path.exists() {
            return Err(StorageError::TemplateMissing(self.template_path.clone()));
        }
        if let Some(parent) = self.data_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&self.template_path, &self.data_path)?;
        Ok(true)
    }
}

impl IdeaStore for FileStore {
    async fn load(&mut self) -> Result<IdeaData, StorageError> {
        let data_path = self.data_path.clone();
        let template_path = self.template_path.clone();
        tokio::task::spawn_blocking(move || -> Result<IdeaData, StorageError> {
            if !data_path.exists() {
                if !template_path.exists() {
                    return Err(StorageError::TemplateMissing(template_path));
                }
                if let Some(parent) = data_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(&template_path, &data_path)?;
            }
            let contents = std::fs::read_to_string(&data_path)?;
            Ok(serde_json::from_str(&contents)?)
        })
        .await
        .map_err(|e| StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}"))))?
    }

    /// Persist via a temporary file and an atomic rename to avoid partial
    /// writes.
    async fn save(&mut self, data: &IdeaData) -> Result<(), StorageError> {
        let data_path = self.data_path.clone();
        let data = data.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            if let Some(parent) = data_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let temp = data_path.with_extension("tmp");
            let mut f = std::fs::File::create(&temp)?;
            let content = serde_json::to_string_pretty(&data)?;
            f.write_all(content.as_bytes())?;
            f.sync_all()?;
            std::fs::rename(temp, &data_path)?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::Io(std::io::Error::other(format!("spawn_blocking failed: {e}"))))?
    }
}

/// In-memory fake for tests.
#[derive(Default)]
pub struct MemoryStore {
    data: IdeaData,
}

impl MemoryStore {
    pub fn new(data: IdeaData) -> Self {
        Self { data }
    }
}

impl IdeaStore for MemoryStore {
    async fn load(&mut self) -> Result<IdeaData, StorageError> {
        Ok(self.data.clone())
    }

    async fn save(&mut self, data: &IdeaData) -> Result<(), StorageError> {
        self.data = data.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Idea;

    fn template_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("template.json");
        std::fs::write(
            &path,
            r#"{"ideas":[{"id":"1","idea":"Picnic","lastShown":null,"lastCompleted":null}]}"#,
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn load_bootstraps_from_template_when_data_file_absent() {
        let dir = tempfile::tempdir().unwrap();
        let template = template_file(&dir);
        let data_path = dir.path().join("nested").join("data.json");
        let mut store = FileStore::new(data_path.clone(), template);

        let data = store.load().await.unwrap();
        assert_eq!(data.ideas.len(), 1);
        assert_eq!(data.ideas[0].idea, "Picnic");
        assert!(data_path.exists());
    }

    #[tokio::test]
    async fn load_fails_when_template_also_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(
            dir.path().join("data.json"),
            dir.path().join("missing-template.json"),
        );
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StorageError::TemplateMissing(_)));
    }

    #[tokio::test]
    async fn save_then_load_round_trips_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = template_file(&dir);
        let data_path = dir.path().join("data.json");
        let mut store = FileStore::new(data_path.clone(), template);

        let mut data = store.load().await.unwrap();
        data.ideas.push(Idea::new("2".into(), "Go stargazing".into()));
        store.save(&data).await.unwrap();

        assert!(!data_path.with_extension("tmp").exists());
        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, data);
    }

    #[tokio::test]
    async fn seed_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let template = template_file(&dir);
        let data_path = dir.path().join("data.json");
        std::fs::write(&data_path, r#"{"ideas":[]}"#).unwrap();

        let store = FileStore::new(data_path.clone(), template);
        assert!(!store.seed_from_template(false).unwrap());
        assert!(store.seed_from_template(true).unwrap());

        let contents = std::fs::read_to_string(&data_path).unwrap();
        assert!(contents.contains("Picnic"));
    }
}
