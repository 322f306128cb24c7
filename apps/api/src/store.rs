//! File-backed project store.
//!
//! The whole store lives in one JSON document shaped as
//! `{"projects": {<id>: <record>}}`. Every read loads the full document and
//! every write rewrites it. Writes go to a temp file in the same directory and
//! are renamed over the target, so an interrupted write never leaves a
//! half-written document behind.
//!
//! Records are decoded one at a time. A record that cannot be decoded is
//! skipped on read with a warning, and is carried through writes untouched.
//! Only a document that is not well-formed JSON (or whose `projects` entry is
//! not an object) counts as corruption.
//!
//! Writers are serialized by an in-process mutex. Readers never take it.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::project::ProjectRecord;

pub type ProjectMap = BTreeMap<String, ProjectRecord>;

/// The `projects` entry as stored, before per-record decoding.
type RawProjects = BTreeMap<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document {path} could not be decoded: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize store document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("project {0} not found")]
    NotFound(String),
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoreDocument {
    #[serde(default)]
    projects: RawProjects,
}

pub struct ProjectStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole store. A missing document is an empty store, not an error.
    pub async fn load(&self) -> Result<ProjectMap, StoreError> {
        Ok(self
            .load_raw()
            .await?
            .into_iter()
            .filter_map(|(id, value)| decode_record(&id, value).map(|record| (id, record)))
            .collect())
    }

    /// Overwrites the whole store document.
    #[allow(dead_code)]
    pub async fn save(&self, projects: &ProjectMap) -> Result<(), StoreError> {
        let raw = projects
            .iter()
            .map(|(id, record)| Ok((id.clone(), serde_json::to_value(record)?)))
            .collect::<Result<RawProjects, StoreError>>()?;
        self.save_raw(raw).await
    }

    /// Inserts a record under a fresh identifier and persists the store.
    pub async fn create(&self, record: ProjectRecord) -> Result<String, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.load_raw().await?;

        let mut id = Uuid::new_v4().to_string();
        while projects.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }

        info!("Creating project {id} ({})", record.name);
        projects.insert(id.clone(), serde_json::to_value(&record)?);
        self.save_raw(projects).await?;
        Ok(id)
    }

    /// A record that exists but cannot be decoded is reported as not found.
    pub async fn get(&self, id: &str) -> Result<ProjectRecord, StoreError> {
        self.load_raw()
            .await?
            .remove(id)
            .and_then(|value| decode_record(id, value))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// All decodable records in identifier order.
    pub async fn list(&self) -> Result<Vec<(String, ProjectRecord)>, StoreError> {
        Ok(self.load().await?.into_iter().collect())
    }

    /// Mutates one record in place and persists the whole store.
    pub async fn update<F, T>(&self, id: &str, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut ProjectRecord) -> T,
    {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.load_raw().await?;

        let mut record = projects
            .remove(id)
            .and_then(|value| decode_record(id, value))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let output = mutate(&mut record);

        projects.insert(id.to_string(), serde_json::to_value(&record)?);
        self.save_raw(projects).await?;
        Ok(output)
    }

    /// Removes one record, decodable or not, and persists the whole store.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut projects = self.load_raw().await?;

        if projects.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }

        info!("Deleting project {id}");
        self.save_raw(projects).await
    }

    async fn load_raw(&self) -> Result<RawProjects, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store document at {}, starting empty", self.path.display());
                return Ok(RawProjects::new());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let document: StoreDocument =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })?;

        Ok(document.projects)
    }

    async fn save_raw(&self, projects: RawProjects) -> Result<(), StoreError> {
        let count = projects.len();
        let bytes = serde_json::to_vec_pretty(&StoreDocument { projects })?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

        debug!("Saved {count} projects to {}", self.path.display());
        Ok(())
    }
}

fn decode_record(id: &str, value: Value) -> Option<ProjectRecord> {
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipping undecodable project {id}: {e}");
            None
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::{Stakeholder, TeamMember};

    fn store_in(dir: &tempfile::TempDir) -> ProjectStore {
        ProjectStore::new(dir.path().join("projects.json"))
    }

    fn apollo() -> ProjectRecord {
        ProjectRecord {
            name: "Apollo".to_string(),
            description: Some("Moonshot".to_string()),
            budget: Some(1000.0),
            team_members: vec![TeamMember {
                name: "Alice".to_string(),
                email: Some("alice@example.com".to_string()),
                ..Default::default()
            }],
            stakeholders: vec![Stakeholder {
                name: "Carol".to_string(),
                email: Some("carol@example.com".to_string()),
                role: Some("CEO".to_string()),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_document_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), b"{ not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_document_without_projects_key_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), b"{}").unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_reproduces_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut projects = ProjectMap::new();
        projects.insert("p1".to_string(), apollo());
        projects.insert(
            "p2".to_string(),
            ProjectRecord {
                name: "Gemini".to_string(),
                progress: Some(45.0),
                ..Default::default()
            },
        );

        store.save(&projects).await.unwrap();
        let first = store.load().await.unwrap();
        assert_eq!(first, projects);

        store.save(&first).await.unwrap();
        assert_eq!(store.load().await.unwrap(), projects);
    }

    #[tokio::test]
    async fn test_saved_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut projects = ProjectMap::new();
        projects.insert("p1".to_string(), apollo());
        store.save(&projects).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["projects"]["p1"]["name"], "Apollo");
        assert_eq!(raw["projects"]["p1"]["team_members"][0]["name"], "Alice");
    }

    #[tokio::test]
    async fn test_create_yields_distinct_ids_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let second = ProjectRecord {
            name: "Gemini".to_string(),
            ..Default::default()
        };
        let id_a = store.create(apollo()).await.unwrap();
        let id_b = store.create(second.clone()).await.unwrap();

        assert_ne!(id_a, id_b);
        assert_eq!(store.get(&id_a).await.unwrap(), apollo());
        assert_eq!(store.get(&id_b).await.unwrap(), second);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let err = store.get("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let id = store.create(apollo()).await.unwrap();

        let progress = store
            .update(&id, |record| {
                record.progress = Some(80.0);
                record.progress
            })
            .await
            .unwrap();
        assert_eq!(progress, Some(80.0));
        assert_eq!(store.get(&id).await.unwrap().progress, Some(80.0));

        store.delete(&id).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());

        assert!(matches!(
            store.delete(&id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_oddly_shaped_record_does_not_hide_its_neighbours() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            br#"{"projects":{
                "p1":{"name":"Apollo","budget":1000},
                "p2":{"name":"Legacy","stakeholders":["CEO"],"additional_info":""},
                "p3":{"description":"no name at all"}
            }}"#,
        )
        .unwrap();

        let apollo = store.get("p1").await.unwrap();
        assert_eq!(apollo.name, "Apollo");
        assert_eq!(apollo.budget, Some(1000.0));

        let legacy = store.get("p2").await.unwrap();
        assert_eq!(legacy.stakeholders[0].name, "CEO");
        assert!(legacy.additional_info.is_none());

        assert!(matches!(
            store.get("p3").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_writes_keep_undecodable_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            br#"{"projects":{"p3":{"description":"no name at all"}}}"#,
        )
        .unwrap();

        let id = store.create(apollo()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw["projects"]["p3"]["description"], "no name at all");
        assert_eq!(raw["projects"][&id]["name"], "Apollo");

        store.delete("p3").await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_projects_entry_of_wrong_shape_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), br#"{"projects":[1,2,3]}"#).unwrap();

        let err = store.load().await.unwrap_err();
        assert!(err.to_string().contains("could not be decoded"), "got {err}");
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(store_in(&dir));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create(ProjectRecord {
                            name: format!("Project {i}"),
                            ..Default::default()
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.load().await.unwrap().len(), 8);
    }
}
