use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

pub type Responses = BTreeMap<String, String>;

// Trigger -> reply mapping kept in a flat JSON object. Reads go to the file
// every time; updates rewrite the whole file while holding the write lock, so
// concurrent updates within the process can't lose each other.
#[derive(Debug)]
pub struct ResponseStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ResponseStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        ResponseStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    // A missing file is the same as an empty mapping.
    pub async fn load(&self) -> Result<Responses> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Responses::new()),
            Ok(raw) => Ok(serde_json::from_str::<Responses>(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No auto-responses stored at {}", self.path.display());
                Ok(Responses::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    // Returns the reply for the first trigger found anywhere in the content.
    // Matching is a plain case-insensitive substring check.
    pub async fn find_response(&self, content: &str) -> Result<Option<String>> {
        let content = content.to_lowercase();
        let responses = self.load().await?;
        let response = responses
            .into_iter()
            .find(|(trigger, _)| !trigger.is_empty() && content.contains(trigger.as_str()))
            .map(|(_, response)| response);
        Ok(response)
    }

    pub async fn insert(&self, trigger: &str, response: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut responses = self.load().await?;
        responses.insert(trigger.to_lowercase(), response.to_string());
        self.save(&responses).await
    }

    // Returns false when there was nothing to remove.
    pub async fn remove(&self, trigger: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut responses = self.load().await?;
        if responses.remove(&trigger.to_lowercase()).is_none() {
            return Ok(false);
        }

        self.save(&responses).await?;
        Ok(true)
    }

    async fn save(&self, responses: &Responses) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let raw = serde_json::to_string_pretty(responses)?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;

    use crate::error::Error;
    use crate::storage::ResponseStore;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = ResponseStore::new(dir.path().join("absent.json"));

        assert_eq!(store.load().await.unwrap().len(), 0);
        assert_eq!(store.find_response("hello").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_persists_lowercased_trigger() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("autoresponses.json");
        let store = ResponseStore::new(&path);

        store.insert("HeLLo", "hi there!").await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["hello"], "hi there!");
    }

    #[tokio::test]
    async fn test_find_response_is_case_insensitive_substring() {
        let dir = tempdir().unwrap();
        let store = ResponseStore::new(dir.path().join("autoresponses.json"));
        store.insert("hello", "hi there!").await.unwrap();

        assert_eq!(
            store.find_response("Well HELLO friend").await.unwrap(),
            Some("hi there!".to_string())
        );
        assert_eq!(store.find_response("goodbye").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_trigger() {
        let dir = tempdir().unwrap();
        let store = ResponseStore::new(dir.path().join("autoresponses.json"));
        store.insert("hello", "hi there!").await.unwrap();

        assert_eq!(store.remove("HELLO").await.unwrap(), true);
        assert_eq!(store.remove("hello").await.unwrap(), false);
        assert_eq!(store.find_response("hello").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_are_not_lost() {
        let dir = tempdir().unwrap();
        let store = Arc::new(ResponseStore::new(dir.path().join("autoresponses.json")));

        let tasks = (0..10)
            .map(|index| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(&format!("trigger{}", index), "reply")
                        .await
                        .unwrap();
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.load().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("autoresponses.json");
        std::fs::write(&path, "[not an object").unwrap();
        let store = ResponseStore::new(&path);

        match store.load().await {
            Err(Error::Storage(_)) => {}
            other => panic!("expected a storage error, got {:?}", other),
        }
    }
}
