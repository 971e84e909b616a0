//! JSON-file-backed store.
//!
//! Stands in for the remote tabular store: events.json is the read-only
//! catalog, responses.json is the response log that batched writes append
//! to. Writes are atomic (tmp file then rename).

use std::path::PathBuf;

use rally_core::Event;
use rally_core::error::{RallyError, RallyResult};
use rally_core::response::ResponseEntry;
use rally_core::sync::{ActionKind, BatchAck, BatchAction, CatalogStore, ResponseStore};

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: PathBuf) -> Self {
        JsonStore { dir }
    }

    pub fn default_dir() -> RallyResult<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| RallyError::Persistence("Could not determine data directory".into()))?;
        Ok(data_dir.join("rally"))
    }

    fn events_path(&self) -> PathBuf {
        self.dir.join("events.json")
    }

    fn responses_path(&self) -> PathBuf {
        self.dir.join("responses.json")
    }

    fn read_responses(&self) -> RallyResult<Vec<ResponseEntry>> {
        let path = self.responses_path();
        if !path.exists() {
            // An empty log is a legitimate cold-start state
            return Ok(vec![]);
        }
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| RallyError::Store(e.to_string()))
    }

    fn write_responses(&self, responses: &[ResponseEntry]) -> RallyResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(responses)
            .map_err(|e| RallyError::Serialization(e.to_string()))?;

        let path = self.responses_path();
        let temp = self.dir.join("responses.json.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

impl CatalogStore for JsonStore {
    async fn fetch_events(&self) -> RallyResult<Vec<Event>> {
        let path = self.events_path();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            RallyError::CatalogUnavailable(format!("{}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| RallyError::CatalogUnavailable(e.to_string()))
    }

    async fn fetch_responses(&self) -> RallyResult<Vec<ResponseEntry>> {
        self.read_responses()
    }
}

impl ResponseStore for JsonStore {
    async fn put_batch(
        &mut self,
        _user_id: &str,
        actions: &[BatchAction],
    ) -> RallyResult<BatchAck> {
        tracing::debug!(actions = actions.len(), "applying batch to the response log");
        let mut responses = self.read_responses()?;
        let mut applied = Vec::new();

        for action in actions {
            match action.kind {
                ActionKind::EventResponse => {
                    let entry: ResponseEntry = serde_json::from_value(action.data.clone())
                        .map_err(|e| RallyError::Serialization(e.to_string()))?;
                    responses.push(entry);
                    applied.push(action.id);
                }
                // The friendship graph lives in another table; acknowledge
                // so the engine clears them from its queue.
                ActionKind::FriendshipAccept
                | ActionKind::FriendshipBlock
                | ActionKind::FriendshipRemove => applied.push(action.id),
            }
        }

        self.write_responses(&responses)?;
        Ok(BatchAck { applied })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rally_core::response::ResponseValue;

    #[tokio::test]
    async fn test_put_batch_appends_to_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::new(dir.path().to_path_buf());

        let entry = ResponseEntry::new(
            "u1",
            "e1",
            Some(ResponseValue::New),
            Some(ResponseValue::Going),
            Utc.with_ymd_and_hms(2025, 3, 19, 12, 0, 0).unwrap(),
        );
        let action = BatchAction::for_response(&entry, entry.created_at.unwrap()).unwrap();

        let ack = store.put_batch("u1", &[action.clone()]).await.unwrap();
        assert_eq!(ack.applied, vec![action.id]);

        let log = store.fetch_responses().await.unwrap();
        assert_eq!(log, vec![entry]);
    }

    #[tokio::test]
    async fn test_missing_catalog_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().to_path_buf());

        let err = store.fetch_events().await.unwrap_err();
        assert!(matches!(err, RallyError::CatalogUnavailable(_)));
    }
}
