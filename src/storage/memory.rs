//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::entries::Entry;

use super::CreateEntryValues;
use super::Result;
use super::Storage;
use super::UpdateEntryValues;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All entries in storage
    entries: Arc<Mutex<HashMap<Uuid, Entry>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_all_entries(&self) -> Result<Vec<Entry>> {
        let mut entries = self
            .entries
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<Entry>>();

        // the hosted table orders for us, here we do it ourselves
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(entries)
    }

    async fn create_entry(&self, values: &CreateEntryValues<'_>) -> Result<Entry> {
        let entry = Entry {
            id: Uuid::new_v4(),
            name: values.name.to_string(),
            message: values.message.to_string(),
            created_at: Utc::now(),
        };

        self.entries.lock().await.insert(entry.id, entry.clone());

        Ok(entry)
    }

    async fn update_entry(
        &self,
        id: &Uuid,
        values: &UpdateEntryValues<'_>,
    ) -> Result<Option<Entry>> {
        Ok(self.entries.lock().await.get_mut(id).map(|entry| {
            if let Some(name) = values.name {
                entry.name = name.to_string();
            }

            if let Some(message) = values.message {
                entry.message = message.to_string();
            }

            entry.clone()
        }))
    }

    async fn delete_entry(&self, id: &Uuid) -> Result<Option<Entry>> {
        Ok(self.entries.lock().await.remove(id))
    }
}
