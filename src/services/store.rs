use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Attributes, Conversation, FruitKind, FruitRecord, Preferences};

/// Errors that can occur when interacting with a fruit store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Persistence for fruit records and matchmaking history
///
/// `list` returns a snapshot; later writes never show up in a list already
/// handed out.
#[async_trait]
pub trait FruitStore: Send + Sync {
    /// Persist a new fruit and return the stored record
    async fn store(
        &self,
        kind: FruitKind,
        attributes: Attributes,
        preferences: Preferences,
    ) -> Result<FruitRecord, StoreError>;

    /// Every record of one kind, oldest first
    async fn list(&self, kind: FruitKind) -> Result<Vec<FruitRecord>, StoreError>;

    async fn get(&self, kind: FruitKind, id: &str) -> Result<FruitRecord, StoreError>;

    async fn count(&self, kind: FruitKind) -> Result<usize, StoreError>;

    async fn record_conversation(&self, conversation: Conversation) -> Result<(), StoreError>;

    /// Retained matchmaking history, oldest first
    async fn conversations(&self) -> Result<Vec<Conversation>, StoreError>;
}

/// Conversations kept when no limit is configured
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// In-process store: one vector per kind behind an async lock.
///
/// The history keeps only the most recent `history_limit` conversations.
#[derive(Debug)]
pub struct MemoryStore {
    fruits: RwLock<HashMap<FruitKind, Vec<FruitRecord>>>,
    history: RwLock<VecDeque<Conversation>>,
    history_limit: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            fruits: RwLock::new(HashMap::new()),
            history: RwLock::new(VecDeque::new()),
            history_limit,
        }
    }

    /// Store pre-built records as-is, keeping their ids and timestamps
    pub async fn seed<I>(&self, records: I)
    where
        I: IntoIterator<Item = FruitRecord>,
    {
        let mut fruits = self.fruits.write().await;
        for record in records {
            fruits.entry(record.kind).or_default().push(record);
        }
    }
}

#[async_trait]
impl FruitStore for MemoryStore {
    async fn store(
        &self,
        kind: FruitKind,
        attributes: Attributes,
        preferences: Preferences,
    ) -> Result<FruitRecord, StoreError> {
        let record = FruitRecord {
            id: format!("{}:{}", kind, uuid::Uuid::new_v4()),
            kind,
            attributes,
            preferences,
            created_at: Utc::now(),
        };

        self.fruits
            .write()
            .await
            .entry(kind)
            .or_default()
            .push(record.clone());

        tracing::debug!("Stored {}", record.id);
        Ok(record)
    }

    async fn list(&self, kind: FruitKind) -> Result<Vec<FruitRecord>, StoreError> {
        let fruits = self.fruits.read().await;
        Ok(fruits.get(&kind).cloned().unwrap_or_default())
    }

    async fn get(&self, kind: FruitKind, id: &str) -> Result<FruitRecord, StoreError> {
        let fruits = self.fruits.read().await;
        fruits
            .get(&kind)
            .and_then(|records| records.iter().find(|record| record.id == id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("{} {}", kind, id)))
    }

    async fn count(&self, kind: FruitKind) -> Result<usize, StoreError> {
        let fruits = self.fruits.read().await;
        Ok(fruits.get(&kind).map_or(0, Vec::len))
    }

    async fn record_conversation(&self, conversation: Conversation) -> Result<(), StoreError> {
        let mut history = self.history.write().await;
        history.push_back(conversation);
        while history.len() > self.history_limit {
            history.pop_front();
        }
        Ok(())
    }

    async fn conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        Ok(self.history.read().await.iter().cloned().collect())
    }
}
