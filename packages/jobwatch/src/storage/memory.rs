//! In-memory store.
//!
//! Backs tests and doubles as the reference implementation of the
//! persistence seams: what SQLite does with constraints, this does with
//! plain collections.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::traits::{SeenJobStore, SubscriptionIndex};
use crate::types::{normalize_keyword, JobPosting, SubscriberId};

#[derive(Default)]
pub struct MemoryStore {
    subscriptions: RwLock<BTreeMap<String, BTreeSet<SubscriberId>>>,
    seen: RwLock<HashMap<String, JobPosting>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription. Returns false when the pair already exists.
    pub fn add_subscription(&self, subscriber: SubscriberId, keyword: &str) -> bool {
        let keyword = normalize_keyword(keyword);
        self.subscriptions
            .write()
            .unwrap()
            .entry(keyword)
            .or_default()
            .insert(subscriber)
    }

    /// Remove a subscription. Returns false when it did not exist.
    pub fn remove_subscription(&self, subscriber: SubscriberId, keyword: &str) -> bool {
        let keyword = normalize_keyword(keyword);
        let mut subscriptions = self.subscriptions.write().unwrap();
        let Some(subscribers) = subscriptions.get_mut(&keyword) else {
            return false;
        };
        let removed = subscribers.remove(&subscriber);
        if subscribers.is_empty() {
            subscriptions.remove(&keyword);
        }
        removed
    }

    /// Keywords one subscriber has registered, sorted.
    pub fn subscriptions_for(&self, subscriber: SubscriberId) -> Vec<String> {
        self.subscriptions
            .read()
            .unwrap()
            .iter()
            .filter(|(_, subscribers)| subscribers.contains(&subscriber))
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }

    /// Ids of every job marked seen, sorted.
    pub fn seen_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.seen.read().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl SubscriptionIndex for MemoryStore {
    async fn all_keywords(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.subscriptions.read().unwrap().keys().cloned().collect())
    }

    async fn subscribers_for(&self, keyword: &str) -> Result<Vec<SubscriberId>, StoreError> {
        let keyword = normalize_keyword(keyword);
        Ok(self
            .subscriptions
            .read()
            .unwrap()
            .get(&keyword)
            .map(|subscribers| subscribers.iter().copied().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl SeenJobStore for MemoryStore {
    async fn is_seen(&self, job_id: &str) -> Result<bool, StoreError> {
        Ok(self.seen.read().unwrap().contains_key(job_id))
    }

    async fn mark_seen(&self, job: &JobPosting) -> Result<(), StoreError> {
        // First record wins, as with the UNIQUE constraint in SQLite.
        self.seen
            .write()
            .unwrap()
            .entry(job.id.clone())
            .or_insert_with(|| job.clone());
        Ok(())
    }
}
