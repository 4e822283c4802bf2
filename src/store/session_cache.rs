use crate::model::HybridRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

pub type SessionId = String;

/// An uploaded working set. Lives only as long as its session.
#[derive(Clone, Debug)]
pub struct UploadedSession {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub records: Arc<Vec<HybridRecord>>,
}

#[derive(Clone, Debug)]
struct CacheEntry {
    session: UploadedSession,
    last_accessed: Instant,
}

/// In-memory store for uploaded working sets with TTL
#[derive(Debug)]
pub struct SessionCache {
    entries: Arc<RwLock<HashMap<SessionId, CacheEntry>>>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store a freshly uploaded working set under a new session id.
    pub async fn create(&self, records: Vec<HybridRecord>) -> UploadedSession {
        let session = UploadedSession {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            records: Arc::new(records),
        };

        let mut entries = self.entries.write().await;
        entries.insert(
            session.id.clone(),
            CacheEntry {
                session: session.clone(),
                last_accessed: Instant::now(),
            },
        );
        session
    }

    /// Get a session if present and not expired
    pub async fn get(&self, id: &str) -> Option<UploadedSession> {
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.get_mut(id) {
            if entry.last_accessed.elapsed() > self.ttl {
                entries.remove(id);
                return None;
            }

            entry.last_accessed = Instant::now();
            Some(entry.session.clone())
        } else {
            None
        }
    }

    pub async fn remove(&self, id: &str) -> bool {
        let mut entries = self.entries.write().await;
        entries.remove(id).is_some()
    }

    /// Drop every expired session; returns how many were removed.
    pub async fn clear_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        let before = entries.len();
        entries.retain(|_, entry| entry.last_accessed.elapsed() <= ttl);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for SessionCache {
    /// One-hour TTL
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}
