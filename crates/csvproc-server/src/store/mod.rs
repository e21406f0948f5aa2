//! In-memory store for normalized upload results
//!
//! Result sets are write-once and live for [`DEFAULT_RETENTION`]. There is no
//! background reaper: every [`ResultStore::put`] and [`ResultStore::get`]
//! sweeps expired entries first, so an expired entry lingers only until the
//! next access.
//!
//! Ages are measured with [`tokio::time::Instant`], which follows tokio's
//! paused test clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use csvproc_common::{NormalizedRecord, SourceType};
use thiserror::Error;
use tokio::time::Instant;
use uuid::Uuid;

/// How long a result set stays retrievable (24 hours)
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Data not found or expired")]
    NotFound(String),
}

/// Normalized output of one upload
#[derive(Debug, Clone)]
pub struct ResultSet {
    pub id: String,
    pub records: Arc<[NormalizedRecord]>,
    pub created_at: DateTime<Utc>,
    pub source_type: SourceType,
    pub original_filename: String,
    stored_at: Instant,
}

/// Metadata returned from [`ResultStore::put`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub id: String,
    pub source_type: SourceType,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
    pub record_count: usize,
}

/// Shared, cloneable handle to the result store.
///
/// All map access goes through one mutex, so a `get` that starts after a
/// `put` returned always sees the new entry.
#[derive(Debug, Clone)]
pub struct ResultStore {
    entries: Arc<Mutex<HashMap<String, ResultSet>>>,
    retention: Duration,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            retention,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Store `records` under a fresh random id
    pub fn put(
        &self,
        source_type: SourceType,
        original_filename: impl Into<String>,
        records: Vec<NormalizedRecord>,
    ) -> ResultSummary {
        let result = ResultSet {
            id: Uuid::new_v4().to_string(),
            records: records.into(),
            created_at: Utc::now(),
            source_type,
            original_filename: original_filename.into(),
            stored_at: Instant::now(),
        };

        let summary = ResultSummary {
            id: result.id.clone(),
            source_type,
            original_filename: result.original_filename.clone(),
            created_at: result.created_at,
            record_count: result.records.len(),
        };

        let mut entries = self.lock();
        entries.insert(result.id.clone(), result);
        self.sweep_locked(&mut entries);

        summary
    }

    /// Records stored under `id`, after sweeping expired entries
    pub fn get(&self, id: &str) -> Result<Arc<[NormalizedRecord]>, StoreError> {
        let mut entries = self.lock();
        self.sweep_locked(&mut entries);

        entries
            .get(id)
            .map(|result| Arc::clone(&result.records))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Remove every entry older than the retention window
    pub fn sweep(&self) -> usize {
        let mut entries = self.lock();
        self.sweep_locked(&mut entries)
    }

    /// Number of entries currently held, expired ones included until swept
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep_locked(&self, entries: &mut HashMap<String, ResultSet>) -> usize {
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, result| {
            now.saturating_duration_since(result.stored_at) <= self.retention
        });

        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = entries.len(), "Evicted expired result sets");
        }
        evicted
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned mutex is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ResultSet>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
