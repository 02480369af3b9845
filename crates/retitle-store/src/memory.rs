//! In-memory job store for tests and single-process deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use retitle_models::{Job, JobId};

use crate::error::StoreResult;
use crate::store::JobStore;

/// HashMap-backed store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryJobStore {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(job_id.as_str()).cloned())
    }

    async fn put(&self, job: &Job) -> StoreResult<()> {
        self.jobs
            .write()
            .await
            .insert(job.job_id.as_str().to_string(), job.clone());
        Ok(())
    }
}
