//! Job store contract.

use async_trait::async_trait;

use retitle_models::{Job, JobId};

use crate::error::StoreResult;

/// Key-value persistence of one record per job id.
///
/// Writes are whole-record upserts; callers read-modify-write the full
/// record. No transactional guarantee is made across concurrent writers to
/// the same job: the pipeline triggers at most one stage per job at a
/// time, so each record has a single writer in practice.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Load the record for a job id, if present.
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>>;

    /// Upsert the whole record.
    async fn put(&self, job: &Job) -> StoreResult<()>;
}
