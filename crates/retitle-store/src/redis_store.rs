//! Redis-backed job store.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use retitle_models::{Job, JobId};

use crate::error::StoreResult;
use crate::store::JobStore;

/// Fixed key prefix for job records.
const KEY_PREFIX: &str = "retitle:job:";

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Redis URL
    pub redis_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }
}

/// Job store over one Redis hash per job.
///
/// The record lives in hash `retitle:job:<job_id>` under field `<job_id>`
/// as a JSON blob. Writer and reader must agree on this composite-key
/// convention; both halves live here so they cannot drift.
pub struct RedisJobStore {
    client: redis::Client,
}

impl RedisJobStore {
    /// Create a new store.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client })
    }

    /// Create from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::new(StoreConfig::from_env())
    }

    fn key(job_id: &JobId) -> String {
        format!("{KEY_PREFIX}{job_id}")
    }
}

#[async_trait]
impl JobStore for RedisJobStore {
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.hget(Self::key(job_id), job_id.as_str()).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, job: &Job) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(job)?;
        conn.hset::<_, _, _, ()>(Self::key(&job.job_id), job.job_id.as_str(), payload)
            .await?;
        debug!("Stored job {}", job.job_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_convention() {
        let key = RedisJobStore::key(&JobId::from_string("Job_1_x"));
        assert_eq!(key, "retitle:job:Job_1_x");
    }
}
