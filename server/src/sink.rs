use shared::{Manifest, Stats};

use crate::db::types::ProfileRecord;

/// Where finished records go. Writes are fire-and-forget for the pipeline:
/// callers log a failure and move on.
#[async_trait::async_trait]
pub trait ProfileSink: Send + Sync {
    async fn store_stats(&self, record: &ProfileRecord) -> anyhow::Result<()>;
    async fn store_manifest(&self, login: &str, manifest: &Manifest) -> anyhow::Result<()>;
}

/// A sink that can also hand back what it stored, keyed by login.
#[async_trait::async_trait]
pub trait ProfileStore: ProfileSink {
    async fn load_stats(&self, login: &str) -> anyhow::Result<Option<Stats>>;
    async fn load_manifest(&self, login: &str) -> anyhow::Result<Option<Manifest>>;
}
