use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;

/// Resource version tracker
///
/// Lock-free per-resource version counters backed by a DashMap.
/// Each resource type ("product", "coupon", "order") keeps its own
/// monotonically increasing version, bumped on every admin mutation.
/// Clients compare versions to decide whether to refetch.
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the version for a resource and return the new value
    ///
    /// Unknown resources start from 0, so the first bump returns 1.
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version for a resource, 0 when never bumped
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// Snapshot of all tracked versions, sorted by resource name
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.versions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared server state
///
/// Cloning is cheap: the database handle and version tracker are
/// reference counted internally.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Resource version tracker for client sync
    pub resource_versions: Arc<ResourceVersions>,
    /// Process start, for uptime reporting
    pub started_at: std::time::Instant,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        Self {
            config,
            db,
            resource_versions: Arc::new(ResourceVersions::new()),
            started_at: std::time::Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Initialize the server state
    ///
    /// Ensures the work directory layout exists, then opens the embedded
    /// database at `work_dir/database/store.db` and applies the schema.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("store.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::new(config.clone(), db_service.db))
    }

    /// Initialize an in-memory state, used by integration tests
    pub async fn initialize_in_memory(config: &Config) -> anyhow::Result<Self> {
        let db_service = DbService::new_memory().await?;
        Ok(Self::new(config.clone(), db_service.db))
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// Bump the sync version after an admin mutation
    pub fn bump_version(&self, resource: &str) -> u64 {
        self.resource_versions.increment(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_start_at_zero_and_increment() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("product"), 0);
        assert_eq!(versions.increment("product"), 1);
        assert_eq!(versions.increment("product"), 2);
        assert_eq!(versions.get("product"), 2);
        assert_eq!(versions.get("coupon"), 0);
    }

    #[test]
    fn snapshot_contains_all_resources() {
        let versions = ResourceVersions::new();
        versions.increment("product");
        versions.increment("order");
        versions.increment("order");

        let snap = versions.snapshot();
        assert_eq!(snap.get("product"), Some(&1));
        assert_eq!(snap.get("order"), Some(&2));
    }
}
