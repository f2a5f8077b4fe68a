//! Storage collaborator: candidate supply, skill-id resolution and profile loading.
//!
//! Handlers depend on the `JobStore` trait so the ranking pipeline can be driven
//! against Postgres in production and an in-memory catalogue in tests.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::models::job::Job;
use crate::models::profile::UserProfile;
use crate::search::filters::StructuralFilters;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Up to `budget` jobs satisfying `filters` and, when given, coarsely
    /// matching `query`. Newest first. Ranking re-checks everything.
    async fn fetch_candidates(
        &self,
        filters: &StructuralFilters,
        query: Option<&str>,
        budget: usize,
    ) -> Result<Vec<Job>, sqlx::Error>;

    /// Names of the given skill ids, in id order. Unknown ids are skipped.
    async fn resolve_skill_names(&self, skill_ids: &[i64]) -> Result<Vec<String>, sqlx::Error>;

    /// The most recent `limit` jobs, unfiltered.
    async fn list_jobs(&self, limit: usize) -> Result<Vec<Job>, sqlx::Error>;

    /// `None` when no such user exists.
    async fn load_profile(&self, user_id: i64) -> Result<Option<UserProfile>, sqlx::Error>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}
