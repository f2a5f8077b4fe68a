use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::job::Job;
use crate::models::profile::UserProfile;
use crate::search::filters::{matches_query, StructuralFilters};
use crate::search::keywords::extract_keywords;
use crate::store::JobStore;

/// In-memory catalogue for handler and router tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryJobStore {
    pub jobs: Vec<Job>,
    pub skills: HashMap<i64, String>,
    pub profiles: HashMap<i64, UserProfile>,
    /// When set, every call fails with a pool timeout.
    pub fail: bool,
}

impl MemoryJobStore {
    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.fail {
            Err(sqlx::Error::PoolTimedOut)
        } else {
            Ok(())
        }
    }

    fn newest_first(&self) -> Vec<Job> {
        let mut jobs = self.jobs.clone();
        jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then_with(|| a.id.cmp(&b.id)));
        jobs
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn fetch_candidates(
        &self,
        filters: &StructuralFilters,
        query: Option<&str>,
        budget: usize,
    ) -> Result<Vec<Job>, sqlx::Error> {
        self.check()?;
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let keywords = query.map(extract_keywords).unwrap_or_default();
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|job| filters.admits(job))
            .filter(|job| query.map_or(true, |q| matches_query(job, &keywords, q)))
            .take(budget)
            .collect())
    }

    async fn resolve_skill_names(&self, skill_ids: &[i64]) -> Result<Vec<String>, sqlx::Error> {
        self.check()?;
        Ok(skill_ids
            .iter()
            .filter_map(|id| self.skills.get(id).cloned())
            .collect())
    }

    async fn list_jobs(&self, limit: usize) -> Result<Vec<Job>, sqlx::Error> {
        self.check()?;
        Ok(self.newest_first().into_iter().take(limit).collect())
    }

    async fn load_profile(&self, user_id: i64) -> Result<Option<UserProfile>, sqlx::Error> {
        self.check()?;
        Ok(self.profiles.get(&user_id).cloned())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check()
    }
}
