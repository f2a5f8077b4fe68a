//! Postgres-backed `JobStore`.
//!
//! Jobs are fetched in one query with company and location joined in, then
//! requirements and disability support are attached with one `ANY($1)` query each.
//! Timestamps are stored without a zone and read back as UTC.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, warn};

use crate::models::job::{Company, Disability, Job, Location};
use crate::models::profile::{ApplicationSummary, UserProfile, RECENT_APPLICATIONS_CAP};
use crate::search::filters::StructuralFilters;
use crate::search::keywords::extract_keywords;
use crate::store::JobStore;

const JOB_COLUMNS: &str = r#"
    SELECT j.id::BIGINT AS id,
           j.title,
           COALESCE(j.description, '') AS description,
           j.employment_type,
           j.remote_type,
           j.created_at AT TIME ZONE 'UTC' AS created_at,
           c.id::BIGINT AS company_id,
           c.name AS company_name,
           l.id::BIGINT AS location_id,
           l.city AS location_city,
           l.country AS location_country
    FROM jobs j
    LEFT JOIN companies c ON c.id = j.company_id
    LEFT JOIN locations l ON l.id = j.location_id
    WHERE TRUE
"#;

#[derive(Debug, FromRow)]
struct JobRow {
    id: i64,
    title: String,
    description: String,
    employment_type: Option<String>,
    remote_type: Option<String>,
    created_at: Option<DateTime<Utc>>,
    company_id: Option<i64>,
    company_name: Option<String>,
    location_id: Option<i64>,
    location_city: Option<String>,
    location_country: Option<String>,
}

impl JobRow {
    fn into_job(self) -> Job {
        let employment_type = self
            .employment_type
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| {
                warn!(job_id = self.id, raw = ?self.employment_type, "unrecognised employment type");
                Default::default()
            });
        let remote_type = self
            .remote_type
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| {
                warn!(job_id = self.id, raw = ?self.remote_type, "unrecognised remote type");
                Default::default()
            });

        Job {
            id: self.id,
            title: self.title,
            description: self.description,
            employment_type,
            remote_type,
            company: match (self.company_id, self.company_name) {
                (Some(id), Some(name)) => Some(Company { id, name }),
                _ => None,
            },
            location: self.location_id.map(|id| Location {
                id,
                city: self.location_city,
                country: self.location_country,
            }),
            requirements: Vec::new(),
            disability_support: Vec::new(),
            posted_at: self.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct RequirementRow {
    job_id: i64,
    requirement: String,
}

#[derive(Debug, FromRow)]
struct SupportRow {
    job_id: i64,
    disability_id: i64,
    name: String,
}

#[derive(Debug, FromRow)]
struct UserRow {
    location: Option<String>,
    preferred_job_type: Option<String>,
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    job_id: i64,
    job_title: String,
    status: Option<String>,
    applied_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_jobs(
        &self,
        mut qb: QueryBuilder<'_, Postgres>,
        limit: usize,
    ) -> Result<Vec<Job>, sqlx::Error> {
        qb.push(" ORDER BY j.created_at DESC NULLS LAST, j.id ASC LIMIT ");
        qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));

        let rows: Vec<JobRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let mut jobs: Vec<Job> = rows.into_iter().map(JobRow::into_job).collect();
        self.attach_details(&mut jobs).await?;
        Ok(jobs)
    }

    /// Eager-loads requirements and disability support for `jobs`.
    async fn attach_details(&self, jobs: &mut [Job]) -> Result<(), sqlx::Error> {
        if jobs.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();

        let requirements: Vec<RequirementRow> = sqlx::query_as(
            r#"
            SELECT job_id::BIGINT AS job_id, requirement
            FROM job_requirements
            WHERE job_id = ANY($1)
            ORDER BY job_id, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let support: Vec<SupportRow> = sqlx::query_as(
            r#"
            SELECT s.job_id::BIGINT AS job_id, d.id::BIGINT AS disability_id, d.name
            FROM job_disability_support s
            JOIN disabilities d ON d.id = s.disability_id
            WHERE s.job_id = ANY($1)
            ORDER BY s.job_id, d.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<i64, &mut Job> = jobs.iter_mut().map(|j| (j.id, j)).collect();
        for row in requirements {
            if let Some(job) = by_id.get_mut(&row.job_id) {
                job.requirements.push(row.requirement);
            }
        }
        for row in support {
            if let Some(job) = by_id.get_mut(&row.job_id) {
                job.disability_support.push(Disability {
                    id: row.disability_id,
                    name: row.name,
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn fetch_candidates(
        &self,
        filters: &StructuralFilters,
        query: Option<&str>,
        budget: usize,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(JOB_COLUMNS);

        if !filters.disability_ids.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM job_disability_support s \
                 WHERE s.job_id = j.id AND s.disability_id = ANY(",
            );
            qb.push_bind(filters.disability_ids.clone());
            qb.push("))");
        }

        if !filters.skill_names.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM job_requirements r \
                 WHERE r.job_id = j.id AND LOWER(r.requirement) LIKE ANY(",
            );
            qb.push_bind(like_patterns(&filters.skill_names));
            qb.push("))");
        }

        if let Some(employment_type) = filters.employment_type {
            qb.push(" AND j.employment_type = ");
            qb.push_bind(employment_type.as_str());
        }

        if let Some(remote_type) = filters.remote_type {
            qb.push(" AND j.remote_type = ");
            qb.push_bind(remote_type.as_str());
        }

        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            let keywords = extract_keywords(query);
            if keywords.is_empty() {
                let pattern = like_patterns(&[query.to_lowercase()]);
                qb.push(" AND (LOWER(j.title) LIKE ANY(");
                qb.push_bind(pattern.clone());
                qb.push(") OR LOWER(COALESCE(j.description, '')) LIKE ANY(");
                qb.push_bind(pattern);
                qb.push("))");
            } else {
                let patterns = like_patterns(&keywords);
                qb.push(" AND (LOWER(j.title) LIKE ANY(");
                qb.push_bind(patterns.clone());
                qb.push(") OR LOWER(COALESCE(j.description, '')) LIKE ANY(");
                qb.push_bind(patterns.clone());
                qb.push(
                    ") OR EXISTS (SELECT 1 FROM job_requirements r \
                     WHERE r.job_id = j.id AND LOWER(r.requirement) LIKE ANY(",
                );
                qb.push_bind(patterns);
                qb.push(")))");
            }
        }

        let jobs = self.fetch_jobs(qb, budget).await?;
        debug!(budget, fetched = jobs.len(), "fetched search candidates");
        Ok(jobs)
    }

    async fn resolve_skill_names(&self, skill_ids: &[i64]) -> Result<Vec<String>, sqlx::Error> {
        if skill_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar("SELECT name FROM skills WHERE id = ANY($1) ORDER BY id")
            .bind(skill_ids)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_jobs(&self, limit: usize) -> Result<Vec<Job>, sqlx::Error> {
        self.fetch_jobs(QueryBuilder::new(JOB_COLUMNS), limit).await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn load_profile(&self, user_id: i64) -> Result<Option<UserProfile>, sqlx::Error> {
        let user: Option<UserRow> =
            sqlx::query_as("SELECT location, preferred_job_type FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let disabilities: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT d.name
            FROM user_disabilities ud
            JOIN disabilities d ON d.id = ud.disability_id
            WHERE ud.user_id = $1
            ORDER BY d.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let skills: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT s.name
            FROM user_skills us
            JOIN skills s ON s.id = us.skill_id
            WHERE us.user_id = $1
            ORDER BY s.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let applications: Vec<ApplicationRow> = sqlx::query_as(
            r#"
            SELECT a.job_id::BIGINT AS job_id, j.title AS job_title, a.status,
                   a.applied_at AT TIME ZONE 'UTC' AS applied_at
            FROM job_applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.user_id = $1
            ORDER BY a.applied_at DESC NULLS LAST
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(RECENT_APPLICATIONS_CAP as i64)
        .fetch_all(&self.pool)
        .await?;

        let profile = UserProfile {
            disabilities,
            skills,
            location: user.location,
            preferred_job_type: user.preferred_job_type,
            ..Default::default()
        }
        .with_applications(
            applications
                .into_iter()
                .map(|a| ApplicationSummary {
                    job_id: a.job_id,
                    job_title: a.job_title,
                    status: a.status.unwrap_or_else(|| "pending".to_string()),
                    applied_at: a.applied_at,
                })
                .collect(),
        );

        debug!(
            user_id,
            disabilities = profile.disabilities.len(),
            skills = profile.skills.len(),
            applications = profile.recent_applications.len(),
            "loaded user profile"
        );
        Ok(Some(profile))
    }
}

/// `%needle%` patterns with LIKE metacharacters escaped.
fn like_patterns(needles: &[String]) -> Vec<String> {
    needles
        .iter()
        .map(|n| {
            let escaped = n
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
        .collect()
}
