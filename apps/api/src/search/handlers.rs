//! Axum route handlers for the job search API.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{EmploymentType, RemoteType};
use crate::search::filters::{parse_optional, SearchFilters};
use crate::search::ranker::{self, rank_jobs, ScoredJob, SearchMode, MAX_QUERY_CHARS};
use crate::search::DEFAULT_LIMIT;
use crate::security::rate_limit::client_key;
use crate::security::sanitize::{is_allowed_query, sanitize_input};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Search body. The singular ids are accepted alongside the lists.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub user_id: Option<i64>,
    pub query: Option<String>,
    pub disability_ids: Vec<i64>,
    pub disability_id: Option<i64>,
    pub skill_ids: Vec<i64>,
    pub skill_id: Option<i64>,
    pub employment_type: Option<String>,
    pub remote_type: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub company_name: Option<String>,
    pub company_id: Option<i64>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub remote_type: RemoteType,
    pub required_skills: Vec<String>,
    pub disability_support: Vec<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub relevance_score: f64,
}

impl From<ScoredJob> for JobListing {
    fn from(scored: ScoredJob) -> Self {
        let ScoredJob {
            job,
            relevance_score,
        } = scored;
        let location = job.location.as_ref().and_then(|l| l.display());
        let disability_support = job.disability_names().map(str::to_string).collect();
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            company_name: job.company.as_ref().map(|c| c.name.clone()),
            company_id: job.company.as_ref().map(|c| c.id),
            location_city: job.location.as_ref().and_then(|l| l.city.clone()),
            location_country: job.location.as_ref().and_then(|l| l.country.clone()),
            location,
            employment_type: job.employment_type,
            remote_type: job.remote_type,
            required_skills: job.requirements,
            disability_support,
            posted_at: job.posted_at,
            relevance_score,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<JobListing>,
    pub count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/search
///
/// Ranks jobs for a query and/or filters, personalised when `user_id` names a user.
pub async fn handle_search(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if !state
        .rate_limiter
        .check(&client_key("search", connect_info), state.search_limit)
    {
        return Err(AppError::RateLimited(
            "Too many requests. Please wait a moment before searching again.".to_string(),
        ));
    }

    if request.user_id.is_some_and(|id| id <= 0) {
        return Err(AppError::Validation("Invalid user ID".to_string()));
    }

    // Length is checked on the raw text; sanitizing would otherwise truncate it.
    let limit = request.limit.unwrap_or(DEFAULT_LIMIT);
    ranker::validate(request.query.as_deref(), limit)?;

    let query = request
        .query
        .as_deref()
        .map(|raw| sanitize_input(raw, MAX_QUERY_CHARS))
        .filter(|q| !q.is_empty());
    if query.as_deref().is_some_and(|q| !is_allowed_query(q)) {
        return Err(AppError::Validation("Invalid search query".to_string()));
    }

    let filters = SearchFilters {
        disability_ids: merge_ids(request.disability_ids, request.disability_id),
        skill_ids: merge_ids(request.skill_ids, request.skill_id),
        employment_type: parse_optional(request.employment_type.as_deref(), "employment type")?,
        remote_type: parse_optional(request.remote_type.as_deref(), "remote type")?,
        query,
    };
    filters.validate_ids()?;

    let query = filters.query_text();

    let profile = match request.user_id {
        Some(user_id) => state.store.load_profile(user_id).await?,
        None => None,
    };

    let skill_names = if filters.skill_ids.is_empty() {
        Vec::new()
    } else {
        state.store.resolve_skill_names(&filters.skill_ids).await?
    };
    let structural = filters.structural(skill_names);

    let mode = SearchMode::detect(query, &structural);
    let budget = mode.candidate_budget(limit);
    let candidates = state
        .store
        .fetch_candidates(&structural, query, budget)
        .await?;

    let ranked = rank_jobs(&candidates, query, &structural, profile.as_ref(), limit)?;

    info!(
        ?mode,
        personalised = profile.is_some(),
        candidates = candidates.len(),
        results = ranked.len(),
        "job search"
    );

    let results: Vec<JobListing> = ranked.into_iter().map(JobListing::from).collect();
    let count = results.len();
    Ok(Json(SearchResponse { results, count }))
}

/// Appends `single` to `ids` unless already present.
fn merge_ids(mut ids: Vec<i64>, single: Option<i64>) -> Vec<i64> {
    if let Some(id) = single {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
