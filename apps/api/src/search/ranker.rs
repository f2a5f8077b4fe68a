//! Relevance ranking: composite per-job score from field matches and profile affinity.
//!
//! Two regimes:
//! - no query and no active filter: every job gets a profile-only score
//!   (base 0.5, +0.2 skill, +0.3 disability), ordered by score then recency;
//! - otherwise: structural filters, a coarse query pre-filter, then
//!   `0.40·title + 0.30·description + 0.20·requirements + 0.05·company + profile bonus`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::job::Job;
use crate::models::profile::UserProfile;
use crate::search::filters::{matches_query, StructuralFilters};
use crate::search::keywords::extract_keywords;
use crate::search::match_scorer;
use crate::search::SearchError;

/// Field weights for the query-present composite.
#[derive(Debug, Clone, Copy)]
pub struct FieldWeights {
    pub title: f64,
    pub description: f64,
    pub requirements: f64,
    pub company: f64,
}

pub const FIELD_WEIGHTS: FieldWeights = FieldWeights {
    title: 0.40,
    description: 0.30,
    requirements: 0.20,
    company: 0.05,
};

/// Only this much of the description is scored.
pub const DESCRIPTION_SCORED_CHARS: usize = 500;

/// Minimum composite for a job to survive when a query was given.
pub const QUERY_SCORE_THRESHOLD: f64 = 0.05;

pub const MAX_QUERY_CHARS: usize = 200;
pub const MAX_LIMIT: usize = 100;

// Default-branch affinity
const DEFAULT_BASE_SCORE: f64 = 0.5;
const DEFAULT_SKILL_BONUS: f64 = 0.2;
const DEFAULT_DISABILITY_BONUS: f64 = 0.3;

// Query/filter-branch bonuses
const SKILL_BONUS_PER_MATCH: f64 = 0.1;
const SKILL_BONUS_CAP: f64 = 0.15;
const DISABILITY_BONUS: f64 = 0.15;
const JOB_TYPE_BONUS: f64 = 0.10;

/// A job with its relevance score, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    pub job: Job,
    pub relevance_score: f64,
}

/// Which scoring regime a search falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Browse,
    Query,
    FiltersOnly,
}

impl SearchMode {
    pub fn detect(query: Option<&str>, filters: &StructuralFilters) -> Self {
        match (query.is_some_and(|q| !q.trim().is_empty()), filters.is_active()) {
            (true, _) => SearchMode::Query,
            (false, true) => SearchMode::FiltersOnly,
            (false, false) => SearchMode::Browse,
        }
    }

    /// How many candidates to ask storage for, so post-scoring thresholds still
    /// leave enough results.
    pub fn candidate_budget(&self, limit: usize) -> usize {
        let factor = match self {
            SearchMode::Browse => 2,
            SearchMode::Query => 5,
            SearchMode::FiltersOnly => 10,
        };
        limit.saturating_mul(factor)
    }
}

/// Rejects inputs the ranker must not silently accept.
pub fn validate(query: Option<&str>, limit: usize) -> Result<(), SearchError> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(SearchError::InvalidInput(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    if query.is_some_and(|q| q.chars().count() > MAX_QUERY_CHARS) {
        return Err(SearchError::InvalidInput(format!(
            "query must be at most {MAX_QUERY_CHARS} characters"
        )));
    }
    Ok(())
}

/// Scores, orders and truncates `candidates`.
///
/// Deterministic for identical inputs: ties fall back to recency (browse) or to
/// ascending job id.
pub fn rank_jobs(
    candidates: &[Job],
    query: Option<&str>,
    filters: &StructuralFilters,
    profile: Option<&UserProfile>,
    limit: usize,
) -> Result<Vec<ScoredJob>, SearchError> {
    validate(query, limit)?;

    let mode = SearchMode::detect(query, filters);
    let affinity = profile.map(ProfileAffinity::new);

    let mut scored: Vec<(&Job, f64)> = match mode {
        SearchMode::Browse => candidates
            .iter()
            .map(|job| (job, browse_score(job, affinity.as_ref())))
            .collect(),
        SearchMode::FiltersOnly => candidates
            .iter()
            .filter(|job| filters.admits(job))
            .map(|job| (job, profile_bonus(job, affinity.as_ref()).min(1.0)))
            .filter(|(_, score)| *score > 0.0)
            .collect(),
        SearchMode::Query => {
            let raw = query.unwrap_or_default().trim();
            let keywords = extract_keywords(raw);
            candidates
                .iter()
                .filter(|job| filters.admits(job))
                .filter(|job| matches_query(job, &keywords, raw))
                .map(|job| (job, query_score(job, &keywords, affinity.as_ref())))
                .filter(|(_, score)| *score >= QUERY_SCORE_THRESHOLD)
                .collect()
        }
    };

    match mode {
        SearchMode::Browse => scored.sort_by(|a, b| {
            desc(a.1, b.1)
                .then_with(|| b.0.posted_at.cmp(&a.0.posted_at))
                .then_with(|| a.0.id.cmp(&b.0.id))
        }),
        _ => scored.sort_by(|a, b| desc(a.1, b.1).then_with(|| a.0.id.cmp(&b.0.id))),
    }

    debug!(
        ?mode,
        candidates = candidates.len(),
        kept = scored.len(),
        limit,
        "ranked job candidates"
    );

    Ok(scored
        .into_iter()
        .take(limit)
        .map(|(job, score)| ScoredJob {
            job: job.clone(),
            relevance_score: round2(score),
        })
        .collect())
}

/// Composite score when a query is present, clamped to 1.0.
pub fn query_score(job: &Job, keywords: &[String], affinity: Option<&ProfileAffinity>) -> f64 {
    let w = FIELD_WEIGHTS;

    let description: String = job.description.chars().take(DESCRIPTION_SCORED_CHARS).collect();

    let mut score = w.title * match_scorer::score(&job.title, keywords)
        + w.description * match_scorer::score(&description, keywords)
        + w.requirements * match_scorer::score(&job.requirements_text(), keywords);

    if let Some(company) = job.company_name() {
        score += w.company * match_scorer::score(company, keywords);
    }

    (score + profile_bonus(job, affinity)).min(1.0)
}

/// Profile-only score used when there is neither a query nor a filter.
fn browse_score(job: &Job, affinity: Option<&ProfileAffinity>) -> f64 {
    let mut score = DEFAULT_BASE_SCORE;
    if let Some(a) = affinity {
        if a.skill_matches(job) > 0 {
            score += DEFAULT_SKILL_BONUS;
        }
        if a.disability_matches(job) {
            score += DEFAULT_DISABILITY_BONUS;
        }
    }
    score.min(1.0)
}

/// Additive profile bonus for the query/filter regimes. Unclamped.
fn profile_bonus(job: &Job, affinity: Option<&ProfileAffinity>) -> f64 {
    let Some(a) = affinity else {
        return 0.0;
    };

    let mut bonus = 0.0;

    let skills = a.skill_matches(job);
    if skills > 0 {
        bonus += (skills as f64 * SKILL_BONUS_PER_MATCH).min(SKILL_BONUS_CAP);
    }

    if a.disability_matches(job) {
        bonus += DISABILITY_BONUS;
    }

    if let Some(pref) = a.preferred_type.as_deref() {
        if pref == job.employment_type.as_str() {
            bonus += JOB_TYPE_BONUS;
        }
        if pref == job.remote_type.as_str() {
            bonus += JOB_TYPE_BONUS;
        }
    }

    bonus
}

/// Lowercased profile fields, computed once per ranking call.
#[derive(Debug, Clone)]
pub struct ProfileAffinity {
    skills: Vec<String>,
    disabilities: Vec<String>,
    preferred_type: Option<String>,
}

impl ProfileAffinity {
    pub fn new(profile: &UserProfile) -> Self {
        Self {
            skills: profile.lowercase_skills(),
            disabilities: profile.lowercase_disabilities(),
            preferred_type: profile.preferred_type(),
        }
    }

    /// Number of user skills found in the joined, lowercased requirement text.
    pub fn skill_matches(&self, job: &Job) -> usize {
        if self.skills.is_empty() {
            return 0;
        }
        let requirements = job.requirements_text().to_lowercase();
        self.skills
            .iter()
            .filter(|s| requirements.contains(s.as_str()))
            .count()
    }

    /// Any user disability matching any supported disability (substring, either way).
    pub fn disability_matches(&self, job: &Job) -> bool {
        job.disability_names().any(|name| {
            let name = name.to_lowercase();
            self.disabilities
                .iter()
                .any(|d| disability_names_match(d, &name))
        })
    }
}

/// Case-sensitive bidirectional containment; callers pass lowercase names.
pub fn disability_names_match(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
