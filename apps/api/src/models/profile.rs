use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent applications kept on a profile.
pub const RECENT_APPLICATIONS_CAP: usize = 10;

/// One of the user's recent applications, newest first on the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub job_id: i64,
    pub job_title: String,
    pub status: String,
    pub applied_at: Option<DateTime<Utc>>,
}

/// Per-request view of a job seeker, built by the profile loader.
///
/// Every field may be empty; an empty profile scores like no profile at all
/// except for the default-branch base score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub disabilities: Vec<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub preferred_job_type: Option<String>,
    pub applied_job_ids: HashSet<i64>,
    pub recent_applications: Vec<ApplicationSummary>,
}

impl UserProfile {
    /// Records recent applications, keeping the newest `RECENT_APPLICATIONS_CAP`.
    /// Every given application counts towards `applied_job_ids`.
    pub fn with_applications(mut self, mut applications: Vec<ApplicationSummary>) -> Self {
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        self.applied_job_ids
            .extend(applications.iter().map(|a| a.job_id));
        applications.truncate(RECENT_APPLICATIONS_CAP);
        self.recent_applications = applications;
        self
    }

    pub fn has_applied(&self, job_id: i64) -> bool {
        self.applied_job_ids.contains(&job_id)
    }

    pub(crate) fn lowercase_disabilities(&self) -> Vec<String> {
        self.disabilities.iter().map(|d| d.to_lowercase()).collect()
    }

    pub(crate) fn lowercase_skills(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.to_lowercase()).collect()
    }

    /// Preferred job type, lowercased and trimmed; `None` when unset or blank.
    pub(crate) fn preferred_type(&self) -> Option<String> {
        self.preferred_job_type
            .as_deref()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
    }
}
