//! Chat context selection: picks the handful of jobs worth showing the LLM.
//!
//! Disability support dominates: each user disability a job supports is worth
//! more than every text signal combined. Jobs the user already applied to are
//! hidden unless the message is about applications.

use std::cmp::Reverse;

use serde::Serialize;

use crate::models::job::Job;
use crate::models::profile::UserProfile;
use crate::search::ranker::disability_names_match;

pub const MAX_CHAT_JOBS: usize = 5;

const DISABILITY_WEIGHT: u32 = 10;
const TITLE_WORD_WEIGHT: u32 = 2;
const TITLE_JOB_KEYWORD_WEIGHT: u32 = 1;
const DESCRIPTION_WORD_WEIGHT: u32 = 1;
const SKILL_WEIGHT: u32 = 2;

/// Message words shorter than this many characters (plus one) are ignored.
const MIN_WORD_CHARS: usize = 4;

pub const JOB_KEYWORDS: &[&str] = &[
    "python",
    "javascript",
    "developer",
    "programmer",
    "engineer",
    "remote",
    "full-time",
    "part-time",
    "contract",
    "data entry",
    "customer service",
    "writer",
    "designer",
    "manager",
    "assistant",
    "specialist",
    "analyst",
];

pub const APPLICATION_INTENT_PHRASES: &[&str] =
    &["applied", "application", "my applications", "status"];

/// Flattened job as shown to the chat pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCandidate {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub remote_type: String,
    pub requirements: Vec<String>,
    pub disability_support: Vec<String>,
    pub has_applied: bool,
}

impl ChatCandidate {
    pub fn from_job(job: &Job, has_applied: bool) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            description: job.description.clone(),
            company: job.company_name().unwrap_or("Unknown").to_string(),
            location: job
                .location
                .as_ref()
                .and_then(|l| l.display())
                .unwrap_or_else(|| "Remote".to_string()),
            employment_type: job.employment_type.to_string(),
            remote_type: job.remote_type.to_string(),
            requirements: job.requirements.clone(),
            disability_support: job.disability_names().map(str::to_string).collect(),
            has_applied,
        }
    }

    /// How many of `user_disabilities` (lowercase) this job supports.
    pub fn disability_match_count(&self, user_disabilities: &[String]) -> usize {
        let supported: Vec<String> = self
            .disability_support
            .iter()
            .map(|d| d.to_lowercase())
            .collect();
        user_disabilities
            .iter()
            .filter(|ud| supported.iter().any(|sd| disability_names_match(ud, sd)))
            .count()
    }
}

/// Whether the message asks about the user's own applications.
pub fn has_application_intent(message: &str) -> bool {
    let lower = message.to_lowercase();
    APPLICATION_INTENT_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// Returns at most `MAX_CHAT_JOBS` candidates, highest weight first. Candidates
/// with weight zero are dropped; equal weights keep their input order.
pub fn select_chat_context(
    candidates: Vec<ChatCandidate>,
    message: &str,
    profile: Option<&UserProfile>,
) -> Vec<ChatCandidate> {
    let message_lower = message.to_lowercase();
    let words: Vec<&str> = message_lower
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect();
    let job_keywords: Vec<&str> = JOB_KEYWORDS
        .iter()
        .copied()
        .filter(|k| message_lower.contains(k))
        .collect();
    let intent = has_application_intent(message);

    let disabilities = profile
        .map(UserProfile::lowercase_disabilities)
        .unwrap_or_default();
    let skills = profile
        .map(UserProfile::lowercase_skills)
        .unwrap_or_default();

    let mut weighted: Vec<(ChatCandidate, u32)> = candidates
        .into_iter()
        .filter(|c| intent || !profile.is_some_and(|p| p.has_applied(c.id)))
        .map(|c| {
            let weight = candidate_weight(&c, &words, &job_keywords, &disabilities, &skills);
            (c, weight)
        })
        .filter(|(_, weight)| *weight > 0)
        .collect();

    weighted.sort_by_key(|(_, weight)| Reverse(*weight));

    weighted
        .into_iter()
        .take(MAX_CHAT_JOBS)
        .map(|(c, _)| c)
        .collect()
}

fn candidate_weight(
    candidate: &ChatCandidate,
    words: &[&str],
    job_keywords: &[&str],
    disabilities: &[String],
    skills: &[String],
) -> u32 {
    let mut weight = 0;

    weight += DISABILITY_WEIGHT * candidate.disability_match_count(disabilities) as u32;

    let title = candidate.title.to_lowercase();
    if words.iter().any(|w| title.contains(w)) {
        weight += TITLE_WORD_WEIGHT;
    }
    if job_keywords.iter().any(|k| title.contains(k)) {
        weight += TITLE_JOB_KEYWORD_WEIGHT;
    }

    let description = candidate.description.to_lowercase();
    if words.iter().any(|w| description.contains(w)) {
        weight += DESCRIPTION_WORD_WEIGHT;
    }

    if !skills.is_empty() {
        let requirements = candidate.requirements.join(" ").to_lowercase();
        if skills.iter().any(|s| requirements.contains(s.as_str())) {
            weight += SKILL_WEIGHT;
        }
    }

    weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, title: &str, disabilities: &[&str], has_applied: bool) -> ChatCandidate {
        ChatCandidate {
            id,
            title: title.to_string(),
            description: String::new(),
            company: "Unknown".to_string(),
            location: "Remote".to_string(),
            employment_type: "full-time".to_string(),
            remote_type: "remote".to_string(),
            requirements: vec![],
            disability_support: disabilities.iter().map(|d| d.to_string()).collect(),
            has_applied,
        }
    }

    fn profile(disabilities: &[&str], applied: &[i64]) -> UserProfile {
        UserProfile {
            disabilities: disabilities.iter().map(|d| d.to_string()).collect(),
            applied_job_ids: applied.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn ids(selected: &[ChatCandidate]) -> Vec<i64> {
        selected.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_anxiety_scenario() {
        let user = profile(&["Anxiety Disorder"], &[2]);
        let candidates = vec![
            candidate(3, "Warehouse Picker", &["Mobility Impairment"], false),
            candidate(1, "Bookkeeper", &["Anxiety Disorder", "Depression"], false),
            candidate(2, "Receptionist", &["Anxiety Disorder"], true),
        ];
        let selected =
            select_chat_context(candidates, "I have anxiety, what jobs fit me?", Some(&user));
        assert_eq!(ids(&selected), vec![1]);
    }

    #[test]
    fn test_application_intent_keeps_applied_jobs() {
        let user = profile(&["Deaf"], &[2]);
        let candidates = vec![candidate(2, "Receptionist", &["Deaf"], true)];
        let selected =
            select_chat_context(candidates, "What is the status of my application?", Some(&user));
        assert_eq!(ids(&selected), vec![2]);
    }

    #[test]
    fn test_never_more_than_five() {
        let user = profile(&["Deaf"], &[]);
        let candidates: Vec<ChatCandidate> = (1..=9)
            .map(|i| candidate(i, "Clerk", &["Deaf"], false))
            .collect();
        let selected = select_chat_context(candidates, "hello", Some(&user));
        assert_eq!(ids(&selected), vec![1, 2, 3, 4, 5], "stable on ties");
    }

    #[test]
    fn test_zero_weight_dropped() {
        let candidates = vec![candidate(1, "Cashier", &[], false)];
        assert!(select_chat_context(candidates, "hello there", None).is_empty());
    }

    #[test]
    fn test_text_signals_without_profile() {
        let mut described = candidate(1, "Clerk", &[], false);
        described.description = "Remote python scripting".to_string();
        let titled = candidate(2, "Python Developer", &[], false);

        // title word (+2) and job keyword (+1) beat description word (+1)
        let selected =
            select_chat_context(vec![described, titled], "any python roles?", None);
        assert_eq!(ids(&selected), vec![2, 1]);
    }

    #[test]
    fn test_short_words_are_ignored() {
        let titled = candidate(1, "Art Lead", &[], false);
        assert!(select_chat_context(vec![titled], "art job", None).is_empty());
    }

    #[test]
    fn test_disability_weight_scales_with_matches() {
        let user = profile(&["deaf", "anxiety"], &[]);
        let one = candidate(1, "Clerk", &["Deaf"], false);
        let two = candidate(2, "Clerk", &["Deaf", "Anxiety"], false);
        assert_eq!(one.disability_match_count(&user.lowercase_disabilities()), 1);
        assert_eq!(two.disability_match_count(&user.lowercase_disabilities()), 2);
        let selected = select_chat_context(vec![one, two], "hi", Some(&user));
        assert_eq!(ids(&selected), vec![2, 1]);
    }

    #[test]
    fn test_skill_match_in_requirements() {
        let user = UserProfile {
            skills: vec!["Excel".to_string()],
            ..Default::default()
        };
        let mut c = candidate(1, "Clerk", &[], false);
        c.requirements = vec!["Advanced Excel".to_string()];
        assert_eq!(ids(&select_chat_context(vec![c], "hi", Some(&user))), vec![1]);
    }

    #[test]
    fn test_from_job_defaults() {
        let job = Job {
            id: 4,
            title: "Clerk".into(),
            description: String::new(),
            employment_type: Default::default(),
            remote_type: Default::default(),
            company: None,
            location: None,
            requirements: vec![],
            disability_support: vec![],
            posted_at: None,
        };
        let c = ChatCandidate::from_job(&job, true);
        assert_eq!(c.company, "Unknown");
        assert_eq!(c.location, "Remote");
        assert_eq!(c.employment_type, "full-time");
        assert!(c.has_applied);
    }
}
