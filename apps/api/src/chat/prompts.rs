// Prompt constants and formatting for the job assistant.

use crate::chat::context_selector::{ChatCandidate, MAX_CHAT_JOBS};
use crate::models::profile::UserProfile;

/// System prompt: short, bullet-point answers, no emoji, disability-first.
pub const CHAT_SYSTEM: &str = "You are a helpful job assistant for people with disabilities. \
You have access to the user's profile, their application history, and a curated list of relevant job listings.

CRITICAL RESPONSE FORMAT:
- NO EMOJIS - Never use emojis in your responses
- NO PARAGRAPHS - Use bullet points, short sentences, or concise summaries
- BE CONCISE - Keep responses brief and to the point
- USE BULLET POINTS - Format information as lists when possible
- SHORT SENTENCES - Maximum 15-20 words per sentence

IMPORTANT GUIDELINES:
- Prioritize jobs that support the user's specific disabilities
- Consider the user's application history - don't recommend jobs they've already applied to (unless they ask)
- Match jobs to user's skills and preferences
- Be personalized and specific - mention why each job is good for their disability
- Recommend 2-3 best matching jobs with specific details (title, company, key requirements)
- Explain how each job accommodates their disability in brief points
- Always mention specific job titles and companies when recommending jobs
- Quality over quantity - don't overwhelm the user with options";

/// Replace `{user_context}` and `{message}` before sending.
pub const CHAT_PROMPT_TEMPLATE: &str = r#"User Context:
{user_context}

User Question: {message}

CRITICAL RESPONSE FORMAT REQUIREMENTS:
- NO EMOJIS - Do not use any emojis in your response
- NO PARAGRAPHS - Use bullet points or short sentences only
- BE CONCISE - Keep response brief and summary-style
- MAXIMUM 100 words total response length
- Use bullet points for job recommendations
- One short sentence per point

CRITICAL INSTRUCTIONS:
1. Disability Matching: Prioritize jobs marked "PERFECT MATCH" - these support the user's specific disabilities
2. Application History: Don't recommend jobs marked "(Already Applied)" unless user specifically asks about them
3. Personalization: Briefly explain why each job matches their disability
4. Recommendations: Suggest 2-3 best matching jobs that support their disabilities
5. Be Specific: Mention job title, company, and accommodation in brief points
6. Be Supportive: Acknowledge their disability briefly
7. Keep Focused: Don't list all jobs - only the best matches
8. Format: Use bullet points, no paragraphs, no emojis, concise summary style"#;

pub const NO_JOBS_FOUND: &str = "No matching jobs found in the database.";

const APPLIED_TITLES_SHOWN: usize = 5;
const LISTED_REQUIREMENTS: usize = 3;
const LISTED_SUPPORTS: usize = 3;

/// Builds the user-turn prompt from the profile, the selected jobs and the message.
pub fn build_chat_prompt(
    message: &str,
    profile: Option<&UserProfile>,
    jobs: &[ChatCandidate],
) -> String {
    let mut lines: Vec<String> = profile.map(profile_context).unwrap_or_default();

    if jobs.is_empty() {
        lines.push(format!("\nNote: {NO_JOBS_FOUND}"));
    } else {
        let disabilities = profile
            .map(UserProfile::lowercase_disabilities)
            .unwrap_or_default();
        lines.push(format!(
            "\nAvailable Job Listings (sorted by relevance to user's disabilities):\n{}",
            format_jobs_for_context(jobs, &disabilities)
        ));
    }

    CHAT_PROMPT_TEMPLATE
        .replace("{user_context}", &lines.join("\n"))
        .replace("{message}", message)
}

fn profile_context(profile: &UserProfile) -> Vec<String> {
    let mut lines = Vec::new();

    if !profile.disabilities.is_empty() {
        lines.push(format!("USER DISABILITIES: {}", profile.disabilities.join(", ")));
        lines.push("CRITICAL: Prioritize jobs that support these specific disabilities".to_string());
    }

    if !profile.recent_applications.is_empty() {
        let titles: Vec<&str> = profile
            .recent_applications
            .iter()
            .take(APPLIED_TITLES_SHOWN)
            .map(|a| a.job_title.as_str())
            .collect();
        lines.push(format!(
            "Jobs user has already applied to: {}",
            titles.join(", ")
        ));
        lines.push(
            "NOTE: Don't recommend these jobs unless user specifically asks about them".to_string(),
        );
    }

    if !profile.skills.is_empty() {
        lines.push(format!("User skills: {}", profile.skills.join(", ")));
    }
    if let Some(location) = profile.location.as_deref().filter(|l| !l.trim().is_empty()) {
        lines.push(format!("User location: {location}"));
    }
    if let Some(job_type) = profile
        .preferred_job_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
    {
        lines.push(format!("Preferred job type: {job_type}"));
    }

    lines
}

/// Renders up to five jobs as prompt text. With known disabilities, jobs that
/// support more of them come first and already-applied jobs sink within a tier.
pub fn format_jobs_for_context(jobs: &[ChatCandidate], user_disabilities: &[String]) -> String {
    if jobs.is_empty() {
        return NO_JOBS_FOUND.to_string();
    }

    let mut ordered: Vec<(&ChatCandidate, usize)> = jobs
        .iter()
        .map(|j| (j, j.disability_match_count(user_disabilities)))
        .collect();
    if !user_disabilities.is_empty() {
        ordered.sort_by_key(|(job, matches)| (std::cmp::Reverse(*matches), job.has_applied));
    }

    ordered
        .into_iter()
        .take(MAX_CHAT_JOBS)
        .map(|(job, matches)| format_job(job, matches > 0))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_job(job: &ChatCandidate, perfect_match: bool) -> String {
    let marker = if perfect_match { "PERFECT MATCH - " } else { "" };
    let applied = if job.has_applied { " (Already Applied)" } else { "" };

    let requirements = job
        .requirements
        .iter()
        .take(LISTED_REQUIREMENTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let support = if job.disability_support.is_empty() {
        "Not specified".to_string()
    } else {
        job.disability_support
            .iter()
            .take(LISTED_SUPPORTS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "{marker}Job #{id}: {title} at {company}{applied}\n\
         Location: {location} | Type: {employment} ({remote})\n\
         Key Requirements: {requirements}\n\
         Disability Support: {support}\n",
        id = job.id,
        title = job.title,
        company = job.company,
        location = job.location,
        employment = job.employment_type,
        remote = job.remote_type,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ApplicationSummary;

    fn candidate(id: i64, disabilities: &[&str], has_applied: bool) -> ChatCandidate {
        ChatCandidate {
            id,
            title: format!("Job {id}"),
            description: String::new(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            employment_type: "part-time".to_string(),
            remote_type: "remote".to_string(),
            requirements: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            disability_support: disabilities.iter().map(|d| d.to_string()).collect(),
            has_applied,
        }
    }

    #[test]
    fn test_empty_jobs_render_placeholder() {
        assert_eq!(format_jobs_for_context(&[], &[]), NO_JOBS_FOUND);
        let prompt = build_chat_prompt("hi", None, &[]);
        assert!(prompt.contains(NO_JOBS_FOUND));
        assert!(prompt.contains("User Question: hi"));
    }

    #[test]
    fn test_job_block_layout() {
        let text = format_jobs_for_context(&[candidate(7, &[], true)], &[]);
        assert!(text.starts_with("Job #7: Job 7 at Acme (Already Applied)\n"));
        assert!(text.contains("Location: Remote | Type: part-time (remote)"));
        assert!(text.contains("Key Requirements: a, b, c\n"));
        assert!(text.contains("Disability Support: Not specified"));
    }

    #[test]
    fn test_matching_jobs_first_and_marked() {
        let jobs = vec![
            candidate(1, &["Blind"], false),
            candidate(2, &["Deaf"], true),
            candidate(3, &["Deaf"], false),
        ];
        let text = format_jobs_for_context(&jobs, &["deaf".to_string()]);
        let pos = |needle: &str| text.find(needle).unwrap();
        assert!(pos("Job #3:") < pos("Job #2:"));
        assert!(pos("Job #2:") < pos("Job #1:"));
        assert!(text.contains("PERFECT MATCH - Job #3:"));
        assert!(!text.contains("PERFECT MATCH - Job #1:"));
    }

    #[test]
    fn test_at_most_five_jobs_listed() {
        let jobs: Vec<ChatCandidate> = (1..=7).map(|i| candidate(i, &[], false)).collect();
        let text = format_jobs_for_context(&jobs, &[]);
        assert_eq!(text.matches("Job #").count(), 5);
    }

    #[test]
    fn test_profile_context_lines() {
        let profile = UserProfile {
            disabilities: vec!["Deaf".into()],
            skills: vec!["Excel".into(), "Typing".into()],
            location: Some("Accra".into()),
            preferred_job_type: Some("remote".into()),
            ..Default::default()
        }
        .with_applications(vec![ApplicationSummary {
            job_id: 9,
            job_title: "Cashier".into(),
            status: "pending".into(),
            applied_at: None,
        }]);

        let prompt = build_chat_prompt("any jobs?", Some(&profile), &[candidate(1, &["Deaf"], false)]);
        assert!(prompt.contains("USER DISABILITIES: Deaf"));
        assert!(prompt.contains("Jobs user has already applied to: Cashier"));
        assert!(prompt.contains("User skills: Excel, Typing"));
        assert!(prompt.contains("User location: Accra"));
        assert!(prompt.contains("Preferred job type: remote"));
        assert!(prompt.contains("PERFECT MATCH - Job #1"));
    }
}
