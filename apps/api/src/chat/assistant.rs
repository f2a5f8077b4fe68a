//! Job assistant: orchestrates one chat turn.
//!
//! Flow: load profile → load recent jobs → select context → build prompt →
//!       completion → strip emoji → cap length.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::chat::context_selector::{select_chat_context, ChatCandidate};
use crate::chat::prompts::{build_chat_prompt, CHAT_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::models::profile::UserProfile;
use crate::store::JobStore;

/// Jobs considered per chat turn before selection.
pub const CHAT_CANDIDATE_POOL: usize = 50;

pub const MAX_ANSWER_WORDS: usize = 100;

/// Emoticons, pictographs, transport and map symbols, flags, dingbats,
/// supplemental symbols, plus the emoji variation selector and ZWJ.
static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        "[",
        r"\x{1F600}-\x{1F64F}",
        r"\x{1F300}-\x{1F5FF}",
        r"\x{1F680}-\x{1F6FF}",
        r"\x{1F1E0}-\x{1F1FF}",
        r"\x{1F900}-\x{1FAFF}",
        r"\x{2702}-\x{27B0}",
        r"\x{FE0F}\x{200D}",
        "]+",
    ))
    .expect("static regex compiles")
});

/// Answers `message` for an optional user.
///
/// A profile that fails to load degrades to an anonymous chat; failing to load
/// jobs or to get a completion is an error.
pub async fn answer_chat(
    store: &dyn JobStore,
    llm: &dyn CompletionService,
    user_id: Option<i64>,
    message: &str,
) -> Result<String, AppError> {
    let profile = match user_id {
        Some(id) => load_profile_or_anonymous(store, id).await,
        None => None,
    };

    let jobs = store.list_jobs(CHAT_CANDIDATE_POOL).await?;
    let candidates: Vec<ChatCandidate> = jobs
        .iter()
        .map(|job| {
            let applied = profile.as_ref().is_some_and(|p| p.has_applied(job.id));
            ChatCandidate::from_job(job, applied)
        })
        .collect();

    let selected = select_chat_context(candidates, message, profile.as_ref());
    info!(
        user_id,
        pool = jobs.len(),
        selected = selected.len(),
        "selected chat context"
    );

    let prompt = build_chat_prompt(message, profile.as_ref(), &selected);

    let raw = llm
        .complete(CHAT_SYSTEM, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Chat completion failed: {e}")))?;

    Ok(postprocess_answer(&raw))
}

async fn load_profile_or_anonymous(store: &dyn JobStore, user_id: i64) -> Option<UserProfile> {
    match store.load_profile(user_id).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(user_id, "failed to load user profile, continuing without it: {e}");
            None
        }
    }
}

/// Strips emoji, then caps the answer at `MAX_ANSWER_WORDS` words.
pub fn postprocess_answer(raw: &str) -> String {
    let stripped = EMOJI.replace_all(raw, "");
    cap_words(stripped.trim(), MAX_ANSWER_WORDS)
}

/// Keeps the text untouched when it has at most `max` words; otherwise the
/// first `max` words joined by single spaces, followed by "...".
pub fn cap_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max {
        return text.to_string();
    }
    format!("{}...", words[..max].join(" "))
}
