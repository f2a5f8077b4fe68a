// Job assistant: context selection, prompt building and the chat turn itself.
// All completions go through the CompletionService held in AppState.

pub mod assistant;
pub mod context_selector;
pub mod handlers;
pub mod prompts;
