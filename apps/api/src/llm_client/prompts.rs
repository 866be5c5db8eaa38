// Prompt fragments shared by every chat backend.
// Relevance-specific prompts live in relevance/prompts.rs.

/// Cheap liveness probe sent right after a session is established.
pub const VERIFICATION_PROMPT: &str = "Hi";
