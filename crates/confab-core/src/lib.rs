//! confab-core - The engine behind confab's multi-agent conversations
//!
//! This crate provides:
//! - Keyword extraction and installed-agent selection for auto-created
//!   conversation groups
//! - Deterministic per-persona response synthesis (a stand-in for a real
//!   generative backend, keyed by agent identifier with a fallback rule)
//! - The agent catalog with install/uninstall/create/update bookkeeping
//! - In-memory conversation groups and the orchestrator that schedules
//!   staggered agent replies
//!
//! The engine functions are pure and synchronous; all async work lives in
//! the orchestrator and the reply runner.

pub mod agent_selector;
pub mod agents;
pub mod conversation;
pub mod keywords;
pub mod orchestrator;
pub mod responder;
pub mod types;

// Re-export main types for convenience
pub use agent_selector::{DEFAULT_MAX_AGENTS, select_agents};
pub use agents::{AgentCatalog, AgentDraft, AgentProfile, CatalogError, builtin_profiles};
pub use conversation::{AgentToggle, ChatGroup, ConversationStore};
pub use keywords::extract_keywords;
pub use orchestrator::{ChatOrchestrator, GroupAppendSink, OrchestratorConfig, SendOutcome};
pub use responder::synthesize_response;
pub use types::{ChatMessage, Participant, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_exports() {
        // Just verify that all main types are exported
        let _ = std::mem::size_of::<AgentProfile>();
        let _ = std::mem::size_of::<AgentCatalog>();
        let _ = std::mem::size_of::<ChatGroup>();
        let _ = std::mem::size_of::<ChatMessage>();
        let _ = std::mem::size_of::<ChatOrchestrator>();
    }
}
