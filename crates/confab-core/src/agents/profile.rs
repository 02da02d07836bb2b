//! Agent profile — a persona definition with display and matching metadata

use serde::{Deserialize, Serialize};

/// A configured persona. The identifier is unique across the catalog and
/// never changes after creation; it keys both response-rule lookup and
/// group-membership tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    /// Icon name or image URL
    pub avatar: String,
    /// Free-text persona description shown to humans; never interpreted
    pub meta_prompt: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub downloads: Option<u64>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_installed: bool,
}

impl AgentProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: String::new(),
            meta_prompt: String::new(),
            category: None,
            description: None,
            tags: Vec::new(),
            rating: None,
            downloads: None,
            is_new: false,
            is_installed: false,
        }
    }
}

/// Fields a user supplies when creating a custom agent; the catalog fills
/// in the identifier and status flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDraft {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub meta_prompt: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_profile_new() {
        let profile = AgentProfile::new("agent-1", "Direct Solver");
        assert_eq!(profile.id, "agent-1");
        assert_eq!(profile.name, "Direct Solver");
        assert!(profile.tags.is_empty());
        assert!(!profile.is_installed);
        assert!(profile.downloads.is_none());
    }

    #[test]
    fn test_profile_deserializes_with_missing_optionals() {
        let json = r#"{"id": "x", "name": "X", "avatar": "", "meta_prompt": ""}"#;
        let profile: AgentProfile = serde_json::from_str(json).unwrap();
        assert!(profile.category.is_none());
        assert!(profile.description.is_none());
        assert!(profile.tags.is_empty());
        assert!(!profile.is_installed);
    }
}
