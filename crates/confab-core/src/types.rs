//! Shared types for confab-core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agents::AgentProfile;

/// The human side of a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: avatar.into(),
        }
    }
}

/// One message inside a chat group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_avatar: String,
    pub timestamp: DateTime<Utc>,
    pub is_agent: bool,
}

impl ChatMessage {
    pub fn new(
        content: impl Into<String>,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        sender_avatar: impl Into<String>,
        is_agent: bool,
    ) -> Self {
        Self {
            id: format!("msg-{}", Uuid::new_v4()),
            content: content.into(),
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            sender_avatar: sender_avatar.into(),
            timestamp: Utc::now(),
            is_agent,
        }
    }

    pub fn from_user(user: &UserProfile, content: impl Into<String>) -> Self {
        Self::new(content, &user.id, &user.name, &user.avatar, false)
    }

    pub fn from_agent(agent: &AgentProfile, content: impl Into<String>) -> Self {
        Self::new(content, &agent.id, &agent.name, &agent.avatar, true)
    }
}

/// A conversation participant — the human user or an agent persona
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Participant {
    Human(UserProfile),
    Agent(AgentProfile),
}

impl Participant {
    pub fn id(&self) -> &str {
        match self {
            Self::Human(user) => &user.id,
            Self::Agent(agent) => &agent.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Human(user) => &user.name,
            Self::Agent(agent) => &agent.name,
        }
    }

    pub fn as_agent(&self) -> Option<&AgentProfile> {
        match self {
            Self::Agent(agent) => Some(agent),
            Self::Human(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_unique() {
        let user = UserProfile::new("user-1", "当前用户", "User");
        let a = ChatMessage::from_user(&user, "你好");
        let b = ChatMessage::from_user(&user, "你好");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("msg-"));
        assert!(!a.is_agent);
    }

    #[test]
    fn test_agent_message_flagged() {
        let agent = AgentProfile::new("agent-1", "Direct Solver");
        let msg = ChatMessage::from_agent(&agent, "回复");
        assert!(msg.is_agent);
        assert_eq!(msg.sender_id, "agent-1");
        assert_eq!(msg.sender_name, "Direct Solver");
    }

    #[test]
    fn test_participant_accessors() {
        let human = Participant::Human(UserProfile::new("user-1", "当前用户", "User"));
        let agent = Participant::Agent(AgentProfile::new("agent-1", "Direct Solver"));

        assert_eq!(human.id(), "user-1");
        assert_eq!(agent.id(), "agent-1");
        assert!(human.as_agent().is_none());
        assert_eq!(agent.as_agent().unwrap().id, "agent-1");
    }
}
